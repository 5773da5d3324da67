// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container serialisation, child access and normal-form checks.
//!
//! Serialisation is two-pass: [`needed_size`] computes the exact container
//! size from the children's size hints, the caller allocates, and
//! [`serialise`] writes into the exact-size buffer. Children are supplied
//! through the [`Filler`] trait, so any representation that knows its own
//! type and size can be written.
//!
//! Reading never fails. Corrupt framing yields children that read as
//! defaults (zeros, empty strings, the unit for variants), and
//! [`is_normal`] reports whether a buffer is in the unique normal form.
//!
//! # Example
//!
//! ```
//! use hvariant::{serialiser, Serialised, TypeInfo, Value};
//!
//! let info = TypeInfo::parse("(si)").unwrap();
//! let bytes = Value::tuple(vec![Value::from("x"), Value::Int32(5)]).to_bytes();
//! assert_eq!(bytes, [0x78, 0, 0, 0, 5, 0, 0, 0, 2]);
//!
//! let view = Serialised::new(info, &bytes);
//! assert!(serialiser::is_normal(&view));
//! assert_eq!(view.child_at(1).unwrap().as_i32(), 5);
//! ```

mod array;
mod byteswap;
mod leaf;
mod maybe;
pub(crate) mod offsets;
mod tuple;
mod variant;

pub use byteswap::byteswap;
pub use leaf::is_object_path;
pub(crate) use leaf::{default_text, valid_text};

use crate::layout::{LayoutClass, TypeInfo};
use crate::serialised::Serialised;
use std::sync::Arc;

/// A child value that can write itself into a container.
pub trait Filler {
    /// Layout of the value's type.
    fn type_info(&self) -> Arc<TypeInfo>;

    /// Exact number of bytes [`Filler::write_into`] will write.
    fn size_hint(&self) -> usize;

    /// Write the serialised value. `dest.len()` equals
    /// [`Filler::size_hint`].
    fn write_into(&self, dest: &mut [u8]);
}

impl<T: Filler + ?Sized> Filler for &T {
    fn type_info(&self) -> Arc<TypeInfo> {
        (**self).type_info()
    }

    fn size_hint(&self) -> usize {
        (**self).size_hint()
    }

    fn write_into(&self, dest: &mut [u8]) {
        (**self).write_into(dest);
    }
}

/// Size of a container of type `info` holding `children`.
///
/// # Panics
///
/// If `info` is a basic type. Leaves are written by their fillers.
pub fn needed_size<C: Filler>(info: &TypeInfo, children: &[C]) -> usize {
    match info.class() {
        LayoutClass::Maybe { element } => maybe::needed_size(element, children),
        LayoutClass::Array { element } => array::needed_size(element, children),
        LayoutClass::Tuple { .. } => tuple::needed_size(info, children),
        LayoutClass::Variant => variant::needed_size(children),
        LayoutClass::Basic(_) => panic!("needed_size called on basic type '{}'", info.type_string()),
    }
}

/// Write a container of type `info` holding `children` into `dest`.
///
/// `dest.len()` must equal [`needed_size`] for the same arguments.
///
/// # Panics
///
/// If `info` is a basic type.
pub fn serialise<C: Filler>(info: &TypeInfo, dest: &mut [u8], children: &[C]) {
    debug_assert_eq!(
        dest.len(),
        needed_size(info, children),
        "destination size disagrees with needed_size for '{}'",
        info.type_string()
    );
    match info.class() {
        LayoutClass::Maybe { element } => maybe::serialise(element, dest, children),
        LayoutClass::Array { element } => array::serialise(element, dest, children),
        LayoutClass::Tuple { .. } => tuple::serialise(info, dest, children),
        LayoutClass::Variant => variant::serialise(dest, children),
        LayoutClass::Basic(_) => panic!("serialise called on basic type '{}'", info.type_string()),
    }
}

pub(crate) fn n_children(value: &Serialised<'_>) -> usize {
    match value.type_info.class() {
        LayoutClass::Maybe { element } => maybe::n_children(value, element),
        LayoutClass::Array { element } => array::n_children(value, element),
        LayoutClass::Tuple { members } => members.len(),
        LayoutClass::Variant => 1,
        LayoutClass::Basic(_) => 0,
    }
}

/// Child `index` of a container view; `index` must be below
/// [`n_children`].
pub(crate) fn get_child<'a>(value: &Serialised<'a>, index: usize) -> Option<Serialised<'a>> {
    match value.type_info.class() {
        LayoutClass::Maybe { element } => Some(maybe::get_child(value, element)),
        LayoutClass::Array { element } => Some(array::get_child(value, element, index)),
        LayoutClass::Tuple { .. } => tuple::get_child(value, index),
        LayoutClass::Variant => Some(variant::get_child(value)),
        LayoutClass::Basic(_) => None,
    }
}

/// True if `value` is in normal form.
///
/// A normal-form buffer has minimal offsets, zero padding, consistent
/// framing at every level, and valid leaves.
pub fn is_normal(value: &Serialised<'_>) -> bool {
    is_normal_view(value)
}

pub(crate) fn is_normal_view(value: &Serialised<'_>) -> bool {
    match value.type_info.class() {
        LayoutClass::Maybe { element } => maybe::is_normal(value, element),
        LayoutClass::Array { element } => array::is_normal(value, element),
        LayoutClass::Tuple { .. } => tuple::is_normal(value),
        LayoutClass::Variant => variant::is_normal(value),
        LayoutClass::Basic(basic) => {
            let Some(data) = value.data else {
                return false;
            };
            match basic {
                crate::types::BasicType::Boolean => data[0] < 2,
                b if b.is_string_like() => valid_text(*b, data).is_some(),
                _ => true,
            }
        }
    }
}

/// Normal-form copy of `value`.
///
/// Normal input is copied unchanged. Anything else is rebuilt from the
/// values its accessor reports, which substitutes defaults wherever the
/// framing or a leaf is invalid.
pub fn normalise(value: &Serialised<'_>) -> Vec<u8> {
    if let (true, Some(data)) = (is_normal_view(value), value.data) {
        return data.to_vec();
    }
    let size = value.size_hint();
    let mut out = vec![0u8; size];
    value.write_into(&mut out);
    log::trace!(
        "[serialiser] normalised '{}': {} -> {} bytes",
        value.type_info.type_string(),
        value.size,
        size
    );
    out
}
