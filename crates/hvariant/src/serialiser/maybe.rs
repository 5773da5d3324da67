// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Maybe containers.
//!
//! With a fixed-size element, `Just` is the element bytes and `Nothing` is
//! empty. With a variable-size element, `Just` is the element followed by a
//! single zero byte, so that an empty element is still distinguishable.

use super::{is_normal_view, Filler};
use crate::config::PADDING_BYTE;
use crate::layout::TypeInfo;
use crate::serialised::Serialised;
use std::sync::Arc;

pub(super) fn n_children(value: &Serialised<'_>, element: &TypeInfo) -> usize {
    if element.is_fixed_size() {
        usize::from(value.size == element.fixed_size())
    } else {
        usize::from(value.size > 0)
    }
}

pub(super) fn get_child<'a>(value: &Serialised<'a>, element: &Arc<TypeInfo>) -> Serialised<'a> {
    if element.is_fixed_size() {
        return value.child(Arc::clone(element), value.data, value.size);
    }
    let size = value.size - 1;
    let data = value.data.map(|d| &d[..size]).filter(|_| size > 0);
    value.child(Arc::clone(element), data, size)
}

pub(super) fn needed_size<C: Filler>(element: &TypeInfo, children: &[C]) -> usize {
    match children.first() {
        None => 0,
        Some(_) if element.is_fixed_size() => element.fixed_size(),
        Some(child) => child.size_hint() + 1,
    }
}

pub(super) fn serialise<C: Filler>(element: &TypeInfo, dest: &mut [u8], children: &[C]) {
    let Some(child) = children.first() else {
        return;
    };
    if element.is_fixed_size() {
        child.write_into(dest);
    } else {
        let end = dest.len() - 1;
        child.write_into(&mut dest[..end]);
        dest[end] = PADDING_BYTE;
    }
}

pub(super) fn is_normal(value: &Serialised<'_>, element: &Arc<TypeInfo>) -> bool {
    if value.size == 0 {
        return true;
    }
    if element.is_fixed_size() {
        if value.size != element.fixed_size() {
            return false;
        }
    } else if value.data.and_then(|d| d.last()) != Some(&PADDING_BYTE) {
        return false;
    }
    is_normal_view(&get_child(value, element))
}
