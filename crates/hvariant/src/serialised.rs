// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Borrowed, zero-copy views into serialised data.
//!
//! A [`Serialised`] pairs a type layout with a byte slice. Children are
//! located in constant time from the layout constants and the offset table;
//! nothing is decoded until a leaf is read. Views never fail: corrupt framing
//! produces children with absent data, which read as zeros or empty strings.

use crate::layout::TypeInfo;
use crate::serialiser::{self, default_text, valid_text, Filler};
use std::fmt;
use std::sync::Arc;

/// Generate little-endian scalar readers over [`Serialised::fixed_bytes`].
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        #[doc = concat!("Read as `", stringify!($type), "`; zero when absent.")]
        pub fn $name(&self) -> $type {
            <$type>::from_le_bytes(self.fixed_bytes::<$size>())
        }
    };
}

/// A typed view of serialised bytes.
#[derive(Clone)]
pub struct Serialised<'a> {
    pub(crate) type_info: Arc<TypeInfo>,
    /// `None` means "all zeros": the framing pointing here was invalid.
    pub(crate) data: Option<&'a [u8]>,
    pub(crate) size: usize,
    /// Containers above this view.
    pub(crate) depth: usize,
}

impl<'a> Serialised<'a> {
    /// View `bytes` as a value of `type_info`.
    ///
    /// A fixed-size type whose length does not match `bytes` is treated as
    /// absent: it reads as zeros and is not in normal form.
    pub fn new(type_info: Arc<TypeInfo>, bytes: &'a [u8]) -> Self {
        if type_info.is_fixed_size() && bytes.len() != type_info.fixed_size() {
            let size = type_info.fixed_size();
            return Self {
                type_info,
                data: None,
                size,
                depth: 0,
            };
        }
        Self {
            type_info,
            data: Some(bytes),
            size: bytes.len(),
            depth: 0,
        }
    }

    pub(crate) fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub(crate) fn child(
        &self,
        type_info: Arc<TypeInfo>,
        data: Option<&'a [u8]>,
        size: usize,
    ) -> Serialised<'a> {
        Serialised {
            type_info,
            data,
            size,
            depth: self.depth + 1,
        }
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    /// Underlying bytes, `None` when absent.
    pub fn data(&self) -> Option<&'a [u8]> {
        self.data
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Container nesting depth of this view below the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of children; 0 for leaves.
    pub fn n_children(&self) -> usize {
        serialiser::n_children(self)
    }

    /// Child at `index`, or `None` if `index >= n_children()`.
    pub fn child_at(&self, index: usize) -> Option<Serialised<'a>> {
        if index >= self.n_children() {
            return None;
        }
        serialiser::get_child(self, index)
    }

    pub fn children(&self) -> impl Iterator<Item = Serialised<'a>> + '_ {
        (0..self.n_children()).filter_map(move |i| serialiser::get_child(self, i))
    }

    /// True if this view is in normal form.
    pub fn is_normal(&self) -> bool {
        serialiser::is_normal(self)
    }

    /// The bytes of a fixed-size leaf; zeros when absent or the wrong size.
    pub fn fixed_bytes<const N: usize>(&self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(data) = self.data.filter(|d| d.len() == N) {
            out.copy_from_slice(data);
        }
        out
    }

    /// Raw elements of an array of fixed-size values.
    ///
    /// An empty array gives an empty slice. `None` for other types, and
    /// when the data is absent or not a whole number of elements.
    pub fn fixed_array(&self) -> Option<&'a [u8]> {
        let element = self
            .type_info
            .element()
            .filter(|_| self.type_info.variant_type().is_array())?;
        if !element.is_fixed_size() {
            return None;
        }
        if self.size == 0 {
            return Some(&[]);
        }
        self.data
            .filter(|data| data.len() % element.fixed_size() == 0)
    }

    /// Boolean leaf; any non-zero byte reads as `true`.
    pub fn as_bool(&self) -> bool {
        self.fixed_bytes::<1>()[0] != 0
    }

    pub fn as_u8(&self) -> u8 {
        self.fixed_bytes::<1>()[0]
    }

    impl_read_le!(as_i16, i16, 2);
    impl_read_le!(as_u16, u16, 2);
    impl_read_le!(as_i32, i32, 4);
    impl_read_le!(as_u32, u32, 4);
    impl_read_le!(as_i64, i64, 8);
    impl_read_le!(as_u64, u64, 8);
    impl_read_le!(as_f64, f64, 8);

    /// Text of a string, object path or signature leaf.
    ///
    /// Invalid data reads as the type's default: `""`, or `"/"` for object
    /// paths. Views of other types read as `""`.
    pub fn as_str(&self) -> &'a str {
        let Some(basic) = self.type_info.as_basic().filter(|b| b.is_string_like()) else {
            return "";
        };
        self.data
            .and_then(|d| valid_text(basic, d))
            .unwrap_or_else(|| default_text(basic))
    }

    /// Normal-form copy of the viewed bytes.
    pub fn to_normal_form(&self) -> Vec<u8> {
        serialiser::normalise(self)
    }
}

/// A view writes its normal form: leaves are copied with defaults
/// substituted, containers are rebuilt from their children.
impl Filler for Serialised<'_> {
    fn type_info(&self) -> Arc<TypeInfo> {
        Arc::clone(&self.type_info)
    }

    fn size_hint(&self) -> usize {
        match self.type_info.as_basic() {
            Some(basic) if basic.is_string_like() => self.as_str().len() + 1,
            Some(basic) => basic.fixed_size(),
            None => {
                let children: Vec<_> = self.children().collect();
                serialiser::needed_size(&self.type_info, &children)
            }
        }
    }

    fn write_into(&self, dest: &mut [u8]) {
        match self.type_info.as_basic() {
            Some(basic) if basic.is_string_like() => {
                let text = self.as_str().as_bytes();
                dest[..text.len()].copy_from_slice(text);
                dest[text.len()] = 0;
            }
            Some(crate::types::BasicType::Boolean) => dest[0] = u8::from(self.as_bool()),
            Some(_) => match self.data {
                Some(data) => dest.copy_from_slice(data),
                None => dest.fill(0),
            },
            None => {
                let children: Vec<_> = self.children().collect();
                serialiser::serialise(&self.type_info, dest, &children);
            }
        }
    }
}

impl fmt::Debug for Serialised<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serialised")
            .field("type", &self.type_info.type_string())
            .field("size", &self.size)
            .field("present", &self.data.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}
