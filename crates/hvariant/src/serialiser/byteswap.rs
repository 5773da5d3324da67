// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Endianness conversion.
//!
//! Only scalar leaves change: every 2, 4 and 8 byte scalar is reversed.
//! Offset tables are always little-endian and are left as they are.

use super::{get_child, n_children, normalise};
use crate::serialised::Serialised;
use std::sync::Arc;

/// Byte-swapped copy of `value`.
///
/// Input that is not in normal form is normalised first, so the result is
/// always in normal form. Applying this twice to a normal buffer yields
/// the original bytes.
pub fn byteswap(value: &Serialised<'_>) -> Vec<u8> {
    let mut out = normalise(value);

    let mut scalars = Vec::new();
    {
        let view = Serialised::new(Arc::clone(&value.type_info), &out).with_depth(value.depth);
        collect_scalars(&view, out.as_ptr() as usize, &mut scalars);
    }
    for (start, len) in scalars {
        out[start..start + len].reverse();
    }
    out
}

/// Record `(offset, length)` of every multi-byte scalar under `value`.
fn collect_scalars(value: &Serialised<'_>, base: usize, scalars: &mut Vec<(usize, usize)>) {
    let Some(data) = value.data else {
        return;
    };
    let info = &value.type_info;
    // byte-aligned types contain no multi-byte scalars
    if info.alignment() == 0 {
        return;
    }
    if info.alignment() as usize + 1 == info.fixed_size() {
        scalars.push((data.as_ptr() as usize - base, info.fixed_size()));
        return;
    }
    for index in 0..n_children(value) {
        if let Some(child) = get_child(value, index) {
            collect_scalars(&child, base, scalars);
        }
    }
}
