// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array containers.
//!
//! Fixed-size elements are packed back to back with no framing. Variable-size
//! elements are each aligned to the element alignment and followed, after the
//! last element, by a table holding the end offset of every element. The
//! first table entry is found by reading the last one: the last element ends
//! where the table begins.

use super::offsets::{offset_size, read_offset, total_size, write_offset};
use super::{is_normal_view, Filler};
use crate::config::PADDING_BYTE;
use crate::layout::{align_up, TypeInfo};
use crate::serialised::Serialised;
use std::sync::Arc;

/// Start of the offset table, or `None` if the framing is corrupt.
fn table_start(value: &Serialised<'_>) -> Option<(usize, usize)> {
    let osz = offset_size(value.size);
    let last_end = read_offset(value.data, value.size - osz, osz);
    if last_end > value.size || (value.size - last_end) % osz != 0 {
        return None;
    }
    Some((last_end, osz))
}

pub(super) fn n_children(value: &Serialised<'_>, element: &TypeInfo) -> usize {
    if element.is_fixed_size() {
        let efs = element.fixed_size();
        return if value.size % efs == 0 {
            value.size / efs
        } else {
            0
        };
    }
    if value.size == 0 {
        return 0;
    }
    match table_start(value) {
        Some((last_end, osz)) => (value.size - last_end) / osz,
        None => 0,
    }
}

pub(super) fn get_child<'a>(
    value: &Serialised<'a>,
    element: &Arc<TypeInfo>,
    index: usize,
) -> Serialised<'a> {
    if element.is_fixed_size() {
        let efs = element.fixed_size();
        let data = value.data.map(|d| &d[efs * index..efs * (index + 1)]);
        return value.child(Arc::clone(element), data, efs);
    }

    let osz = offset_size(value.size);
    let last_end = read_offset(value.data, value.size - osz, osz);
    let start = if index > 0 {
        let prev = read_offset(value.data, last_end + osz * (index - 1), osz);
        align_up(prev, element.alignment())
    } else {
        0
    };
    let end = read_offset(value.data, last_end + osz * index, osz);

    match value.data {
        Some(d) if start < end && end <= value.size => {
            value.child(Arc::clone(element), Some(&d[start..end]), end - start)
        }
        _ => value.child(Arc::clone(element), None, 0),
    }
}

pub(super) fn needed_size<C: Filler>(element: &TypeInfo, children: &[C]) -> usize {
    if element.is_fixed_size() {
        return element.fixed_size() * children.len();
    }
    let body = children.iter().fold(0, |offset, child| {
        align_up(offset, element.alignment()) + child.size_hint()
    });
    total_size(body, children.len())
}

pub(super) fn serialise<C: Filler>(element: &TypeInfo, dest: &mut [u8], children: &[C]) {
    if element.is_fixed_size() {
        let efs = element.fixed_size();
        for (child, slot) in children.iter().zip(dest.chunks_exact_mut(efs)) {
            child.write_into(slot);
        }
        return;
    }

    let osz = offset_size(dest.len());
    let mut table = dest.len() - osz * children.len();
    let mut offset = 0;
    for child in children {
        let start = align_up(offset, element.alignment());
        dest[offset..start].fill(PADDING_BYTE);
        let end = start + child.size_hint();
        child.write_into(&mut dest[start..end]);
        write_offset(dest, table, end, osz);
        table += osz;
        offset = end;
    }
}

pub(super) fn is_normal(value: &Serialised<'_>, element: &Arc<TypeInfo>) -> bool {
    if element.is_fixed_size() {
        if value.size % element.fixed_size() != 0 {
            return false;
        }
        return (0..n_children(value, element))
            .all(|i| is_normal_view(&get_child(value, element, i)));
    }

    if value.size == 0 {
        return true;
    }
    let Some(data) = value.data else {
        return false;
    };
    let Some((last_end, osz)) = table_start(value) else {
        return false;
    };
    let length = (value.size - last_end) / osz;
    if length == 0 {
        return false;
    }

    let mut offset = 0;
    for i in 0..length {
        let this_end = read_offset(Some(data), last_end + osz * i, osz);
        if this_end < offset || this_end > last_end {
            return false;
        }
        while offset & element.alignment() as usize != 0 {
            if !(offset < this_end && data[offset] == PADDING_BYTE) {
                return false;
            }
            offset += 1;
        }
        let slice = &data[offset..this_end];
        let child = value.child(
            Arc::clone(element),
            (!slice.is_empty()).then_some(slice),
            slice.len(),
        );
        if !is_normal_view(&child) {
            return false;
        }
        offset = this_end;
    }
    offset == last_end && total_size(last_end, length) == value.size
}
