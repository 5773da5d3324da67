// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tuples and dictionary entries.
//!
//! Members are laid out in order, each aligned to its own alignment. Every
//! variable-size member except the last records its end offset in a table
//! at the back of the container, written in reverse: the first such offset
//! occupies the final bytes. A fixed-size tuple is padded with zeros to its
//! fixed size and carries no table.

use super::offsets::{offset_size, read_offset, total_size, write_offset};
use super::{is_normal_view, Filler};
use crate::config::PADDING_BYTE;
use crate::layout::{align_up, MemberEnding, TypeInfo};
use crate::serialised::Serialised;
use std::sync::Arc;

pub(super) fn get_child<'a>(value: &Serialised<'a>, index: usize) -> Option<Serialised<'a>> {
    let member = value.type_info.member(index)?;
    let child_info = Arc::clone(&member.type_info);
    let child_fixed = child_info.fixed_size();

    // A missing fixed-size tuple: all members read as zeros.
    if value.data.is_none() && value.size != 0 {
        return Some(value.child(child_info, None, child_fixed));
    }

    let osz = offset_size(value.size);
    let slots = member.offset_index.map_or(0, |i| i + 1);

    if member.ending == MemberEnding::Offset {
        if osz * (slots + 1) > value.size {
            return Some(value.child(child_info, None, 0));
        }
    } else if osz * slots > value.size {
        return Some(value.child(child_info, None, child_fixed));
    }

    let prev_end = if slots > 0 {
        read_offset(value.data, value.size - osz * slots, osz)
    } else {
        0
    };
    let start = member.start_after(prev_end);

    let end = match member.ending {
        MemberEnding::Last => value.size - osz * slots,
        MemberEnding::Fixed => start.wrapping_add(child_fixed),
        MemberEnding::Offset => read_offset(value.data, value.size - osz * (slots + 1), osz),
    };

    match value.data {
        Some(d) if start < end && end <= value.size => {
            Some(value.child(child_info, Some(&d[start..end]), end - start))
        }
        _ => Some(value.child(child_info, None, child_fixed)),
    }
}

pub(super) fn needed_size<C: Filler>(info: &TypeInfo, children: &[C]) -> usize {
    if info.is_fixed_size() {
        return info.fixed_size();
    }
    let mut offset = 0;
    for (member, child) in info.members().iter().zip(children) {
        offset = align_up(offset, member.type_info.alignment());
        offset += if member.type_info.is_fixed_size() {
            member.type_info.fixed_size()
        } else {
            child.size_hint()
        };
    }
    let n_offsets = info
        .members()
        .last()
        .and_then(|m| m.offset_index)
        .map_or(0, |i| i + 1);
    total_size(offset, n_offsets)
}

pub(super) fn serialise<C: Filler>(info: &TypeInfo, dest: &mut [u8], children: &[C]) {
    let osz = offset_size(dest.len());
    let mut limit = dest.len();
    let mut offset = 0;
    for (member, child) in info.members().iter().zip(children) {
        let start = align_up(offset, member.type_info.alignment());
        dest[offset..start].fill(PADDING_BYTE);
        let end = start + child.size_hint();
        child.write_into(&mut dest[start..end]);
        offset = end;
        if member.ending == MemberEnding::Offset {
            limit -= osz;
            write_offset(dest, limit, offset, osz);
        }
    }
    dest[offset..limit].fill(PADDING_BYTE);
}

pub(super) fn is_normal(value: &Serialised<'_>) -> bool {
    if value.data.is_none() && value.size != 0 {
        return false;
    }
    let data = value.data.unwrap_or(&[]);
    let info = &value.type_info;
    let osz = offset_size(value.size);
    let mut offset_ptr = value.size;
    let mut offset = 0;
    let mut n_offsets = 0;

    for member in info.members() {
        let child_info = &member.type_info;
        let alignment = child_info.alignment() as usize;
        while offset & alignment != 0 {
            if offset >= value.size || data[offset] != PADDING_BYTE {
                return false;
            }
            offset += 1;
        }

        let end = match member.ending {
            MemberEnding::Fixed => offset + child_info.fixed_size(),
            MemberEnding::Last => offset_ptr,
            MemberEnding::Offset => {
                if offset_ptr < offset + osz {
                    return false;
                }
                offset_ptr -= osz;
                n_offsets += 1;
                read_offset(Some(data), offset_ptr, osz)
            }
        };
        if end < offset || end > offset_ptr {
            return false;
        }

        let slice = &data[offset..end];
        let child = value.child(
            Arc::clone(child_info),
            (!slice.is_empty()).then_some(slice),
            slice.len(),
        );
        if !is_normal_view(&child) {
            return false;
        }
        offset = end;
    }

    if info.is_fixed_size() {
        if info.n_members() == 0 {
            // the unit tuple is a single zero byte
            if data.first() != Some(&PADDING_BYTE) {
                return false;
            }
            offset += 1;
        } else {
            while offset & info.alignment() as usize != 0 {
                if data.get(offset) != Some(&PADDING_BYTE) {
                    return false;
                }
                offset += 1;
            }
        }
    }

    if offset_ptr != offset {
        return false;
    }
    // the table must use the narrowest width that fits
    info.is_fixed_size() || total_size(offset, n_offsets) == value.size
}
