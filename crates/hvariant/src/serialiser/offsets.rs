// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Offset table encoding.
//!
//! Offsets are little-endian unsigned integers whose width depends only on
//! the total size of the container that holds them: 1 byte up to 255, 2 up
//! to 65535, 4 up to 2^32 - 1 and 8 beyond.

/// Width of one offset in a container of `size` bytes.
#[inline]
pub(crate) fn offset_size(size: usize) -> usize {
    let size = size as u64;
    if size > u64::from(u32::MAX) {
        8
    } else if size > u64::from(u16::MAX) {
        4
    } else if size > u64::from(u8::MAX) {
        2
    } else if size > 0 {
        1
    } else {
        0
    }
}

/// Smallest container size holding `body` bytes plus `offsets` offsets.
///
/// The offset width is the smallest one for which the resulting total still
/// fits that width.
pub(crate) fn total_size(body: usize, offsets: usize) -> usize {
    let body = body as u64;
    let offsets = offsets as u64;
    let total = if body + offsets <= u64::from(u8::MAX) {
        body + offsets
    } else if body + 2 * offsets <= u64::from(u16::MAX) {
        body + 2 * offsets
    } else if body + 4 * offsets <= u64::from(u32::MAX) {
        body + 4 * offsets
    } else {
        body + 8 * offsets
    };
    total as usize
}

/// Read the offset of `width` bytes at `pos`.
///
/// Missing data and out-of-range positions read as 0, as does a zero width.
#[inline]
pub(crate) fn read_offset(data: Option<&[u8]>, pos: usize, width: usize) -> usize {
    let Some(bytes) = data.and_then(|d| d.get(pos..pos.checked_add(width)?)) else {
        return 0;
    };
    let mut le = [0u8; 8];
    le[..width].copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(le)).unwrap_or(usize::MAX)
}

/// Write `value` as a `width`-byte little-endian offset at `pos`.
#[inline]
pub(crate) fn write_offset(dest: &mut [u8], pos: usize, value: usize, width: usize) {
    let le = (value as u64).to_le_bytes();
    dest[pos..pos + width].copy_from_slice(&le[..width]);
}
