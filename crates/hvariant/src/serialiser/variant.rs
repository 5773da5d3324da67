// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variant containers: `<value> 0x00 <type string>`.
//!
//! The type string is found by scanning backwards for the last zero byte.
//! Anything that does not decode to a definite type of the right size reads
//! as the unit `()`.

use super::{is_normal_view, Filler};
use crate::config::{self, PADDING_BYTE};
use crate::layout::{TypeInfo, TypeInfoRegistry};
use crate::serialised::Serialised;
use crate::types::{scan_type, VariantType};
use std::sync::Arc;

/// Unit stand-in for an undecodable variant body.
fn unit<'a>(value: &Serialised<'a>) -> Serialised<'a> {
    let unit = TypeInfoRegistry::global().resolve(&VariantType::unit());
    value.child(unit, None, 1)
}

/// What a variant cut off by the nesting limit normalises to: the unit
/// body, the separator and the type string `()`.
const CUT_OFF_FORM: &[u8] = b"\x00\x00()";

fn too_deep(value: &Serialised<'_>) -> bool {
    value.depth + 1 > config::runtime().limits().max_nesting_depth
}

pub(super) fn get_child<'a>(value: &Serialised<'a>) -> Serialised<'a> {
    let Some(data) = value.data.filter(|_| value.size > 0) else {
        return unit(value);
    };
    if too_deep(value) {
        log::trace!(
            "[serialiser] variant nested deeper than {} containers, reading as ()",
            config::runtime().limits().max_nesting_depth
        );
        return unit(value);
    }

    let Some(split) = data.iter().rposition(|&b| b == 0) else {
        return unit(value);
    };
    let tag = &data[split + 1..];
    let ty = match scan_type(tag) {
        Some((ty, used)) if used == tag.len() && ty.is_definite() => ty,
        _ => return unit(value),
    };

    let info = TypeInfoRegistry::global().resolve(&ty);
    if info.is_fixed_size() && info.fixed_size() != split {
        return unit(value);
    }
    let body = (split > 0).then(|| &data[..split]);
    value.child(info, body, split)
}

pub(super) fn needed_size<C: Filler>(children: &[C]) -> usize {
    children.first().map_or(0, |child| {
        let info = child.type_info();
        child.size_hint() + 1 + info.type_string().len()
    })
}

pub(super) fn serialise<C: Filler>(dest: &mut [u8], children: &[C]) {
    let Some(child) = children.first() else {
        return;
    };
    let info: Arc<TypeInfo> = child.type_info();
    let size = child.size_hint();
    child.write_into(&mut dest[..size]);
    dest[size] = PADDING_BYTE;
    dest[size + 1..].copy_from_slice(info.type_string().as_bytes());
}

pub(super) fn is_normal(value: &Serialised<'_>) -> bool {
    // Past the limit only the form normalisation writes there is normal,
    // so normalising twice changes nothing.
    if too_deep(value) {
        return value.data == Some(CUT_OFF_FORM);
    }
    let child = get_child(value);
    (child.data.is_some() || child.size == 0) && is_normal_view(&child)
}
