// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Random type and value generators shared by the integration tests.

#![allow(dead_code)]

use hvariant::{BasicType, Serialised, Value, VariantType};

const BASIC_TAGS: &[u8] = b"bynqiuxthdsog";
const SIGNATURES: &[&str] = &["", "i", "a{sv}", "(yqs)", "aai", "v"];

pub fn ty(s: &str) -> VariantType {
    VariantType::new(s).expect("valid type string")
}

pub fn random_basic(rng: &mut fastrand::Rng) -> VariantType {
    let tag = BASIC_TAGS[rng.usize(..BASIC_TAGS.len())];
    VariantType::basic(BasicType::from_tag(tag).expect("basic tag"))
}

/// Random definite type with at most `depth` levels of nesting.
pub fn random_type(rng: &mut fastrand::Rng, depth: usize) -> VariantType {
    if depth <= 1 || rng.u8(..3) == 0 {
        return if rng.u8(..8) == 0 {
            VariantType::variant()
        } else {
            random_basic(rng)
        };
    }
    match rng.u8(..4) {
        0 => VariantType::array(&random_type(rng, depth - 1)),
        1 => VariantType::maybe(&random_type(rng, depth - 1)),
        2 => {
            let n = rng.usize(..5);
            let items: Vec<_> = (0..n).map(|_| random_type(rng, depth - 1)).collect();
            VariantType::tuple(&items)
        }
        _ => {
            let key = random_basic(rng);
            let value = random_type(rng, depth - 1);
            VariantType::dict_entry(&key, &value).expect("basic key")
        }
    }
}

fn random_text(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(..12);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

fn random_path(rng: &mut fastrand::Rng) -> String {
    let n = rng.usize(..4);
    if n == 0 {
        return "/".to_string();
    }
    (0..n)
        .map(|_| format!("/{}", rng.alphanumeric()))
        .collect()
}

/// Random value of `ty`. Arrays hold up to `max_arity` items.
pub fn random_value(
    rng: &mut fastrand::Rng,
    ty: &VariantType,
    depth: usize,
    max_arity: usize,
) -> Value {
    if let Some(basic) = ty.as_basic() {
        return match basic {
            BasicType::Boolean => Value::Boolean(rng.bool()),
            BasicType::Byte => Value::Byte(rng.u8(..)),
            BasicType::Int16 => Value::Int16(rng.i16(..)),
            BasicType::Uint16 => Value::Uint16(rng.u16(..)),
            BasicType::Int32 => Value::Int32(rng.i32(..)),
            BasicType::Uint32 => Value::Uint32(rng.u32(..)),
            BasicType::Int64 => Value::Int64(rng.i64(..)),
            BasicType::Uint64 => Value::Uint64(rng.u64(..)),
            BasicType::Handle => Value::Handle(rng.i32(..)),
            BasicType::Double => Value::Double(f64::from(rng.i32(..)) / 4.0),
            BasicType::String => Value::String(random_text(rng)),
            BasicType::ObjectPath => Value::object_path(&random_path(rng)).expect("path"),
            BasicType::Signature => {
                Value::signature(SIGNATURES[rng.usize(..SIGNATURES.len())]).expect("signature")
            }
        };
    }
    if ty.is_variant() {
        let inner_ty = random_type(rng, depth.saturating_sub(1).max(1));
        return Value::variant(random_value(rng, &inner_ty, depth.saturating_sub(1), max_arity));
    }
    if let Some(element) = ty.element() {
        let child_depth = depth.saturating_sub(1);
        return if ty.is_array() {
            let n = rng.usize(..=max_arity);
            let items = (0..n)
                .map(|_| random_value(rng, element, child_depth, max_arity))
                .collect();
            Value::array(element, items).expect("array")
        } else {
            let item = rng
                .bool()
                .then(|| random_value(rng, element, child_depth, max_arity));
            Value::maybe(element, item).expect("maybe")
        };
    }
    let items: Vec<_> = ty
        .items()
        .iter()
        .map(|item| random_value(rng, item, depth.saturating_sub(1), max_arity))
        .collect();
    if ty.is_dict_entry() {
        let mut items = items.into_iter();
        let key = items.next().expect("key");
        let value = items.next().expect("value");
        Value::dict_entry(key, value).expect("entry")
    } else {
        Value::tuple(items)
    }
}

/// Visit every node below `view`, reading every leaf.
///
/// Returns the number of nodes visited.
pub fn walk(view: &Serialised<'_>) -> usize {
    let info = view.type_info();
    match info.as_basic() {
        Some(b) if b.is_string_like() => {
            let _ = view.as_str();
        }
        Some(_) => {
            let _ = view.as_u64();
            let _ = view.as_u8();
        }
        None => {}
    }
    1 + (0..view.n_children())
        .map(|i| walk(&view.child_at(i).expect("child in range")))
        .sum::<usize>()
}

/// Hex dump for assertion messages.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
