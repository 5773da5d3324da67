// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomised round trips: serialise random value trees, read them back
// through the flat accessor, and byte-swap them twice.

mod common;

use common::{hex, random_type, random_value, ty, walk};
use hvariant::{serialiser, Filler, Serialised, Value, Variant};

fn check_round_trip(value: &Value) {
    let bytes = value.to_bytes();
    assert_eq!(bytes.len(), value.size_hint());

    let view = Serialised::new(value.type_info(), &bytes);
    assert!(
        view.is_normal(),
        "'{}' not normal: [{}]",
        value.type_string(),
        hex(&bytes)
    );
    assert_eq!(&Value::from_serialised(&view), value);
    assert_eq!(serialiser::normalise(&view), bytes);
    walk(&view);
}

#[test]
fn random_trees_depth_six() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0001);
    for _ in 0..300 {
        let t = random_type(&mut rng, 6);
        let value = random_value(&mut rng, &t, 6, 4);
        check_round_trip(&value);
    }
}

#[test]
fn wide_arrays_arity_hundred() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0002);
    for _ in 0..40 {
        let element = random_type(&mut rng, 2);
        let items = (0..100)
            .map(|_| random_value(&mut rng, &element, 2, 3))
            .collect();
        let value = Value::array(&element, items).unwrap();
        check_round_trip(&value);

        let bytes = value.to_bytes();
        let view = Serialised::new(value.type_info(), &bytes);
        assert_eq!(view.n_children(), 100);
    }
}

#[test]
fn wide_tuples() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0003);
    for _ in 0..20 {
        let items = (0..100)
            .map(|_| {
                let t = random_type(&mut rng, 3);
                random_value(&mut rng, &t, 3, 3)
            })
            .collect();
        check_round_trip(&Value::tuple(items));
    }
}

#[test]
fn byteswap_twice_restores_bytes() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_0004);
    for _ in 0..300 {
        let t = random_type(&mut rng, 6);
        let value = random_value(&mut rng, &t, 6, 4);
        let variant = Variant::from_value(&value);
        let swapped = variant.byteswap();
        assert!(swapped.is_normal_form());
        assert_eq!(swapped.size(), variant.size());
        let restored = swapped.byteswap();
        assert_eq!(restored, variant, "'{}'", value.type_string());
        assert_eq!(restored.data(), variant.data());
    }
}

#[test]
fn byteswap_changes_multibyte_scalars_only() {
    let value = Value::tuple(vec![
        Value::Byte(0xab),
        Value::Uint32(0x0102_0304),
        Value::from("ok"),
        Value::Boolean(true),
    ]);
    let variant = Variant::from_value(&value);
    let swapped = variant.byteswap();
    let fields = swapped.to_value();
    assert_eq!(
        fields.children(),
        &[
            Value::Byte(0xab),
            Value::Uint32(0x0403_0201),
            Value::from("ok"),
            Value::Boolean(true),
        ]
    );
}

#[test]
fn nested_variants_round_trip() {
    let mut value = Value::Int16(-7);
    for _ in 0..20 {
        value = Value::variant(value);
    }
    check_round_trip(&value);

    let variant = Variant::from_value(&value);
    let mut current = variant;
    for _ in 0..20 {
        assert_eq!(current.type_string(), "v");
        current = current.child_value(0).unwrap();
    }
    assert_eq!(current.as_serialised().as_i16(), -7);
}

#[test]
fn dictionary_lookup() {
    let entries = (0..50)
        .map(|i| {
            Value::dict_entry(
                Value::from(format!("key{i}")),
                Value::variant(Value::Uint64(i * 1000)),
            )
            .unwrap()
        })
        .collect();
    let dict = Value::array(&ty("{sv}"), entries).unwrap();
    let variant = Variant::from_value(&dict);

    let found = variant.lookup_value("key42", Some(&ty("t"))).unwrap();
    assert_eq!(found.as_serialised().as_u64(), 42_000);
    assert!(variant.lookup_value("key42", Some(&ty("s"))).is_none());
    assert!(variant.lookup_value("key50", None).is_none());
}

#[test]
fn variants_as_map_keys() {
    use std::collections::HashMap;

    let mut rng = fastrand::Rng::with_seed(11);
    let mut seen = HashMap::new();
    for _ in 0..200 {
        let t = random_type(&mut rng, 3);
        let value = random_value(&mut rng, &t, 3, 3);
        let bytes = value.to_bytes();
        let untrusted = Variant::from_bytes(&value.variant_type(), bytes).unwrap();
        seen.insert(Variant::from_value(&value), value);
        // an untrusted copy of the same bytes finds the same entry
        assert!(seen.contains_key(&untrusted));
    }
}
