// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Untrusted input: corrupted buffers must read without panicking, the
// normal-form check must agree with re-serialisation, and normalisation
// must always produce normal output.

mod common;

use common::{hex, random_type, random_value, ty, walk};
use hvariant::{serialiser, Serialised, TypeInfo, Value, Variant};

fn view<'a>(type_string: &str, bytes: &'a [u8]) -> Serialised<'a> {
    Serialised::new(TypeInfo::parse(type_string).unwrap(), bytes)
}

/// Properties every buffer must satisfy, whatever its content.
fn check_untrusted(view: &Serialised<'_>, bytes: &[u8]) {
    walk(view);

    let decoded = Value::from_serialised(view);
    let normal = serialiser::normalise(view);
    assert_eq!(
        decoded.to_bytes(),
        normal,
        "'{}' [{}]",
        view.type_info().type_string(),
        hex(bytes)
    );

    let renormalised = Serialised::new(view.type_info().clone(), &normal);
    assert!(
        renormalised.is_normal(),
        "normalised '{}' [{}] -> [{}]",
        view.type_info().type_string(),
        hex(bytes),
        hex(&normal)
    );

    if view.is_normal() {
        assert_eq!(normal, bytes, "normal input must survive unchanged");
    }
}

#[test]
fn single_byte_mutations() {
    let mut rng = fastrand::Rng::with_seed(0xbad_0001);
    for _ in 0..400 {
        let t = random_type(&mut rng, 4);
        let value = random_value(&mut rng, &t, 4, 4);
        let mut bytes = value.to_bytes();
        if bytes.is_empty() {
            continue;
        }
        for _ in 0..8 {
            let at = rng.usize(..bytes.len());
            bytes[at] = rng.u8(..);
            let info = TypeInfo::of(&t).unwrap();
            check_untrusted(&Serialised::new(info, &bytes), &bytes);
        }
    }
}

#[test]
fn truncated_and_extended_buffers() {
    let mut rng = fastrand::Rng::with_seed(0xbad_0002);
    for _ in 0..200 {
        let t = random_type(&mut rng, 4);
        let value = random_value(&mut rng, &t, 4, 4);
        let bytes = value.to_bytes();
        let info = TypeInfo::of(&t).unwrap();

        let cut = rng.usize(..=bytes.len());
        check_untrusted(&Serialised::new(info.clone(), &bytes[..cut]), &bytes[..cut]);

        let mut longer = bytes.clone();
        longer.extend((0..rng.usize(1..5)).map(|_| rng.u8(..)));
        check_untrusted(&Serialised::new(info, &longer), &longer);
    }
}

#[test]
fn random_garbage() {
    let mut rng = fastrand::Rng::with_seed(0xbad_0003);
    for _ in 0..500 {
        let t = random_type(&mut rng, 4);
        let len = rng.usize(..64);
        let bytes: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
        let info = TypeInfo::of(&t).unwrap();
        check_untrusted(&Serialised::new(info, &bytes), &bytes);
    }
}

#[test]
fn nonzero_padding_is_not_normal() {
    // (yi) with a non-zero padding byte
    let bytes = [1, 0xff, 0, 0, 2, 0, 0, 0];
    let v = view("(yi)", &bytes);
    assert!(!v.is_normal());
    assert_eq!(serialiser::normalise(&v), [1, 0, 0, 0, 2, 0, 0, 0]);
    assert_eq!(v.child_at(1).unwrap().as_i32(), 2);
}

#[test]
fn oversized_offsets_are_not_normal() {
    // as [253 x 'x'] with a 2-byte offset where 1 byte suffices
    let mut bytes = vec![b'x'; 253];
    bytes.extend([0, 254, 0]);
    let v = view("as", &bytes);
    assert_eq!(v.n_children(), 1);
    assert_eq!(v.child_at(0).unwrap().as_str().len(), 253);
    assert!(!v.is_normal());

    let normal = serialiser::normalise(&v);
    assert_eq!(normal.len(), 255);
    assert_eq!(normal[..254], bytes[..254]);
    assert_eq!(normal[254], 254);
    check_untrusted(&v, &bytes);
}

#[test]
fn offsets_past_the_body_read_as_empty() {
    // as ["ab", "c"] with the first offset pointing past the body
    let bytes = [b'a', b'b', 0, b'c', 0, 7, 5];
    let v = view("as", &bytes);
    assert!(!v.is_normal());
    assert_eq!(v.n_children(), 2);
    assert_eq!(v.child_at(0).unwrap().as_str(), "");
    assert_eq!(v.child_at(1).unwrap().as_str(), "");
    check_untrusted(&v, &bytes);
}

#[test]
fn invalid_leaves_take_defaults() {
    let v = view("(bsog)", b"\x07a\x00b\x00(\x00\x05\x03");
    assert!(!v.is_normal());
    let value = Value::from_serialised(&v);
    assert_eq!(
        value.children(),
        &[
            Value::Boolean(true),
            Value::from("a"),
            Value::ObjectPath("/".to_string()),
            Value::Signature(String::new()),
        ]
    );
    check_untrusted(&v, b"\x07a\x00b\x00(\x00\x05\x03");
}

#[test]
fn bad_variant_tags_read_as_unit() {
    let cases: &[&[u8]] = &[
        b"\x01\x00zz",       // not a type
        b"\x01\x00a*",       // indefinite
        b"\x01\x02\x00i",    // wrong size for int32
        b"\x01\x00(ii",      // unterminated
        b"\x01\x02\x03",     // no separator
        b"\x01\x00ii",       // two types
    ];
    for bytes in cases {
        let v = view("v", bytes);
        let child = v.child_at(0).unwrap();
        assert_eq!(child.type_info().type_string(), "()", "[{}]", hex(bytes));
        assert!(!v.is_normal());
        check_untrusted(&v, bytes);
    }
    assert_eq!(serialiser::normalise(&view("v", b"")), b"\x00\x00()");
}

#[test]
fn wrong_size_fixed_array() {
    // ai with 6 bytes: not a multiple of the element size
    let v = view("ai", &[1, 0, 0, 0, 2, 0]);
    assert_eq!(v.n_children(), 0);
    assert!(!v.is_normal());
    assert_eq!(serialiser::normalise(&v), Vec::<u8>::new());
}

#[test]
fn deep_variant_nesting_is_bounded() {
    let mut value = Value::Byte(1);
    for _ in 0..1000 {
        value = Value::variant(value);
    }
    let bytes = value.to_bytes();
    let v = view("v", &bytes);

    assert!(!v.is_normal());
    // the walk stops where nesting is cut off
    assert!(walk(&v) < 300);

    let variant = Variant::from_bytes(&ty("v"), bytes).unwrap();
    assert!(!variant.is_normal_form());
}

#[test]
fn shallow_nesting_is_normal() {
    let mut value = Value::Byte(1);
    for _ in 0..100 {
        value = Value::variant(value);
    }
    let bytes = value.to_bytes();
    assert!(view("v", &bytes).is_normal());
}

#[test]
fn normalising_past_the_nesting_limit_is_stable() {
    let mut value = Value::Byte(1);
    for _ in 0..200 {
        value = Value::variant(value);
    }
    let bytes = value.to_bytes();
    let deep = view("v", &bytes);
    assert!(!deep.is_normal());

    let normal = serialiser::normalise(&deep);
    let renormalised = view("v", &normal);
    assert!(renormalised.is_normal());
    assert_eq!(serialiser::normalise(&renormalised), normal);

    let swapped = serialiser::byteswap(&deep);
    assert_eq!(serialiser::byteswap(&view("v", &swapped)), normal);

    // the flag on normal_form() must agree with a fresh check
    let variant = Variant::from_bytes(&ty("v"), bytes).unwrap();
    let normal_form = variant.normal_form();
    assert!(normal_form.is_normal_form());
    let reread = Variant::from_bytes(&ty("v"), normal_form.data().unwrap().to_vec()).unwrap();
    assert!(reread.is_normal_form());
    assert_eq!(reread, variant);
}
