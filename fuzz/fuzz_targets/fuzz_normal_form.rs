// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hvariant::{serialiser, Serialised, TypeInfo};
use libfuzzer_sys::fuzz_target;

const TYPES: &[&str] = &["v", "a{sv}", "(ysai)", "aas", "m(xs)", "(qmvag)", "a(yt)"];

fn walk(view: &Serialised<'_>) {
    let _ = view.as_str();
    let _ = view.as_u64();
    for child in view.children() {
        walk(&child);
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, bytes)) = data.split_first() else {
        return;
    };
    let Ok(info) = TypeInfo::parse(TYPES[usize::from(selector) % TYPES.len()]) else {
        return;
    };
    let view = Serialised::new(info.clone(), bytes);

    // Reading corrupt data must never go out of bounds
    walk(&view);

    // Normalised output must be normal, and normal input must survive
    let normal = serialiser::normalise(&view);
    assert!(Serialised::new(info.clone(), &normal).is_normal());
    if view.is_normal() {
        assert_eq!(normal, bytes);
    }

    // Swapping twice restores the normal form
    let swapped = serialiser::byteswap(&view);
    let restored = serialiser::byteswap(&Serialised::new(info, &swapped));
    assert_eq!(restored, normal);
});
