// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use hvariant::types::{scan_type, string_is_valid};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Scanning must agree with whole-string validation
    if let Some((ty, used)) = scan_type(data) {
        assert_eq!(ty.as_str().as_bytes(), &data[..used]);
        if used == data.len() {
            if let Ok(text) = std::str::from_utf8(data) {
                assert!(string_is_valid(text));
            }
        }
    }
});
