// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Tuple member start positions.
//
// The (a, b, c) constants must agree with a plain sequential layout
// (align, place, advance) for every residue of the previous variable-size
// member's end modulo the largest alignment.

mod common;

use common::{hex, random_basic, random_type, ty};
use hvariant::config::MAX_ALIGNMENT;
use hvariant::{Filler, Serialised, TypeInfo, Value, VariantType};
use std::sync::Arc;

fn align_up(offset: usize, alignment: u8) -> usize {
    let mask = alignment as usize;
    (offset + mask) & !mask
}

/// Sequential layout: start of every member, given the sizes of the
/// variable-size ones.
fn naive_starts(info: &TypeInfo, var_sizes: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut starts = Vec::new();
    let mut var_ends = Vec::new();
    let mut pos = 0;
    let mut var = var_sizes.iter();
    for member in info.members() {
        let member_info = member.type_info();
        let start = align_up(pos, member_info.alignment());
        let size = if member_info.is_fixed_size() {
            member_info.fixed_size()
        } else {
            let size = *var.next().expect("size for variable member");
            var_ends.push(start + size);
            size
        };
        starts.push(start);
        pos = start + size;
    }
    (starts, var_ends)
}

/// Pick a size for each variable member so that it ends on `flavour`
/// modulo `MAX_ALIGNMENT`.
fn sizes_for_flavour(info: &TypeInfo, flavour: usize, rng: &mut fastrand::Rng) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut pos = 0;
    for member in info.members() {
        let member_info = member.type_info();
        let start = align_up(pos, member_info.alignment());
        let size = if member_info.is_fixed_size() {
            member_info.fixed_size()
        } else {
            let size = (flavour + MAX_ALIGNMENT - start % MAX_ALIGNMENT) % MAX_ALIGNMENT
                + MAX_ALIGNMENT * rng.usize(..3);
            sizes.push(size);
            size
        };
        pos = start + size;
    }
    sizes
}

fn random_tuple_type(rng: &mut fastrand::Rng) -> VariantType {
    let n = rng.usize(1..9);
    let items: Vec<_> = (0..n)
        .map(|_| match rng.u8(..4) {
            0 => ty("ay"),
            1 => random_type(rng, 3),
            _ => random_basic(rng),
        })
        .collect();
    VariantType::tuple(&items)
}

#[test]
fn member_starts_match_sequential_layout() {
    let mut rng = fastrand::Rng::with_seed(0xf1a7_0001);
    for _ in 0..500 {
        let tuple = random_tuple_type(&mut rng);
        let info = TypeInfo::of(&tuple).unwrap();
        for flavour in 0..MAX_ALIGNMENT {
            let sizes = sizes_for_flavour(&info, flavour, &mut rng);
            let (starts, var_ends) = naive_starts(&info, &sizes);
            for (j, member) in info.members().iter().enumerate() {
                let prev_end = member.offset_index().map_or(0, |k| var_ends[k]);
                assert_eq!(
                    member.start_after(prev_end),
                    starts[j],
                    "member {} of '{}' after end {} (flavour {})",
                    j,
                    tuple,
                    prev_end,
                    flavour
                );
            }
        }
    }
}

#[test]
fn fixed_tuple_size_matches_sequential_layout() {
    let mut rng = fastrand::Rng::with_seed(0xf1a7_0002);
    for _ in 0..300 {
        let n = rng.usize(..8);
        let items: Vec<_> = (0..n).map(|_| random_fixed_type(&mut rng, 3)).collect();
        let tuple = VariantType::tuple(&items);
        let info = TypeInfo::of(&tuple).unwrap();
        let (starts, _) = naive_starts(&info, &[]);
        let expected = match info.members().last() {
            None => 1,
            Some(last) => align_up(
                starts[starts.len() - 1] + last.type_info().fixed_size(),
                info.alignment(),
            ),
        };
        assert_eq!(info.fixed_size(), expected, "'{}'", tuple);
        assert!(usize::from(info.alignment()) < MAX_ALIGNMENT);
    }
}

fn random_fixed_type(rng: &mut fastrand::Rng, depth: usize) -> VariantType {
    const FIXED: &[&str] = &["b", "y", "n", "q", "i", "u", "x", "t", "h", "d"];
    if depth <= 1 || rng.bool() {
        return ty(FIXED[rng.usize(..FIXED.len())]);
    }
    let n = rng.usize(..4);
    let items: Vec<_> = (0..n).map(|_| random_fixed_type(rng, depth - 1)).collect();
    VariantType::tuple(&items)
}

fn fixed_value(info: &Arc<TypeInfo>, rng: &mut fastrand::Rng) -> Value {
    match info.type_string() {
        "b" => Value::Boolean(rng.bool()),
        "y" => Value::Byte(rng.u8(..)),
        "n" => Value::Int16(rng.i16(..)),
        "q" => Value::Uint16(rng.u16(..)),
        "i" => Value::Int32(rng.i32(..)),
        "u" => Value::Uint32(rng.u32(..)),
        "x" => Value::Int64(rng.i64(..)),
        "t" => Value::Uint64(rng.u64(..)),
        "h" => Value::Handle(rng.i32(..)),
        "d" => Value::Double(f64::from(rng.u16(..))),
        other => panic!("unexpected member type {}", other),
    }
}

#[test]
fn serialised_members_read_back_for_every_flavour() {
    const MEMBERS: &[&str] = &["ay", "y", "n", "i", "x", "d", "s"];
    let mut rng = fastrand::Rng::with_seed(0xf1a7_0003);
    for _ in 0..200 {
        let n = rng.usize(1..8);
        let items: Vec<_> = (0..n)
            .map(|_| ty(MEMBERS[rng.usize(..MEMBERS.len())]))
            .collect();
        let tuple = VariantType::tuple(&items);
        let info = TypeInfo::of(&tuple).unwrap();

        for flavour in 0..MAX_ALIGNMENT {
            let sizes = sizes_for_flavour(&info, flavour, &mut rng);
            let mut var = sizes.iter();
            let values: Vec<_> = info
                .members()
                .iter()
                .map(|member| {
                    let member_info = member.type_info();
                    match member_info.type_string() {
                        "ay" => {
                            let len = *var.next().unwrap();
                            let bytes = (0..len).map(|_| Value::Byte(rng.u8(..))).collect();
                            Value::array(&ty("y"), bytes).unwrap()
                        }
                        "s" => {
                            // the terminator counts towards the size
                            let len = (*var.next().unwrap()).max(1) - 1;
                            Value::from("x".repeat(len))
                        }
                        _ => fixed_value(member_info, &mut rng),
                    }
                })
                .collect();
            let value = Value::tuple(values);
            let bytes = value.to_bytes();
            let view = Serialised::new(value.type_info(), &bytes);
            assert!(view.is_normal(), "'{}': [{}]", tuple, hex(&bytes));
            assert_eq!(Value::from_serialised(&view), value, "'{}'", tuple);
        }
    }
}
