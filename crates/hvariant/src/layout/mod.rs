// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type layout information.
//!
//! A [`TypeInfo`] records everything the serialiser and accessor need to know
//! about a definite type: its alignment, its fixed size (0 if variable), and
//! for containers the layout of each child. Tuple members carry the
//! constants `(i, a, b, c)` that turn "the end of the previous variable-size
//! member" into "the start of this member" with one add, one mask and one or:
//!
//! ```text
//! start = ((end_of_member_i + a) & b) | c
//! ```
//!
//! Layouts are shared through the [`TypeInfoRegistry`].

pub mod registry;

pub use registry::{LookupStats, TypeInfoRegistry};

use crate::error::TypeError;
use crate::types::{BasicType, VariantType};
use std::sync::{Arc, Weak};

/// Container class of a layout, with child layouts where applicable.
#[derive(Debug)]
pub enum LayoutClass {
    Basic(BasicType),
    Variant,
    Array { element: Arc<TypeInfo> },
    Maybe { element: Arc<TypeInfo> },
    /// Tuples and dictionary entries.
    Tuple { members: Vec<MemberInfo> },
}

/// How the end of a tuple member is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberEnding {
    /// The member is fixed-size; it ends `fixed_size` bytes after its start.
    Fixed,
    /// Variable-size final member; it ends at the start of the offset table.
    Last,
    /// Variable-size inner member; its end is the next offset-table entry.
    Offset,
}

/// Layout of one tuple or dictionary entry member.
#[derive(Debug)]
pub struct MemberInfo {
    pub(crate) type_info: Arc<TypeInfo>,
    /// Index of the preceding variable-size member, `None` if there is none.
    pub(crate) offset_index: Option<usize>,
    pub(crate) a: usize,
    pub(crate) b: usize,
    pub(crate) c: usize,
    pub(crate) ending: MemberEnding,
}

impl MemberInfo {
    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.type_info
    }

    pub fn offset_index(&self) -> Option<usize> {
        self.offset_index
    }

    /// The `(a, b, c)` start constants.
    pub fn constants(&self) -> (usize, usize, usize) {
        (self.a, self.b, self.c)
    }

    pub fn ending(&self) -> MemberEnding {
        self.ending
    }

    /// Start of this member given the end of the member at `offset_index`
    /// (0 when there is none).
    #[inline]
    pub fn start_after(&self, prev_end: usize) -> usize {
        (prev_end.wrapping_add(self.a) & self.b) | self.c
    }
}

/// Layout of a definite type.
#[derive(Debug)]
pub struct TypeInfo {
    ty: VariantType,
    alignment: u8,
    fixed_size: usize,
    class: LayoutClass,
    /// Registry to notify on drop; dangling for pinned entries.
    pub(crate) registry: Weak<registry::RegistryInner>,
}

impl TypeInfo {
    /// Layout of `ty` from the process-wide registry.
    pub fn of(ty: &VariantType) -> Result<Arc<TypeInfo>, TypeError> {
        TypeInfoRegistry::global().get(ty)
    }

    /// Parse `type_string` and resolve its layout from the global registry.
    pub fn parse(type_string: &str) -> Result<Arc<TypeInfo>, TypeError> {
        Self::of(&VariantType::new(type_string)?)
    }

    pub fn variant_type(&self) -> &VariantType {
        &self.ty
    }

    pub fn type_string(&self) -> &str {
        self.ty.as_str()
    }

    /// Alignment in one-less form: 0, 1, 3 or 7.
    pub fn alignment(&self) -> u8 {
        self.alignment
    }

    /// Fixed size in bytes, 0 if the type is variable-size.
    pub fn fixed_size(&self) -> usize {
        self.fixed_size
    }

    pub fn is_fixed_size(&self) -> bool {
        self.fixed_size != 0
    }

    pub fn class(&self) -> &LayoutClass {
        &self.class
    }

    /// Element layout of an array or maybe.
    pub fn element(&self) -> Option<&Arc<TypeInfo>> {
        match &self.class {
            LayoutClass::Array { element } | LayoutClass::Maybe { element } => Some(element),
            _ => None,
        }
    }

    /// Member layouts of a tuple or dictionary entry (empty otherwise).
    pub fn members(&self) -> &[MemberInfo] {
        match &self.class {
            LayoutClass::Tuple { members } => members,
            _ => &[],
        }
    }

    pub fn n_members(&self) -> usize {
        self.members().len()
    }

    pub fn member(&self, index: usize) -> Option<&MemberInfo> {
        self.members().get(index)
    }

    pub fn as_basic(&self) -> Option<BasicType> {
        match self.class {
            LayoutClass::Basic(b) => Some(b),
            _ => None,
        }
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TypeInfo {}

impl Drop for TypeInfo {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.release(self.ty.as_str());
        }
    }
}

/// Shared layout of a basic type from the global registry.
pub(crate) fn basic_info(basic: BasicType) -> Arc<TypeInfo> {
    TypeInfoRegistry::global().resolve(&VariantType::basic(basic))
}

/// Round `offset` up to a multiple of `alignment + 1`.
#[inline]
pub(crate) fn align_up(offset: usize, alignment: u8) -> usize {
    let mask = alignment as usize;
    offset.wrapping_add(mask) & !mask
}

/// Build a basic layout. Used for pinned entries.
pub(crate) fn basic_layout(ty: &VariantType, basic: BasicType) -> TypeInfo {
    TypeInfo {
        ty: ty.clone(),
        alignment: basic.alignment(),
        fixed_size: basic.fixed_size(),
        class: LayoutClass::Basic(basic),
        registry: Weak::new(),
    }
}

pub(crate) fn variant_layout(ty: &VariantType) -> TypeInfo {
    TypeInfo {
        ty: ty.clone(),
        alignment: crate::config::VARIANT_ALIGNMENT,
        fixed_size: 0,
        class: LayoutClass::Variant,
        registry: Weak::new(),
    }
}

pub(crate) fn array_layout(ty: &VariantType, element: Arc<TypeInfo>, maybe: bool) -> TypeInfo {
    let alignment = element.alignment;
    let class = if maybe {
        LayoutClass::Maybe { element }
    } else {
        LayoutClass::Array { element }
    };
    TypeInfo {
        ty: ty.clone(),
        alignment,
        fixed_size: 0,
        class,
        registry: Weak::new(),
    }
}

/// Build a tuple or dictionary entry layout from its member layouts.
pub(crate) fn tuple_layout(ty: &VariantType, items: Vec<Arc<TypeInfo>>) -> TypeInfo {
    let members = generate_members(items);
    let alignment = members
        .iter()
        .fold(0u8, |acc, m| acc | m.type_info.alignment);

    let fixed_size = match members.last() {
        None => 1,
        Some(last) if last.offset_index.is_none() && last.type_info.is_fixed_size() => {
            let end = last.start_after(0) + last.type_info.fixed_size;
            align_up(end, alignment)
        }
        Some(_) => 0,
    };

    TypeInfo {
        ty: ty.clone(),
        alignment,
        fixed_size,
        class: LayoutClass::Tuple { members },
        registry: Weak::new(),
    }
}

/// Compute the `(i, a, b, c)` table for a sequence of member layouts.
///
/// `a` accumulates the padded length of whole alignment blocks since the
/// last variable member, `b` is the largest alignment seen in that run, and
/// `c` is the remaining byte offset inside the current block.
fn generate_members(items: Vec<Arc<TypeInfo>>) -> Vec<MemberInfo> {
    let n = items.len();
    let mut members = Vec::with_capacity(n);
    let mut index: Option<usize> = None;
    let (mut a, mut b, mut c) = (0usize, 0usize, 0usize);

    for (pos, item) in items.into_iter().enumerate() {
        let d = item.alignment as usize;
        let e = item.fixed_size;

        if d <= b {
            c = align_up(c, d as u8);
        } else {
            a += align_up(c, b as u8);
            b = d;
            c = 0;
        }

        // Fold whole blocks of c into a, keep the sub-alignment remainder.
        let ma = a + (!b & c);
        let mc = c & b;

        let ending = if e != 0 {
            MemberEnding::Fixed
        } else if pos + 1 == n {
            MemberEnding::Last
        } else {
            MemberEnding::Offset
        };

        members.push(MemberInfo {
            type_info: item,
            offset_index: index,
            a: ma + b,
            b: !b,
            c: mc,
            ending,
        });

        if e == 0 {
            index = Some(index.map_or(0, |i| i + 1));
            a = 0;
            b = 0;
            c = 0;
        } else {
            c += e;
        }
    }

    members
}
