// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared registry of type layouts.
//!
//! Layouts are computed once per canonical type string and shared by every
//! holder of that type. Basic types and `v` are pinned for the life of the
//! registry. Container layouts are held weakly: when the last
//! `Arc<TypeInfo>` goes away the entry removes itself.
//!
//! Every lookup goes through a `DashMap` and never touches a global lock.
//! Container insertion and release are serialised by one
//! `parking_lot::Mutex`, so a release cannot remove an entry that a
//! concurrent insertion just replaced. Child layouts are resolved before
//! that mutex is taken, and no `TypeInfo` is dropped while it or a map
//! shard is held.

use super::{array_layout, basic_layout, tuple_layout, variant_layout, TypeInfo};
use crate::error::TypeError;
use crate::types::{TypeKind, VariantType};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Instant;

/// Registry hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    /// Time spent building the most recently created layout.
    pub last_miss_ns: u64,
}

pub(crate) struct RegistryInner {
    entries: DashMap<Box<str>, Weak<TypeInfo>>,
    /// Held while container entries are inserted or released.
    update: Mutex<()>,
    pinned: DashMap<Box<str>, Arc<TypeInfo>>,
    hits: AtomicU64,
    misses: AtomicU64,
    last_miss_ns: AtomicU64,
}

impl RegistryInner {
    /// Remove the entry for `key` if nobody holds it any more.
    ///
    /// A concurrent `get` may already have replaced the dead entry with a
    /// live one; that entry is left alone.
    pub(crate) fn release(&self, key: &str) {
        let _update = self.update.lock();
        let removed = self
            .entries
            .remove_if(key, |_, weak| weak.strong_count() == 0);
        if removed.is_some() {
            log::debug!("[type-registry] released '{}'", key);
        }
    }
}

/// Registry mapping canonical type strings to shared [`TypeInfo`].
pub struct TypeInfoRegistry {
    inner: Arc<RegistryInner>,
}

static GLOBAL: OnceLock<TypeInfoRegistry> = OnceLock::new();

impl TypeInfoRegistry {
    /// Create an empty, private registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: DashMap::new(),
                update: Mutex::new(()),
                pinned: DashMap::new(),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                last_miss_ns: AtomicU64::new(0),
            }),
        }
    }

    /// Process-wide registry.
    pub fn global() -> &'static TypeInfoRegistry {
        GLOBAL.get_or_init(TypeInfoRegistry::new)
    }

    /// Layout for a definite type.
    pub fn get(&self, ty: &VariantType) -> Result<Arc<TypeInfo>, TypeError> {
        if !ty.is_definite() {
            return Err(TypeError::Indefinite(ty.as_str().to_string()));
        }
        Ok(self.resolve(ty))
    }

    /// Number of live entries, pinned ones included.
    pub fn len(&self) -> usize {
        let live = self
            .inner
            .entries
            .iter()
            .filter(|entry| entry.value().strong_count() > 0)
            .count();
        live + self.inner.pinned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live container entries.
    pub fn container_len(&self) -> usize {
        self.len() - self.inner.pinned.len()
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            last_miss_ns: self.inner.last_miss_ns.load(Ordering::Relaxed),
        }
    }

    /// Resolve a type already known to be definite.
    pub(crate) fn resolve(&self, ty: &VariantType) -> Arc<TypeInfo> {
        match ty.kind() {
            TypeKind::Basic(basic) => {
                let basic = *basic;
                self.resolve_pinned(ty, || basic_layout(ty, basic))
            }
            TypeKind::Variant => self.resolve_pinned(ty, || variant_layout(ty)),
            _ => self.resolve_container(ty),
        }
    }

    fn resolve_pinned<F>(&self, ty: &VariantType, build: F) -> Arc<TypeInfo>
    where
        F: FnOnce() -> TypeInfo,
    {
        if let Some(hit) = self.inner.pinned.get(ty.as_str()) {
            self.record_hit();
            return Arc::clone(hit.value());
        }
        let start = Instant::now();
        let entry = self
            .inner
            .pinned
            .entry(ty.as_str().into())
            .or_insert_with(|| Arc::new(build()));
        let info = Arc::clone(entry.value());
        drop(entry);
        self.record_miss(start);
        info
    }

    fn resolve_container(&self, ty: &VariantType) -> Arc<TypeInfo> {
        if let Some(hit) = self.lookup(ty.as_str()) {
            self.record_hit();
            return hit;
        }

        let start = Instant::now();
        let mut built = match ty.kind() {
            TypeKind::Array(element) => array_layout(ty, self.resolve(element), false),
            TypeKind::Maybe(element) => array_layout(ty, self.resolve(element), true),
            _ => {
                let items = ty.items().iter().map(|item| self.resolve(item)).collect();
                tuple_layout(ty, items)
            }
        };
        built.registry = Arc::downgrade(&self.inner);
        let built = Arc::new(built);

        let existing = {
            let _update = self.inner.update.lock();
            // the shard guard from `get` must be gone before `insert`
            let live = self.lookup(ty.as_str());
            if live.is_none() {
                self.inner
                    .entries
                    .insert(ty.as_str().into(), Arc::downgrade(&built));
            }
            live
        };

        match existing {
            // Lost the race; `built` is dropped here, outside the lock.
            Some(live) => {
                self.record_hit();
                live
            }
            None => {
                self.record_miss(start);
                log::debug!(
                    "[type-registry] created '{}' (alignment {}, fixed size {})",
                    ty,
                    built.alignment(),
                    built.fixed_size()
                );
                built
            }
        }
    }

    fn lookup(&self, key: &str) -> Option<Arc<TypeInfo>> {
        let entry = self.inner.entries.get(key)?;
        entry.value().upgrade()
    }

    fn record_hit(&self) {
        self.inner.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, start: Instant) {
        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        self.inner
            .last_miss_ns
            .store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Default for TypeInfoRegistry {
    fn default() -> Self {
        Self::new()
    }
}
