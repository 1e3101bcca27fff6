// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element key types for arena-based storage.
//!
//! Each element gets a unique, type-safe key for O(1) lookup in its
//! document. Keys are created by `slotmap::SlotMap` and are generational: a
//! key whose element was removed never resolves again, even if the slot is
//! reused. That is how stale references are detected.

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Key for an open document in a session.
    pub struct DocumentKey;

    /// Key for a level (named reference elevation).
    pub struct LevelKey;

    /// Key for a barrier solid (wall, floor, column).
    pub struct BarrierKey;

    /// Key for a linear run (duct or pipe).
    pub struct RunKey;

    /// Key for a 3D view.
    pub struct ViewKey;

    /// Key for a family symbol (loadable type).
    pub struct SymbolKey;

    /// Key for a placed placeholder instance.
    pub struct PlaceholderKey;

    /// Key for a link instance (federated model placed in a host document).
    pub struct LinkKey;
}

impl LinkKey {
    /// The reserved link identity of elements in the host document itself
    #[inline]
    pub fn host() -> Self {
        Self::null()
    }
}

/// Logical identity of a ray hit: which barrier, seen through which link.
///
/// Hits on barriers of the document itself carry the null link key.
/// Equality and hashing cover exactly these two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitKey {
    pub barrier: BarrierKey,
    pub link: LinkKey,
}

impl HitKey {
    /// Identity of a barrier in the host document
    pub fn local(barrier: BarrierKey) -> Self {
        Self {
            barrier,
            link: LinkKey::host(),
        }
    }

    /// Identity of a barrier seen through a link instance
    pub fn linked(barrier: BarrierKey, link: LinkKey) -> Self {
        Self { barrier, link }
    }

    pub fn is_local(&self) -> bool {
        self.link.is_null()
    }
}

impl From<BarrierKey> for HitKey {
    fn from(barrier: BarrierKey) -> Self {
        HitKey::local(barrier)
    }
}
