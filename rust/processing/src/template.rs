// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The placeholder family type shared by every discipline batch.

use mep_openings_core::{Document, Result, SymbolKey};

/// Family symbol used to instantiate every placeholder of a command.
///
/// Resolved once per command and passed explicitly to each discipline batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    pub symbol: SymbolKey,
    pub family_name: String,
}

impl PlaceholderTemplate {
    pub fn new(symbol: SymbolKey, family_name: impl Into<String>) -> Self {
        Self {
            symbol,
            family_name: family_name.into(),
        }
    }

    pub fn is_active(&self, document: &Document) -> bool {
        document
            .symbol(self.symbol)
            .map(|s| s.is_active())
            .unwrap_or(false)
    }

    /// Check-then-activate. Returns `true` only when this call activated it.
    pub fn ensure_active(&self, document: &mut Document) -> Result<bool> {
        if self.is_active(document) {
            return Ok(false);
        }
        document.activate_symbol(self.symbol)
    }
}
