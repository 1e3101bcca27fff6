// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Atomic edit scopes.
//!
//! A [`Transaction`] borrows a document mutably and journals every
//! placeholder edit it makes. `commit()` keeps them; `rollback()` or simply
//! dropping the transaction undoes all of them, leaving the document as it
//! was when the scope started.

use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::document::Document;
use crate::element::PlaceholderInstance;
use crate::error::{Error, Result};
use crate::keys::{HitKey, LevelKey, PlaceholderKey, SymbolKey};

/// Lifecycle of an edit scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Started,
    Committed,
    RolledBack,
}

/// Undo record for one edit
#[derive(Debug)]
enum JournalEntry {
    Created(PlaceholderKey),
    ParameterSet {
        placeholder: PlaceholderKey,
        name: String,
        previous: Option<f64>,
    },
}

/// An all-or-nothing unit of document mutation.
#[derive(Debug)]
pub struct Transaction<'a> {
    document: &'a mut Document,
    name: String,
    status: TransactionStatus,
    journal: Vec<JournalEntry>,
}

impl<'a> Transaction<'a> {
    /// Open a scope on `document`
    pub fn start(document: &'a mut Document, name: impl Into<String>) -> Self {
        Self {
            document,
            name: name.into(),
            status: TransactionStatus::Started,
            journal: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Read access to the document being edited
    pub fn document(&self) -> &Document {
        self.document
    }

    /// Number of placeholders created so far in this scope
    pub fn created_count(&self) -> usize {
        self.journal
            .iter()
            .filter(|e| matches!(e, JournalEntry::Created(_)))
            .count()
    }

    /// Create a placeholder instance at `point`, hosted by `host` on `level`.
    pub fn create_placeholder(
        &mut self,
        symbol: SymbolKey,
        point: Point3<f64>,
        host: HitKey,
        level: LevelKey,
    ) -> Result<PlaceholderKey> {
        self.ensure_open()?;

        let family = self
            .document
            .symbol(symbol)
            .ok_or(Error::SymbolNotFound(symbol))?;
        if !family.is_active() {
            return Err(Error::InactiveSymbol(symbol));
        }
        if self.document.level(level).is_none() {
            return Err(Error::LevelNotFound(level));
        }

        let (_, barrier) = self
            .document
            .resolve_hit(host)
            .ok_or(Error::DanglingBarrierReference(host))?;
        if !barrier.allows_hosting {
            return Err(Error::PlaceholderCreation(format!(
                "'{}' cannot host family instances",
                barrier.name
            )));
        }
        if !point.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::PlaceholderCreation(format!(
                "non-finite insertion point {point}"
            )));
        }

        let key = self.document.placeholders.insert(PlaceholderInstance {
            symbol,
            point,
            host,
            level,
            parameters: FxHashMap::default(),
        });
        self.journal.push(JournalEntry::Created(key));
        Ok(key)
    }

    /// Set an instance parameter declared by the placeholder's family.
    pub fn set_parameter(&mut self, placeholder: PlaceholderKey, name: &str, value: f64) -> Result<()> {
        self.ensure_open()?;

        let instance = self
            .document
            .placeholders
            .get(placeholder)
            .ok_or(Error::PlaceholderNotFound(placeholder))?;
        let declared = self
            .document
            .symbol(instance.symbol)
            .map(|s| s.declares(name))
            .unwrap_or(false);
        if !declared {
            return Err(Error::MissingParameter(name.to_string()));
        }

        let instance = self
            .document
            .placeholders
            .get_mut(placeholder)
            .ok_or(Error::PlaceholderNotFound(placeholder))?;
        let previous = instance.parameters.insert(name.to_string(), value);
        self.journal.push(JournalEntry::ParameterSet {
            placeholder,
            name: name.to_string(),
            previous,
        });
        Ok(())
    }

    /// Keep every edit made in this scope
    pub fn commit(mut self) -> TransactionStatus {
        if self.status == TransactionStatus::Started {
            self.journal.clear();
            self.status = TransactionStatus::Committed;
        }
        self.status
    }

    /// Undo every edit made in this scope
    pub fn rollback(mut self) -> TransactionStatus {
        self.undo();
        self.status
    }

    fn ensure_open(&self) -> Result<()> {
        match self.status {
            TransactionStatus::Started => Ok(()),
            _ => Err(Error::TransactionClosed(self.name.clone())),
        }
    }

    fn undo(&mut self) {
        if self.status != TransactionStatus::Started {
            return;
        }

        // Reverse order so parameter restores run before their instance is removed
        while let Some(entry) = self.journal.pop() {
            match entry {
                JournalEntry::Created(key) => {
                    self.document.placeholders.remove(key);
                }
                JournalEntry::ParameterSet {
                    placeholder,
                    name,
                    previous,
                } => {
                    if let Some(instance) = self.document.placeholders.get_mut(placeholder) {
                        match previous {
                            Some(value) => {
                                instance.parameters.insert(name, value);
                            }
                            None => {
                                instance.parameters.remove(&name);
                            }
                        }
                    }
                }
            }
        }
        self.status = TransactionStatus::RolledBack;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.undo();
    }
}
