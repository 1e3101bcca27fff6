// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The set of documents open in one application session.

use slotmap::SlotMap;

use crate::document::Document;
use crate::keys::DocumentKey;

/// Open documents plus the one the user is working in.
#[derive(Debug, Default)]
pub struct Session {
    documents: SlotMap<DocumentKey, Document>,
    active: Option<DocumentKey>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document. The first one opened becomes active.
    pub fn open(&mut self, document: Document) -> DocumentKey {
        let key = self.documents.insert(document);
        self.active.get_or_insert(key);
        key
    }

    pub fn set_active(&mut self, key: DocumentKey) -> bool {
        if self.documents.contains_key(key) {
            self.active = Some(key);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<DocumentKey> {
        self.active.filter(|k| self.documents.contains_key(*k))
    }

    pub fn close(&mut self, key: DocumentKey) -> Option<Document> {
        if self.active == Some(key) {
            self.active = None;
        }
        self.documents.remove(key)
    }

    pub fn document(&self, key: DocumentKey) -> Option<&Document> {
        self.documents.get(key)
    }

    pub fn document_mut(&mut self, key: DocumentKey) -> Option<&mut Document> {
        self.documents.get_mut(key)
    }

    /// Open documents in the order they were opened
    pub fn documents(&self) -> impl Iterator<Item = (DocumentKey, &Document)> {
        self.documents.iter()
    }
}
