// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host application collaborators: document lookup, template lookup and
//! user notification.

use mep_openings_core::{Category, DocumentKey, Error, Result, Session};

use crate::template::PlaceholderTemplate;

/// The two documents a command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentPair {
    /// Receives placeholders; source of walls and levels
    pub architectural: DocumentKey,
    /// Source of ducts and pipes; never edited
    pub mechanical: DocumentKey,
}

/// Finds the architectural and mechanical documents in a session.
pub trait DocumentLocator {
    fn locate(&self, session: &Session) -> Result<DocumentPair>;
}

/// Active document is architectural; the first other open document whose
/// title contains `marker` is mechanical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLocator {
    pub marker: String,
}

impl TitleLocator {
    pub fn new(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }
}

impl DocumentLocator for TitleLocator {
    fn locate(&self, session: &Session) -> Result<DocumentPair> {
        let architectural = session
            .active()
            .ok_or_else(|| Error::DocumentNotFound("no active document".into()))?;
        let mechanical = session
            .documents()
            .find(|(key, doc)| *key != architectural && doc.title().contains(&self.marker))
            .map(|(key, _)| key)
            .ok_or_else(|| Error::DocumentNotFound(format!("title containing '{}'", self.marker)))?;

        Ok(DocumentPair {
            architectural,
            mechanical,
        })
    }
}

/// Resolves the placeholder family type in the architectural document.
pub trait TemplateLookup {
    fn find(&self, session: &Session, document: DocumentKey) -> Result<PlaceholderTemplate>;
}

/// Looks up the first symbol of a family name within a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyLookup {
    pub family_name: String,
    pub category: Category,
}

impl FamilyLookup {
    pub fn new(family_name: impl Into<String>, category: Category) -> Self {
        Self {
            family_name: family_name.into(),
            category,
        }
    }

    fn not_found(&self) -> Error {
        Error::TemplateNotFound {
            family: self.family_name.clone(),
            category: self.category.to_string(),
        }
    }
}

impl TemplateLookup for FamilyLookup {
    fn find(&self, session: &Session, document: DocumentKey) -> Result<PlaceholderTemplate> {
        let doc = session
            .document(document)
            .ok_or_else(|| Error::DocumentNotFound(format!("{document:?}")))?;
        doc.find_symbol(&self.family_name, self.category)
            .map(|symbol| PlaceholderTemplate::new(symbol, self.family_name.clone()))
            .ok_or_else(|| self.not_found())
    }
}

/// Shows fatal conditions to the user.
pub trait UserNotifier {
    fn notify(&mut self, title: &str, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl UserNotifier for TracingNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        tracing::warn!(title, message, "User notification");
    }
}

/// Keeps notifications in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    pub messages: Vec<(String, String)>,
}

impl UserNotifier for RecordingNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        self.messages.push((title.to_string(), message.to_string()));
    }
}
