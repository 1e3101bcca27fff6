// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access and opening placement.

use crate::keys::{BarrierKey, HitKey, LevelKey, PlaceholderKey, SymbolKey};

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// How far an error is allowed to propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Aborts the whole command before any edit scope opens; shown to the user.
    Fatal,
    /// Skips one run or one hit; processing continues silently.
    PerItem,
    /// Rolls back the edit scope it happened in.
    Scope,
}

/// Errors that can occur while locating, scanning and placing openings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required document is not open in the session.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// No family symbol with the configured family name and category.
    #[error("placeholder family '{family}' not found in category {category}")]
    TemplateNotFound { family: String, category: String },

    /// The architectural document has no non-template 3D view.
    #[error("no 3D view available for ray sampling")]
    NoSamplingContext,

    /// The run's location curve is not a usable straight line.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// A hit references a barrier that no longer exists.
    #[error("barrier {0:?} no longer exists")]
    DanglingBarrierReference(HitKey),

    /// A barrier has no level, or its level cannot be resolved.
    #[error("barrier {0:?} has no resolvable level")]
    MissingLevel(BarrierKey),

    /// Level key not found in the document.
    #[error("level not found: {0:?}")]
    LevelNotFound(LevelKey),

    /// Family symbol key not found in the document.
    #[error("family symbol not found: {0:?}")]
    SymbolNotFound(SymbolKey),

    /// Placeholder instance key not found in the document.
    #[error("placeholder not found: {0:?}")]
    PlaceholderNotFound(PlaceholderKey),

    /// Instances cannot be created from a symbol that was never activated.
    #[error("family symbol {0:?} is not active")]
    InactiveSymbol(SymbolKey),

    /// The placeholder family does not declare the parameter.
    #[error("parameter '{0}' is not defined by the placeholder family")]
    MissingParameter(String),

    /// The host refused the new instance.
    #[error("placeholder creation failed: {0}")]
    PlaceholderCreation(String),

    /// The edit scope was already closed.
    #[error("transaction '{0}' is not open")]
    TransactionClosed(String),
}

impl Error {
    /// Propagation class of this error.
    pub fn severity(&self) -> Severity {
        match self {
            Error::DocumentNotFound(_) | Error::TemplateNotFound { .. } | Error::NoSamplingContext => {
                Severity::Fatal
            }
            Error::UnsupportedGeometry(_)
            | Error::DanglingBarrierReference(_)
            | Error::MissingLevel(_) => Severity::PerItem,
            Error::LevelNotFound(_)
            | Error::SymbolNotFound(_)
            | Error::PlaceholderNotFound(_)
            | Error::InactiveSymbol(_)
            | Error::MissingParameter(_)
            | Error::PlaceholderCreation(_)
            | Error::TransactionClosed(_) => Severity::Scope,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<mep_openings_geometry::Error> for Error {
    fn from(err: mep_openings_geometry::Error) -> Self {
        Error::UnsupportedGeometry(err.to_string())
    }
}
