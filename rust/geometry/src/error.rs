// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("Degenerate direction: {0}")]
    DegenerateDirection(String),

    #[error("Invalid solid: {0}")]
    InvalidSolid(String),
}
