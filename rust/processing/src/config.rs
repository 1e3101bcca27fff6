// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening placement configuration, with environment overrides.

use mep_openings_core::{Category, LengthUnit};
use serde::{Deserialize, Serialize};

use crate::dedup::TieBreak;

/// Settings for one opening placement command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningsConfig {
    /// Clearance added to the run diameter on width and height.
    pub clearance: f64,
    /// Unit `clearance` is expressed in.
    pub clearance_unit: LengthUnit,
    /// Family name of the placeholder symbol.
    pub family_name: String,
    /// Category the placeholder family belongs to.
    pub category: Category,
    /// Substring identifying the mechanical document by title.
    pub mechanical_title_marker: String,
    /// Instance parameter receiving the opening width.
    pub width_parameter: String,
    /// Instance parameter receiving the opening height.
    pub height_parameter: String,
    /// Also cast against walls inside linked models.
    pub include_links: bool,
    /// Which raw hit survives when one barrier is struck several times.
    pub tie_break: TieBreak,
    /// Scan runs on the rayon pool. Edits stay serialized.
    pub parallel_scan: bool,
}

impl Default for OpeningsConfig {
    fn default() -> Self {
        Self {
            clearance: 30.0,
            clearance_unit: LengthUnit::Millimeters,
            family_name: "Opening".into(),
            category: Category::GenericModel,
            mechanical_title_marker: "ОВ".into(),
            width_parameter: "Width".into(),
            height_parameter: "Height".into(),
            include_links: false,
            tie_break: TieBreak::FirstSeen,
            parallel_scan: false,
        }
    }
}

impl OpeningsConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source; unset or unparsable
    /// values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            clearance: lookup("OPENINGS_CLEARANCE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(defaults.clearance),
            clearance_unit: lookup("OPENINGS_CLEARANCE_UNIT")
                .and_then(|v| LengthUnit::parse(&v))
                .unwrap_or(defaults.clearance_unit),
            family_name: lookup("OPENINGS_FAMILY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.family_name),
            mechanical_title_marker: lookup("OPENINGS_MEP_MARKER")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.mechanical_title_marker),
            include_links: lookup("OPENINGS_INCLUDE_LINKS")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.include_links),
            tie_break: lookup("OPENINGS_TIE_BREAK")
                .and_then(|v| TieBreak::parse(&v))
                .unwrap_or(defaults.tie_break),
            parallel_scan: lookup("OPENINGS_PARALLEL_SCAN")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.parallel_scan),
            ..defaults
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
