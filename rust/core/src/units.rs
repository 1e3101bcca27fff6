// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length units and conversion into a document's internal unit.

/// Linear units understood by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    Meters,
    Inches,
    Feet,
}

impl LengthUnit {
    /// Size of one unit in meters
    #[inline]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1e-3,
            LengthUnit::Centimeters => 1e-2,
            LengthUnit::Meters => 1.0,
            LengthUnit::Inches => 0.0254,
            LengthUnit::Feet => 0.3048,
        }
    }

    /// Convert `value` expressed in `self` into `target`
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        if self == target {
            return value;
        }
        value * self.meters_per_unit() / target.meters_per_unit()
    }

    /// Multiplier taking lengths in this unit to `target`
    pub fn scale_to(self, target: LengthUnit) -> f64 {
        self.convert(1.0, target)
    }

    /// Parse a unit symbol or name (`mm`, `millimeters`, `ft`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Some(LengthUnit::Millimeters),
            "cm" | "centimeter" | "centimeters" => Some(LengthUnit::Centimeters),
            "m" | "meter" | "meters" => Some(LengthUnit::Meters),
            "in" | "inch" | "inches" => Some(LengthUnit::Inches),
            "ft" | "foot" | "feet" => Some(LengthUnit::Feet),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converts user-facing lengths into a document's internal linear unit.
pub trait UnitConverter {
    fn to_internal(&self, value: f64, unit: LengthUnit) -> f64;
}

/// Converter for a document whose internal unit is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentUnits {
    pub internal: LengthUnit,
}

impl UnitConverter for DocumentUnits {
    fn to_internal(&self, value: f64, unit: LengthUnit) -> f64 {
        unit.convert(value, self.internal)
    }
}
