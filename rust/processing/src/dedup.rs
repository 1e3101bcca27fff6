// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hit Deduplication
//!
//! A single wall crossing usually produces several raw hits: one per face
//! the ray passes through, sometimes more where triangles share an edge.
//! Deduplication collapses them to one logical hit per (barrier, link)
//! identity after dropping hits beyond the end of the run.

use mep_openings_core::HitKey;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::caster::RawHit;

/// Which raw hit represents a barrier struck more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the first hit in caster order. The caster gives no distance
    /// ordering, so the kept hit may be either face of the wall.
    #[default]
    FirstSeen,
    /// Keep the hit closest to the run's start point.
    Nearest,
}

impl TieBreak {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_seen" | "firstseen" => Some(TieBreak::FirstSeen),
            "nearest" | "min" | "closest" => Some(TieBreak::Nearest),
            _ => None,
        }
    }
}

/// A deduplicated hit: unique per [`HitKey`] within one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalHit {
    pub key: HitKey,
    pub proximity: f64,
}

impl From<LogicalHit> for RawHit {
    fn from(hit: LogicalHit) -> Self {
        RawHit {
            proximity: hit.proximity,
            barrier: hit.key.barrier,
            link: hit.key.link,
        }
    }
}

/// Collapse the raw hits of one ray into logical hits.
///
/// Hits with `proximity > max_proximity` (past the end of the run) are
/// discarded first; a hit exactly at `max_proximity` is kept. Output order
/// is the order in which each identity was first encountered.
pub fn deduplicate<I>(hits: I, max_proximity: f64, tie_break: TieBreak) -> Vec<LogicalHit>
where
    I: IntoIterator<Item = RawHit>,
{
    let mut logical: Vec<LogicalHit> = Vec::new();
    let mut seen: FxHashMap<HitKey, usize> = FxHashMap::default();

    for hit in hits.into_iter().filter(|h| h.proximity <= max_proximity) {
        let key = hit.key();
        match seen.get(&key) {
            Some(&slot) => {
                if tie_break == TieBreak::Nearest && hit.proximity < logical[slot].proximity {
                    logical[slot].proximity = hit.proximity;
                }
            }
            None => {
                seen.insert(key, logical.len());
                logical.push(LogicalHit {
                    key,
                    proximity: hit.proximity,
                });
            }
        }
    }

    logical
}
