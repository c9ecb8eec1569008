//! Value resolution policy.
//!
//! Every attribute carries up to three candidate values. A [`ViewMode`]
//! selects which one is surfaced:
//!
//! | Mode | Result |
//! |------|--------|
//! | `Original` | `originalValue` verbatim |
//! | `Updated` | `updatedValue` verbatim |
//! | `Mapped` | `mappedValue` verbatim |
//! | `Current` | `updatedValue` if set, else `mappedValue` when the attribute has a `mappableValue`, else `originalValue` |
//!
//! `Current` gates the mapped slot on `mappableValue`, not on whether the
//! mapped slot happens to hold something. An attribute that was never
//! mapping-eligible keeps showing its original value even if a stale mapped
//! value is lying around.
//!
//! `None` is a legitimate result in every mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value::Candidates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Current,
    Original,
    Updated,
    Mapped,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Current,
        ViewMode::Original,
        ViewMode::Updated,
        ViewMode::Mapped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Current => "current",
            ViewMode::Original => "original",
            ViewMode::Updated => "updated",
            ViewMode::Mapped => "mapped",
        }
    }

    /// Modes in which leaf editors accept changes.
    pub fn allows_editing(&self) -> bool {
        matches!(self, ViewMode::Current | ViewMode::Updated)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "current" => Ok(ViewMode::Current),
            "original" => Ok(ViewMode::Original),
            "updated" => Ok(ViewMode::Updated),
            "mapped" => Ok(ViewMode::Mapped),
            other => Err(format!(
                "unknown view mode '{}' (expected current, original, updated or mapped)",
                other
            )),
        }
    }
}

/// Select the candidate value surfaced for `mode`.
///
/// `mappable` is whether the owning attribute carries a `mappableValue`.
pub fn resolve<V>(candidates: &Candidates<V>, mode: ViewMode, mappable: bool) -> Option<&V> {
    match mode {
        ViewMode::Original => candidates.original(),
        ViewMode::Updated => candidates.updated(),
        ViewMode::Mapped => candidates.mapped(),
        ViewMode::Current => {
            if let Some(updated) = candidates.updated() {
                Some(updated)
            } else if mappable {
                candidates.mapped()
            } else {
                candidates.original()
            }
        }
    }
}
