//! ONT position on the OLT.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validate::require_numeric;
use crate::error::CommandError;

/// Rack and shelf are fixed at `1/1` on every OLT we provision.
const RACK_SHELF: (u32, u32) = (1, 1);

/// Where an ONT hangs: slot, PON port and position on the PON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntPosition {
    pub slot: u32,
    pub pon: u32,
    pub index: u32,
}

impl OntPosition {
    pub fn new(slot: u32, pon: u32, index: u32) -> Self {
        Self { slot, pon, index }
    }

    /// Parse the three position fields of the form.
    ///
    /// Each field is required and must contain only digits.
    pub fn parse(slot: &str, pon: &str, index: &str) -> Result<Self, CommandError> {
        Ok(Self {
            slot: require_numeric("Slot", slot)?,
            pon: require_numeric("PON port", pon)?,
            index: require_numeric("Position", index)?,
        })
    }

    /// TL1 access identifier, e.g. `1-1-3-7-12`.
    pub fn tl1_aid(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            RACK_SHELF.0, RACK_SHELF.1, self.slot, self.pon, self.index
        )
    }

    /// CLI interface path, e.g. `1/1/3/7/12`.
    pub fn cli_path(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            RACK_SHELF.0, RACK_SHELF.1, self.slot, self.pon, self.index
        )
    }
}

impl fmt::Display for OntPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cli_path())
    }
}
