//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for dominions, as assigned by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DominionCode(pub u32);

impl DominionCode {
    pub fn new(code: u32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for DominionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Game tick counter (one tick = one in-game hour)
pub type Tick = u64;

/// Unit slot within a race (stable numbering 1..N for the whole session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitSlot(pub u8);

impl UnitSlot {
    pub fn new(slot: u8) -> Self {
        Self(slot)
    }
}

impl std::fmt::Display for UnitSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
