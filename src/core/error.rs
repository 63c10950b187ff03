use thiserror::Error;

use crate::core::types::{DominionCode, UnitSlot};

#[derive(Error, Debug)]
pub enum IntelError {
    #[error("Race {race}: duplicate unit slot {slot}")]
    DuplicateSlot { race: String, slot: UnitSlot },

    #[error("Race {race}: unit slot {slot} pairing perk references missing slot {target}")]
    DanglingPairingSlot {
        race: String,
        slot: UnitSlot,
        target: UnitSlot,
    },

    #[error("Race {race}: unit slot {slot} pairing ratio must be positive, got {per}")]
    InvalidPairingRatio {
        race: String,
        slot: UnitSlot,
        per: i64,
    },

    #[error("Race {race}: unit slot {slot} role is inconsistent with its stats: {reason}")]
    RoleMismatch {
        race: String,
        slot: UnitSlot,
        reason: String,
    },

    #[error("Race {race}: no such unit slot {slot}")]
    UnknownSlot { race: String, slot: UnitSlot },

    #[error("Invalid race file {file}: {message}")]
    InvalidRaceFile { file: String, message: String },

    #[error("Dominion {code}: no race named {race} in the catalog")]
    UnknownRace { code: DominionCode, race: String },

    #[error("Partial amount {partial} out of range for slot {slot} (estimated amount {amount})")]
    PartialOutOfRange {
        slot: UnitSlot,
        partial: i64,
        amount: i64,
    },

    #[error("Negative count {count} for slot {slot}")]
    NegativeCount { slot: UnitSlot, count: i64 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IntelError>;
