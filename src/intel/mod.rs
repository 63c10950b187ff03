//! Tactical estimation over point-in-time intelligence snapshots

pub mod batch;
pub mod bonus;
pub mod defend;
pub mod power;
pub mod send;
pub mod snapshot;
pub mod spywiz;

pub use batch::{assess_dominion, assess_realm, DominionReport, RealmQuery};
pub use bonus::BonusProfile;
pub use defend::{safe_op_versus, DefensePlan};
pub use power::{PowerEstimator, TransportSummary};
pub use send::{five_over_four, max_sendable_op, safe_dp, safe_op, SendAssessment};
pub use snapshot::{BonusInputs, DominionIntel, HomeCount, MilitarySnapshot, SlotIntel};
pub use spywiz::SpyWizEstimate;
