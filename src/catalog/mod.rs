//! Static unit/race catalog: definitions, derived views, TOML loading

pub mod loader;
pub mod race;
pub mod unit;

pub use loader::{load_races, parse_race_toml};
pub use race::{RaceDefinition, RacePerk};
pub use unit::{SpyWizRatios, UnitDefinition, UnitPerk, UnitRole};
