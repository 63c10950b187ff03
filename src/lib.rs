//! Dominion Intel - Military Power Estimation

pub mod catalog;
pub mod core;
pub mod intel;
