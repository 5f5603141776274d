//! Survey feature engineering.
//!
//! This module derives scenario-level boolean features from raw option rows,
//! merges per-country AMCE estimates, partitions users into train/test
//! splits, and aggregates per-user moral profiles.

pub mod country;
pub mod describe;
pub mod engineer;
pub mod pipeline;
pub mod profile;
pub mod split;
pub mod types;
pub mod utility;
