//! Row-shaped domain records for the geographic reference tables.
//!
//! # Responsibility
//! - Define the flat records mirroring the continent/country/region rows.
//! - Keep identity assignment with the store: ids are `None` until persisted.
//!
//! # Invariants
//! - An assigned id is immutable and never reused for another row.
//! - `code` is the unique natural key of every entity family.

use std::fmt::{Display, Formatter};

pub mod continent;
pub mod country;
pub mod region;

/// Names one of the three entity families, mostly for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Continent,
    Country,
    Region,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continent => write!(f, "Continent"),
            Self::Country => write!(f, "Country"),
            Self::Region => write!(f, "Region"),
        }
    }
}
