//! Read-only collaborator contracts implemented by the external data layer,
//! plus the person/address record types they hand back.
//!
//! The engine never creates, mutates, or deletes persons or edges; it batch
//! loads before traversal and enriches after, so the BFS loops themselves
//! stay free of suspension points.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{PersonId, RelationshipRow};

/// Gender of a person, as resolved from the external gender reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    #[default]
    Unknown,
}

impl Gender {
    /// Parse a wire-form gender filter value.
    pub fn parse_filter(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Self::Female),
            "male" | "m" => Ok(Self::Male),
            other => Err(crate::error::KingraphError::InvalidFilter(format!(
                "unknown gender '{}'",
                other
            ))),
        }
    }
}

/// Address hierarchy references carried on a person record. Each level is an
/// identifier into the external address tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRef {
    pub country_id: Option<u64>,
    pub state_id: Option<u64>,
    pub district_id: Option<u64>,
    pub sub_district_id: Option<u64>,
    pub locality_id: Option<u64>,
}

/// Display attributes of a person, read-only to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    pub person_id: PersonId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub address: Option<AddressRef>,
    pub religion_id: Option<u64>,
}

impl PersonRecord {
    /// Full display name, name parts joined and trimmed.
    pub fn display_name(&self) -> String {
        let joined = format!("{} {}", self.first_name, self.last_name);
        joined.trim().to_string()
    }

    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    /// Whole years from birth to death, or to `as_of` if still alive.
    /// None when the birth date is missing or in the future.
    pub fn years_lived(&self, as_of: NaiveDate) -> Option<u32> {
        let birth = self.birth_date?;
        let end = self.death_date.unwrap_or(as_of);
        if end < birth {
            return None;
        }
        let mut years = end.year() - birth.year();
        if (end.month(), end.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Source of raw relationship edges, scoped per query to bound how much of
/// the graph is pulled into memory.
pub trait RelationshipStore {
    /// Edges within `max_depth` hops of `person`. Implementations may
    /// over-approximate the scope; the traversal re-derives exact depths.
    fn load_edges_near(
        &self,
        person: PersonId,
        max_depth: u32,
    ) -> impl std::future::Future<Output = Result<Vec<RelationshipRow>>> + Send;

    /// The full edge set. Acceptable for small graphs and tests.
    fn load_all_edges(&self) -> impl std::future::Future<Output = Result<Vec<RelationshipRow>>> + Send;
}

/// Lookup of person display attributes and address summaries. A `None`
/// result is a tolerated miss, never an error.
pub trait PersonDirectory {
    fn lookup_person(
        &self,
        person: PersonId,
    ) -> impl std::future::Future<Output = Result<Option<PersonRecord>>> + Send;

    /// Human-readable location summary ("locality, district, state") or
    /// `None` when the person has no resolvable address.
    fn lookup_address_summary(
        &self,
        person: PersonId,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
}
