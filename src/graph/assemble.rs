//! Result assembly: ordering, the result cap, and display enrichment via
//! the person directory collaborator.
//!
//! Enrichment misses degrade to empty fields rather than dropping the
//! person or failing the query.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::Result;
use crate::graph::discovery::DiscoveryResult;
use crate::graph::path::{PathSearch, PathStep};
use crate::graph::{PersonId, RelationLabel};
use crate::source::{Gender, PersonDirectory, PersonRecord};

/// One discovered relative, enriched for display.
#[derive(Debug, Clone, Serialize)]
pub struct RelativeEntry {
    pub person_id: PersonId,
    pub depth: u32,
    pub display_name: Option<String>,
    pub gender: Option<Gender>,
    pub alive: Option<bool>,
    /// Age if alive, years lived at death otherwise.
    pub years: Option<u32>,
    pub location: Option<String>,
}

/// Externally-facing discovery result.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResponse {
    pub relatives: Vec<RelativeEntry>,
    /// Matches before the result cap, so callers can render "showing N of M".
    pub total_count: usize,
}

/// One node of a connection path, enriched for display.
#[derive(Debug, Clone, Serialize)]
pub struct PathNode {
    pub person_id: PersonId,
    #[serde(rename = "incoming_relationship_kind")]
    pub relationship: Option<RelationLabel>,
    pub display_name: Option<String>,
    pub location: Option<String>,
}

/// Externally-facing path result.
#[derive(Debug, Clone, Serialize)]
pub struct PathResponse {
    pub connection_found: bool,
    pub path: Vec<PathNode>,
    pub person_count: usize,
}

/// Sort by closeness, cap, then enrich the survivors.
///
/// Ordering is depth ascending with a stable tie-break on display name then
/// person id, and truncation happens after sorting so the closest relatives
/// are always the ones surfaced. `as_of` anchors age computation.
pub async fn assemble_discovery<D: PersonDirectory>(
    result: DiscoveryResult,
    persons: &HashMap<PersonId, PersonRecord>,
    directory: &D,
    cap: usize,
    as_of: NaiveDate,
) -> Result<DiscoveryResponse> {
    let mut matches: Vec<(PersonId, u32)> = result.depths.into_iter().collect();
    matches.sort_by_key(|&(person, depth)| {
        let name = persons
            .get(&person)
            .map(PersonRecord::display_name)
            .unwrap_or_default();
        (depth, name, person)
    });

    let total_count = matches.len();
    if total_count > cap {
        log::debug!("Truncating {} discovery matches to {}", total_count, cap);
        matches.truncate(cap);
    }

    let mut relatives = Vec::with_capacity(matches.len());
    for (person, depth) in matches {
        let record = persons.get(&person);
        relatives.push(RelativeEntry {
            person_id: person,
            depth,
            display_name: record.map(PersonRecord::display_name),
            gender: record.map(|r| r.gender),
            alive: record.map(PersonRecord::is_alive),
            years: record.and_then(|r| r.years_lived(as_of)),
            location: lookup_location(directory, person).await,
        });
    }

    Ok(DiscoveryResponse {
        relatives,
        total_count,
    })
}

/// Enrich a path search outcome. Paths are bounded by the hop ceiling, so
/// there is no truncation here.
pub async fn assemble_path<D: PersonDirectory>(
    search: &PathSearch,
    persons: &HashMap<PersonId, PersonRecord>,
    directory: &D,
) -> Result<PathResponse> {
    let (connection_found, steps): (bool, &[PathStep]) = match search {
        PathSearch::Found(steps) => (true, steps.as_slice()),
        // A self-path is flagged as non-meaningful, never a connection.
        PathSearch::Trivial(person) => {
            let node = enrich_step(
                &PathStep {
                    person: *person,
                    label: None,
                },
                persons,
                directory,
            )
            .await;
            return Ok(PathResponse {
                connection_found: false,
                path: vec![node],
                person_count: 1,
            });
        }
        PathSearch::NotConnected => (false, &[]),
    };

    let mut path = Vec::with_capacity(steps.len());
    for step in steps {
        path.push(enrich_step(step, persons, directory).await);
    }
    let person_count = path.len();

    Ok(PathResponse {
        connection_found,
        path,
        person_count,
    })
}

async fn enrich_step<D: PersonDirectory>(
    step: &PathStep,
    persons: &HashMap<PersonId, PersonRecord>,
    directory: &D,
) -> PathNode {
    PathNode {
        person_id: step.person,
        relationship: step.label,
        display_name: persons
            .get(&step.person)
            .map(PersonRecord::display_name),
        location: lookup_location(directory, step.person).await,
    }
}

/// Address lookup with the partial-failure policy: a miss or a collaborator
/// error leaves the field empty instead of failing the query.
async fn lookup_location<D: PersonDirectory>(directory: &D, person: PersonId) -> Option<String> {
    match directory.lookup_address_summary(person).await {
        Ok(summary) => summary,
        Err(err) => {
            log::debug!("Address lookup failed for person {}: {}", person, err);
            None
        }
    }
}
