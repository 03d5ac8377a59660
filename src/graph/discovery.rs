//! Bounded breadth-first discovery: every person reachable from a root
//! within a depth limit, with depth modes and post-traversal attribute
//! filters.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KingraphError, Result};
use crate::graph::{AdjacencyView, PersonId};
use crate::source::{Gender, PersonRecord};

/// Whether results include everyone within the depth limit or only persons
/// at exactly that depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthMode {
    UpTo,
    OnlyAt,
}

impl FromStr for DepthMode {
    type Err = KingraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up_to" | "upto" => Ok(Self::UpTo),
            "only_at" | "onlyat" => Ok(Self::OnlyAt),
            other => Err(KingraphError::InvalidDepthMode(other.to_string())),
        }
    }
}

/// Address hierarchy filter. Every specified level is an independent exact
/// match against the person's address reference; unspecified levels are
/// ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFilter {
    pub country_id: Option<u64>,
    pub state_id: Option<u64>,
    pub district_id: Option<u64>,
    pub sub_district_id: Option<u64>,
    pub locality_id: Option<u64>,
}

impl AddressFilter {
    fn is_unrestricted(&self) -> bool {
        self.country_id.is_none()
            && self.state_id.is_none()
            && self.district_id.is_none()
            && self.sub_district_id.is_none()
            && self.locality_id.is_none()
    }

    fn matches(&self, person: &PersonRecord) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let Some(addr) = person.address else {
            return false;
        };
        let level_ok = |wanted: Option<u64>, actual: Option<u64>| match wanted {
            None => true,
            Some(id) => actual == Some(id),
        };
        level_ok(self.country_id, addr.country_id)
            && level_ok(self.state_id, addr.state_id)
            && level_ok(self.district_id, addr.district_id)
            && level_ok(self.sub_district_id, addr.sub_district_id)
            && level_ok(self.locality_id, addr.locality_id)
    }
}

/// Optional attribute predicates applied to the depth-filtered result set.
/// Filters never affect traversal reachability: a filtered-out person still
/// conducts the search through to their relatives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryFilter {
    #[serde(default)]
    pub alive_only: bool,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub address: AddressFilter,
}

impl DiscoveryFilter {
    fn is_unrestricted(&self) -> bool {
        !self.alive_only && self.gender.is_none() && self.address.is_unrestricted()
    }

    /// A person with no loaded record cannot satisfy any predicate and is
    /// excluded once a predicate is set.
    fn matches(&self, record: Option<&PersonRecord>) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let Some(person) = record else {
            return false;
        };
        if self.alive_only && !person.is_alive() {
            return false;
        }
        if let Some(gender) = self.gender {
            if person.gender != gender {
                return false;
            }
        }
        self.address.matches(person)
    }
}

/// Reachable persons mapped to their minimum hop count from the root.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    pub depths: HashMap<PersonId, u32>,
}

impl DiscoveryResult {
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn depth_of(&self, person: PersonId) -> Option<u32> {
        self.depths.get(&person).copied()
    }
}

/// BFS from `root` up to `max_depth` hops over the adjacency view.
///
/// The visited-depth map doubles as the cycle guard: a person is recorded
/// at first discovery (which BFS level order makes the minimum depth) and
/// never revisited, so marriage cycles terminate naturally. Neighbors past
/// the depth limit are not enqueued, bounding work to the N-hop
/// neighborhood regardless of overall graph size.
///
/// `max_depth` is expected to be pre-clamped by the caller; a value of 0
/// yields an empty result. The root itself is excluded structurally.
pub fn discover(
    view: &AdjacencyView,
    root: PersonId,
    max_depth: u32,
    mode: DepthMode,
    filter: &DiscoveryFilter,
    persons: &HashMap<PersonId, PersonRecord>,
) -> Result<DiscoveryResult> {
    if !view.contains(root) {
        return Err(KingraphError::PersonNotFound(root));
    }

    let mut visited: HashMap<PersonId, u32> = HashMap::new();
    let mut queue: VecDeque<(PersonId, u32)> = VecDeque::new();

    // Root marked at depth 0 so it is never recounted as its own neighbor.
    visited.insert(root, 0);
    queue.push_back((root, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for neighbor in view.neighbors(current) {
            if !visited.contains_key(&neighbor.person) {
                visited.insert(neighbor.person, depth + 1);
                queue.push_back((neighbor.person, depth + 1));
            }
        }
    }

    let depths = visited
        .into_iter()
        .filter(|&(person, depth)| {
            person != root
                && match mode {
                    DepthMode::UpTo => depth > 0,
                    DepthMode::OnlyAt => depth == max_depth,
                }
        })
        .filter(|&(person, _)| filter.matches(persons.get(&person)))
        .collect();

    Ok(DiscoveryResult { depths })
}
