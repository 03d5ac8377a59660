//! Family relationship graph engine: adjacency normalization, bounded BFS
//! discovery, bidirectional shortest-path search, and result assembly.
//!
//! Persons and relationship edges are owned by external collaborators (see
//! `crate::source`); this module only computes over a read-only view of them.

mod adjacency;
mod assemble;
mod discovery;
mod engine;
mod path;

pub use adjacency::{AdjacencyView, Neighbor};
pub use assemble::{DiscoveryResponse, PathNode, PathResponse, RelativeEntry};
pub use discovery::{AddressFilter, DepthMode, DiscoveryFilter, DiscoveryResult};
pub use engine::{discover, find_path};
pub use path::{PathSearch, PathStep};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KingraphError;
use crate::source::Gender;

/// Identifier of a person, minted by the external person store.
pub type PersonId = u64;

/// Stored relationship kind (closed set). A row `(u, v, kind)` reads
/// "v is the `kind` of u".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Father,
    Mother,
    Daughter,
    Son,
    Wife,
    Husband,
    Spouse,
}

impl FromStr for RelationshipKind {
    type Err = KingraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "father" => Ok(Self::Father),
            "mother" => Ok(Self::Mother),
            "daughter" => Ok(Self::Daughter),
            "son" => Ok(Self::Son),
            "wife" => Ok(Self::Wife),
            "husband" => Ok(Self::Husband),
            "spouse" => Ok(Self::Spouse),
            other => Err(KingraphError::MalformedEdge(format!(
                "unknown relationship kind '{}'",
                other
            ))),
        }
    }
}

/// Display vocabulary for adjacency entries and path links: the stored kinds
/// plus the genderless fallbacks produced by inverse derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationLabel {
    Father,
    Mother,
    Daughter,
    Son,
    Wife,
    Husband,
    Spouse,
    /// Child of unknown gender
    Child,
    /// Parent of unknown gender
    Parent,
}

impl From<RelationshipKind> for RelationLabel {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Father => Self::Father,
            RelationshipKind::Mother => Self::Mother,
            RelationshipKind::Daughter => Self::Daughter,
            RelationshipKind::Son => Self::Son,
            RelationshipKind::Wife => Self::Wife,
            RelationshipKind::Husband => Self::Husband,
            RelationshipKind::Spouse => Self::Spouse,
        }
    }
}

impl RelationLabel {
    /// Label of the *other* endpoint of a stored row, as seen from the
    /// endpoint the row labels. `gender` is the gender of the person being
    /// labeled by the result.
    ///
    /// A row `(u, v, father)` says v is u's father, so u is v's son or
    /// daughter (by u's own gender). Spouse kinds invert to the generic
    /// `Spouse`: the forward label encodes the spouse's gender, the inverse
    /// relation is symmetric.
    pub fn inverse_of(kind: RelationshipKind, gender: Gender) -> Self {
        match kind {
            RelationshipKind::Father | RelationshipKind::Mother => match gender {
                Gender::Male => Self::Son,
                Gender::Female => Self::Daughter,
                Gender::Unknown => Self::Child,
            },
            RelationshipKind::Son | RelationshipKind::Daughter => match gender {
                Gender::Male => Self::Father,
                Gender::Female => Self::Mother,
                Gender::Unknown => Self::Parent,
            },
            RelationshipKind::Wife | RelationshipKind::Husband | RelationshipKind::Spouse => {
                Self::Spouse
            }
        }
    }
}

impl fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Daughter => "daughter",
            Self::Son => "son",
            Self::Wife => "wife",
            Self::Husband => "husband",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Parent => "parent",
        };
        f.write_str(name)
    }
}

/// Whether an adjacency entry came from a stored row as written or was
/// materialized from its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    Forward,
    Backward,
}

/// A raw relationship edge as handed over by the store collaborator
/// (source --kind--> target, kind still in stored string form).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRow {
    pub source_person_id: PersonId,
    pub target_person_id: PersonId,
    pub kind: String,
}

impl RelationshipRow {
    pub fn new(source: PersonId, target: PersonId, kind: &str) -> Self {
        Self {
            source_person_id: source,
            target_person_id: target,
            kind: kind.to_string(),
        }
    }
}
