pub mod config;
pub mod error;
pub mod graph;
pub mod source;

pub use config::GraphConfig;
pub use error::{KingraphError, Result};
pub use graph::{
    discover, find_path, AddressFilter, DepthMode, DiscoveryFilter, DiscoveryResponse,
    PathResponse, PersonId, RelationLabel, RelationshipKind, RelationshipRow,
};
pub use source::{Gender, PersonDirectory, PersonRecord, RelationshipStore};
