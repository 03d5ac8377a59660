//! Engine entry points: load the query's graph scope from the collaborators,
//! run the pure traversal, assemble the response.
//!
//! All I/O happens before traversal (batch edge and person loads) or after
//! it (address enrichment); the BFS loops themselves never block. Each query
//! builds its own ephemeral adjacency view, so concurrent queries need no
//! coordination.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::config::GraphConfig;
use crate::error::Result;
use crate::graph::discovery::{self, DepthMode, DiscoveryFilter};
use crate::graph::{assemble, path, AdjacencyView, PersonId, RelationshipRow};
use crate::graph::{DiscoveryResponse, PathResponse};
use crate::source::{Gender, PersonDirectory, PersonRecord, RelationshipStore};

/// Discover every person within `max_depth` hops of `root`, filtered,
/// enriched, ordered by closeness, and capped at `config.result_cap`.
///
/// Depths above `config.max_depth_ceiling` are clamped rather than
/// rejected.
pub async fn discover<S, D>(
    store: &S,
    directory: &D,
    config: &GraphConfig,
    root: PersonId,
    max_depth: u32,
    mode: DepthMode,
    filter: &DiscoveryFilter,
) -> Result<DiscoveryResponse>
where
    S: RelationshipStore,
    D: PersonDirectory,
{
    let depth = clamp_depth(max_depth, config.max_depth_ceiling);

    let rows = store.load_edges_near(root, depth).await?;
    let persons = load_person_map(directory, &rows, &[root]).await;
    let view = AdjacencyView::build(&rows, &genders_of(&persons))?;
    log::debug!(
        "Discovery from {}: {} persons in scope, depth {} ({:?})",
        root,
        view.person_count(),
        depth,
        mode
    );

    let result = discovery::discover(&view, root, depth, mode, filter, &persons)?;
    assemble::assemble_discovery(
        result,
        &persons,
        directory,
        config.result_cap,
        Utc::now().date_naive(),
    )
    .await
}

/// Shortest labeled connection between `a` and `b`, bounded by
/// `config.max_path_hops`.
pub async fn find_path<S, D>(
    store: &S,
    directory: &D,
    config: &GraphConfig,
    a: PersonId,
    b: PersonId,
) -> Result<PathResponse>
where
    S: RelationshipStore,
    D: PersonDirectory,
{
    // Both endpoints' neighborhoods; the view build collapses the overlap.
    let mut rows = store.load_edges_near(a, config.max_path_hops).await?;
    if b != a {
        rows.extend(store.load_edges_near(b, config.max_path_hops).await?);
    }

    let persons = load_person_map(directory, &rows, &[a, b]).await;
    let view = AdjacencyView::build(&rows, &genders_of(&persons))?;
    log::debug!(
        "Path search {} -> {}: {} persons in scope",
        a,
        b,
        view.person_count()
    );

    let search = path::find_between(&view, a, b, config.max_path_hops)?;
    assemble::assemble_path(&search, &persons, directory).await
}

fn clamp_depth(requested: u32, ceiling: u32) -> u32 {
    if requested > ceiling {
        log::debug!("Clamping requested depth {} to ceiling {}", requested, ceiling);
        ceiling
    } else {
        requested
    }
}

/// Batch person load for every id touched by the edge scope. Lookup misses
/// and failures leave the person out of the map; downstream consumers
/// tolerate the gap.
async fn load_person_map<D: PersonDirectory>(
    directory: &D,
    rows: &[RelationshipRow],
    extra: &[PersonId],
) -> HashMap<PersonId, PersonRecord> {
    let mut ids: HashSet<PersonId> = extra.iter().copied().collect();
    for row in rows {
        ids.insert(row.source_person_id);
        ids.insert(row.target_person_id);
    }

    let mut persons = HashMap::with_capacity(ids.len());
    for id in ids {
        match directory.lookup_person(id).await {
            Ok(Some(record)) => {
                persons.insert(id, record);
            }
            Ok(None) => {}
            Err(err) => {
                log::debug!("Person lookup failed for {}: {}", id, err);
            }
        }
    }
    persons
}

fn genders_of(persons: &HashMap<PersonId, PersonRecord>) -> HashMap<PersonId, Gender> {
    persons.iter().map(|(&id, p)| (id, p.gender)).collect()
}
