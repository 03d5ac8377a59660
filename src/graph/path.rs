//! Shortest labeled path between two persons via bidirectional BFS.
//!
//! Two frontiers expand in whole layers, one from each endpoint; the search
//! stops at the first node visited by both sides. Under the deterministic
//! adjacency ordering this makes tie-breaks between equally short paths
//! reproducible across runs.

use std::collections::HashMap;

use crate::error::{KingraphError, Result};
use crate::graph::{AdjacencyView, PersonId, RelationLabel};

/// One step of a connection path. `label` describes this person relative to
/// the previous step; it is `None` only on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub person: PersonId,
    pub label: Option<RelationLabel>,
}

/// Outcome of a path search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSearch {
    /// Both endpoints are the same person; not a meaningful connection.
    Trivial(PersonId),
    /// The endpoints live in disjoint components (or the connection exceeds
    /// the hop ceiling). A normal outcome, not an error.
    NotConnected,
    /// Shortest connection from A to B inclusive.
    Found(Vec<PathStep>),
}

/// One search side: its current frontier, visited depths, and predecessor
/// links carrying the label needed for A→B rendering.
struct Frontier {
    frontier: Vec<PersonId>,
    visited: HashMap<PersonId, u32>,
    pred: HashMap<PersonId, (PersonId, RelationLabel)>,
    depth: u32,
}

impl Frontier {
    fn seed(start: PersonId) -> Self {
        let mut visited = HashMap::new();
        visited.insert(start, 0);
        Self {
            frontier: vec![start],
            visited,
            pred: HashMap::new(),
            depth: 0,
        }
    }

    /// Expand one whole layer. Returns the first node also visited by
    /// `other`, if any.
    ///
    /// The A-side stores each discovered node's label relative to its
    /// predecessor; the B-side stores the reciprocal (predecessor relative
    /// to the node), because the B-segment of the final path is walked
    /// meeting→B while labels must read in A→B order.
    fn expand(
        &mut self,
        view: &AdjacencyView,
        other: &Frontier,
        use_reciprocal: bool,
    ) -> Option<PersonId> {
        let current_layer = std::mem::take(&mut self.frontier);
        let mut next = Vec::new();

        for &current in &current_layer {
            for neighbor in view.neighbors(current) {
                if self.visited.contains_key(&neighbor.person) {
                    continue;
                }
                self.visited.insert(neighbor.person, self.depth + 1);
                let label = if use_reciprocal {
                    neighbor.reciprocal
                } else {
                    neighbor.label
                };
                self.pred.insert(neighbor.person, (current, label));
                if other.visited.contains_key(&neighbor.person) {
                    return Some(neighbor.person);
                }
                next.push(neighbor.person);
            }
        }

        self.depth += 1;
        self.frontier = next;
        None
    }
}

/// Shortest connection between `a` and `b`, at most `max_hops` edges long.
///
/// Either endpoint missing from the view is `PersonNotFound`; `a == b` is
/// the trivial case. Each round expands the smaller frontier (family graphs
/// branch heavily around spouses, so this saves real work); exhausting
/// either frontier means the components are disjoint.
pub fn find_between(
    view: &AdjacencyView,
    a: PersonId,
    b: PersonId,
    max_hops: u32,
) -> Result<PathSearch> {
    if !view.contains(a) {
        return Err(KingraphError::PersonNotFound(a));
    }
    if !view.contains(b) {
        return Err(KingraphError::PersonNotFound(b));
    }
    if a == b {
        return Ok(PathSearch::Trivial(a));
    }

    let mut from_a = Frontier::seed(a);
    let mut from_b = Frontier::seed(b);

    while !from_a.frontier.is_empty()
        && !from_b.frontier.is_empty()
        && from_a.depth + from_b.depth < max_hops
    {
        let meeting = if from_a.frontier.len() <= from_b.frontier.len() {
            from_a.expand(view, &from_b, false)
        } else {
            from_b.expand(view, &from_a, true)
        };
        if let Some(node) = meeting {
            return Ok(PathSearch::Found(reconstruct(a, b, node, &from_a, &from_b)));
        }
    }

    Ok(PathSearch::NotConnected)
}

/// Concatenate the two predecessor chains through the meeting node into one
/// A→B sequence with per-step labels.
fn reconstruct(
    a: PersonId,
    b: PersonId,
    meeting: PersonId,
    from_a: &Frontier,
    from_b: &Frontier,
) -> Vec<PathStep> {
    let mut steps = Vec::new();

    // meeting → a, then reversed into a → meeting order.
    let mut current = meeting;
    while current != a {
        let (prev, label) = from_a.pred[&current];
        steps.push(PathStep {
            person: current,
            label: Some(label),
        });
        current = prev;
    }
    steps.push(PathStep {
        person: a,
        label: None,
    });
    steps.reverse();

    // meeting → b, already in path order.
    let mut current = meeting;
    while current != b {
        let (next, label) = from_b.pred[&current];
        steps.push(PathStep {
            person: next,
            label: Some(label),
        });
        current = next;
    }

    steps
}
