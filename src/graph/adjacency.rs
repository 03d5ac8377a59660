//! Edge normalization: raw directed relationship rows in, symmetric
//! adjacency view out.
//!
//! The store may or may not materialize the inverse of each relationship
//! row, so every row contributes entries to both endpoints here. Neighbor
//! lists are sorted and deduplicated to make traversal order deterministic;
//! repeated queries over unchanged data must return identical results.

use std::collections::HashMap;

use crate::error::Result;
use crate::graph::{EdgeDirection, PersonId, RelationLabel, RelationshipKind, RelationshipRow};
use crate::source::Gender;

/// One adjacency entry: how `person` relates to the owner of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub person: PersonId,
    /// Label of `person` relative to the list owner.
    pub label: RelationLabel,
    /// Label of the list owner relative to `person` (the mirror entry's
    /// label). Carried so path reconstruction can label both walk
    /// directions without re-deriving inverses.
    pub reciprocal: RelationLabel,
    pub direction: EdgeDirection,
}

/// Per-query, ephemeral symmetric adjacency structure.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyView {
    map: HashMap<PersonId, Vec<Neighbor>>,
}

impl AdjacencyView {
    /// Build a view from raw stored rows.
    ///
    /// A row `(u, v, kind)` reads "v is the `kind` of u" and yields a
    /// forward entry under u and a backward (inverse-derived) entry under
    /// v. Inverse labels are refined by the labeled person's own gender
    /// (`genders` is keyed by person id; absent means unknown).
    ///
    /// Entries for the same `(neighbor, label)` under one person collapse
    /// to a single entry, which makes the build idempotent when the store
    /// already materialized both directions of a relationship. Distinct
    /// labels between the same pair are all retained.
    ///
    /// Fails with `MalformedEdge` on any kind outside the closed set; the
    /// whole edge set is rejected, not just the offending row.
    pub fn build(
        rows: &[RelationshipRow],
        genders: &HashMap<PersonId, Gender>,
    ) -> Result<Self> {
        let mut map: HashMap<PersonId, Vec<Neighbor>> = HashMap::with_capacity(rows.len());

        for row in rows {
            let kind: RelationshipKind = row.kind.parse()?;
            let u = row.source_person_id;
            let v = row.target_person_id;
            let gender_u = genders.get(&u).copied().unwrap_or(Gender::Unknown);

            let forward = RelationLabel::from(kind);
            let inverse = RelationLabel::inverse_of(kind, gender_u);

            map.entry(u).or_default().push(Neighbor {
                person: v,
                label: forward,
                reciprocal: inverse,
                direction: EdgeDirection::Forward,
            });
            map.entry(v).or_default().push(Neighbor {
                person: u,
                label: inverse,
                reciprocal: forward,
                direction: EdgeDirection::Backward,
            });
        }

        for neighbors in map.values_mut() {
            neighbors.sort_by_key(|n| (n.person, n.label, n.direction, n.reciprocal));
            neighbors.dedup_by_key(|n| (n.person, n.label));
        }

        Ok(Self { map })
    }

    pub fn contains(&self, person: PersonId) -> bool {
        self.map.contains_key(&person)
    }

    /// Neighbors of a person in deterministic order; empty for persons
    /// outside the view.
    pub fn neighbors(&self, person: PersonId) -> &[Neighbor] {
        self.map.get(&person).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn person_count(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KingraphError;

    fn row(source: PersonId, target: PersonId, kind: &str) -> RelationshipRow {
        RelationshipRow::new(source, target, kind)
    }

    fn genders(pairs: &[(PersonId, Gender)]) -> HashMap<PersonId, Gender> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_single_row_materializes_both_directions() {
        // "2 is the father of 1"; 1 is male, so the inverse labels 1 a son.
        let view = AdjacencyView::build(
            &[row(1, 2, "father")],
            &genders(&[(1, Gender::Male), (2, Gender::Male)]),
        )
        .unwrap();

        let from_1 = view.neighbors(1);
        assert_eq!(from_1.len(), 1);
        assert_eq!(from_1[0].person, 2);
        assert_eq!(from_1[0].label, RelationLabel::Father);
        assert_eq!(from_1[0].direction, EdgeDirection::Forward);

        let from_2 = view.neighbors(2);
        assert_eq!(from_2.len(), 1);
        assert_eq!(from_2[0].person, 1);
        assert_eq!(from_2[0].label, RelationLabel::Son);
        assert_eq!(from_2[0].direction, EdgeDirection::Backward);
    }

    #[test]
    fn test_inverse_falls_back_to_generic_child() {
        let view = AdjacencyView::build(&[row(1, 2, "mother")], &genders(&[])).unwrap();
        assert_eq!(view.neighbors(2)[0].label, RelationLabel::Child);
    }

    #[test]
    fn test_child_row_inverse_labels_the_parent() {
        // "2 is the daughter of 1"; 1 is female, so 1 is 2's mother.
        let view = AdjacencyView::build(
            &[row(1, 2, "daughter")],
            &genders(&[(1, Gender::Female)]),
        )
        .unwrap();
        assert_eq!(view.neighbors(2)[0].label, RelationLabel::Mother);
        assert_eq!(view.neighbors(1)[0].label, RelationLabel::Daughter);
    }

    #[test]
    fn test_spouse_inverse_is_generic() {
        let view = AdjacencyView::build(
            &[row(1, 2, "wife")],
            &genders(&[(1, Gender::Male), (2, Gender::Female)]),
        )
        .unwrap();
        assert_eq!(view.neighbors(1)[0].label, RelationLabel::Wife);
        assert_eq!(view.neighbors(2)[0].label, RelationLabel::Spouse);
    }

    #[test]
    fn test_reciprocal_mirrors_the_other_side() {
        let view = AdjacencyView::build(
            &[row(1, 2, "father")],
            &genders(&[(1, Gender::Female)]),
        )
        .unwrap();
        // 1's entry for 2 carries what 1 looks like from 2's side, and
        // vice versa.
        assert_eq!(view.neighbors(1)[0].reciprocal, RelationLabel::Daughter);
        assert_eq!(view.neighbors(2)[0].reciprocal, RelationLabel::Father);
    }

    #[test]
    fn test_distinct_labels_between_same_pair_retained() {
        // Divorced and remarried: recorded once as wife, once generically.
        let view = AdjacencyView::build(
            &[row(1, 2, "wife"), row(1, 2, "spouse")],
            &genders(&[]),
        )
        .unwrap();
        let labels: Vec<RelationLabel> = view.neighbors(1).iter().map(|n| n.label).collect();
        assert_eq!(labels, vec![RelationLabel::Wife, RelationLabel::Spouse]);
    }

    #[test]
    fn test_identical_rows_collapse() {
        let view = AdjacencyView::build(
            &[row(1, 2, "father"), row(1, 2, "father")],
            &genders(&[]),
        )
        .unwrap();
        assert_eq!(view.neighbors(1).len(), 1);
        assert_eq!(view.neighbors(2).len(), 1);
    }

    #[test]
    fn test_prematerialized_inverse_rows_collapse() {
        // Store wrote both directions: "2 is 1's father" and "1 is 2's son".
        let view = AdjacencyView::build(
            &[row(1, 2, "father"), row(2, 1, "son")],
            &genders(&[(1, Gender::Male), (2, Gender::Male)]),
        )
        .unwrap();
        assert_eq!(view.neighbors(1).len(), 1);
        assert_eq!(view.neighbors(1)[0].label, RelationLabel::Father);
        assert_eq!(view.neighbors(2).len(), 1);
        assert_eq!(view.neighbors(2)[0].label, RelationLabel::Son);
    }

    #[test]
    fn test_malformed_kind_rejects_whole_set() {
        let err = AdjacencyView::build(
            &[row(1, 2, "father"), row(2, 3, "cousin")],
            &genders(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, KingraphError::MalformedEdge(_)));
    }

    #[test]
    fn test_ordering_is_input_order_independent() {
        let rows = vec![
            row(1, 4, "spouse"),
            row(1, 2, "father"),
            row(1, 3, "mother"),
            row(3, 5, "husband"),
        ];
        let mut shuffled = rows.clone();
        shuffled.reverse();

        let g = genders(&[(1, Gender::Male), (2, Gender::Male), (3, Gender::Female)]);
        let a = AdjacencyView::build(&rows, &g).unwrap();
        let b = AdjacencyView::build(&shuffled, &g).unwrap();

        for person in [1, 2, 3, 4, 5] {
            assert_eq!(a.neighbors(person), b.neighbors(person), "person {}", person);
        }
        let order: Vec<PersonId> = a.neighbors(1).iter().map(|n| n.person).collect();
        assert_eq!(order, vec![2, 3, 4]);
    }

    #[test]
    fn test_absent_person_has_no_neighbors() {
        let view = AdjacencyView::build(&[row(1, 2, "spouse")], &genders(&[])).unwrap();
        assert!(!view.contains(99));
        assert!(view.neighbors(99).is_empty());
        assert_eq!(view.person_count(), 2);
    }
}
