//! Proportional stratified sampling.
//!
//! The reference table fixes the label proportions; the candidate table
//! supplies the rows. For each reference label the matcher draws
//! `floor(candidate_rows * proportion)` rows of that label from the candidate
//! table, never more than it has, then shuffles the combined sample.
//!
//! All randomness comes from a single [`Pcg32`] seeded with the caller's seed,
//! so the result depends only on the inputs and the seed.

use labelmatch_stats::distribution::DistributionMap;
use rand::{SeedableRng as _, seq::SliceRandom as _, seq::index};
use rand_pcg::Pcg32;

use crate::{InvalidInput, LabeledTable, Row, TableRole};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Resamples candidate tables to the label distribution of a reference table.
#[derive(Debug, Clone)]
pub struct DistributionMatcher {
    label_column: String,
    seed: u64,
}

impl DistributionMatcher {
    /// Creates a matcher grouping rows by `label_column`, seeded with [`DEFAULT_SEED`].
    #[must_use]
    pub fn new(label_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
            seed: DEFAULT_SEED,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Label proportions of `reference`.
    pub fn compute_distribution(
        &self,
        reference: &LabeledTable,
    ) -> Result<DistributionMap, InvalidInput> {
        compute_distribution(reference, &self.label_column)
    }

    /// Samples `candidate` to the label proportions of `reference`.
    pub fn match_distribution(
        &self,
        reference: &LabeledTable,
        candidate: &LabeledTable,
    ) -> Result<SampledTable, InvalidInput> {
        match_distribution(reference, candidate, &self.label_column, self.seed)
    }
}

/// Per-label sampling outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAllocation {
    pub label: String,
    /// Share of the label in the reference table.
    pub proportion: f64,
    /// `floor(candidate_rows * proportion)`.
    pub target: usize,
    /// Candidate rows carrying the label.
    pub available: usize,
    /// Rows drawn, `min(target, available)`.
    pub sampled: usize,
}

impl LabelAllocation {
    /// Whether the candidate table ran short of rows for this label.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.sampled < self.target
    }
}

/// Result of [`match_distribution`].
#[derive(Debug, Clone)]
pub struct SampledTable {
    table: LabeledTable,
    allocations: Vec<LabelAllocation>,
}

impl SampledTable {
    /// The sampled rows, in shuffled order.
    #[must_use]
    pub fn table(&self) -> &LabeledTable {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> LabeledTable {
        self.table
    }

    /// One allocation per reference label, in label order.
    #[must_use]
    pub fn allocations(&self) -> &[LabelAllocation] {
        &self.allocations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn require_label_column(
    table: &LabeledTable,
    label_column: &str,
    role: TableRole,
) -> Result<usize, InvalidInput> {
    table
        .column_index(label_column)
        .ok_or_else(|| InvalidInput::MissingLabelColumn {
            role,
            column: label_column.to_owned(),
        })
}

fn require_rows(table: &LabeledTable, role: TableRole) -> Result<(), InvalidInput> {
    if table.is_empty() {
        return Err(InvalidInput::EmptyTable { role });
    }
    Ok(())
}

/// Counts each label of `reference` and divides by the row count.
///
/// Fails if `label_column` is missing or `reference` has no rows.
pub fn compute_distribution(
    reference: &LabeledTable,
    label_column: &str,
) -> Result<DistributionMap, InvalidInput> {
    let index = require_label_column(reference, label_column, TableRole::Reference)?;
    require_rows(reference, TableRole::Reference)?;

    let labels = reference
        .rows()
        .iter()
        .map(|row| row.values()[index].as_str());
    DistributionMap::from_labels(labels).ok_or(InvalidInput::EmptyTable {
        role: TableRole::Reference,
    })
}

/// Draws a subset of `candidate` whose label counts follow the proportions of `reference`.
///
/// Labels only present in `candidate` are left out; labels only present in
/// `reference` contribute no rows. Both tables are validated before any row is
/// drawn, so an error never comes with partial output.
pub fn match_distribution(
    reference: &LabeledTable,
    candidate: &LabeledTable,
    label_column: &str,
    seed: u64,
) -> Result<SampledTable, InvalidInput> {
    let distribution = compute_distribution(reference, label_column)?;
    let candidate_index = require_label_column(candidate, label_column, TableRole::Candidate)?;
    require_rows(candidate, TableRole::Candidate)?;

    let total = candidate.len();
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut sampled_rows = Vec::<Row>::new();
    let mut allocations = Vec::with_capacity(distribution.len());

    for (label, proportion) in distribution.iter() {
        let target = distribution.target_count(label, total);
        let class_rows = candidate
            .rows()
            .iter()
            .filter(|row| row.values()[candidate_index] == label)
            .collect::<Vec<_>>();
        let available = class_rows.len();
        let amount = target.min(available);

        sampled_rows.extend(
            index::sample(&mut rng, available, amount)
                .into_iter()
                .map(|i| class_rows[i].clone()),
        );

        log::debug!(
            "label {label:?}: proportion {proportion:.4}, target {target}, available {available}, sampled {amount}"
        );
        allocations.push(LabelAllocation {
            label: label.to_owned(),
            proportion,
            target,
            available,
            sampled: amount,
        });
    }

    sampled_rows.shuffle(&mut rng);
    log::debug!(
        "sampled {} of {total} candidate rows (seed {seed})",
        sampled_rows.len()
    );

    Ok(SampledTable {
        table: LabeledTable::with_rows(candidate.columns().to_vec(), sampled_rows),
        allocations,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    const LABEL: &str = "gold_label";

    fn table_from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> LabeledTable {
        LabeledTable::from_rows(
            vec!["id".into(), LABEL.into()],
            labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| vec![i.to_string(), label.to_owned()]),
        )
        .unwrap()
    }

    fn repeated(groups: &[(&'static str, usize)]) -> Vec<&'static str> {
        groups
            .iter()
            .flat_map(|(label, n)| std::iter::repeat_n(*label, *n))
            .collect()
    }

    fn label_counts(table: &LabeledTable) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for label in table.labels(LABEL).unwrap() {
            *counts.entry(label.to_owned()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_compute_distribution() {
        let reference = table_from_labels(["A", "A", "A", "B"]);
        let dist = compute_distribution(&reference, LABEL).unwrap();
        assert_eq!(dist.proportion("A"), Some(0.75));
        assert_eq!(dist.proportion("B"), Some(0.25));
        let sum: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_distribution_missing_column() {
        let reference = table_from_labels(["A"]);
        let err = compute_distribution(&reference, "label").unwrap_err();
        assert_eq!(
            err,
            InvalidInput::MissingLabelColumn {
                role: TableRole::Reference,
                column: "label".into(),
            }
        );
        assert_eq!(err.to_string(), "reference table has no 'label' column");
    }

    #[test]
    fn test_compute_distribution_empty_reference() {
        let reference = table_from_labels([]);
        let err = compute_distribution(&reference, LABEL).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::EmptyTable {
                role: TableRole::Reference
            }
        );
    }

    #[test]
    fn test_match_caps_at_available_rows() {
        let reference = table_from_labels(["A", "A", "A", "B"]);
        let candidate = table_from_labels(repeated(&[("A", 40), ("B", 60)]));

        let sampled = match_distribution(&reference, &candidate, LABEL, DEFAULT_SEED).unwrap();
        assert_eq!(sampled.len(), 65);

        let counts = label_counts(sampled.table());
        assert_eq!(counts["A"], 40);
        assert_eq!(counts["B"], 25);

        let allocations = sampled.allocations();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].label, "A");
        assert_eq!(allocations[0].target, 75);
        assert_eq!(allocations[0].available, 40);
        assert_eq!(allocations[0].sampled, 40);
        assert!(allocations[0].is_capped());
        assert_eq!(allocations[1].target, 25);
        assert_eq!(allocations[1].sampled, 25);
        assert!(!allocations[1].is_capped());
    }

    #[test]
    fn test_match_excludes_candidate_only_labels() {
        let reference = table_from_labels(["A", "B", "B", "C"]);
        let candidate = table_from_labels(repeated(&[("A", 10), ("B", 10), ("D", 20)]));

        let sampled = match_distribution(&reference, &candidate, LABEL, 1).unwrap();
        let counts = label_counts(sampled.table());
        assert!(!counts.contains_key("D"));
        // targets: A = 10, B = 20 (capped to 10), C = 10 (none available)
        assert_eq!(counts["A"], 10);
        assert_eq!(counts["B"], 10);
        assert!(!counts.contains_key("C"));
        let c = &sampled.allocations()[2];
        assert_eq!((c.label.as_str(), c.target, c.available, c.sampled), ("C", 10, 0, 0));
    }

    #[test]
    fn test_match_respects_bounds() {
        let reference = table_from_labels(repeated(&[("x", 3), ("y", 5), ("z", 9)]));
        let candidate = table_from_labels(repeated(&[("x", 7), ("y", 30), ("z", 2), ("w", 4)]));
        let dist = compute_distribution(&reference, LABEL).unwrap();

        let sampled = match_distribution(&reference, &candidate, LABEL, 99).unwrap();
        let counts = label_counts(sampled.table());
        let available = label_counts(&candidate);
        for (label, count) in &counts {
            assert!(dist.contains(label));
            assert!(*count <= dist.target_count(label, candidate.len()));
            assert!(*count <= available[label]);
        }
    }

    #[test]
    fn test_match_is_deterministic() {
        let reference = table_from_labels(["A", "B", "B"]);
        let candidate = table_from_labels(repeated(&[("A", 25), ("B", 25), ("C", 5)]));

        let first = match_distribution(&reference, &candidate, LABEL, 1234).unwrap();
        let second = match_distribution(&reference, &candidate, LABEL, 1234).unwrap();
        assert_eq!(first.table(), second.table());
    }

    #[test]
    fn test_match_samples_without_replacement() {
        let reference = table_from_labels(["A", "B"]);
        let candidate = table_from_labels(repeated(&[("A", 30), ("B", 30)]));

        let sampled = match_distribution(&reference, &candidate, LABEL, 5).unwrap();
        let mut ids = sampled
            .table()
            .rows()
            .iter()
            .map(|row| row.values()[0].clone())
            .collect::<Vec<_>>();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len);
        assert_eq!(len, 60);
    }

    #[test]
    fn test_match_shuffles_rows() {
        let reference = table_from_labels(["A", "B"]);
        let candidate = table_from_labels(repeated(&[("A", 50), ("B", 50)]));

        let sampled = match_distribution(&reference, &candidate, LABEL, DEFAULT_SEED).unwrap();
        let labels = sampled.table().labels(LABEL).unwrap().collect::<Vec<_>>();
        let grouped = labels.windows(2).filter(|w| w[0] != w[1]).count() == 1;
        assert!(!grouped, "rows should not stay grouped by label");
    }

    #[test]
    fn test_match_empty_candidate() {
        let reference = table_from_labels(["A"]);
        let candidate = table_from_labels([]);
        let err = match_distribution(&reference, &candidate, LABEL, 0).unwrap_err();
        assert_eq!(
            err,
            InvalidInput::EmptyTable {
                role: TableRole::Candidate
            }
        );
    }

    #[test]
    fn test_match_candidate_missing_column() {
        let reference = table_from_labels(["A"]);
        let candidate = LabeledTable::from_rows(
            vec!["id".into(), "label".into()],
            [vec!["0".into(), "A".into()]],
        )
        .unwrap();
        let err = match_distribution(&reference, &candidate, LABEL, 0).unwrap_err();
        assert_eq!(err.role(), TableRole::Candidate);
        assert!(matches!(err, InvalidInput::MissingLabelColumn { .. }));
    }

    #[test]
    fn test_output_keeps_candidate_columns() {
        let reference = table_from_labels(["A"]);
        let candidate = LabeledTable::from_rows(
            vec!["text".into(), LABEL.into(), "source".into()],
            [
                vec!["t0".into(), "A".into(), "web".into()],
                vec!["t1".into(), "A".into(), "news".into()],
            ],
        )
        .unwrap();
        let sampled = DistributionMatcher::new(LABEL)
            .match_distribution(&reference, &candidate)
            .unwrap();
        assert_eq!(sampled.table().columns(), candidate.columns());
        assert_eq!(sampled.len(), 2);
    }

    #[test]
    fn test_matcher_uses_seed() {
        let reference = table_from_labels(["A", "B"]);
        let candidate = table_from_labels(repeated(&[("A", 100), ("B", 100)]));
        let matcher = DistributionMatcher::new(LABEL);
        assert_eq!(matcher.seed(), DEFAULT_SEED);

        let a = matcher.clone().with_seed(1).match_distribution(&reference, &candidate);
        let b = matcher.with_seed(2).match_distribution(&reference, &candidate);
        assert_ne!(a.unwrap().table(), b.unwrap().table());
    }
}
