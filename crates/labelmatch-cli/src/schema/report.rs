use chrono::{DateTime, Utc};
use labelmatch_core::{LabelAllocation, SampledTable};
use labelmatch_stats::{distribution::DistributionMap, share::LabelShare};
use serde::{Deserialize, Serialize};

/// Summary of a matching run, written next to the matched CSV
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Column the rows were grouped by
    pub label_column: String,
    /// Seed of the sampling generator
    pub seed: u64,
    pub reference_rows: usize,
    pub candidate_rows: usize,
    pub sampled_rows: usize,
    /// Reference breakdown, ordered by label
    pub reference_distribution: Vec<ShareRecord>,
    /// Matched breakdown, ordered by descending count
    pub matched_distribution: Vec<ShareRecord>,
    pub allocations: Vec<AllocationRecord>,
}

/// Label breakdown of a single table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub generated_at: DateTime<Utc>,
    /// File the table was read from
    pub source: String,
    pub label_column: String,
    pub total_rows: usize,
    pub distribution: Vec<ShareRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub label: String,
    pub count: usize,
    /// Percentage (0-100)
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub label: String,
    pub proportion: f64,
    pub target: usize,
    pub available: usize,
    pub sampled: usize,
}

impl From<&LabelShare> for ShareRecord {
    fn from(share: &LabelShare) -> Self {
        Self {
            label: share.label.clone(),
            count: share.count,
            percent: share.percent,
        }
    }
}

impl From<&LabelAllocation> for AllocationRecord {
    fn from(allocation: &LabelAllocation) -> Self {
        Self {
            label: allocation.label.clone(),
            proportion: allocation.proportion,
            target: allocation.target,
            available: allocation.available,
            sampled: allocation.sampled,
        }
    }
}

fn share_records(shares: &[LabelShare]) -> Vec<ShareRecord> {
    shares.iter().map(ShareRecord::from).collect()
}

impl MatchReport {
    pub fn new(
        label_column: &str,
        seed: u64,
        reference: &DistributionMap,
        candidate_rows: usize,
        sampled: &SampledTable,
    ) -> Self {
        let matched_distribution = matched_distribution(sampled, label_column)
            .map(|dist| share_records(&dist.shares_by_frequency()))
            .unwrap_or_default();
        Self {
            generated_at: Utc::now(),
            label_column: label_column.to_owned(),
            seed,
            reference_rows: reference.total(),
            candidate_rows,
            sampled_rows: sampled.len(),
            reference_distribution: share_records(&reference.shares()),
            matched_distribution,
            allocations: sampled
                .allocations()
                .iter()
                .map(AllocationRecord::from)
                .collect(),
        }
    }
}

impl DistributionReport {
    pub fn new(source: String, label_column: &str, distribution: &DistributionMap) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            label_column: label_column.to_owned(),
            total_rows: distribution.total(),
            distribution: share_records(&distribution.shares()),
        }
    }
}

/// Label distribution of the matched rows, `None` when nothing was sampled
pub fn matched_distribution(sampled: &SampledTable, label_column: &str) -> Option<DistributionMap> {
    DistributionMap::from_labels(sampled.table().labels(label_column)?)
}

#[cfg(test)]
mod tests {
    use labelmatch_core::{LabeledTable, match_distribution};

    use super::*;

    fn table(labels: &[&str]) -> LabeledTable {
        LabeledTable::from_rows(
            vec!["id".into(), "gold_label".into()],
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| vec![i.to_string(), (*l).to_owned()]),
        )
        .unwrap()
    }

    #[test]
    fn test_match_report_contents() {
        let reference = table(&["A", "A", "A", "B"]);
        let mut labels = vec!["A"; 40];
        labels.extend(vec!["B"; 60]);
        let candidate = table(&labels);

        let dist = DistributionMap::from_labels(reference.labels("gold_label").unwrap()).unwrap();
        let sampled = match_distribution(&reference, &candidate, "gold_label", 42).unwrap();
        let report = MatchReport::new("gold_label", 42, &dist, candidate.len(), &sampled);

        assert_eq!(report.reference_rows, 4);
        assert_eq!(report.candidate_rows, 100);
        assert_eq!(report.sampled_rows, 65);
        assert_eq!(report.reference_distribution[0].label, "A");
        assert!((report.reference_distribution[0].percent - 75.0).abs() < 1e-9);
        // 40 A rows outnumber 25 B rows
        assert_eq!(report.matched_distribution[0].label, "A");
        assert_eq!(report.matched_distribution[0].count, 40);
        assert_eq!(
            report.allocations[0],
            AllocationRecord {
                label: "A".into(),
                proportion: 0.75,
                target: 75,
                available: 40,
                sampled: 40,
            }
        );
    }

    #[test]
    fn test_match_report_serializes() {
        let reference = table(&["A"]);
        let candidate = table(&["B", "B"]);
        let dist = DistributionMap::from_labels(["A"]).unwrap();
        let sampled = match_distribution(&reference, &candidate, "gold_label", 0).unwrap();
        let report = MatchReport::new("gold_label", 0, &dist, candidate.len(), &sampled);
        assert!(report.matched_distribution.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sampled_rows"], 0);
        assert_eq!(json["allocations"][0]["available"], 0);
        assert!(json["generated_at"].is_string());
    }
}
