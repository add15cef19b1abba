use std::collections::BTreeMap;

use crate::share::LabelShare;

/// Per-label counts of a categorical column and the proportions derived from them.
///
/// Labels are kept in lexicographic order, so iteration is deterministic
/// regardless of the order in which labels were observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionMap {
    counts: BTreeMap<String, usize>,
    total: usize,
}

impl DistributionMap {
    /// Counts the given labels.
    ///
    /// # Returns
    ///
    /// * `Some(DistributionMap)` - if at least one label was given
    /// * `None` - if the iterator is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use labelmatch_stats::distribution::DistributionMap;
    /// let dist = DistributionMap::from_labels(["x", "y", "x"]).unwrap();
    /// assert_eq!(dist.count("x"), 2);
    /// assert_eq!(dist.total(), 3);
    /// assert!(DistributionMap::from_labels(Vec::<&str>::new()).is_none());
    /// ```
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = BTreeMap::<String, usize>::new();
        let mut total = 0;
        for label in labels {
            let label = label.as_ref();
            match counts.get_mut(label) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(label.to_owned(), 1);
                }
            }
            total += 1;
        }
        (total > 0).then_some(Self { counts, total })
    }

    /// Number of observations the distribution was built from.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always `false`; an empty distribution cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// Number of observations of `label` (zero when unseen).
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Fraction of observations carrying `label`, or `None` for an unseen label.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn proportion(&self, label: &str) -> Option<f64> {
        let count = *self.counts.get(label)?;
        Some(count as f64 / self.total as f64)
    }

    /// Iterates over `(label, proportion)` pairs in label order.
    #[expect(clippy::cast_precision_loss)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        let total = self.total as f64;
        self.counts
            .iter()
            .map(move |(label, count)| (label.as_str(), *count as f64 / total))
    }

    /// Iterates over the distinct labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.counts.keys().map(String::as_str)
    }

    /// Number of rows `label` should occupy in a table of `total_rows` rows.
    ///
    /// The product is truncated toward zero, so the targets over all labels
    /// usually add up to slightly less than `total_rows`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use labelmatch_stats::distribution::DistributionMap;
    /// let dist = DistributionMap::from_labels(["a", "b", "b"]).unwrap();
    /// assert_eq!(dist.target_count("a", 10), 3);
    /// assert_eq!(dist.target_count("b", 10), 6);
    /// assert_eq!(dist.target_count("c", 10), 0);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn target_count(&self, label: &str, total_rows: usize) -> usize {
        self.proportion(label)
            .map_or(0, |p| (total_rows as f64 * p).floor() as usize)
    }

    /// Percentage breakdown ordered by label.
    #[must_use]
    pub fn shares(&self) -> Vec<LabelShare> {
        self.counts
            .iter()
            .map(|(label, count)| LabelShare::new(label.clone(), *count, self.total))
            .collect()
    }

    /// Percentage breakdown ordered by descending count, ties broken by label.
    #[must_use]
    pub fn shares_by_frequency(&self) -> Vec<LabelShare> {
        let mut shares = self.shares();
        // stable sort keeps label order among equal counts
        shares.sort_by(|a, b| b.count.cmp(&a.count));
        shares
    }
}
