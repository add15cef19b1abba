/// One row of a percentage breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelShare {
    /// The label value.
    pub label: String,
    /// Number of rows carrying the label.
    pub count: usize,
    /// Share of all rows, in percent (0 to 100).
    pub percent: f64,
}

impl LabelShare {
    /// Creates a share of `count` out of `total` rows.
    ///
    /// A zero `total` yields a zero percentage.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(label: String, count: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        Self {
            label,
            count,
            percent,
        }
    }

    /// Percentage with two decimals and a trailing `%`.
    ///
    /// ```
    /// # use labelmatch_stats::share::LabelShare;
    /// let share = LabelShare::new("A".to_owned(), 1, 8);
    /// assert_eq!(share.formatted_percent(), "12.50%");
    /// ```
    #[must_use]
    pub fn formatted_percent(&self) -> String {
        format!("{:.2}%", self.percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_percent() {
        assert_eq!(
            LabelShare::new("a".into(), 3, 4).formatted_percent(),
            "75.00%"
        );
        assert_eq!(
            LabelShare::new("a".into(), 2, 3).formatted_percent(),
            "66.67%"
        );
        assert_eq!(
            LabelShare::new("a".into(), 5, 5).formatted_percent(),
            "100.00%"
        );
    }

    #[test]
    fn test_zero_total() {
        let share = LabelShare::new("a".into(), 0, 0);
        assert!(share.percent.abs() < f64::EPSILON);
        assert_eq!(share.formatted_percent(), "0.00%");
    }
}
