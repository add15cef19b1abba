//! Tabular data with named columns.

use crate::TableError;

mod csv_io;

/// A single table row, holding one value per table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    /// Value at the given column index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Ordered rows over a fixed, ordered list of columns.
///
/// Every row has exactly one value per column, so a row can be read as a
/// mapping from column name to value. Values are kept as text; the column
/// used for grouping compares labels by exact string equality.
///
/// # Example
///
/// ```
/// use labelmatch_core::LabeledTable;
///
/// let mut table = LabeledTable::new(vec!["sentence".into(), "gold_label".into()]);
/// table.push_row(vec!["a cat sleeps".into(), "neutral".into()])?;
/// table.push_row(vec!["no cat".into(), "contradiction".into()])?;
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.column_index("gold_label"), Some(1));
/// let labels = table.labels("gold_label").unwrap().collect::<Vec<_>>();
/// assert_eq!(labels, ["neutral", "contradiction"]);
/// # Ok::<(), labelmatch_core::TableError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl LabeledTable {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: vec![],
        }
    }

    /// Creates a table from columns and row values.
    pub fn from_rows<I>(columns: Vec<String>, rows: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut table = Self::new(columns);
        for values in rows {
            table.push_row(values)?;
        }
        Ok(table)
    }

    /// Appends a row.
    ///
    /// Fails when the number of values differs from the number of columns.
    pub fn push_row(&mut self, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::RowLength {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(Row { values });
        Ok(())
    }

    /// Creates an empty table sharing this table's columns.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self::new(self.columns.clone())
    }

    pub(crate) fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of `column` in row order, or `None` if the column does not exist.
    pub fn labels(&self, column: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| row.values[index].as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["id".into(), "label".into()]
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = LabeledTable::new(columns());
        table.push_row(vec!["1".into(), "A".into()]).unwrap();
        let err = table.push_row(vec!["2".into()]).unwrap_err();
        assert!(matches!(
            err,
            TableError::RowLength {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_labels_missing_column() {
        let table = LabeledTable::new(columns());
        assert!(table.labels("gold_label").is_none());
        assert!(!table.has_column("gold_label"));
    }

    #[test]
    fn test_labels_in_row_order() {
        let table = LabeledTable::from_rows(
            columns(),
            [
                vec!["1".into(), "B".into()],
                vec!["2".into(), "A".into()],
                vec!["3".into(), "B".into()],
            ],
        )
        .unwrap();
        let labels = table.labels("label").unwrap().collect::<Vec<_>>();
        assert_eq!(labels, vec!["B", "A", "B"]);
        assert_eq!(table.rows()[1].get(0), Some("2"));
    }

    #[test]
    fn test_empty_like_keeps_columns() {
        let table =
            LabeledTable::from_rows(columns(), [vec!["1".into(), "A".into()]]).unwrap();
        let empty = table.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.columns(), table.columns());
    }
}
