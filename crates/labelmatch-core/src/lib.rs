//! Label-distribution matching over labeled tables.
//!
//! - [`LabeledTable`] - Ordered rows over a fixed list of columns, read from and written to CSV
//! - [`DistributionMatcher`] - Resamples a candidate table to the label proportions of a reference table
//! - [`SampledTable`] - Matching result with per-label [`LabelAllocation`]s
//!
//! # Example
//!
//! ```
//! use labelmatch_core::{DistributionMatcher, LabeledTable};
//!
//! let reference = LabeledTable::read_csv("text,label\nx,A\ny,A\nz,A\nw,B\n".as_bytes())?;
//! let mut candidate = LabeledTable::new(vec!["text".into(), "label".into()]);
//! for i in 0..10 {
//!     let label = if i < 4 { "A" } else { "B" };
//!     candidate.push_row(vec![format!("row{i}"), label.to_owned()])?;
//! }
//!
//! let matcher = DistributionMatcher::new("label").with_seed(7);
//! let sampled = matcher.match_distribution(&reference, &candidate)?;
//!
//! // A: floor(10 * 0.75) = 7, capped at 4 available; B: floor(10 * 0.25) = 2
//! assert_eq!(sampled.len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{matcher::*, table::*};

pub mod matcher;
pub mod table;

/// Which input a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TableRole {
    /// The table whose label proportions are the target.
    #[display("reference")]
    Reference,
    /// The table rows are sampled from.
    #[display("candidate")]
    Candidate,
}

/// Input rejected before any sampling took place.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidInput {
    #[display("{role} table has no '{column}' column")]
    MissingLabelColumn { role: TableRole, column: String },
    #[display("{role} table has no rows")]
    EmptyTable { role: TableRole },
}

impl InvalidInput {
    /// The table the error refers to.
    #[must_use]
    pub fn role(&self) -> TableRole {
        match self {
            InvalidInput::MissingLabelColumn { role, .. } | InvalidInput::EmptyTable { role } => {
                *role
            }
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("malformed CSV: {_0}")]
    Csv(csv::Error),
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    #[display("row {row} has {found} values but the table has {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl From<csv::Error> for TableError {
    fn from(err: csv::Error) -> Self {
        TableError::Csv(err)
    }
}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::Io(err)
    }
}
