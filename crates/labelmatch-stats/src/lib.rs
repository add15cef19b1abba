//! Label distribution statistics for the labelmatch project.
//!
//! This crate provides the counting side of distribution matching:
//!
//! - **Distributions**: Count categorical labels and derive per-label proportions
//! - **Shares**: Per-label percentage breakdowns for reporting
//!
//! # Modules
//!
//! - [`distribution`]: Label counts, proportions and target counts
//! - [`share`]: Percentage breakdown rows and their formatting
//!
//! # Examples
//!
//! ## Computing a distribution
//!
//! ```
//! use labelmatch_stats::distribution::DistributionMap;
//!
//! let dist = DistributionMap::from_labels(["A", "A", "A", "B"]).unwrap();
//! assert_eq!(dist.proportion("A"), Some(0.75));
//! assert_eq!(dist.target_count("B", 100), 25);
//! ```
//!
//! ## Formatting a breakdown
//!
//! ```
//! use labelmatch_stats::distribution::DistributionMap;
//!
//! let dist = DistributionMap::from_labels(["cat", "dog", "dog"]).unwrap();
//! let shares = dist.shares();
//! assert_eq!(shares[0].label, "cat");
//! assert_eq!(shares[0].formatted_percent(), "33.33%");
//! ```

pub mod distribution;
pub mod share;
