//! Categorical statistics for survey response tables.
//!
//! This crate turns a [`polltab_table::ResponseTable`] into frequency tables,
//! per-question summary metrics, and two-variable association tests:
//!
//! - **Frequency tabulation**: Count responses per category, optionally
//!   against a fixed expected-category list with zero fills
//! - **Question summaries**: Mode, mode percentage, Shannon entropy, and the
//!   Gini-Simpson diversity index
//! - **Contingency analysis**: Cross-tabulation with a chi-square
//!   independence test and Cramér's V, or a deviation-based fallback when no
//!   test backend is configured
//! - **Theme scoring**: Aggregate counts over named groups of questions
//!
//! Every operation is a pure function over an immutable table: no caching, no
//! shared state, no I/O. Results are plain value objects that renderers and
//! report builders can consume.
//!
//! # Modules
//!
//! - [`frequency`]: Frequency tabulation with category-ordering policies
//! - [`summary`]: Per-question descriptive summaries
//! - [`contingency`]: Cross-tabulation and association tests
//! - [`chi2`]: Chi-square distribution survival function
//! - [`themes`]: Question-group scoring
//!
//! # Examples
//!
//! ## Summarizing one question
//!
//! ```
//! use polltab_stats::summary::QuestionSummary;
//! use polltab_table::ResponseTable;
//!
//! let mut table = ResponseTable::with_columns(["color"]).unwrap();
//! for value in ["Red", "Red", "Blue"] {
//!     table.push_row([Some(value.to_string())]).unwrap();
//! }
//!
//! let summary = QuestionSummary::summarize(&table, "color").unwrap();
//! assert_eq!(summary.mode.as_deref(), Some("Red"));
//! assert_eq!(summary.total_responses, 3);
//! ```
//!
//! ## Testing association between two questions
//!
//! ```
//! use polltab_stats::contingency::ContingencyAnalyzer;
//! use polltab_table::ResponseTable;
//!
//! let mut table = ResponseTable::with_columns(["grade", "answer"]).unwrap();
//! for (grade, answer) in [("4", "Yes"), ("4", "No"), ("5", "Yes"), ("5", "No")] {
//!     table
//!         .push_row([Some(grade.to_string()), Some(answer.to_string())])
//!         .unwrap();
//! }
//!
//! let analyzer = ContingencyAnalyzer::new();
//! let result = analyzer.cross_tabulate(&table, "grade", "answer").unwrap();
//! assert!(result.is_some());
//! ```

pub mod chi2;
pub mod contingency;
pub mod frequency;
pub mod summary;
pub mod themes;

/// Errors raised by the statistics operations.
///
/// An empty input (zero non-missing responses) is never an error; it yields
/// a well-defined empty summary instead.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// The requested question identifier is not a column of the table.
    #[display("column '{name}' not found in response table")]
    ColumnNotFound { name: String },
    /// Strict tabulation observed a category absent from the expected list.
    #[display("observed category '{category}' is not in the expected list for '{question}'")]
    UnknownCategory { question: String, category: String },
    /// A contingency axis has fewer than 2 observed categories, so the
    /// chi-square test is mathematically undefined.
    #[display("'{question}' has fewer than 2 observed categories; chi-square test is undefined")]
    DegenerateTable { question: String },
}
