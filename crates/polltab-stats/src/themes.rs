//! Scoring of named question groups.
//!
//! Vocational-style surveys group several questions under one theme (e.g.
//! "Health Sciences" spans three interest questions) and score each theme by
//! counting how many responses match a marker label prefix. The catalog is a
//! plain value object, deserializable from JSON so callers can ship theme
//! definitions alongside the survey form.

use polltab_table::ResponseTable;
use serde::{Deserialize, Serialize};

/// One named group of question identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Display name of the theme.
    pub name: String,
    /// Question identifiers contributing to this theme.
    pub questions: Vec<String>,
}

/// An ordered collection of themes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCatalog {
    pub themes: Vec<Theme>,
}

/// Aggregate score for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeScore {
    /// Display name of the theme.
    pub name: String,
    /// Responses across the theme's questions that matched the marker
    /// prefix.
    pub matching_responses: u64,
}

/// Scores each theme by counting responses whose label starts with
/// `marker_prefix`.
///
/// Question identifiers absent from the table are skipped rather than
/// rejected; theme catalogs routinely outlive individual survey exports.
/// Missing responses never match.
///
/// # Examples
///
/// ```
/// use polltab_stats::themes::{Theme, ThemeCatalog, score_themes};
/// use polltab_table::ResponseTable;
///
/// let mut table = ResponseTable::with_columns(["q1", "q2"]).unwrap();
/// table
///     .push_row([Some("A. Yes".into()), Some("B. No".into())])
///     .unwrap();
/// table
///     .push_row([Some("A. Yes".into()), Some("A. Maybe".into())])
///     .unwrap();
///
/// let catalog = ThemeCatalog {
///     themes: vec![Theme {
///         name: "Interest".into(),
///         questions: vec!["q1".into(), "q2".into()],
///     }],
/// };
///
/// let scores = score_themes(&table, &catalog, "A");
/// assert_eq!(scores[0].matching_responses, 3);
/// ```
#[must_use]
pub fn score_themes(
    table: &ResponseTable,
    catalog: &ThemeCatalog,
    marker_prefix: &str,
) -> Vec<ThemeScore> {
    catalog
        .themes
        .iter()
        .map(|theme| {
            let matching_responses = theme
                .questions
                .iter()
                .filter_map(|question| table.responses(question))
                .flatten()
                .filter(|response| response.starts_with(marker_prefix))
                .count() as u64;
            ThemeScore {
                name: theme.name.clone(),
                matching_responses,
            }
        })
        .collect()
}
