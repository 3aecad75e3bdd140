use polltab_table::ResponseTable;
use serde::Serialize;

use crate::{StatsError, frequency::FrequencyTable};

/// Additive guard inside `log2` so a zero-probability term cannot produce
/// `-inf`. Observed categories always have probability > 0, so the guard only
/// protects numerical edge cases; its contribution is clamped away so a
/// single-category distribution reports exactly 0 bits.
pub const ENTROPY_EPSILON: f64 = 1e-10;

/// Descriptive summary of one categorical question over a response table.
///
/// A summary is a pure value object: computed on demand, never mutated, cheap
/// to recompute. A question with zero non-missing responses yields a valid
/// "empty" summary (`mode = None`, zeroed metrics), not an error.
///
/// # Examples
///
/// ```
/// use polltab_stats::summary::QuestionSummary;
/// use polltab_table::ResponseTable;
///
/// let mut table = ResponseTable::with_columns(["q"]).unwrap();
/// for value in ["A", "A", "B", "C", "C", "C"] {
///     table.push_row([Some(value.to_string())]).unwrap();
/// }
///
/// let summary = QuestionSummary::summarize(&table, "q").unwrap();
/// assert_eq!(summary.mode.as_deref(), Some("C"));
/// assert!((summary.mode_percentage - 50.0).abs() < 1e-9);
/// assert!((summary.diversity_index - 22.0 / 36.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    /// The question identifier this summary was computed for.
    pub question: String,
    /// Count of non-missing responses.
    pub total_responses: u64,
    /// Response counts per category, in first-observed order.
    pub frequency: FrequencyTable,
    /// Most frequent category. Ties are broken by first-observed order;
    /// `None` when there are no responses.
    pub mode: Option<String>,
    /// Count of the mode category, 0 when there are no responses.
    pub mode_count: u64,
    /// `mode_count / total_responses * 100`, 0 when there are no responses.
    pub mode_percentage: f64,
    /// Shannon entropy of the empirical distribution, in bits. 0 iff a
    /// single category was observed.
    pub entropy_bits: f64,
    /// Gini-Simpson index `1 - Σ p_i²`, in `[0, 1 - 1/k]` for k observed
    /// categories. 0 iff a single category was observed.
    pub diversity_index: f64,
}

impl QuestionSummary {
    /// Computes the summary for one question.
    ///
    /// Tabulates the natural categories (no expected-category restriction),
    /// then derives mode, entropy, and diversity from the empirical
    /// distribution.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ColumnNotFound`] if `question_id` is not a
    /// column of the table.
    pub fn summarize(table: &ResponseTable, question_id: &str) -> Result<Self, StatsError> {
        let frequency = FrequencyTable::tabulate(table, question_id)?;
        Ok(Self::from_frequency(question_id, frequency))
    }

    /// Computes one summary per distinct value of a grouping column.
    ///
    /// Groups appear in first-observed order of the grouping column. Rows
    /// with a missing grouping cell belong to no group.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ColumnNotFound`] if either column is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use polltab_stats::summary::QuestionSummary;
    /// use polltab_table::ResponseTable;
    ///
    /// let mut table = ResponseTable::with_columns(["grade", "q"]).unwrap();
    /// for (grade, answer) in [("4", "Yes"), ("5", "No"), ("4", "Yes")] {
    ///     table
    ///         .push_row([Some(grade.to_string()), Some(answer.to_string())])
    ///         .unwrap();
    /// }
    ///
    /// let per_grade = QuestionSummary::summarize_by_group(&table, "grade", "q").unwrap();
    /// assert_eq!(per_grade.len(), 2);
    /// assert_eq!(per_grade[0].0, "4");
    /// assert_eq!(per_grade[0].1.total_responses, 2);
    /// ```
    pub fn summarize_by_group(
        table: &ResponseTable,
        group_question_id: &str,
        question_id: &str,
    ) -> Result<Vec<(String, Self)>, StatsError> {
        let groups = table
            .distinct(group_question_id)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: group_question_id.to_string(),
            })?;
        if !table.has_column(question_id) {
            return Err(StatsError::ColumnNotFound {
                name: question_id.to_string(),
            });
        }

        let groups: Vec<String> = groups.into_iter().map(String::from).collect();
        groups
            .into_iter()
            .map(|group| {
                // Column existence was checked above; the filtered table
                // keeps the full column set.
                let subset = table
                    .filtered(group_question_id, &group)
                    .unwrap_or_default();
                let summary = Self::summarize(&subset, question_id)?;
                Ok((group, summary))
            })
            .collect()
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_frequency(question_id: &str, frequency: FrequencyTable) -> Self {
        let total = frequency.total();
        if total == 0 {
            return Self {
                question: question_id.to_string(),
                total_responses: 0,
                frequency,
                mode: None,
                mode_count: 0,
                mode_percentage: 0.0,
                entropy_bits: 0.0,
                diversity_index: 0.0,
            };
        }

        // First entry with the maximum count; strict `>` keeps the
        // first-observed category on ties.
        let mut mode: Option<&str> = None;
        let mut mode_count = 0;
        for (category, count) in frequency.iter() {
            if count > mode_count {
                mode = Some(category);
                mode_count = count;
            }
        }

        let n = total as f64;
        let mut entropy_bits = 0.0;
        let mut concentration = 0.0;
        for (_, count) in frequency.iter() {
            let p = count as f64 / n;
            entropy_bits -= p * (p + ENTROPY_EPSILON).log2();
            concentration += p * p;
        }

        Self {
            question: question_id.to_string(),
            total_responses: total,
            mode: mode.map(String::from),
            mode_count,
            mode_percentage: mode_count as f64 / n * 100.0,
            // The epsilon guard can push a pure distribution a hair below
            // zero; clamp so a single category reports exactly 0 bits.
            entropy_bits: entropy_bits.max(0.0),
            diversity_index: 1.0 - concentration,
            frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(values: &[&str]) -> ResponseTable {
        let mut table = ResponseTable::with_columns(["q"]).unwrap();
        for value in values {
            table.push_row([Some((*value).to_string())]).unwrap();
        }
        table
    }

    #[test]
    fn summarizes_mixed_distribution() {
        let table = table_of(&["A", "A", "B", "C", "C", "C"]);
        let summary = QuestionSummary::summarize(&table, "q").unwrap();

        assert_eq!(summary.total_responses, 6);
        assert_eq!(summary.frequency.count("A"), 2);
        assert_eq!(summary.frequency.count("B"), 1);
        assert_eq!(summary.frequency.count("C"), 3);
        assert_eq!(summary.mode.as_deref(), Some("C"));
        assert_eq!(summary.mode_count, 3);
        assert!((summary.mode_percentage - 50.0).abs() < 1e-9);
        assert!((summary.diversity_index - 22.0 / 36.0).abs() < 1e-9);
        // -(1/3 log2 1/3 + 1/6 log2 1/6 + 1/2 log2 1/2)
        assert!((summary.entropy_bits - 1.4591).abs() < 1e-3);
    }

    #[test]
    fn empty_question_is_a_valid_state() {
        let table = ResponseTable::with_columns(["q"]).unwrap();
        let summary = QuestionSummary::summarize(&table, "q").unwrap();

        assert_eq!(summary.total_responses, 0);
        assert_eq!(summary.mode, None);
        assert!((summary.mode_percentage - 0.0).abs() < f64::EPSILON);
        assert!((summary.entropy_bits - 0.0).abs() < f64::EPSILON);
        assert!((summary.diversity_index - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn single_category_has_zero_spread() {
        let table = table_of(&["Only", "Only", "Only"]);
        let summary = QuestionSummary::summarize(&table, "q").unwrap();

        assert!((summary.mode_percentage - 100.0).abs() < 1e-9);
        assert_eq!(summary.entropy_bits, 0.0);
        assert!(summary.diversity_index.abs() < 1e-9);
    }

    #[test]
    fn uniform_distribution_approaches_log2_k() {
        let table = table_of(&["A", "B", "C", "D"]);
        let summary = QuestionSummary::summarize(&table, "q").unwrap();

        assert!((summary.entropy_bits - 2.0).abs() < 1e-6);
        assert!((summary.diversity_index - 0.75).abs() < 1e-9);
    }

    #[test]
    fn entropy_grows_as_mass_spreads() {
        let concentrated = QuestionSummary::summarize(&table_of(&["A", "A", "A", "B"]), "q")
            .unwrap()
            .entropy_bits;
        let spread = QuestionSummary::summarize(&table_of(&["A", "A", "B", "B"]), "q")
            .unwrap()
            .entropy_bits;
        let wider = QuestionSummary::summarize(&table_of(&["A", "B", "C", "D"]), "q")
            .unwrap()
            .entropy_bits;
        assert!(concentrated < spread);
        assert!(spread < wider);
    }

    #[test]
    fn mode_tie_breaks_on_first_observed() {
        let table = table_of(&["B", "A", "A", "B"]);
        let summary = QuestionSummary::summarize(&table, "q").unwrap();
        assert_eq!(summary.mode.as_deref(), Some("B"));
    }

    #[test]
    fn summarize_is_deterministic() {
        let table = table_of(&["A", "B", "B", "C"]);
        let first = QuestionSummary::summarize(&table, "q").unwrap();
        let second = QuestionSummary::summarize(&table, "q").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn by_group_splits_on_demographic_column() {
        let mut table = ResponseTable::with_columns(["grade", "q"]).unwrap();
        let rows = [
            ("4", Some("Yes")),
            ("4", Some("Yes")),
            ("5", Some("No")),
            ("5", None),
        ];
        for (grade, answer) in rows {
            table
                .push_row([Some(grade.to_string()), answer.map(String::from)])
                .unwrap();
        }

        let per_grade = QuestionSummary::summarize_by_group(&table, "grade", "q").unwrap();
        assert_eq!(per_grade.len(), 2);

        let (grade, summary) = &per_grade[0];
        assert_eq!(grade, "4");
        assert_eq!(summary.total_responses, 2);
        assert_eq!(summary.mode.as_deref(), Some("Yes"));

        let (grade, summary) = &per_grade[1];
        assert_eq!(grade, "5");
        assert_eq!(summary.total_responses, 1);
    }

    #[test]
    fn by_group_checks_both_columns() {
        let table = table_of(&["A"]);
        let missing_group = QuestionSummary::summarize_by_group(&table, "grade", "q");
        assert_eq!(
            missing_group.unwrap_err(),
            StatsError::ColumnNotFound {
                name: "grade".to_string()
            }
        );
        let missing_target = QuestionSummary::summarize_by_group(&table, "q", "other");
        assert_eq!(
            missing_target.unwrap_err(),
            StatsError::ColumnNotFound {
                name: "other".to_string()
            }
        );
    }
}
