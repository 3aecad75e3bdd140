use polltab_table::ResponseTable;
use serde::Serialize;

use crate::StatsError;

/// How to treat observed categories that are absent from a caller-supplied
/// expected-category list.
///
/// Survey forms drift: a later export may contain answer labels the original
/// questionnaire did not define. The policy is an explicit per-call choice,
/// never an implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CategoryPolicy {
    /// Unexpected observed categories are a caller error
    /// ([`StatsError::UnknownCategory`]).
    Strict,
    /// Unexpected observed categories are appended after the expected list,
    /// in first-observed order.
    Lenient,
}

/// One category and its response count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    /// The category label.
    pub category: String,
    /// Number of responses observed for this category.
    pub count: u64,
}

/// Response counts per category for one question.
///
/// Entry order is meaningful: natural tabulation lists categories in
/// first-observed order, and tabulation against an expected list preserves
/// the expected order (with zero fills for categories never observed).
///
/// # Examples
///
/// ```
/// use polltab_stats::frequency::FrequencyTable;
/// use polltab_table::ResponseTable;
///
/// let mut table = ResponseTable::with_columns(["q"]).unwrap();
/// for value in ["A", "A", "B", "C", "C", "C"] {
///     table.push_row([Some(value.to_string())]).unwrap();
/// }
///
/// let frequency = FrequencyTable::tabulate(&table, "q").unwrap();
/// assert_eq!(frequency.count("A"), 2);
/// assert_eq!(frequency.count("C"), 3);
/// assert_eq!(frequency.total(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    total: u64,
}

impl FrequencyTable {
    /// Tabulates response counts for one question, categories in
    /// first-observed order.
    ///
    /// Missing responses are dropped before counting.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ColumnNotFound`] if `question_id` is not a
    /// column of the table.
    pub fn tabulate(table: &ResponseTable, question_id: &str) -> Result<Self, StatsError> {
        let responses = table
            .responses(question_id)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: question_id.to_string(),
            })?;

        let mut entries: Vec<FrequencyEntry> = vec![];
        let mut total = 0;
        for response in responses {
            total += 1;
            match entries.iter_mut().find(|e| e.category == response) {
                Some(entry) => entry.count += 1,
                None => entries.push(FrequencyEntry {
                    category: response.to_string(),
                    count: 1,
                }),
            }
        }
        Ok(Self { entries, total })
    }

    /// Tabulates response counts against an explicit expected-category list.
    ///
    /// The result contains exactly the expected categories, in the given
    /// order, with 0 for categories never observed. Observed categories
    /// outside the list are handled per `policy`: rejected under
    /// [`CategoryPolicy::Strict`], appended after the expected list under
    /// [`CategoryPolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ColumnNotFound`] if `question_id` is not a
    /// column, or [`StatsError::UnknownCategory`] under strict policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use polltab_stats::frequency::{CategoryPolicy, FrequencyTable};
    /// use polltab_table::ResponseTable;
    ///
    /// let mut table = ResponseTable::with_columns(["scale"]).unwrap();
    /// for value in ["Often", "Never", "Often"] {
    ///     table.push_row([Some(value.to_string())]).unwrap();
    /// }
    ///
    /// let expected = ["Never", "Sometimes", "Often"];
    /// let frequency = FrequencyTable::tabulate_expected(
    ///     &table,
    ///     "scale",
    ///     &expected,
    ///     CategoryPolicy::Strict,
    /// )
    /// .unwrap();
    ///
    /// let categories: Vec<_> = frequency.iter().collect();
    /// assert_eq!(
    ///     categories,
    ///     [("Never", 1), ("Sometimes", 0), ("Often", 2)],
    /// );
    /// ```
    pub fn tabulate_expected<S>(
        table: &ResponseTable,
        question_id: &str,
        expected_categories: &[S],
        policy: CategoryPolicy,
    ) -> Result<Self, StatsError>
    where
        S: AsRef<str>,
    {
        let responses = table
            .responses(question_id)
            .ok_or_else(|| StatsError::ColumnNotFound {
                name: question_id.to_string(),
            })?;

        let mut entries: Vec<FrequencyEntry> = expected_categories
            .iter()
            .map(|category| FrequencyEntry {
                category: category.as_ref().to_string(),
                count: 0,
            })
            .collect();
        let expected_len = entries.len();

        let mut total = 0;
        for response in responses {
            total += 1;
            if let Some(entry) = entries.iter_mut().find(|e| e.category == response) {
                entry.count += 1;
                continue;
            }
            match policy {
                CategoryPolicy::Strict => {
                    return Err(StatsError::UnknownCategory {
                        question: question_id.to_string(),
                        category: response.to_string(),
                    });
                }
                CategoryPolicy::Lenient => entries.push(FrequencyEntry {
                    category: response.to_string(),
                    count: 1,
                }),
            }
        }

        // Entry order invariant: expected categories first, drift categories
        // appended in first-observed order.
        debug_assert!(entries.len() >= expected_len);
        Ok(Self { entries, total })
    }

    /// Count for one category, 0 if the category is not in the table.
    #[must_use]
    pub fn count(&self, category: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map_or(0, |e| e.count)
    }

    /// Total number of non-missing responses counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of categories (including zero-filled expected ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no categories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category/count pairs in tabulation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|e| (e.category.as_str(), e.count))
    }

    /// All entries in tabulation order.
    #[must_use]
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// Percentage of total responses for one category.
    ///
    /// Returns 0 when no responses were counted.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percentage(&self, category: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.total as f64 * 100.0
    }

    /// Category/percentage pairs in tabulation order.
    pub fn percentages(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.category.as_str(), self.percentage(&e.category)))
    }
}
