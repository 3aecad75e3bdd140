use polltab_table::ResponseTable;
use serde::Serialize;

use crate::{StatsError, chi2};

/// Threshold below which a p-value is reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Chi-square p-value provider for [`ContingencyAnalyzer`].
///
/// The provider is injected at analyzer construction, so availability of the
/// statistical test is an explicit configuration value rather than a
/// process-wide flag. When no provider is configured the analyzer falls back
/// to a deviation-based association measure.
pub trait ChiSquareTest: std::fmt::Debug {
    /// Upper-tail probability of the chi-square distribution for the given
    /// statistic and degrees of freedom.
    fn p_value(&self, chi_square: f64, degrees_of_freedom: usize) -> f64;
}

/// Default p-value provider backed by [`chi2::survival`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaChiSquareTest;

impl ChiSquareTest for GammaChiSquareTest {
    fn p_value(&self, chi_square: f64, degrees_of_freedom: usize) -> f64 {
        chi2::survival(chi_square, degrees_of_freedom)
    }
}

/// Association measure attached to a [`ContingencyResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Association {
    /// Classical chi-square independence test.
    ChiSquare {
        /// `Σ (observed - expected)² / expected` over all cells.
        chi_square: f64,
        /// Upper-tail probability under the null hypothesis of independence.
        p_value: f64,
        /// `(rows - 1) * (cols - 1)`.
        degrees_of_freedom: usize,
        /// `sqrt(chi_square / (n * (min(rows, cols) - 1)))`, in `[0, 1]`.
        cramers_v: f64,
        /// `p_value < SIGNIFICANCE_LEVEL`.
        significant: bool,
    },
    /// Fallback when no chi-square test backend is configured: average of
    /// `|observed - expected|` over all cells, no p-value.
    Basic { mean_absolute_deviation: f64 },
}

/// Cross-tabulation of two categorical questions with an association
/// measure.
///
/// Rows are the grouping variable's categories, columns the target
/// variable's categories, both in first-observed order. Unseen combinations
/// count 0. Rows with a missing cell in either variable are excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyResult {
    /// Identifier of the grouping question (grid rows).
    pub group_question: String,
    /// Identifier of the target question (grid columns).
    pub target_question: String,
    /// Row labels, in first-observed order.
    pub group_categories: Vec<String>,
    /// Column labels, in first-observed order.
    pub target_categories: Vec<String>,
    /// Dense counts grid, `counts[row][col]`.
    pub counts: Vec<Vec<u64>>,
    /// Sum over all cells.
    pub grand_total: u64,
    /// Chi-square test results, or the basic fallback measure.
    pub analysis: Association,
}

/// Stateless analyzer for two-variable contingency tables.
///
/// # Examples
///
/// ```
/// use polltab_stats::contingency::{Association, ContingencyAnalyzer};
/// use polltab_table::ResponseTable;
///
/// let mut table = ResponseTable::with_columns(["grade", "answer"]).unwrap();
/// for (grade, answer) in [("4", "Yes"), ("4", "No"), ("5", "No"), ("5", "Yes")] {
///     table
///         .push_row([Some(grade.to_string()), Some(answer.to_string())])
///         .unwrap();
/// }
///
/// let result = ContingencyAnalyzer::new()
///     .cross_tabulate(&table, "grade", "answer")
///     .unwrap()
///     .unwrap();
/// assert_eq!(result.grand_total, 4);
/// assert!(matches!(result.analysis, Association::ChiSquare { .. }));
/// ```
#[derive(Debug)]
pub struct ContingencyAnalyzer {
    test: Option<Box<dyn ChiSquareTest>>,
}

impl Default for ContingencyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContingencyAnalyzer {
    /// Analyzer with the default chi-square test backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_test(Box::new(GammaChiSquareTest))
    }

    /// Analyzer with a caller-supplied chi-square test backend.
    #[must_use]
    pub fn with_test(test: Box<dyn ChiSquareTest>) -> Self {
        Self { test: Some(test) }
    }

    /// Analyzer without a test backend; produces the
    /// [`Association::Basic`] fallback.
    #[must_use]
    pub fn basic() -> Self {
        Self { test: None }
    }

    /// Cross-tabulates the grouping question against the target question.
    ///
    /// Returns `Ok(None)` when the grouping variable has fewer than 2
    /// distinct observed categories; a comparison across a single group is
    /// meaningless but not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ColumnNotFound`] if either question is missing,
    /// or [`StatsError::DegenerateTable`] if the chi-square test is
    /// configured and the target variable has fewer than 2 observed
    /// categories.
    pub fn cross_tabulate(
        &self,
        table: &ResponseTable,
        group_question_id: &str,
        target_question_id: &str,
    ) -> Result<Option<ContingencyResult>, StatsError> {
        for id in [group_question_id, target_question_id] {
            if !table.has_column(id) {
                return Err(StatsError::ColumnNotFound {
                    name: id.to_string(),
                });
            }
        }
        // Both columns verified above.
        let pairs = table
            .paired_responses(group_question_id, target_question_id)
            .unwrap_or_else(|| unreachable!());

        let mut group_categories: Vec<String> = vec![];
        let mut target_categories: Vec<String> = vec![];
        let mut observed: Vec<(usize, usize)> = vec![];
        for (group, target) in pairs {
            let (Some(group), Some(target)) = (group, target) else {
                continue;
            };
            let row = index_of(&mut group_categories, group);
            let col = index_of(&mut target_categories, target);
            observed.push((row, col));
        }

        if group_categories.len() < 2 {
            return Ok(None);
        }

        let mut counts = vec![vec![0_u64; target_categories.len()]; group_categories.len()];
        for (row, col) in observed {
            counts[row][col] += 1;
        }

        let analysis = match &self.test {
            Some(test) => {
                if target_categories.len() < 2 {
                    return Err(StatsError::DegenerateTable {
                        question: target_question_id.to_string(),
                    });
                }
                chi_square_analysis(&counts, test.as_ref())
            }
            None => basic_analysis(&counts),
        };

        let grand_total = counts.iter().flatten().sum();
        Ok(Some(ContingencyResult {
            group_question: group_question_id.to_string(),
            target_question: target_question_id.to_string(),
            group_categories,
            target_categories,
            counts,
            grand_total,
            analysis,
        }))
    }
}

fn index_of(categories: &mut Vec<String>, label: &str) -> usize {
    match categories.iter().position(|c| c == label) {
        Some(index) => index,
        None => {
            categories.push(label.to_string());
            categories.len() - 1
        }
    }
}

struct Margins {
    row_totals: Vec<f64>,
    col_totals: Vec<f64>,
    grand_total: f64,
}

#[expect(clippy::cast_precision_loss)]
fn margins(counts: &[Vec<u64>]) -> Margins {
    let row_totals: Vec<f64> = counts
        .iter()
        .map(|row| row.iter().sum::<u64>() as f64)
        .collect();
    let num_cols = counts.first().map_or(0, Vec::len);
    let col_totals: Vec<f64> = (0..num_cols)
        .map(|col| counts.iter().map(|row| row[col]).sum::<u64>() as f64)
        .collect();
    let grand_total = row_totals.iter().sum();
    Margins {
        row_totals,
        col_totals,
        grand_total,
    }
}

#[expect(clippy::cast_precision_loss)]
fn chi_square_analysis(counts: &[Vec<u64>], test: &dyn ChiSquareTest) -> Association {
    let margins = margins(counts);

    let mut chi_square = 0.0;
    for (row, row_counts) in counts.iter().enumerate() {
        for (col, &count) in row_counts.iter().enumerate() {
            let expected =
                margins.row_totals[row] * margins.col_totals[col] / margins.grand_total;
            if expected > 0.0 {
                chi_square += (count as f64 - expected).powi(2) / expected;
            }
        }
    }

    let rows = counts.len();
    let cols = counts[0].len();
    let degrees_of_freedom = (rows - 1) * (cols - 1);
    let p_value = test.p_value(chi_square, degrees_of_freedom);
    let cramers_v =
        (chi_square / (margins.grand_total * (rows.min(cols) - 1) as f64)).sqrt();

    Association::ChiSquare {
        chi_square,
        p_value,
        degrees_of_freedom,
        cramers_v,
        significant: p_value < SIGNIFICANCE_LEVEL,
    }
}

#[expect(clippy::cast_precision_loss)]
fn basic_analysis(counts: &[Vec<u64>]) -> Association {
    let margins = margins(counts);
    let num_cells = counts.iter().map(Vec::len).sum::<usize>();
    if num_cells == 0 || margins.grand_total == 0.0 {
        return Association::Basic {
            mean_absolute_deviation: 0.0,
        };
    }

    let mut total_deviation = 0.0;
    for (row, row_counts) in counts.iter().enumerate() {
        for (col, &count) in row_counts.iter().enumerate() {
            let expected =
                margins.row_totals[row] * margins.col_totals[col] / margins.grand_total;
            total_deviation += (count as f64 - expected).abs();
        }
    }

    Association::Basic {
        mean_absolute_deviation: total_deviation / num_cells as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired_table(rows: &[(&str, &str)]) -> ResponseTable {
        let mut table = ResponseTable::with_columns(["group", "target"]).unwrap();
        for (group, target) in rows {
            table
                .push_row([Some((*group).to_string()), Some((*target).to_string())])
                .unwrap();
        }
        table
    }

    /// 2x2 grid [[10, 5], [5, 10]]: all expected counts are 7.5.
    fn skewed_table() -> ResponseTable {
        let mut rows = vec![];
        rows.extend(std::iter::repeat_n(("G1", "Yes"), 10));
        rows.extend(std::iter::repeat_n(("G1", "No"), 5));
        rows.extend(std::iter::repeat_n(("G2", "Yes"), 5));
        rows.extend(std::iter::repeat_n(("G2", "No"), 10));
        paired_table(&rows)
    }

    #[test]
    fn grid_counts_and_labels() {
        let table = paired_table(&[("A", "x"), ("A", "y"), ("B", "x"), ("B", "x")]);
        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&table, "group", "target")
            .unwrap()
            .unwrap();

        assert_eq!(result.group_categories, ["A", "B"]);
        assert_eq!(result.target_categories, ["x", "y"]);
        assert_eq!(result.counts, [[1, 1], [2, 0]]);
        assert_eq!(result.grand_total, 4);
    }

    #[test]
    fn chi_square_on_two_by_two() {
        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&skewed_table(), "group", "target")
            .unwrap()
            .unwrap();

        let Association::ChiSquare {
            chi_square,
            p_value,
            degrees_of_freedom,
            cramers_v,
            significant,
        } = result.analysis
        else {
            panic!("expected chi-square analysis");
        };

        // chi2 = 4 * 2.5^2 / 7.5 = 10/3; V = sqrt(chi2 / 30) = 1/3.
        assert!((chi_square - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(degrees_of_freedom, 1);
        assert!((cramers_v - 1.0 / 3.0).abs() < 1e-9);
        assert!((p_value - 0.0679).abs() < 1e-3);
        assert!(!significant);
        assert!(p_value > 0.0 && p_value < 1.0);
    }

    #[test]
    fn strong_association_is_significant() {
        let mut rows = vec![];
        rows.extend(std::iter::repeat_n(("G1", "Yes"), 20));
        rows.extend(std::iter::repeat_n(("G2", "No"), 20));
        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&paired_table(&rows), "group", "target")
            .unwrap()
            .unwrap();

        let Association::ChiSquare {
            p_value,
            cramers_v,
            significant,
            ..
        } = result.analysis
        else {
            panic!("expected chi-square analysis");
        };
        assert!(significant);
        assert!(p_value < SIGNIFICANCE_LEVEL);
        assert!((cramers_v - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cramers_v_stays_in_unit_interval() {
        let table = paired_table(&[
            ("A", "x"),
            ("A", "y"),
            ("B", "y"),
            ("B", "z"),
            ("C", "z"),
            ("C", "x"),
        ]);
        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&table, "group", "target")
            .unwrap()
            .unwrap();
        let Association::ChiSquare { cramers_v, .. } = result.analysis else {
            panic!("expected chi-square analysis");
        };
        assert!((0.0..=1.0).contains(&cramers_v));
    }

    #[test]
    fn single_group_category_yields_none() {
        let table = paired_table(&[("only", "x"), ("only", "y")]);
        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&table, "group", "target")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn single_target_category_is_degenerate() {
        let table = paired_table(&[("A", "same"), ("B", "same")]);
        let result = ContingencyAnalyzer::new().cross_tabulate(&table, "group", "target");
        assert_eq!(
            result.unwrap_err(),
            StatsError::DegenerateTable {
                question: "target".to_string()
            }
        );
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = paired_table(&[("A", "x")]);
        let result = ContingencyAnalyzer::new().cross_tabulate(&table, "group", "absent");
        assert_eq!(
            result.unwrap_err(),
            StatsError::ColumnNotFound {
                name: "absent".to_string()
            }
        );
    }

    #[test]
    fn rows_with_missing_cells_are_excluded() {
        let mut table = ResponseTable::with_columns(["group", "target"]).unwrap();
        table
            .push_row([Some("A".to_string()), Some("x".to_string())])
            .unwrap();
        table.push_row([Some("A".to_string()), None]).unwrap();
        table.push_row([None, Some("y".to_string())]).unwrap();
        table
            .push_row([Some("B".to_string()), Some("y".to_string())])
            .unwrap();

        let result = ContingencyAnalyzer::new()
            .cross_tabulate(&table, "group", "target")
            .unwrap()
            .unwrap();
        assert_eq!(result.grand_total, 2);
    }

    #[test]
    fn basic_fallback_reports_mean_deviation() {
        let result = ContingencyAnalyzer::basic()
            .cross_tabulate(&skewed_table(), "group", "target")
            .unwrap()
            .unwrap();

        // Every |observed - expected| is 2.5 in the [[10,5],[5,10]] grid.
        assert_eq!(
            result.analysis,
            Association::Basic {
                mean_absolute_deviation: 2.5
            }
        );
    }

    #[test]
    fn basic_fallback_tolerates_single_target_category() {
        let table = paired_table(&[("A", "same"), ("B", "same")]);
        let result = ContingencyAnalyzer::basic()
            .cross_tabulate(&table, "group", "target")
            .unwrap()
            .unwrap();
        let Association::Basic {
            mean_absolute_deviation,
        } = result.analysis
        else {
            panic!("expected basic analysis");
        };
        assert!(mean_absolute_deviation.abs() < 1e-12);
    }

    #[test]
    fn injected_test_backend_is_used() {
        #[derive(Debug)]
        struct FixedP(f64);
        impl ChiSquareTest for FixedP {
            fn p_value(&self, _chi_square: f64, _degrees_of_freedom: usize) -> f64 {
                self.0
            }
        }

        let result = ContingencyAnalyzer::with_test(Box::new(FixedP(0.001)))
            .cross_tabulate(&skewed_table(), "group", "target")
            .unwrap()
            .unwrap();
        let Association::ChiSquare {
            p_value,
            significant,
            ..
        } = result.analysis
        else {
            panic!("expected chi-square analysis");
        };
        assert!((p_value - 0.001).abs() < 1e-12);
        assert!(significant);
    }
}
