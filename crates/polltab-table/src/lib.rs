//! In-memory model of categorical survey responses.
//!
//! A [`ResponseTable`] holds one named column per survey question and one row
//! per respondent. Every cell is either a category label or missing. The table
//! is immutable once built (rows are only appended during construction), and
//! row order carries no meaning for any statistic derived from it.
//!
//! Input normalization (trimming labels, mapping empty cells or null markers
//! to missing) is the loader's responsibility; this crate stores cells as
//! given.
//!
//! # Examples
//!
//! ```
//! use polltab_table::ResponseTable;
//!
//! let mut table = ResponseTable::with_columns(["grade", "answer"]).unwrap();
//! table.push_row([Some("4".into()), Some("Yes".into())]).unwrap();
//! table.push_row([Some("5".into()), None]).unwrap();
//!
//! assert_eq!(table.num_rows(), 2);
//! let answers: Vec<_> = table.responses("answer").unwrap().collect();
//! assert_eq!(answers, ["Yes"]);
//! ```

/// Errors raised while building a [`ResponseTable`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    /// Two columns share the same identifier.
    #[display("duplicate column identifier '{id}'")]
    DuplicateColumn { id: String },
    /// A pushed row does not have one cell per column.
    #[display("row has {actual} cells, table has {expected} columns")]
    RowWidth { expected: usize, actual: usize },
}

#[derive(Debug, Clone)]
struct Column {
    id: String,
    values: Vec<Option<String>>,
}

/// An ordered collection of survey responses, one column per question.
///
/// Column identifiers are unique within a table. Cells hold `None` for
/// missing responses.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    columns: Vec<Column>,
}

impl ResponseTable {
    /// Creates an empty table with the given column identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateColumn`] if an identifier appears twice.
    pub fn with_columns<I, S>(ids: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<Column> = vec![];
        for id in ids {
            let id = id.into();
            if columns.iter().any(|c| c.id == id) {
                return Err(TableError::DuplicateColumn { id });
            }
            columns.push(Column { id, values: vec![] });
        }
        Ok(Self { columns })
    }

    /// Appends one respondent's row of cells, in column order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowWidth`] if the row length does not match the
    /// number of columns.
    pub fn push_row<I>(&mut self, row: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let cells: Vec<_> = row.into_iter().collect();
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.values.push(cell);
        }
        Ok(())
    }

    /// Number of respondent rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of question columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column identifiers in table order.
    pub fn column_ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.id.as_str())
    }

    /// Whether the table has a column with the given identifier.
    #[must_use]
    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Non-missing responses for one question, in row order.
    ///
    /// Returns `None` if the column does not exist.
    pub fn responses(&self, id: &str) -> Option<impl Iterator<Item = &str>> {
        let column = self.column(id)?;
        Some(column.values.iter().filter_map(|v| v.as_deref()))
    }

    /// Paired cells of two columns, in row order, missing cells included.
    ///
    /// Used for cross-tabulation, where a row counts only when both cells are
    /// present. Returns `None` if either column does not exist.
    pub fn paired_responses<'a>(
        &'a self,
        first: &str,
        second: &str,
    ) -> Option<impl Iterator<Item = (Option<&'a str>, Option<&'a str>)>> {
        let first = self.column(first)?;
        let second = self.column(second)?;
        Some(
            first
                .values
                .iter()
                .zip(&second.values)
                .map(|(a, b)| (a.as_deref(), b.as_deref())),
        )
    }

    /// Distinct non-missing values of a column, in first-observed order.
    ///
    /// Returns `None` if the column does not exist.
    pub fn distinct(&self, id: &str) -> Option<Vec<&str>> {
        let column = self.column(id)?;
        let mut seen: Vec<&str> = vec![];
        for value in column.values.iter().filter_map(|v| v.as_deref()) {
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        Some(seen)
    }

    /// A new table containing only the rows where `id` equals `value`.
    ///
    /// Rows with a missing cell in the filter column are dropped. Returns
    /// `None` if the column does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use polltab_table::ResponseTable;
    ///
    /// let mut table = ResponseTable::with_columns(["grade", "answer"]).unwrap();
    /// table.push_row([Some("4".into()), Some("Yes".into())]).unwrap();
    /// table.push_row([Some("5".into()), Some("No".into())]).unwrap();
    ///
    /// let fourth = table.filtered("grade", "4").unwrap();
    /// assert_eq!(fourth.num_rows(), 1);
    /// ```
    #[must_use]
    pub fn filtered(&self, id: &str, value: &str) -> Option<Self> {
        let filter = self.column(id)?;
        let keep: Vec<usize> = filter
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_deref() == Some(value))
            .map(|(row, _)| row)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                id: column.id.clone(),
                values: keep.iter().map(|&row| column.values[row].clone()).collect(),
            })
            .collect();
        Some(Self { columns })
    }
}
