use anyhow::{Context, bail};
use polltab_table::ResponseTable;

/// Parses a `column=value` demographic filter argument.
pub(crate) fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected 'column=value', got '{raw}'")),
    }
}

/// Applies an optional demographic filter to the table.
pub(crate) fn apply_filter(
    table: ResponseTable,
    filter: Option<&(String, String)>,
) -> anyhow::Result<ResponseTable> {
    let Some((column, value)) = filter else {
        return Ok(table);
    };
    let filtered = table
        .filtered(column, value)
        .with_context(|| format!("filter column '{column}' not found"))?;
    if filtered.num_rows() == 0 {
        bail!("no rows match filter '{column}={value}'");
    }
    Ok(filtered)
}

pub(crate) fn print_heading(heading: &str) {
    println!("{}", "=".repeat(60));
    println!("{heading}");
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_column_and_value() {
        assert_eq!(
            parse_filter("grade=4"),
            Ok(("grade".to_string(), "4".to_string()))
        );
        assert_eq!(
            parse_filter(" district = Lima "),
            Ok(("district".to_string(), "Lima".to_string()))
        );
    }

    #[test]
    fn rejects_malformed_filters() {
        assert!(parse_filter("grade").is_err());
        assert!(parse_filter("=4").is_err());
    }

    #[test]
    fn filter_narrows_rows() {
        let mut table = ResponseTable::with_columns(["grade", "q"]).unwrap();
        table
            .push_row([Some("4".to_string()), Some("A".to_string())])
            .unwrap();
        table
            .push_row([Some("5".to_string()), Some("B".to_string())])
            .unwrap();

        let filter = ("grade".to_string(), "4".to_string());
        let filtered = apply_filter(table.clone(), Some(&filter)).unwrap();
        assert_eq!(filtered.num_rows(), 1);

        let no_match = ("grade".to_string(), "6".to_string());
        assert!(apply_filter(table.clone(), Some(&no_match)).is_err());
        assert!(apply_filter(table, None).is_ok());
    }
}
