use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use polltab_table::ResponseTable;

/// Cell values (after trimming) treated as a missing response.
const MISSING_MARKERS: [&str; 2] = ["", "NA"];

/// Loads a CSV export of survey responses into a [`ResponseTable`].
///
/// The first record is the header row; header labels and cells are trimmed,
/// and empty cells or an explicit `NA` marker become missing responses.
pub(crate) fn load_table(path: &Path) -> anyhow::Result<ResponseTable> {
    let file =
        File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    read_table(BufReader::new(file))
        .with_context(|| format!("failed to read '{}'", path.display()))
}

pub(crate) fn read_table<R>(reader: R) -> anyhow::Result<ResponseTable>
where
    R: std::io::Read,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let ids: Vec<String> = csv_reader
        .headers()
        .context("missing header row")?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    let mut table = ResponseTable::with_columns(ids).context("invalid header row")?;

    for (index, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed record {}", index + 1))?;
        table
            .push_row(record.iter().map(normalize_cell))
            .with_context(|| format!("malformed record {}", index + 1))?;
    }
    Ok(table)
}

fn normalize_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "grade, answer\n4, Yes\n5,No\n";
        let table = read_table(csv.as_bytes()).unwrap();
        let ids: Vec<_> = table.column_ids().collect();
        assert_eq!(ids, ["grade", "answer"]);
        assert_eq!(table.num_rows(), 2);
        let answers: Vec<_> = table.responses("answer").unwrap().collect();
        assert_eq!(answers, ["Yes", "No"]);
    }

    #[test]
    fn empty_and_na_cells_become_missing() {
        let csv = "q\nA\n\nNA\n  \nB\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.num_rows(), 4);
        let responses: Vec<_> = table.responses("q").unwrap().collect();
        assert_eq!(responses, ["A", "B"]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let csv = "q,q\nA,B\n";
        assert!(read_table(csv.as_bytes()).is_err());
    }
}
