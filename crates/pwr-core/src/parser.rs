//! CSV reader for password export files

use crate::error::{Error, Result};
use crate::table::{Column, RawRow, RawTable};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Parse a CSV export file into a RawTable
///
/// A path that does not exist is reported as [`Error::MissingInput`].
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
        _ => Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let table = read_table(BufReader::new(file), path.to_path_buf())?;
    log::debug!(
        "Parsed {} rows with {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<RawTable> {
    read_table(content.as_bytes(), PathBuf::from(source_name))
}

/// Read only the header of a CSV file
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<Vec<Column>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    header_columns(&mut csv_reader, path)
}

fn read_table<R: Read>(reader: R, path: PathBuf) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Exports are not always rectangular
        .from_reader(reader);

    let columns = header_columns(&mut csv_reader, &path)?;

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() > columns.len() {
            log::warn!(
                "row {} in {} has more cells than columns, truncating",
                row_idx + 1,
                path.display()
            );
        }

        // Short rows leave their trailing fields absent
        let row: RawRow = columns
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.name.as_str(), value))
            .collect();

        rows.push(row);
    }

    Ok(RawTable {
        columns,
        rows,
        source_path: path,
    })
}

fn header_columns<R: Read>(csv_reader: &mut csv::Reader<R>, path: &Path) -> Result<Vec<Column>> {
    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = if i == 0 {
                name.trim_start_matches('\u{feff}')
            } else {
                name
            };
            Column::new(name.to_string(), i)
        })
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path: path.to_path_buf(),
            message: "no columns found in CSV".to_string(),
        });
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_legacy_export() {
        let csv = "url,username,password,totp,extra,name,grouping,fav\n\
                   https://a.com,u1,p1,,n1,A,Work,0\n";
        let table = parse_csv_str(csv, "vault.csv").unwrap();

        assert_eq!(table.column_count(), 8);
        assert_eq!(table.columns[4].name, "extra");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].get("extra"), Some("n1"));
        assert_eq!(table.rows[0].get("totp"), Some(""));
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let csv = "name,url,username,password,note\nA,https://a.com,u1\n";
        let table = parse_csv_str(csv, "chrome.csv").unwrap();

        let row = &table.rows[0];
        assert_eq!(row.get("username"), Some("u1"));
        assert_eq!(row.get("password"), None);
        assert_eq!(row.get("note"), None);
    }

    #[test]
    fn test_long_row_is_truncated() {
        let csv = "url,username\na.com,u1,surplus\n";
        let table = parse_csv_str(csv, "chrome.csv").unwrap();

        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[0].get("username"), Some("u1"));
    }

    #[test]
    fn test_quoted_fields() {
        let csv = "name,url,username,password,note\n\"Acme, Inc\",a.com,u1,\"p\"\"w\",\"line1\nline2\"\n";
        let table = parse_csv_str(csv, "chrome.csv").unwrap();

        let row = &table.rows[0];
        assert_eq!(row.get("name"), Some("Acme, Inc"));
        assert_eq!(row.get("password"), Some("p\"w"));
        assert_eq!(row.get("note"), Some("line1\nline2"));
    }

    #[test]
    fn test_bom_is_stripped_from_header() {
        let csv = "\u{feff}name,url\nA,a.com\n";
        let table = parse_csv_str(csv, "chrome.csv").unwrap();

        assert_eq!(table.columns[0].name, "name");
        assert_eq!(table.rows[0].get("name"), Some("A"));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = parse_csv_str("", "empty.csv").unwrap_err();
        assert!(matches!(err, Error::CsvParse { .. }));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let table = parse_csv_str("name,url,username,password,note\n", "chrome.csv").unwrap();
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_missing_file_is_missing_input() {
        let err = parse_csv("/nonexistent/dir/vault.csv").unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
