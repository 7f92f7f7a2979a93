use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

/// Columns every sort CSV must carry.
const SORT_COLUMNS: [&str; 3] = ["title", "type", "vibe"];

/// One row of a sort CSV: a title and the two folders it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SortRow {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub vibe: String,
}

/// Lazy, single-pass iterator over the rows of a sort CSV, in file order.
pub struct SortRows<R> {
    inner: csv::DeserializeRecordsIntoIter<R, SortRow>,
}

impl<R: Read> Iterator for SortRows<R> {
    type Item = Result<SortRow, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|row| row.map_err(CatalogError::from))
    }
}

/// Open a sort CSV and validate its header.
///
/// Fails up front if the file is missing or the header lacks `title`,
/// `type` or `vibe`. Individual malformed records are yielded as `Err`
/// items so the caller can skip them.
pub fn read_sort_rows(path: &Path) -> Result<SortRows<File>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    sort_rows_from_reader(file)
}

/// Same as [`read_sort_rows`] over any reader.
pub fn sort_rows_from_reader<R: Read>(reader: R) -> Result<SortRows<R>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in SORT_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(CatalogError::MissingColumn(column.to_string()));
        }
    }

    Ok(SortRows {
        inner: rdr.into_deserialize(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_rows_in_order() {
        let data = "title,type,vibe\nInception,movie,mind-bending\nThe Office,tv,cozy\n";
        let rows: Vec<SortRow> = sort_rows_from_reader(data.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            SortRow {
                title: "Inception".into(),
                kind: "movie".into(),
                vibe: "mind-bending".into(),
            }
        );
        assert_eq!(rows[1].title, "The Office");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = "year,title,vibe,type\n2010,Inception,mind-bending,movie\n";
        let rows: Vec<SortRow> = sort_rows_from_reader(data.as_bytes())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows[0].kind, "movie");
        assert_eq!(rows[0].vibe, "mind-bending");
    }

    #[test]
    fn missing_column_is_rejected() {
        let data = "title,type\nInception,movie\n";
        match sort_rows_from_reader(data.as_bytes()) {
            Err(CatalogError::MissingColumn(col)) => assert_eq!(col, "vibe"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected missing column error"),
        }
    }

    #[test]
    fn short_record_yields_error_item() {
        let data = "title,type,vibe\nInception,movie\nHeat,movie,tense\n";
        let rows: Vec<_> = sort_rows_from_reader(data.as_bytes()).unwrap().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_err());
        assert_eq!(rows[1].as_ref().unwrap().title, "Heat");
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = read_sort_rows(Path::new("/nonexistent/movies_list.csv")).err();
        assert!(matches!(err, Some(CatalogError::Open { .. })));
    }
}
