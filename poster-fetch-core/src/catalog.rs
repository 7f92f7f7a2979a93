//! In-memory view of a sync CSV.
//!
//! Unlike the sort reader this keeps every column, so the file can be written
//! back with only the `image_path` column changed.

use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::CatalogError;

pub const TITLE_COLUMN: &str = "title";
pub const IMAGE_URL_COLUMN: &str = "image_url";
pub const IMAGE_PATH_COLUMN: &str = "image_path";

/// A title table loaded from CSV.
#[derive(Debug, Clone)]
pub struct Catalog {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
    title_col: usize,
    image_url_col: Option<usize>,
    image_path_col: usize,
}

/// Borrowed view of one catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRow<'a> {
    pub index: usize,
    pub title: &'a str,
    /// Pre-known poster URL. Empty cells are reported as `None`.
    pub image_url: Option<&'a str>,
    pub image_path: Option<&'a str>,
}

impl Catalog {
    /// Load a catalog from a CSV file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a catalog from any reader. Requires a `title` column; adds an
    /// empty `image_path` column if the file has none.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let title_col = column_index(&headers, TITLE_COLUMN)
            .ok_or_else(|| CatalogError::MissingColumn(TITLE_COLUMN.to_string()))?;
        let image_url_col = column_index(&headers, IMAGE_URL_COLUMN);
        let image_path_col = match column_index(&headers, IMAGE_PATH_COLUMN) {
            Some(idx) => idx,
            None => {
                headers.push(IMAGE_PATH_COLUMN.to_string());
                headers.len() - 1
            }
        };

        let width = headers.len();
        let mut records = Vec::new();
        for record in rdr.records() {
            let mut fields: Vec<String> = record?.iter().map(str::to_string).collect();
            if fields.len() < width {
                fields.resize(width, String::new());
            }
            records.push(fields);
        }

        Ok(Self {
            headers,
            records,
            title_col,
            image_url_col,
            image_path_col,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<CatalogRow<'_>> {
        let fields = self.records.get(index)?;
        Some(CatalogRow {
            index,
            title: fields[self.title_col].as_str(),
            image_url: self
                .image_url_col
                .map(|col| fields[col].trim())
                .filter(|url| !url.is_empty()),
            image_path: Some(fields[self.image_path_col].as_str()).filter(|p| !p.is_empty()),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = CatalogRow<'_>> {
        (0..self.records.len()).filter_map(|index| self.row(index))
    }

    /// Store the local poster path for a row.
    pub fn set_image_path(&mut self, index: usize, path: &str) -> Result<(), CatalogError> {
        let fields = self
            .records
            .get_mut(index)
            .ok_or(CatalogError::RowOutOfRange(index))?;
        fields[self.image_path_col] = path.to_string();
        Ok(())
    }

    /// Serialize the whole table, header first.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        self.write_csv(writer)?;
        Ok(())
    }

    fn write_csv<W: Write>(&self, writer: W) -> Result<W, CatalogError> {
        let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        wtr.write_record(&self.headers)?;
        for record in &self.records {
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        wtr.into_inner().map_err(|e| CatalogError::Io(e.into_error()))
    }

    /// Rewrite the CSV at `path`.
    ///
    /// The table is written to a sibling `.tmp` file which is then renamed
    /// over the target, so a crash never leaves a half-written catalog.
    /// On failure the `.tmp` file is removed and the target is left as it was.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let tmp = temp_path(path);
        let result = self
            .write_temp(&tmp)
            .and_then(|()| std::fs::rename(&tmp, path).map_err(CatalogError::from));
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn write_temp(&self, tmp: &Path) -> Result<(), CatalogError> {
        let file = File::create(tmp).map_err(|source| CatalogError::Open {
            path: tmp.to_path_buf(),
            source,
        })?;
        let file = self.write_csv(file)?;
        file.sync_all()?;
        Ok(())
    }
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog.csv"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
