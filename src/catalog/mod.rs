//! Ingestion of cleaned card catalogs produced by the upstream scraper and
//! cleaner pipeline. Two interchange formats are accepted: the cleaner's
//! JSON card array and a flat CSV reward table.

mod parser;
mod table;

use std::io::Read;
use std::path::Path;

use crate::portfolio::Card;

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read card catalog: {}", err),
            CatalogImportError::Json(err) => write!(f, "invalid catalog JSON data: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid reward table CSV data: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Json(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for CatalogImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Vec<Card>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<Card>, CatalogImportError> {
        Ok(parser::parse_cards(reader)?)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<Card>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<Card>, CatalogImportError> {
        Ok(table::parse_table(reader)?)
    }
}
