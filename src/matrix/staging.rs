// One-hot staging file:
// header row = terms in column order
// one row per document, cells "0" or "1"

use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use super::occurrence::OccurrenceMatrix;
use super::vocabulary::Vocabulary;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("One-hot file has an empty header")]
    EmptyHeader,
    #[error("Empty term in header column {column}")]
    EmptyTerm { column: usize },
    #[error("Duplicate term in header: {0}")]
    DuplicateTerm(String),
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}, column {column}: expected 0 or 1, found {value:?}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
}

impl OccurrenceMatrix {
    pub fn write_csv(&self, path: &Path) -> Result<(), MatrixError> {
        if self.columns() == 0 {
            return Err(MatrixError::EmptyHeader);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let f = fs::File::create(path)?;
        self.write_to(f)?;
        info!(
            path = %path.display(),
            documents = self.rows(),
            terms = self.columns(),
            "wrote one-hot matrix"
        );
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), MatrixError> {
        if self.columns() == 0 {
            return Err(MatrixError::EmptyHeader);
        }

        let mut out = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        out.write_record(self.vocabulary().terms())?;
        for row in self.iter_rows() {
            out.write_record(row.iter().map(|&hit| if hit { "1" } else { "0" }))?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn read_csv(path: &Path) -> Result<Self, MatrixError> {
        let f = fs::File::open(path)?;
        Self::read_from(f)
    }

    pub fn read_from<R: Read>(reader: R) -> Result<Self, MatrixError> {
        // Row widths are checked below so ragged input gets a precise error.
        let mut input = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header = input.headers()?.clone();
        if header.is_empty() || header.iter().all(str::is_empty) {
            return Err(MatrixError::EmptyHeader);
        }

        let mut seen = BTreeSet::new();
        let mut terms = Vec::with_capacity(header.len());
        for (column, term) in header.iter().enumerate() {
            if term.is_empty() {
                return Err(MatrixError::EmptyTerm { column });
            }
            if !seen.insert(term) {
                return Err(MatrixError::DuplicateTerm(term.to_string()));
            }
            terms.push(term.to_string());
        }

        let mut rows = Vec::new();
        for (i, record) in input.records().enumerate() {
            let record = record?;
            let row_number = i + 1;
            if record.len() != terms.len() {
                return Err(MatrixError::RaggedRow {
                    row: row_number,
                    expected: terms.len(),
                    found: record.len(),
                });
            }

            let mut row = Vec::with_capacity(terms.len());
            for (col, value) in record.iter().enumerate() {
                let hit = match value.trim() {
                    "0" => false,
                    "1" => true,
                    other => {
                        return Err(MatrixError::InvalidCell {
                            row: row_number,
                            column: terms[col].clone(),
                            value: other.to_string(),
                        })
                    }
                };
                row.push(hit);
            }
            rows.push(row);
        }

        Ok(OccurrenceMatrix::from_parts(Vocabulary::from_ordered(terms), rows))
    }
}
