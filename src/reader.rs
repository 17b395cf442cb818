//! Reader for the `.kna` dataset format.
//!
//! A dataset has a header section, a line starting with `DATA`, then one
//! `<id> <profit> <weight>` record per line. The header must carry a
//! `MAX_CAPACITY: <number>` line; every other header line is ignored.
//! Keywords are matched case-insensitively on the trimmed line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::{Instance, Num};

/// Errors raised while reading a dataset. Any of these aborts the run
/// before solving.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no MAX_CAPACITY line found in the header")]
    MissingCapacity,

    #[error("unparseable MAX_CAPACITY value at line {line}: {text:?}")]
    InvalidCapacity { line: usize, text: String },

    #[error("unparseable item record at line {line}: {text:?}")]
    InvalidItemRecord { line: usize, text: String },
}

impl Instance {
    /// Reads a dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Instance, DatasetError> {
        let file = File::open(path.as_ref())?;
        Instance::from_reader(BufReader::new(file))
    }

    /// Reads a dataset from any buffered source.
    pub fn from_reader<R: BufRead>(input: R) -> Result<Instance, DatasetError> {
        let mut capacity = None;
        let mut values = Vec::new();
        let mut data_section = false;

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let line_no = index + 1;
            if line.is_empty() {
                continue;
            }

            // A DATA marker is discarded wherever it appears; the first one
            // opens the data section.
            if line.to_ascii_uppercase().starts_with("DATA") {
                data_section = true;
                continue;
            }

            if !data_section {
                if line.to_ascii_uppercase().starts_with("MAX_CAPACITY:") {
                    let text = line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
                    capacity =
                        Some(
                            Num::parse(text).ok_or_else(|| DatasetError::InvalidCapacity {
                                line: line_no,
                                text: text.to_string(),
                            })?,
                        );
                }
                // Unrecognized header lines are ignored, forward-compatible.
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                // Not an item record.
                continue;
            }
            let field = |token: &str| {
                Num::parse(token).ok_or_else(|| DatasetError::InvalidItemRecord {
                    line: line_no,
                    text: line.to_string(),
                })
            };
            let profit = field(tokens[1])?;
            let weight = field(tokens[2])?;
            values.push((profit, weight));
        }

        let capacity = capacity.ok_or(DatasetError::MissingCapacity)?;
        let instance = Instance::new(capacity, values);
        debug!(
            items = instance.len(),
            capacity = %instance.capacity(),
            integral = instance.is_integral(),
            "parsed dataset"
        );
        Ok(instance)
    }

    /// Writes the instance back in the `.kna` format. Parsing the output
    /// yields an identical instance.
    pub fn to_dataset_string(&self) -> String {
        let mut out = format!("MAX_CAPACITY: {}\n\nDATA\n", self.capacity());
        for item in self.items() {
            out.push_str(&format!("{} {} {}\n", item.id, item.profit, item.weight));
        }
        out
    }
}

impl FromStr for Instance {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Instance, DatasetError> {
        Instance::from_reader(s.as_bytes())
    }
}
