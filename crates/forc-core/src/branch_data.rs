// ─────────────────────────────────────────────────────────────────────
// SCPN FORC Core — Branch Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tabulated hysteresis-branch data.
//!
//! Format: one header line, then whitespace- or tab-separated rows of at
//! least five numeric columns:
//!
//!   branch sign (+1 upper / −1 lower), field, magnetization, unused, distance
//!
//! Rows need not be sorted; each branch is sorted by field on load.

use forc_types::error::{HysteresisError, HysteresisResult};
use tracing::warn;

const MIN_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchSample {
    pub field: f64,
    pub magnetization: f64,
    pub distance: f64,
}

/// Upper (ascending) and bottom (descending) branches, each sorted by field.
#[derive(Debug, Clone, Default)]
pub struct BranchTable {
    pub upper: Vec<BranchSample>,
    pub bottom: Vec<BranchSample>,
}

impl BranchTable {
    pub fn from_file(path: &str) -> HysteresisResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(text: &str) -> HysteresisResult<Self> {
        let mut table = BranchTable::default();

        // Line numbers are 1-based; line 1 is the header.
        for (idx, line) in text.lines().enumerate().skip(1) {
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let columns: Vec<&str> = trimmed.split_whitespace().collect();
            if columns.len() < MIN_COLUMNS {
                return Err(HysteresisError::Parse {
                    line: line_no,
                    message: format!(
                        "expected at least {MIN_COLUMNS} columns, found {}",
                        columns.len()
                    ),
                });
            }

            let mut values = [0.0; MIN_COLUMNS];
            for (slot, raw) in values.iter_mut().zip(columns.iter()) {
                *slot = raw.parse::<f64>().map_err(|e| HysteresisError::Parse {
                    line: line_no,
                    message: format!("invalid number '{raw}': {e}"),
                })?;
            }

            let sample = BranchSample {
                field: values[1],
                magnetization: values[2],
                distance: values[4],
            };
            if values[0] == 1.0 {
                table.upper.push(sample);
            } else if values[0] == -1.0 {
                table.bottom.push(sample);
            } else {
                warn!(
                    line = line_no,
                    sign = values[0],
                    "skipping branch-data row with unknown branch sign"
                );
            }
        }

        sort_by_field(&mut table.upper);
        sort_by_field(&mut table.bottom);
        Ok(table)
    }
}

fn sort_by_field(samples: &mut [BranchSample]) {
    samples.sort_by(|a, b| a.field.total_cmp(&b.field));
}
