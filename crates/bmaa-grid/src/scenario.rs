//! MovingAI `.scen` loading.
//!
//! # Format
//!
//! A `version` line followed by one tab-separated row per problem:
//!
//! ```text
//! version 1
//! 0	arena.map	49	49	1	11	1	12	1
//! 0	arena.map	49	49	1	13	4	12	3.41421356
//! ```
//!
//! | Column | Meaning                        |
//! |--------|--------------------------------|
//! | 0      | bucket                         |
//! | 1      | map file name                  |
//! | 2, 3   | map width, height              |
//! | 4, 5   | start x, y                     |
//! | 6, 7   | goal x, y                      |
//! | 8      | optimal path length (optional) |

use std::io::Read;
use std::path::Path;

use bmaa_core::GridPoint;

use crate::{GridError, GridResult};

#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioEntry {
    pub bucket: u32,
    pub start: GridPoint,
    pub goal: GridPoint,
    pub optimal_length: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenario {
    pub map_name: Option<String>,
    pub entries: Vec<ScenarioEntry>,
}

impl Scenario {
    pub fn load(path: &Path) -> GridResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Like [`load`](Self::load) but reads from any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> GridResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut scenario = Scenario::default();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let line = i + 1;
            match record.get(0) {
                Some(first) if first.starts_with("version") => continue,
                Some("") | None if record.len() <= 1 => continue,
                _ => {}
            }
            if record.len() < 8 {
                return Err(GridError::Parse {
                    line,
                    msg: format!("expected at least 8 columns, found {}", record.len()),
                });
            }

            if scenario.map_name.is_none() {
                scenario.map_name = record.get(1).map(str::to_owned);
            }
            scenario.entries.push(ScenarioEntry {
                bucket: field(&record, 0, line)?,
                start:  GridPoint::new(field(&record, 4, line)?, field(&record, 5, line)?),
                goal:   GridPoint::new(field(&record, 6, line)?, field(&record, 7, line)?),
                optimal_length: record.get(8).and_then(|s| s.trim().parse().ok()),
            });
        }
        Ok(scenario)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the first `limit` problems.
    pub fn with_agent_limit(mut self, limit: usize) -> Self {
        self.entries.truncate(limit);
        self
    }
}

fn field<T: std::str::FromStr>(record: &csv::StringRecord, col: usize, line: usize) -> GridResult<T> {
    let raw = record.get(col).unwrap_or_default().trim();
    raw.parse().map_err(|_| GridError::Parse {
        line,
        msg: format!("column {col}: cannot parse {raw:?}"),
    })
}
