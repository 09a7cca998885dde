//! `bmaa-output`: run output writers for the rust_bmaa framework.
//!
//! | Backend | Files created                                                 |
//! |---------|---------------------------------------------------------------|
//! | CSV     | `results.csv`, `agent_snapshots.csv`, `tick_summaries.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `bmaa_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bmaa_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output/bmaa"))?;
//! let mut obs = SimOutputObserver::new(writer, "bmaa");
//! ctl.run_with_stop_times(&stops, &mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, ResultRow, TickSummaryRow};
pub use writer::OutputWriter;
