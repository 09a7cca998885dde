//! `bmaa-core`: foundational types for the `rust_bmaa` multi-agent
//! pathfinding framework.
//!
//! This crate is a dependency of every other `bmaa-*` crate.  It intentionally
//! has no `bmaa-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `NodeId`                                   |
//! | [`point`]       | `GridPoint`, octile / euclidean distance              |
//! | [`time`]        | `Tick`, `SimClock` (tick counter + stopwatch)         |
//! | [`config`]      | `BmaaConfig`, `Strategy`                              |
//! | [`rng`]         | `SimRng` (seeded problem generation)                  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod point;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{BmaaConfig, Strategy};
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, NodeId};
pub use point::GridPoint;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
