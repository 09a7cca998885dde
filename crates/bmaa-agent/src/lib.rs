//! `bmaa-agent`: the per-agent half of BMAA*.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent`: prefix following, move, push, cutoff metrics     |
//! | [`search`]      | bounded A* episode (`Agent::search_phase`), `Episode`     |
//! | [`heuristic`]   | `HeuristicCache` (octile default + learned overrides)     |
//! | [`waypoint`]    | `SubGoals`, full-path `decompose`, waypoint sampling      |
//! | [`metrics`]     | `AgentMetrics` counters                                   |
//! | [`store`]       | `AgentStore` arena                                        |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `AgentMetrics`.         |

pub mod agent;
pub mod error;
pub mod heuristic;
pub mod metrics;
pub mod search;
pub mod store;
pub mod waypoint;


pub use agent::Agent;
pub use error::{AgentError, AgentResult};
pub use heuristic::HeuristicCache;
pub use metrics::AgentMetrics;
pub use search::Episode;
pub use store::AgentStore;
pub use waypoint::{decompose, sample_waypoints, SubGoals};
