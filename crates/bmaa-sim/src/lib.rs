//! `bmaa-sim`: tick loop controller for the rust_bmaa framework.
//!
//! # Two-phase tick loop
//!
//! ```text
//! while not all agents at goal and stopwatch < limit:
//!   start stopwatch
//!   ① Search: every agent that needs a plan runs one bounded episode
//!               against the same occupancy snapshot.
//!   ② Move:   for each agent in ascending AgentId order with a next node n:
//!                 n held by a goal-sitter and push enabled → push it aside
//!                 n free                                   → move onto n
//!                 otherwise                                → wait this tick
//!   stop stopwatch; tick += 1
//! ```
//!
//! At each stop time the agents are evaluated as of that cutoff into a
//! [`RunResult`].
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs waypoint decomposition on Rayon's thread pool.       |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `RunResult`.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bmaa_core::SimRng;
//! use bmaa_grid::{GridMap, ProblemSet};
//! use bmaa_sim::{ControllerBuilder, NoopObserver};
//!
//! let graph = GridMap::load("maps/den312d.map")?.to_graph();
//! let problems = ProblemSet::random(&graph, 100, &mut SimRng::new(42))?;
//! let mut ctl = ControllerBuilder::from_problems(graph, &problems).build()?;
//! let result = ctl.run_with_time_limit(Duration::from_millis(500), &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod observer;
pub mod results;

#[cfg(test)]
mod tests;

pub use builder::ControllerBuilder;
pub use controller::Controller;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use results::RunResult;
