//! `bmaa-grid`: grid graph, open list, occupancy, planning, and problem
//! loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`graph`]     | `GridGraph` (CSR + components + R-tree), `GridGraphBuilder` |
//! | [`open_list`] | `IndexedOpenList` (min-first `PriorityQueue` wrapper)     |
//! | [`astar`]     | `Planner` trait, `Path`, unbounded `AStar`                |
//! | [`occupancy`] | `Occupancy` node → agent arena                            |
//! | [`map`]       | MovingAI `.map` parsing (`GridMap`)                       |
//! | [`scenario`]  | MovingAI `.scen` parsing (`Scenario`)                     |
//! | [`problem`]   | `ProblemSet` generation/validation, `Region`              |
//! | [`error`]     | `GridError`, `GridResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Forwards serde derives to `bmaa-core` types.                 |

pub mod astar;
pub mod error;
pub mod graph;
pub mod map;
pub mod occupancy;
pub mod open_list;
pub mod problem;
pub mod scenario;

#[cfg(test)]
mod tests;

pub use astar::{AStar, Path, Planner};
pub use error::{GridError, GridResult};
pub use graph::{Edge, GridGraph, GridGraphBuilder};
pub use map::GridMap;
pub use occupancy::{Occupancy, Occupant};
pub use open_list::IndexedOpenList;
pub use problem::{ProblemSet, Region};
pub use scenario::{Scenario, ScenarioEntry};
