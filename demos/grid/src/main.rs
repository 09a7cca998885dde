//! grid: BMAA* and waypoint BMAA* on a small embedded map.
//!
//! Generates random start/goal pairs on a 32×16 MovingAI-style map, runs both
//! strategies on the same problem set, evaluates each run at several stop
//! times, and writes CSV output under `output/grid/<strategy>/`.
//!
//! ```text
//! cargo run -p grid --release                          # embedded map, random problems
//! cargo run -p grid --release -- my.map                # own map, random problems
//! cargo run -p grid --release -- my.map my.scen        # own map and scenario
//! cargo run -p grid --release -- -n 40 --seed 7        # more agents, other seed
//! RUST_LOG=bmaa_sim=debug cargo run -p grid            # per-tick logging
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bmaa_agent::AgentStore;
use bmaa_core::{BmaaConfig, SimRng, Strategy, Tick};
use bmaa_grid::{GridGraph, GridMap, ProblemSet, Scenario};
use bmaa_output::{CsvWriter, OutputWriter, SimOutputObserver};
use bmaa_sim::{ControllerBuilder, RunResult, SimObserver, TickSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const STOP_TIMES_MS:   [u64; 5] = [5, 10, 25, 50, 100];
const SNAPSHOT_TICKS:  u64   = 5;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "grid", about = "BMAA* and waypoint BMAA* on a MovingAI grid", long_about = None)]
struct Cli {
    /// MovingAI `.map` file (embedded map when omitted).
    map: Option<PathBuf>,

    /// MovingAI `.scen` file (random problems when omitted).
    scen: Option<PathBuf>,

    /// Number of agents.
    #[arg(short = 'n', long, default_value = "24")]
    agents: usize,

    /// Seed for random problem generation.
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Directory for CSV output; one subdirectory per strategy.
    #[arg(short, long, default_value = "output/grid")]
    out: PathBuf,
}

// ── Embedded map ──────────────────────────────────────────────────────────────

// `T` trees and `@` walls block, `W` water blocks, `.` is open ground.
const MAP: &str = "\
type octile
height 16
width 32
map
TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT
T.........@....................T
T.........@...WWWW.............T
T.........@...WWWW.............T
T..@@@@@..@....................T
T.........@..........@.........T
T.........@..........@.........T
T.........@..........@.........T
T....@....@..........@.........T
T....@....@..........@.........T
T....@....@..........@.........T
T....@...............@..@@@@@..T
T....@...............@.........T
T....................@.........T
T....................@.........T
TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT
";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:         SimOutputObserver<W>,
    ticks:         usize,
    pushes:        usize,
    snapshot_rows: usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, ticks: 0, pushes: 0, snapshot_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.ticks += 1;
        self.pushes += summary.pushes;
        self.inner.on_tick_end(summary);
    }

    fn on_snapshot(&mut self, tick: Tick, graph: &GridGraph, agents: &AgentStore) {
        self.snapshot_rows += agents.len();
        self.inner.on_snapshot(tick, graph, agents);
    }

    fn on_run_end(&mut self, final_tick: Tick, results: &[RunResult]) {
        self.inner.on_run_end(final_tick, results);
    }
}

// ── Problem loading ───────────────────────────────────────────────────────────

fn load_graph(map_path: Option<&Path>) -> Result<(String, GridGraph)> {
    let map = match map_path {
        Some(p) => GridMap::load(p).with_context(|| format!("loading map {}", p.display()))?,
        None => {
            let mut m = GridMap::parse(MAP)?;
            m.name = "embedded".into();
            m
        }
    };
    Ok((map.name.clone(), map.to_graph()))
}

fn load_problems(graph: &GridGraph, cli: &Cli) -> Result<ProblemSet> {
    let problems = match cli.scen.as_deref() {
        Some(p) => {
            let scen = Scenario::load(p).with_context(|| format!("loading scenario {}", p.display()))?;
            ProblemSet::from_scenario(graph, &scen, Some(cli.agents))?
        }
        None => ProblemSet::random(graph, cli.agents, &mut SimRng::new(cli.seed))?,
    };
    problems.validate(graph)?;
    Ok(problems)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    println!("=== grid: rust_bmaa ===");

    // 1. Graph and problems.
    let (map_name, graph) = load_graph(cli.map.as_deref())?;
    let problems = load_problems(&graph, &cli)?;
    println!(
        "Map {map_name}: {} nodes, {} edges, {} component(s)",
        graph.node_count(),
        graph.edge_count(),
        graph.component_count()
    );
    println!(
        "Agents: {}  |  Seed: {}  |  longest octile distance {:.1}, average {:.1}",
        problems.len(),
        cli.seed,
        problems.longest_distance(&graph),
        problems.average_distance(&graph)
    );
    println!();

    let stop_times: Vec<Duration> = STOP_TIMES_MS.iter().map(|&ms| Duration::from_millis(ms)).collect();
    let config = BmaaConfig::default();
    config.validate()?;

    let mut all: Vec<(Strategy, Vec<RunResult>)> = Vec::new();

    for strategy in [Strategy::Bmaa, Strategy::Waypoint] {
        // 2. Build the controller.  Each strategy gets its own copy of the graph.
        let mut ctl = ControllerBuilder::from_problems(graph.clone(), &problems)
            .config(config.clone())
            .strategy(strategy)
            .count_preprocessing(true)
            .snapshot_interval(SNAPSHOT_TICKS)
            .build()?;

        // 3. Output.
        let dir = cli.out.join(strategy.as_str());
        let writer = CsvWriter::new(&dir)?;
        let mut obs = CountingObserver::new(SimOutputObserver::new(writer, strategy.as_str()));

        // 4. Run.
        let t0 = Instant::now();
        let results = ctl.run_with_stop_times(&stop_times, &mut obs)?;
        let elapsed = t0.elapsed();

        if let Some(e) = obs.inner.take_error() {
            eprintln!("output error: {e}");
        }

        info!(%strategy, ticks = obs.ticks, pushes = obs.pushes, "run complete");
        println!(
            "{strategy:<9} {} ticks in {:.3} s (preprocessing {:.3} ms), {} pushes, {} snapshot rows → {}",
            obs.ticks,
            elapsed.as_secs_f64(),
            ctl.preprocessing_time().as_secs_f64() * 1e3,
            obs.pushes,
            obs.snapshot_rows,
            dir.display()
        );
        all.push((strategy, results));
    }
    println!();

    // 5. Summary table.
    println!(
        "{:<9} {:>8} {:>10} {:>12} {:>12} {:>10}",
        "Strategy", "Stop ms", "Complete", "Avg secs", "Avg steps", "Avg dist"
    );
    println!("{}", "-".repeat(66));
    for (strategy, results) in &all {
        for r in results {
            println!(
                "{:<9} {:>8} {:>9.1}% {:>12.4} {:>12} {:>10.2}",
                strategy.as_str(),
                r.time_limit.as_millis(),
                r.completion_rate * 100.0,
                r.avg_completion_secs,
                r.avg_completion_steps.map_or_else(|| "-".to_owned(), |s| format!("{s:.1}")),
                r.avg_travel_distance,
            );
        }
    }

    Ok(())
}
