//! Bounded breadth-first solver for water sort boards.
//!
//! The search explores pours level by level, so the first solved board it
//! dequeues is reached by a shortest pour sequence. When no solved board is
//! found within the iteration budget, the path with the best excavation
//! score is returned instead.

use std::collections::VecDeque;
use std::time::Instant;

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::board::Board;
use crate::evaluation::{excavation_score, is_solved, parity_advisory};
use crate::moves::{possible_moves, Move};

const BUDGET_FALLBACK_WARNING: &str = "computation limit reached — best excavation path returned";
const BUDGET_ERROR: &str = "search space too large — try a few manual moves first";
const EXHAUSTED_FALLBACK_WARNING: &str = "no full solution found — best excavation path returned";
const EXHAUSTED_ERROR: &str = "current board has no solution — verify the colors entered";

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum boards dequeued before the search gives up
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15_000,
        }
    }
}

/// How the search ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOutcome {
    /// A solved board was dequeued
    Solved,
    /// The iteration budget ran out first
    BudgetExceeded,
    /// Every reachable board was explored without success
    Exhausted,
}

/// Counters collected during a search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Boards dequeued
    pub iterations: usize,
    /// Distinct boards seen, including the start
    pub states_visited: usize,
    /// Largest frontier size reached
    pub max_frontier: usize,
    pub elapsed_ms: u64,
}

/// Result of a solve
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    /// Moves to apply in order, possibly empty
    pub steps: Vec<Move>,
    /// Set only when no usable path exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when `steps` is a fallback or the color counts look wrong
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SolverResult {
    /// Whether `steps` reaches a solved board
    pub fn is_solution(&self) -> bool {
        self.outcome == SearchOutcome::Solved
    }
}

/// One pour in the search tree, linked to the pour before it
#[derive(Debug, Clone, Copy)]
struct Trail {
    parent: Option<usize>,
    step: Move,
}

/// A frontier entry
#[derive(Debug)]
struct SearchNode {
    board: Board,
    /// Index of the last pour in `trails`, `None` for the start board
    trail: Option<usize>,
    score: usize,
}

/// Path storage shared by every node in the search
#[derive(Debug, Default)]
struct TrailArena {
    trails: Vec<Trail>,
}

impl TrailArena {
    fn push(&mut self, parent: Option<usize>, step: Move) -> usize {
        self.trails.push(Trail { parent, step });
        self.trails.len() - 1
    }

    fn path(&self, mut tip: Option<usize>) -> Vec<Move> {
        let mut path = Vec::new();
        while let Some(index) = tip {
            let trail = self.trails[index];
            path.push(trail.step);
            tip = trail.parent;
        }
        path.reverse();
        path
    }
}

/// Terminal state of the search before packaging
#[derive(Debug)]
struct SearchReport {
    outcome: SearchOutcome,
    /// Solution path when solved, best fallback path otherwise
    path: Vec<Move>,
    stats: SearchStats,
}

/// Run the breadth-first search
fn search(board: &Board, config: &SolverConfig) -> SearchReport {
    let start_time = Instant::now();
    let mut stats = SearchStats::default();
    let mut arena = TrailArena::default();

    let initial_score = excavation_score(board);
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(board.canonical_key());

    let mut queue: VecDeque<SearchNode> = VecDeque::new();
    queue.push_back(SearchNode {
        board: board.clone(),
        trail: None,
        score: initial_score,
    });

    let mut best_score = initial_score;
    let mut best_trail: Option<usize> = None;

    let finish = |outcome, tip, arena: &TrailArena, mut stats: SearchStats, seen: usize| {
        stats.states_visited = seen;
        stats.elapsed_ms = start_time.elapsed().as_millis() as u64;
        SearchReport {
            outcome,
            path: arena.path(tip),
            stats,
        }
    };

    while let Some(node) = queue.pop_front() {
        stats.iterations += 1;

        // First board to reach a new minimum keeps the spot
        if node.score < best_score {
            best_score = node.score;
            best_trail = node.trail;
            trace!(score = best_score, "new best excavation score");
        }

        if is_solved(&node.board) {
            return finish(
                SearchOutcome::Solved,
                node.trail,
                &arena,
                stats,
                visited.len(),
            );
        }

        if stats.iterations > config.max_iterations {
            return finish(
                SearchOutcome::BudgetExceeded,
                best_trail,
                &arena,
                stats,
                visited.len(),
            );
        }

        for mv in possible_moves(&node.board) {
            let next = node.board.apply_move(&mv);
            if !visited.insert(next.canonical_key()) {
                continue;
            }
            let score = excavation_score(&next);
            let trail = arena.push(node.trail, mv);
            queue.push_back(SearchNode {
                board: next,
                trail: Some(trail),
                score,
            });
        }
        stats.max_frontier = stats.max_frontier.max(queue.len());
    }

    finish(
        SearchOutcome::Exhausted,
        best_trail,
        &arena,
        stats,
        visited.len(),
    )
}

/// Solve `board`, returning a shortest solution or the best fallback found.
///
/// Never fails: an exhausted budget or an unsolvable board is reported
/// through `error` and `warning` on the result.
pub fn solve(board: &Board, config: &SolverConfig) -> SolverResult {
    let advisory = parity_advisory(board);
    if let Some(advisory) = &advisory {
        debug!(%advisory, "color parity check failed");
    }
    debug!(
        tubes = board.tube_count(),
        capacity = board.capacity(),
        max_iterations = config.max_iterations,
        "starting search"
    );

    let report = search(board, config);
    info!(
        outcome = ?report.outcome,
        steps = report.path.len(),
        iterations = report.stats.iterations,
        states = report.stats.states_visited,
        elapsed_ms = report.stats.elapsed_ms,
        "search finished"
    );

    package(report, advisory)
}

/// Turn a search report into the caller-facing verdict
fn package(report: SearchReport, advisory: Option<String>) -> SolverResult {
    let SearchReport {
        outcome,
        path,
        stats,
    } = report;

    let (steps, error, warning) = match outcome {
        SearchOutcome::Solved => (path, None, None),
        SearchOutcome::BudgetExceeded if !path.is_empty() => {
            (path, None, Some(BUDGET_FALLBACK_WARNING.to_string()))
        }
        SearchOutcome::BudgetExceeded => (Vec::new(), Some(BUDGET_ERROR.to_string()), None),
        SearchOutcome::Exhausted if !path.is_empty() => {
            (path, None, Some(EXHAUSTED_FALLBACK_WARNING.to_string()))
        }
        SearchOutcome::Exhausted => (Vec::new(), Some(EXHAUSTED_ERROR.to_string()), None),
    };

    let warning = match (warning, advisory) {
        (Some(warning), Some(advisory)) => Some(format!("{}; {}", warning, advisory)),
        (warning, advisory) => warning.or(advisory),
    };

    SolverResult {
        steps,
        error,
        warning,
        outcome,
        stats,
    }
}
