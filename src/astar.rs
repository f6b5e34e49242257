//! The A* loop and its per-run bookkeeping.
//!
//! Superseded frontier entries are handled by eager reinsertion with lazy deletion: when a
//! cheaper route to a queued cell is found, a fresh entry with the lower f-score is pushed
//! and the old one stays in the heap. Entries whose priority exceeds the cell's current
//! f-score, or whose cell is no longer open, are discarded when popped.
use core::hash::BuildHasher;

use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use crate::error::{EndpointIssue, GridError, GridResult};
use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::heuristic::{Heuristic, Manhattan};
use crate::{Pos, INFINITE_COST, STEP_COST};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// What the observer is being told about a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpansionEvent {
    /// The cell entered the open set.
    Opened,
    /// The cell was popped and its neighbours examined. This is the suspension point at
    /// which cancellation takes effect.
    Expanded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// Terminal state of one search run. `path` runs from the first step after the start up to
/// and including the goal, so its length is the path cost; it is empty unless the search
/// succeeded, and also empty when start and goal coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    pub path: Vec<Pos>,
    /// Cells in the order they were expanded.
    pub expansion_order: Vec<Pos>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.outcome == SearchOutcome::Succeeded
    }
    pub fn cancelled(&self) -> bool {
        self.outcome == SearchOutcome::Cancelled
    }
}

/// Scores and links of a single run. Unset scores read as [INFINITE_COST].
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    g_score: FxHashMap<Pos, u32>,
    f_score: FxHashMap<Pos, u32>,
    came_from: FxIndexMap<Pos, Pos>,
    open_set: FxHashSet<Pos>,
}

impl SearchState {
    /// Fresh state with only `start` scored and open.
    pub fn new(start: Pos, start_estimate: u32) -> SearchState {
        let mut state = SearchState::default();
        state.g_score.insert(start, 0);
        state.f_score.insert(start, start_estimate);
        state.open_set.insert(start);
        state
    }
    pub fn g(&self, pos: Pos) -> u32 {
        self.g_score.get(&pos).copied().unwrap_or(INFINITE_COST)
    }
    pub fn f(&self, pos: Pos) -> u32 {
        self.f_score.get(&pos).copied().unwrap_or(INFINITE_COST)
    }
    pub fn predecessor(&self, pos: Pos) -> Option<Pos> {
        self.came_from.get(&pos).copied()
    }
    pub fn is_open(&self, pos: Pos) -> bool {
        self.open_set.contains(&pos)
    }
    pub fn came_from(&self) -> &FxIndexMap<Pos, Pos> {
        &self.came_from
    }

    /// Records a strictly better route to `pos` through `parent`. Returns whether `pos`
    /// was newly added to the open set.
    fn relax(&mut self, pos: Pos, parent: Pos, g: u32, f: u32) -> bool {
        self.came_from.insert(pos, parent);
        self.g_score.insert(pos, g);
        self.f_score.insert(pos, f);
        self.open_set.insert(pos)
    }

    /// Closes `pos` if it is open; false means the popped entry was superseded.
    fn close(&mut self, pos: Pos) -> bool {
        self.open_set.remove(&pos)
    }
}

/// Walks the predecessor links back from `goal` and returns the route in start-to-goal
/// order. The start, which has no predecessor, is not part of the route.
pub fn reconstruct_path<S: BuildHasher>(
    came_from: &IndexMap<Pos, Pos, S>,
    goal: Pos,
) -> Vec<Pos> {
    let mut path =
        std::iter::successors(Some(goal), |p| came_from.get(p).copied()).collect::<Vec<_>>();
    // Drop the start
    path.pop();
    path.reverse();
    path
}

/// Runs A* searches on a [Grid] with the heuristic `H`.
#[derive(Clone, Debug, Default)]
pub struct AStarEngine<H = Manhattan> {
    heuristic: H,
}

impl AStarEngine<Manhattan> {
    pub fn new() -> AStarEngine<Manhattan> {
        AStarEngine {
            heuristic: Manhattan,
        }
    }
}

impl<H: Heuristic> AStarEngine<H> {
    pub fn with_heuristic(heuristic: H) -> AStarEngine<H> {
        AStarEngine { heuristic }
    }

    fn check_endpoint(grid: &Grid, pos: Pos) -> GridResult<()> {
        let reason = match grid.is_blocked(pos) {
            Ok(false) => return Ok(()),
            Ok(true) => EndpointIssue::Blocked,
            Err(_) => EndpointIssue::OutOfBounds,
        };
        warn!("Rejecting search endpoint {pos}: {reason}");
        Err(GridError::InvalidEndpoint { pos, reason })
    }

    /// Computes a shortest path from `start` to `goal`, reporting progress to `observer`.
    /// Returning `false` from the observer requests cancellation, which takes effect right
    /// after the current expansion. The grid's adjacency must have been refreshed since the
    /// last edit.
    pub fn search<F>(
        &self,
        grid: &Grid,
        start: Pos,
        goal: Pos,
        mut observer: F,
    ) -> GridResult<SearchResult>
    where
        F: FnMut(Pos, ExpansionEvent) -> bool,
    {
        Self::check_endpoint(grid, start)?;
        Self::check_endpoint(grid, goal)?;
        if grid.is_adjacency_stale() {
            warn!("Searching a grid whose adjacency has not been refreshed since the last edit");
        }
        info!("Searching from {start} to {goal} on a {0}x{0} grid", grid.size());

        let mut state = SearchState::new(start, self.heuristic.estimate(&start, &goal));
        let mut frontier = Frontier::new();
        frontier.push(state.f(start), start);
        let mut expansion_order = Vec::new();
        let mut cancel_requested = false;

        while !frontier.is_empty() {
            let (priority, current) = frontier.pop_min_entry()?;
            if priority > state.f(current) || !state.close(current) {
                continue;
            }
            if current == goal {
                let path = reconstruct_path(state.came_from(), goal);
                debug!(
                    "Reached {goal} after {} expansions, path length {}",
                    expansion_order.len(),
                    path.len()
                );
                return Ok(SearchResult {
                    outcome: SearchOutcome::Succeeded,
                    path,
                    expansion_order,
                });
            }

            let current_g = state.g(current);
            for neighbor in grid.neighbors(current)? {
                let tentative_g = current_g + STEP_COST;
                if tentative_g < state.g(neighbor) {
                    let f = tentative_g.saturating_add(self.heuristic.estimate(&neighbor, &goal));
                    let opened = state.relax(neighbor, current, tentative_g, f);
                    frontier.push(f, neighbor);
                    if opened && !observer(neighbor, ExpansionEvent::Opened) {
                        cancel_requested = true;
                    }
                }
            }

            trace!("Expanded {current} with g = {current_g}");
            expansion_order.push(current);
            if !observer(current, ExpansionEvent::Expanded) || cancel_requested {
                debug!("Search cancelled after {} expansions", expansion_order.len());
                return Ok(SearchResult {
                    outcome: SearchOutcome::Cancelled,
                    path: Vec::new(),
                    expansion_order,
                });
            }
        }

        if grid.reachable(start, goal)? {
            warn!("Reachable goal {goal} could not be pathed to, is the adjacency up to date?");
        }
        debug!(
            "Frontier exhausted after {} expansions, no path to {goal}",
            expansion_order.len()
        );
        Ok(SearchResult {
            outcome: SearchOutcome::Failed,
            path: Vec::new(),
            expansion_order,
        })
    }

    /// Searches without observing progress. `None` if the goal cannot be reached.
    pub fn find_path(&self, grid: &Grid, start: Pos, goal: Pos) -> GridResult<Option<Vec<Pos>>> {
        let result = self.search(grid, start, goal, |_, _| true)?;
        Ok(result.found().then_some(result.path))
    }
}
