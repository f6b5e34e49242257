//! Per-cell roles collected from search events, for hosts that draw the search as it runs.
use core::fmt;

use grid_util::{SimpleValueGrid, ValueGrid};
use itertools::Itertools;

use crate::astar::{ExpansionEvent, SearchResult};
use crate::error::{GridError, GridResult};
use crate::grid::Grid;
use crate::Pos;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellRole {
    #[default]
    Free,
    Blocked,
    Start,
    Goal,
    Open,
    Closed,
    Path,
}

impl CellRole {
    pub fn symbol(&self) -> char {
        match self {
            CellRole::Free => '.',
            CellRole::Blocked => '#',
            CellRole::Start => 'S',
            CellRole::Goal => 'G',
            CellRole::Open => 'o',
            CellRole::Closed => 'x',
            CellRole::Path => '*',
        }
    }
}

/// Tracks the role of every cell while a search runs. Feed it events through
/// [observer](Self::observer) and mark the final route with [finish](Self::finish).
/// Start and goal keep their roles throughout.
#[derive(Clone, Debug)]
pub struct SearchTrace {
    roles: SimpleValueGrid<CellRole>,
    start: Pos,
    goal: Pos,
    expansions: usize,
    expansion_limit: Option<usize>,
}

impl SearchTrace {
    pub fn new(grid: &Grid, start: Pos, goal: Pos) -> GridResult<SearchTrace> {
        let n = grid.size();
        let mut roles = SimpleValueGrid::new(n, n, CellRole::Free);
        for pos in grid.positions() {
            if grid.is_blocked(pos)? {
                roles.set_point(pos.point(), CellRole::Blocked);
            }
        }
        for (pos, role) in [(start, CellRole::Start), (goal, CellRole::Goal)] {
            if !grid.in_bounds(pos) {
                return Err(GridError::OutOfBounds { pos, size: n });
            }
            roles.set_point(pos.point(), role);
        }
        Ok(SearchTrace {
            roles,
            start,
            goal,
            expansions: 0,
            expansion_limit: None,
        })
    }

    /// Requests cancellation once `limit` cells have been expanded. Cancellation only takes
    /// effect after an expansion, so a limit of 0 behaves like a limit of 1.
    pub fn with_expansion_limit(mut self, limit: usize) -> SearchTrace {
        self.expansion_limit = Some(limit.max(1));
        self
    }

    fn mark(&mut self, pos: Pos, role: CellRole) {
        if pos == self.start || pos == self.goal {
            return;
        }
        if self.roles.point_in_bounds(pos.point()) {
            self.roles.set_point(pos.point(), role);
        }
    }

    /// Records one event; returns whether the search may continue.
    pub fn observe(&mut self, pos: Pos, event: ExpansionEvent) -> bool {
        match event {
            ExpansionEvent::Opened => self.mark(pos, CellRole::Open),
            ExpansionEvent::Expanded => {
                self.mark(pos, CellRole::Closed);
                self.expansions += 1;
            }
        }
        self.expansion_limit.map_or(true, |limit| self.expansions < limit)
    }

    /// Borrows the trace as a callback for [AStarEngine::search](crate::AStarEngine::search).
    pub fn observer(&mut self) -> impl FnMut(Pos, ExpansionEvent) -> bool + '_ {
        move |pos, event| self.observe(pos, event)
    }

    /// Marks the route of a successful search.
    pub fn finish(&mut self, result: &SearchResult) {
        if result.found() {
            for &pos in &result.path {
                self.mark(pos, CellRole::Path);
            }
        }
    }

    pub fn role(&self, pos: Pos) -> Option<CellRole> {
        let p = pos.point();
        self.roles.point_in_bounds(p).then(|| self.roles.get_point(p))
    }

    pub fn expansions(&self) -> usize {
        self.expansions
    }

    fn rows(&self) -> Vec<Vec<CellRole>> {
        let n = self.roles.width() as i32;
        (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| self.roles.get_point(Pos::new(row, col).point()))
                    .collect()
            })
            .collect()
    }

    pub fn count(&self, role: CellRole) -> usize {
        self.rows().into_iter().flatten().filter(|&r| r == role).count()
    }

    /// One line per row, using [CellRole::symbol].
    pub fn render(&self) -> String {
        self.rows()
            .iter()
            .map(|row| row.iter().map(CellRole::symbol).collect::<String>())
            .join("\n")
    }
}

impl fmt::Display for SearchTrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AStarEngine;

    #[test]
    fn roles_after_search() {
        let (grid, start, goal) = Grid::parse_with_endpoints("S..\n.#.\n..G").unwrap();
        let (start, goal) = (start.unwrap(), goal.unwrap());
        let mut trace = SearchTrace::new(&grid, start, goal).unwrap();
        assert_eq!(trace.render(), "S..\n.#.\n..G");
        let result = AStarEngine::new()
            .search(&grid, start, goal, trace.observer())
            .unwrap();
        trace.finish(&result);
        assert_eq!(trace.role(start), Some(CellRole::Start));
        assert_eq!(trace.role(goal), Some(CellRole::Goal));
        assert_eq!(trace.role(Pos::new(1, 1)), Some(CellRole::Blocked));
        // The route minus the goal
        assert_eq!(trace.count(CellRole::Path), 3);
        assert_eq!(trace.expansions(), result.expansion_order.len());
        for pos in &result.path[..result.path.len() - 1] {
            assert_eq!(trace.role(*pos), Some(CellRole::Path));
        }
    }

    #[test]
    fn expansion_limit_cancels() {
        let grid = Grid::new(8);
        let (start, goal) = (Pos::new(0, 0), Pos::new(7, 7));
        let mut trace = SearchTrace::new(&grid, start, goal)
            .unwrap()
            .with_expansion_limit(3);
        let result = AStarEngine::new()
            .search(&grid, start, goal, trace.observer())
            .unwrap();
        trace.finish(&result);
        assert!(result.cancelled());
        assert_eq!(trace.expansions(), 3);
        assert_eq!(trace.count(CellRole::Path), 0);
        // The start keeps its role, so only two cells show as closed.
        assert_eq!(trace.count(CellRole::Closed), 2);
        assert!(trace.count(CellRole::Open) > 0);
    }

    #[test]
    fn endpoints_must_be_in_bounds() {
        let grid = Grid::new(2);
        assert!(SearchTrace::new(&grid, Pos::new(0, 0), Pos::new(2, 0)).is_err());
    }

    /// A zero limit still lets the first expansion happen before cancelling.
    #[test]
    fn zero_limit_behaves_like_one() {
        let grid = Grid::new(8);
        let (start, goal) = (Pos::new(0, 0), Pos::new(7, 7));
        for limit in [0, 1] {
            let mut trace = SearchTrace::new(&grid, start, goal)
                .unwrap()
                .with_expansion_limit(limit);
            let result = AStarEngine::new()
                .search(&grid, start, goal, trace.observer())
                .unwrap();
            assert!(result.cancelled());
            assert_eq!(trace.expansions(), 1);
            assert_eq!(result.expansion_order, vec![start]);
        }
    }
}
