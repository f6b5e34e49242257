use core::fmt;
use core::str::FromStr;

use grid_util::{BoolGrid, SimpleGrid, ValueGrid};
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::{GridError, GridResult};
use crate::Pos;

type Neighbors = SmallVec<[Pos; 4]>;

/// View of a single grid position. `neighbors` are the free, in-bounds, axis-aligned
/// neighbours as of the last [Grid::refresh_adjacency].
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    pos: Pos,
    blocked: bool,
    neighbors: &'a [Pos],
}

impl<'a> Cell<'a> {
    pub fn pos(&self) -> Pos {
        self.pos
    }
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
    pub fn neighbors(&self) -> &'a [Pos] {
        self.neighbors
    }
}

/// [Grid] keeps the blocked state of an N×N area in a [BoolGrid] ([true] is blocked) and
/// the adjacency of every cell in a [SimpleGrid]. It also maintains a [UnionFind] over the
/// free cells so reachability can be queried without searching. Adjacency and components
/// are only brought up to date by [Grid::refresh_adjacency].
#[derive(Clone, Debug)]
pub struct Grid {
    blocked: BoolGrid,
    neighbors: SimpleGrid<Neighbors>,
    components: UnionFind<usize>,
    adjacency_dirty: bool,
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::new(0)
    }
}

impl Grid {
    /// Builds an `n`×`n` grid with every cell free and adjacency already computed.
    pub fn new(n: usize) -> Grid {
        let mut grid = Grid::unrefreshed(n);
        grid.refresh_adjacency();
        grid
    }

    /// Storage only; adjacency is empty and flagged stale.
    fn unrefreshed(n: usize) -> Grid {
        Grid {
            blocked: BoolGrid::new(n, n, false),
            neighbors: grid_util::Grid::new(n, n, Neighbors::new()),
            components: UnionFind::new(n * n),
            adjacency_dirty: true,
        }
    }

    pub fn size(&self) -> usize {
        self.blocked.width()
    }

    /// Every position on the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let n = self.size() as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Pos::new(row, col)))
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.blocked.point_in_bounds(pos.point())
    }

    /// Storage index of `pos`, if it lies on the grid.
    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| self.blocked.get_ix_point(&pos.point()))
    }

    fn checked_index(&self, pos: Pos) -> GridResult<usize> {
        self.index(pos).ok_or(GridError::OutOfBounds {
            pos,
            size: self.size(),
        })
    }

    pub fn cell_at(&self, pos: Pos) -> GridResult<Cell<'_>> {
        self.checked_index(pos)?;
        let neighbors = grid_util::Grid::get_point(&self.neighbors, pos.point())
            .map(|n| n.as_slice())
            .unwrap_or(&[]);
        Ok(Cell {
            pos,
            blocked: self.blocked.get_point(pos.point()),
            neighbors,
        })
    }

    pub fn is_blocked(&self, pos: Pos) -> GridResult<bool> {
        self.cell_at(pos).map(|c| c.is_blocked())
    }

    /// Positions adjacent to `pos` as of the last refresh.
    pub fn neighbors(&self, pos: Pos) -> GridResult<impl Iterator<Item = Pos> + '_> {
        let neighbors = self.cell_at(pos)?.neighbors();
        Ok(neighbors.iter().copied())
    }

    pub fn free_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.positions().filter(|&p| self.is_free(p))
    }

    /// Updates the blocked flag of one cell. Adjacency and components are stale until
    /// [Grid::refresh_adjacency] is called.
    pub fn set_blocked(&mut self, pos: Pos, blocked: bool) -> GridResult<()> {
        self.checked_index(pos)?;
        if self.blocked.get_point(pos.point()) != blocked {
            self.blocked.set_point(pos.point(), blocked);
            self.adjacency_dirty = true;
        }
        Ok(())
    }

    /// Sets a `height`×`width` rectangle with top-left corner `corner`. Parts falling outside
    /// the grid are ignored.
    pub fn set_rect(&mut self, corner: Pos, height: usize, width: usize, blocked: bool) {
        for row in corner.row..corner.row.saturating_add(height as i32) {
            for col in corner.col..corner.col.saturating_add(width as i32) {
                // Clipped: out-of-bounds parts of the rectangle are skipped.
                let _ = self.set_blocked(Pos::new(row, col), blocked);
            }
        }
    }

    pub fn is_adjacency_stale(&self) -> bool {
        self.adjacency_dirty
    }

    fn is_free(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && !self.blocked.get_point(pos.point())
    }

    /// Recomputes every cell's neighbour set and regenerates the connected components.
    /// O(N²); never called implicitly by the search.
    pub fn refresh_adjacency(&mut self) {
        for pos in self.positions().collect::<Vec<_>>() {
            let free = pos
                .neumann_neighborhood()
                .filter(|&n| self.is_free(n))
                .collect::<Neighbors>();
            if let Some(slot) = grid_util::Grid::get_point_mut(&mut self.neighbors, pos.point()) {
                *slot = free;
            }
        }
        self.generate_components();
        self.adjacency_dirty = false;
    }

    /// Generates a new [UnionFind] structure and links up free neighbours to the same
    /// component. Only the down and right links are needed to cover every edge.
    fn generate_components(&mut self) {
        let n = self.size();
        info!("Generating connected components for {n}x{n} grid");
        self.components = UnionFind::new(n * n);
        for pos in self.positions().filter(|&p| self.is_free(p)).collect::<Vec<_>>() {
            let ix = self.blocked.get_ix_point(&pos.point());
            for next in [Pos::new(pos.row + 1, pos.col), Pos::new(pos.row, pos.col + 1)] {
                if self.is_free(next) {
                    let next_ix = self.blocked.get_ix_point(&next.point());
                    self.components.union(ix, next_ix);
                }
            }
        }
    }

    /// Checks whether `a` and `b` are free and on the same connected component, as of the
    /// last refresh.
    pub fn reachable(&self, a: Pos, b: Pos) -> GridResult<bool> {
        let a_ix = self.checked_index(a)?;
        let b_ix = self.checked_index(b)?;
        if !self.is_free(a) || !self.is_free(b) {
            return Ok(false);
        }
        Ok(self.components.equiv(a_ix, b_ix))
    }

    /// Parses the text format produced by [Display](fmt::Display), additionally accepting
    /// `S` and `G` markers (free cells) and returning their positions.
    pub fn parse_with_endpoints(s: &str) -> GridResult<(Grid, Option<Pos>, Option<Pos>)> {
        let rows = s
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .collect::<Vec<_>>();
        if rows.is_empty() {
            return Err(GridError::Parse {
                line: 1,
                reason: "no rows".to_owned(),
            });
        }
        let n = rows.len();
        let mut grid = Grid::unrefreshed(n);
        let (mut start, mut goal) = (None, None);
        for (row, (line_ix, line)) in rows.into_iter().enumerate() {
            let line_no = line_ix + 1;
            let width = line.chars().count();
            if width != n {
                return Err(GridError::Parse {
                    line: line_no,
                    reason: format!("expected {n} columns, found {width}"),
                });
            }
            for (col, c) in line.chars().enumerate() {
                let pos = Pos::new(row as i32, col as i32);
                let marker = match c {
                    '.' => None,
                    '#' => {
                        grid.set_blocked(pos, true)?;
                        None
                    }
                    'S' => Some(&mut start),
                    'G' => Some(&mut goal),
                    other => {
                        return Err(GridError::Parse {
                            line: line_no,
                            reason: format!("unexpected character {other:?}"),
                        })
                    }
                };
                if let Some(slot) = marker {
                    if slot.replace(pos).is_some() {
                        return Err(GridError::Parse {
                            line: line_no,
                            reason: format!("duplicate {c:?} marker"),
                        });
                    }
                }
            }
        }
        grid.refresh_adjacency();
        Ok((grid, start, goal))
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> GridResult<Grid> {
        Grid::parse_with_endpoints(s).map(|(grid, _, _)| grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.size() as i32;
        for row in 0..n {
            let line = (0..n)
                .map(|col| {
                    if self.is_free(Pos::new(row, col)) {
                        '.'
                    } else {
                        '#'
                    }
                })
                .collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
