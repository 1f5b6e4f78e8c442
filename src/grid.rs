use core::fmt;
use std::str::FromStr;

use itertools::iproduct;
use log::{debug, info};
use petgraph::unionfind::UnionFind;

use crate::cell::{Cell, CellPos, CellState};
use crate::config::{pixel_extent, VisualizerConfig, DEFAULT_CELL_SIZE};
use crate::error::{GridError, Result};

/// Orthogonal neighbour offsets, in the order up, down, left, right. The search expands
/// neighbours in this order, which keeps runs reproducible.
const NEIGHBOUR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// [Grid] owns every [Cell] of the board together with the start and goal references, so the
/// host never holds a position that a reset could invalidate. It also maintains connected
/// components of the passable cells in a [UnionFind] structure for cheap reachability queries.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: u32,
    cells: Vec<Cell>,
    start: Option<CellPos>,
    goal: Option<CellPos>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Creates a grid with every cell [CellState::Empty]. The board must fit in `i32` pixel
    /// coordinates, otherwise [GridError::PixelOverflow] is returned.
    pub fn new(rows: usize, cols: usize, cell_size: u32) -> Result<Grid> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimension { rows, cols });
        }
        if cell_size == 0 {
            return Err(GridError::InvalidCellSize);
        }
        let cells = rows.max(cols);
        if pixel_extent(cells, cell_size).is_none() {
            return Err(GridError::PixelOverflow { cells, cell_size });
        }
        Grid::blank(rows, cols, cell_size)
    }

    /// Square grid sized by the given configuration.
    pub fn from_config(config: &VisualizerConfig) -> Result<Grid> {
        config.validate()?;
        Grid::new(config.rows, config.rows, config.cell_size)
    }

    fn blank(rows: usize, cols: usize, cell_size: u32) -> Result<Grid> {
        let cells = iproduct!(0..rows, 0..cols)
            .map(|(row, col)| Cell::new(CellPos::new(row, col), cell_size))
            .collect::<Result<Vec<Cell>>>()?;
        let mut grid = Grid {
            rows,
            cols,
            cell_size,
            cells,
            start: None,
            goal: None,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Returns the whole board to the state of a fresh empty grid of the same dimensions.
    pub fn reset(&mut self) {
        info!("Resetting {}x{} grid", self.rows, self.cols);
        for cell in self.cells.iter_mut() {
            cell.state = CellState::Empty;
            cell.clear_annotations();
        }
        self.start = None;
        self.goal = None;
        self.generate_components();
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn start(&self) -> Option<CellPos> {
        self.start
    }

    pub fn goal(&self) -> Option<CellPos> {
        self.goal
    }

    pub fn in_bounds(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn ix(&self, pos: CellPos) -> usize {
        pos.row * self.cols + pos.col
    }

    fn out_of_bounds(&self, row: i64, col: i64) -> GridError {
        GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn checked_ix(&self, pos: CellPos) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok(self.ix(pos))
        } else {
            Err(self.out_of_bounds(pos.row as i64, pos.col as i64))
        }
    }

    /// Bounds-checked lookup.
    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell> {
        let ix = self.checked_ix(CellPos::new(row, col))?;
        Ok(&self.cells[ix])
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.checked_ix(pos).ok().map(|ix| &self.cells[ix])
    }

    pub fn state(&self, pos: CellPos) -> Result<CellState> {
        self.checked_ix(pos).map(|ix| self.cells[ix].state)
    }

    /// Only for positions already known to be on the grid.
    pub(crate) fn at(&self, pos: CellPos) -> &Cell {
        &self.cells[self.ix(pos)]
    }

    pub(crate) fn cell_mut(&mut self, pos: CellPos) -> &mut Cell {
        let ix = self.ix(pos);
        &mut self.cells[ix]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn count_state(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Positions currently in `state`, in row-major order.
    pub fn positions_in_state(&self, state: CellState) -> Vec<CellPos> {
        self.cells
            .iter()
            .filter(|c| c.state == state)
            .map(Cell::pos)
            .collect()
    }

    /// Lazily yields the in-bounds, non-obstacle cells orthogonally adjacent to `pos`, always in
    /// the order up, down, left, right.
    pub fn neighbors(&self, pos: CellPos) -> impl Iterator<Item = CellPos> + '_ {
        NEIGHBOUR_OFFSETS
            .into_iter()
            .filter_map(move |(d_row, d_col)| pos.offset(d_row, d_col))
            .filter(move |&p| self.can_move_to(p))
    }

    pub fn can_move_to(&self, pos: CellPos) -> bool {
        self.in_bounds(pos) && self.cells[self.ix(pos)].state.is_passable()
    }

    /// Sets the state of a cell. Placing a [CellState::Start] or [CellState::Goal] first sends
    /// the previous holder of that state back to [CellState::Empty]; overwriting the current
    /// start or goal with anything else unsets it.
    pub fn set_state(&mut self, pos: CellPos, state: CellState) -> Result<()> {
        let ix = self.checked_ix(pos)?;
        self.assign(ix, state);
        Ok(())
    }

    fn assign(&mut self, ix: usize, state: CellState) {
        let pos = self.cells[ix].pos();
        let previous = self.cells[ix].state;
        match state {
            CellState::Start => {
                if let Some(old) = self.start.replace(pos).filter(|&old| old != pos) {
                    self.vacate(old);
                }
            }
            CellState::Goal => {
                if let Some(old) = self.goal.replace(pos).filter(|&old| old != pos) {
                    self.vacate(old);
                }
            }
            _ => {}
        }
        if state != CellState::Start && self.start == Some(pos) {
            self.start = None;
        }
        if state != CellState::Goal && self.goal == Some(pos) {
            self.goal = None;
        }
        self.cells[ix].state = state;
        if previous.is_passable() && !state.is_passable() {
            // Placing an obstacle may split a component
            self.components_dirty = true;
        } else if !previous.is_passable() && state.is_passable() {
            self.join_component(pos);
        }
    }

    fn vacate(&mut self, pos: CellPos) {
        let ix = self.ix(pos);
        self.cells[ix].state = CellState::Empty;
    }

    /// Changes a cell's state without touching the start/goal references. Used by the search
    /// engine for its markings.
    pub(crate) fn mark(&mut self, pos: CellPos, state: CellState) {
        debug_assert!(state.is_passable());
        self.cell_mut(pos).state = state;
    }

    /// Places an endpoint the way [set_state](Self::set_state) does, for positions known to be
    /// on the grid.
    pub(crate) fn place(&mut self, pos: CellPos, state: CellState) {
        let ix = self.ix(pos);
        self.assign(ix, state);
    }

    /// Sends every cell whose state satisfies `predicate` back to [CellState::Empty] and returns
    /// how many cells matched. A matched cell that is still the registered start or goal (for
    /// example a start the search marked as visited) gets its endpoint state back instead.
    pub fn reset_states_matching<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(CellState) -> bool,
    {
        let mut matched = 0;
        for ix in 0..self.cells.len() {
            let state = self.cells[ix].state;
            if !predicate(state) {
                continue;
            }
            let pos = self.cells[ix].pos();
            let target = match state {
                CellState::Start | CellState::Goal => CellState::Empty,
                _ if self.start == Some(pos) && !predicate(CellState::Start) => CellState::Start,
                _ if self.goal == Some(pos) && !predicate(CellState::Goal) => CellState::Goal,
                _ => CellState::Empty,
            };
            self.assign(ix, target);
            matched += 1;
        }
        matched
    }

    /// Clears the Frontier, Visited and Path markings of a previous search.
    pub fn clear_search(&mut self) -> usize {
        self.reset_states_matching(CellState::is_transient)
    }

    pub(crate) fn clear_annotations(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_annotations);
    }

    /// Erases the square of side `2 * radius + 1` centred on `center`, clamped to the grid.
    /// Returns the number of cells erased.
    pub fn erase_around(&mut self, center: CellPos, radius: usize) -> Result<usize> {
        self.checked_ix(center)?;
        let row_range =
            center.row.saturating_sub(radius)..=center.row.saturating_add(radius).min(self.rows - 1);
        let col_range =
            center.col.saturating_sub(radius)..=center.col.saturating_add(radius).min(self.cols - 1);
        let side = radius.saturating_mul(2).saturating_add(1);
        if row_range.clone().count() < side || col_range.clone().count() < side {
            debug!("Eraser at {} clamped to the grid edge", center);
        }
        let mut erased = 0;
        for (row, col) in iproduct!(row_range, col_range) {
            let ix = self.ix(CellPos::new(row, col));
            self.assign(ix, CellState::Empty);
            erased += 1;
        }
        Ok(erased)
    }

    /// Maps a pixel position (for instance the mouse pointer) to the cell under it.
    pub fn cell_at_pixel(&self, x: i32, y: i32) -> Result<CellPos> {
        let size = i32::try_from(self.cell_size).map_err(|_| GridError::InvalidCellSize)?;
        let row = y.div_euclid(size);
        let col = x.div_euclid(size);
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return Err(self.out_of_bounds(row as i64, col as i64));
        }
        Ok(CellPos::new(row as usize, col as usize))
    }

    /// Parses the character map produced by this type's [Display](fmt::Display) implementation.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str, cell_size: u32) -> Result<Grid> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if lines.iter().any(|l| l.chars().count() != cols) {
            return Err(GridError::InvalidDimension { rows, cols });
        }
        let mut grid = Grid::new(rows, cols, cell_size)?;
        for (row, line) in lines.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let state = CellState::from_symbol(symbol)
                    .ok_or(GridError::InvalidSymbol { symbol, row, col })?;
                let pos = CellPos::new(row, col);
                if state.is_transient() {
                    grid.mark(pos, state);
                } else {
                    grid.place(pos, state);
                }
            }
        }
        grid.update();
        Ok(grid)
    }

    /// Retrieves the component id a given position belongs to.
    pub fn get_component(&self, pos: CellPos) -> usize {
        self.components.find(self.ix(pos))
    }

    /// Checks if `a` and `b` are passable and on the same connected component.
    pub fn reachable(&self, a: CellPos, b: CellPos) -> bool {
        self.can_move_to(a) && self.can_move_to(b) && self.components.equiv(self.ix(a), self.ix(b))
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for (row, col) in iproduct!(0..self.rows, 0..self.cols) {
            let pos = CellPos::new(row, col);
            if !self.can_move_to(pos) {
                continue;
            }
            let parent_ix = self.ix(pos);
            // Down and right suffice, the other two directions are covered from the other side
            for n in [pos.offset(1, 0), pos.offset(0, 1)].into_iter().flatten() {
                if self.can_move_to(n) {
                    let ix = self.ix(n);
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }

    fn join_component(&mut self, pos: CellPos) {
        let p_ix = self.ix(pos);
        let neighbours = self.neighbors(pos).collect::<Vec<CellPos>>();
        for n in neighbours {
            let n_ix = self.ix(n);
            self.components.union(p_ix, n_ix);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line = row.iter().map(|c| c.state.symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Grid> {
        Grid::from_ascii(s, DEFAULT_CELL_SIZE)
    }
}
