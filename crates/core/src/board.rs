//! Board module - owned cell storage for one session
//!
//! Cells live in a flat row-major vector (`y * width + x`, row 0 at the
//! bottom). All mutation goes through `set`, `swap`, `clear` and the crate
//! internal movement helpers, so an occupant is never copied out, edited and
//! forgotten. Void cells never hold anything.

use arrayvec::ArrayVec;

use crate::effects::{EffectsSink, SpawnRequest, VisualHandle};
use crate::error::{BoardError, InvalidSwapReason, SwapError};
use crate::hex::{HexGrid, HexMetrics};
use crate::layout::{BoardLayout, CellKind};
use crate::types::{Coord, ElementId, Lane, WorldPos};

/// A movable piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub kind: ElementId,
    pub handle: Option<VisualHandle>,
    /// Where the visual layer should move the piece to
    pub target: WorldPos,
    /// Lane swept when this element is matched; `None` for ordinary elements
    pub charge: Option<Lane>,
}

impl Element {
    pub fn new(kind: ElementId) -> Self {
        Self {
            kind,
            handle: None,
            target: WorldPos::default(),
            charge: None,
        }
    }

    pub fn charged(kind: ElementId, lane: Lane) -> Self {
        Self {
            charge: Some(lane),
            ..Self::new(kind)
        }
    }

    pub fn is_special(&self) -> bool {
        self.charge.is_some()
    }
}

/// An immovable goal tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    pub health: u8,
    pub handle: Option<VisualHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Element(Element),
    Goal(Goal),
}

impl Occupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupant::Empty)
    }

    pub fn handle(&self) -> Option<VisualHandle> {
        match self {
            Occupant::Empty => None,
            Occupant::Element(e) => e.handle,
            Occupant::Goal(g) => g.handle,
        }
    }
}

/// Result of hitting a goal tile once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalHit {
    Damaged { health: u8 },
    Destroyed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    layout: BoardLayout,
    metrics: HexMetrics,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Occupant>,
}

impl Board {
    /// Empty board; goals are placed by [`Board::populate_goals`]
    pub fn new(layout: BoardLayout, metrics: HexMetrics) -> Self {
        let cells = vec![Occupant::Empty; layout.grid().cell_count()];
        Self {
            layout,
            metrics,
            cells,
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn grid(&self) -> &HexGrid {
        self.layout.grid()
    }

    pub fn metrics(&self) -> &HexMetrics {
        &self.metrics
    }

    pub fn width(&self) -> u8 {
        self.layout.width()
    }

    pub fn height(&self) -> u8 {
        self.layout.height()
    }

    /// Index of a non-void cell
    #[inline(always)]
    fn index(&self, c: Coord) -> Option<usize> {
        if self.layout.is_void(c) {
            return None;
        }
        self.grid().index(c)
    }

    /// Out-of-range coordinates count as void
    pub fn is_void(&self, c: Coord) -> bool {
        self.layout.is_void(c)
    }

    pub fn is_playable(&self, c: Coord) -> bool {
        !self.is_void(c)
    }

    /// Occupant of a playable cell; `None` for void or out-of-range coordinates
    pub fn get(&self, c: Coord) -> Option<&Occupant> {
        self.index(c).map(|i| &self.cells[i])
    }

    pub fn element(&self, c: Coord) -> Option<&Element> {
        match self.get(c) {
            Some(Occupant::Element(e)) => Some(e),
            _ => None,
        }
    }

    pub fn element_kind(&self, c: Coord) -> Option<ElementId> {
        self.element(c).map(|e| e.kind)
    }

    pub fn goal(&self, c: Coord) -> Option<&Goal> {
        match self.get(c) {
            Some(Occupant::Goal(g)) => Some(g),
            _ => None,
        }
    }

    pub fn is_empty_cell(&self, c: Coord) -> bool {
        matches!(self.get(c), Some(Occupant::Empty))
    }

    /// Replace the occupant of a playable cell and return the previous one
    ///
    /// Handles are not touched: the caller owns the returned occupant's
    /// handle. Elements get their target recomputed for `c`.
    pub fn set(&mut self, c: Coord, occupant: Occupant) -> Result<Occupant, BoardError> {
        if !self.grid().contains(c) {
            return Err(BoardError::OutOfBounds(c));
        }
        let idx = self.index(c).ok_or(BoardError::VoidCell(c))?;
        let occupant = match occupant {
            Occupant::Element(mut e) => {
                e.target = self.world_pos(c);
                Occupant::Element(e)
            }
            other => other,
        };
        Ok(std::mem::replace(&mut self.cells[idx], occupant))
    }

    /// Both playable and listed in each other's neighbour table
    pub fn are_adjacent(&self, a: Coord, b: Coord) -> bool {
        self.is_playable(a) && self.is_playable(b) && self.grid().is_neighbor(a, b)
    }

    /// Playable neighbours of `c`
    pub fn neighbors(&self, c: Coord) -> ArrayVec<Coord, 6> {
        if self.is_void(c) {
            return ArrayVec::new();
        }
        self.grid()
            .neighbors(c)
            .into_iter()
            .filter(|&n| self.is_playable(n))
            .collect()
    }

    /// Why `a <-> b` cannot be swapped, if anything
    pub fn check_swap(&self, a: Coord, b: Coord) -> Option<InvalidSwapReason> {
        if !self.grid().contains(a) || !self.grid().contains(b) {
            return Some(InvalidSwapReason::OutOfBounds);
        }
        if self.is_void(a) || self.is_void(b) {
            return Some(InvalidSwapReason::VoidCell);
        }
        if a == b {
            return Some(InvalidSwapReason::SameCell);
        }
        if !self.are_adjacent(a, b) {
            return Some(InvalidSwapReason::NotAdjacent);
        }
        if self.element(a).is_none() || self.element(b).is_none() {
            return Some(InvalidSwapReason::Immovable);
        }
        None
    }

    /// Exchange two adjacent elements; a rejected swap leaves the board untouched
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), SwapError> {
        if let Some(reason) = self.check_swap(a, b) {
            return Err(SwapError::InvalidSwap { a, b, reason });
        }
        self.exchange(a, b);
        Ok(())
    }

    /// Swap two playable cells without validation, recomputing targets
    pub(crate) fn exchange(&mut self, a: Coord, b: Coord) {
        if let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) {
            self.cells.swap(ia, ib);
            self.retarget(a);
            self.retarget(b);
        }
    }

    fn retarget(&mut self, c: Coord) {
        let pos = self.world_pos(c);
        if let Some(idx) = self.index(c) {
            if let Occupant::Element(e) = &mut self.cells[idx] {
                e.target = pos;
            }
        }
    }

    /// Empty a cell, releasing its visual to the pool
    pub fn clear<E: EffectsSink + ?Sized>(&mut self, c: Coord, effects: &mut E) -> Occupant {
        let Some(idx) = self.index(c) else {
            return Occupant::Empty;
        };
        let old = std::mem::take(&mut self.cells[idx]);
        if let Some(handle) = old.handle() {
            effects.release(handle);
        }
        old
    }

    /// Move an occupant into an empty cell (compaction)
    pub(crate) fn move_occupant(&mut self, from: Coord, to: Coord) {
        if let (Some(src), Some(dst)) = (self.index(from), self.index(to)) {
            let occupant = std::mem::take(&mut self.cells[src]);
            self.cells[dst] = occupant;
            self.retarget(to);
        }
    }

    /// Put a fresh element in an empty cell; its target is the cell itself
    pub(crate) fn place_element(&mut self, c: Coord, element: Element) {
        let pos = self.world_pos(c);
        if let Some(idx) = self.index(c) {
            self.cells[idx] = Occupant::Element(Element {
                target: pos,
                ..element
            });
        }
    }

    /// Empower an element; false if `c` holds no element
    pub fn set_charge(&mut self, c: Coord, lane: Lane) -> bool {
        match self.index(c).map(|i| &mut self.cells[i]) {
            Some(Occupant::Element(e)) => {
                e.charge = Some(lane);
                true
            }
            _ => false,
        }
    }

    /// Take one point of health off the goal at `c`
    ///
    /// A goal reaching zero is removed and its visual released.
    pub fn hit_goal<E: EffectsSink + ?Sized>(
        &mut self,
        c: Coord,
        effects: &mut E,
    ) -> Option<GoalHit> {
        let idx = self.index(c)?;
        let Occupant::Goal(goal) = &mut self.cells[idx] else {
            return None;
        };
        goal.health = goal.health.saturating_sub(1);
        if goal.health > 0 {
            return Some(GoalHit::Damaged {
                health: goal.health,
            });
        }
        self.clear(c, effects);
        Some(GoalHit::Destroyed)
    }

    /// True iff every playable cell is occupied
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    pub fn empty_count(&self) -> usize {
        self.coords().filter(|&c| self.is_empty_cell(c)).count()
    }

    /// Playable coordinates, bottom row first
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.grid().coords().filter(move |&c| self.is_playable(c))
    }

    /// Count of goal tiles still standing
    pub fn goal_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|o| matches!(o, Occupant::Goal(_)))
            .count()
    }

    /// Release every visual and empty the board
    pub fn release_all<E: EffectsSink + ?Sized>(&mut self, effects: &mut E) {
        for cell in &mut self.cells {
            if let Some(handle) = cell.handle() {
                effects.release(handle);
            }
            *cell = Occupant::Empty;
        }
    }

    /// Place the layout's goal tiles with fresh visuals
    pub fn populate_goals<E: EffectsSink + ?Sized>(&mut self, effects: &mut E, pool_tag: &str) {
        let goals: Vec<(Coord, u8)> = self.layout.goals().collect();
        for (c, health) in goals {
            let handle = effects.spawn_visual(SpawnRequest {
                pool_tag,
                material: pool_tag,
                at: self.world_pos(c),
            });
            if let Some(idx) = self.index(c) {
                self.cells[idx] = Occupant::Goal(Goal {
                    health,
                    handle: Some(handle),
                });
            }
        }
    }

    pub fn world_pos(&self, c: Coord) -> WorldPos {
        self.metrics.to_world(self.grid(), c)
    }

    /// Grid cell under a world point, void cells excluded
    pub fn pick(&self, pos: WorldPos, tight: bool) -> Option<Coord> {
        self.metrics
            .pick(self.grid(), pos, tight)
            .filter(|&c| self.is_playable(c))
    }

    /// Overwrite the board from a picture, top row first, one token per cell
    ///
    /// `a`-`z` are element ids 0-25 (upper case: charged along the column
    /// lane), `1`-`8` a goal with that health, `_` an empty cell and `.` a void
    /// cell. No visuals are spawned; existing handles are dropped without
    /// being released.
    pub fn paint(&mut self, rows: &[&str]) -> Result<(), BoardError> {
        let height = self.height() as usize;
        if rows.len() != height {
            return Err(BoardError::Picture {
                row: rows.len(),
                reason: format!("expected {} rows", height),
            });
        }
        for (r, line) in rows.iter().enumerate() {
            let y = (height - 1 - r) as i16;
            let tokens: Vec<char> = line
                .split_whitespace()
                .flat_map(|t| t.chars())
                .collect();
            if tokens.len() != self.width() as usize {
                return Err(BoardError::Picture {
                    row: r,
                    reason: format!("expected {} cells, found {}", self.width(), tokens.len()),
                });
            }
            for (x, token) in tokens.into_iter().enumerate() {
                let c = Coord::new(x as i16, y);
                let void = self.is_void(c);
                let occupant = match token {
                    '.' if void => continue,
                    '.' => {
                        return Err(BoardError::Picture {
                            row: r,
                            reason: format!("`.` on playable cell {}", c),
                        })
                    }
                    _ if void => return Err(BoardError::VoidCell(c)),
                    '_' => Occupant::Empty,
                    'a'..='z' => Occupant::Element(Element::new(ElementId(token as u8 - b'a'))),
                    'A'..='Z' => Occupant::Element(Element::charged(
                        ElementId(token as u8 - b'A'),
                        Lane::Column,
                    )),
                    '1'..='8' => Occupant::Goal(Goal {
                        health: token as u8 - b'0',
                        handle: None,
                    }),
                    other => {
                        return Err(BoardError::Picture {
                            row: r,
                            reason: format!("unknown token `{}`", other),
                        })
                    }
                };
                self.set(c, occupant)?;
            }
        }
        Ok(())
    }

    /// Layout kind of a cell (what it started the session as)
    pub fn cell_kind(&self, c: Coord) -> CellKind {
        self.layout.kind(c)
    }
}
