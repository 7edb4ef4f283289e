//! # Grid and Cells
//!
//! The fixed lattice of unit cells and the cell-level door operation.

use super::{Dungeon, Position, RoomId};
use crate::generation::Sampler;
use crate::{WarrenError, WarrenResult};
use std::collections::BTreeSet;

/// A unit grid position.
///
/// Every cell is owned by exactly one room. Its door set lists the
/// neighbouring cells it shares a door with; the relation is symmetric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    pub(crate) room: RoomId,
    pub(crate) doors: BTreeSet<Position>,
}

impl Cell {
    pub(crate) fn new(position: Position, room: RoomId) -> Self {
        Self {
            position,
            room,
            doors: BTreeSet::new(),
        }
    }

    /// Coordinate of this cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Room that owns this cell.
    pub fn room(&self) -> RoomId {
        self.room
    }

    /// Neighbouring cells this cell shares a door with.
    pub fn doors(&self) -> &BTreeSet<Position> {
        &self.doors
    }

    /// Whether this cell has a door to the cell at `pos`.
    pub fn has_door_to(&self, pos: Position) -> bool {
        self.doors.contains(&pos)
    }

    /// In-bounds orthogonal neighbours of this cell.
    pub fn neighbors(&self, grid: &Grid) -> Vec<Position> {
        grid.neighbors(self.position)
    }
}

/// Fixed `width × height` lattice owning all cells, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounds-checked lookup by coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::Dungeon;
    ///
    /// let dungeon = Dungeon::with_singleton_rooms(2, 2);
    /// assert!(dungeon.grid().at(1, 1).is_some());
    /// assert!(dungeon.grid().at(2, 0).is_none());
    /// assert!(dungeon.grid().at(-1, 0).is_none());
    /// ```
    pub fn at(&self, x: i32, y: i32) -> Option<&Cell> {
        self.get(Position::new(x, y))
    }

    /// Bounds-checked lookup by position.
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |index| &mut self.cells[index])
    }

    /// Whether the position lies on the grid.
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// In-bounds orthogonal neighbours of `pos`.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|neighbor| self.contains(*neighbor))
            .collect()
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl Dungeon {
    /// Puts a door from the cell at `pos` into a neighbouring cell of `other_room`.
    ///
    /// If several neighbours belong to `other_room` one is picked uniformly.
    /// The door is recorded on both cells. Returns the partner cell.
    pub fn add_cell_door(
        &mut self,
        pos: Position,
        other_room: RoomId,
        sampler: &mut Sampler,
    ) -> WarrenResult<Position> {
        let cell = self
            .grid
            .get(pos)
            .ok_or_else(|| WarrenError::AdjacencyViolation(format!("{pos} is outside the grid")))?;
        if cell.room == other_room {
            return Err(WarrenError::InvalidDoor(format!(
                "cell {pos} already belongs to {other_room:?}"
            )));
        }

        let candidates: Vec<Position> = self
            .grid
            .neighbors(pos)
            .into_iter()
            .filter(|neighbor| self.room_at(*neighbor) == Some(other_room))
            .collect();
        let destination = match sampler.pick(&candidates) {
            Ok(destination) => *destination,
            Err(_) => {
                return Err(WarrenError::AdjacencyViolation(format!(
                    "cell {pos} does not border {other_room:?}"
                )))
            }
        };

        for (from, to) in [(pos, destination), (destination, pos)] {
            if let Some(cell) = self.grid.get_mut(from) {
                cell.doors.insert(to);
            }
        }

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_respect_bounds() {
        let dungeon = Dungeon::with_singleton_rooms(3, 3);
        let grid = dungeon.grid();

        assert_eq!(grid.neighbors(Position::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors(Position::new(1, 0)).len(), 3);
        assert_eq!(grid.neighbors(Position::new(1, 1)).len(), 4);

        let corner = grid.at(2, 2).unwrap();
        let neighbors = corner.neighbors(grid);
        assert!(neighbors.contains(&Position::new(1, 2)));
        assert!(neighbors.contains(&Position::new(2, 1)));
    }

    #[test]
    fn test_row_major_lookup() {
        let dungeon = Dungeon::with_singleton_rooms(3, 2);
        let cell = dungeon.grid().at(2, 1).unwrap();
        assert_eq!(cell.position(), Position::new(2, 1));
        assert_eq!(dungeon.grid().len(), 6);
        assert!(!dungeon.grid().is_empty());
    }

    #[test]
    fn test_cell_door_is_symmetric() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let mut sampler = Sampler::seeded(1);
        let left = Position::new(0, 0);
        let right = Position::new(1, 0);
        let right_room = dungeon.room_at(right).unwrap();

        let partner = dungeon
            .add_cell_door(left, right_room, &mut sampler)
            .unwrap();

        assert_eq!(partner, right);
        assert!(dungeon.grid().get(left).unwrap().has_door_to(right));
        assert!(dungeon.grid().get(right).unwrap().has_door_to(left));
        assert_eq!(dungeon.door_count(), 1);
    }

    #[test]
    fn test_cell_door_to_own_room_is_rejected() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let mut sampler = Sampler::seeded(1);
        let left = Position::new(0, 0);
        let own_room = dungeon.room_at(left).unwrap();

        let result = dungeon.add_cell_door(left, own_room, &mut sampler);
        assert!(matches!(result, Err(WarrenError::InvalidDoor(_))));
    }

    #[test]
    fn test_cell_door_to_distant_room_is_rejected() {
        let mut dungeon = Dungeon::with_singleton_rooms(3, 1);
        let mut sampler = Sampler::seeded(1);
        let far_room = dungeon.room_at(Position::new(2, 0)).unwrap();

        let result = dungeon.add_cell_door(Position::new(0, 0), far_room, &mut sampler);
        assert!(matches!(result, Err(WarrenError::AdjacencyViolation(_))));
        assert_eq!(dungeon.door_count(), 0);
    }
}
