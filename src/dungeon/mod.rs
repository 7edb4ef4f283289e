//! # Dungeon Module
//!
//! The arena that owns every cell, room and connectivity component of a layout.
//!
//! Rooms and components reference each other through stable handles
//! ([`RoomId`], [`ComponentId`]) rather than owning pointers. Merging two rooms
//! vacates both slots and fills a new one, so a handle to a merged-away room
//! can never silently alias the room that replaced it.

pub mod component;
pub mod grid;
pub mod room;
pub mod validate;

pub use component::*;
pub use grid::*;
pub use room::*;

use crate::{WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::fmt;

new_key_type! {
    /// Handle to a live room in a [`Dungeon`].
    pub struct RoomId;
    /// Handle to a live connectivity component in a [`Dungeon`].
    pub struct ComponentId;
}

/// Represents a cell coordinate on the dungeon grid.
///
/// # Examples
///
/// ```
/// use warren::Position;
///
/// let pos = Position::new(3, 4);
/// assert_eq!(pos.x, 3);
/// assert_eq!(pos.step(warren::Direction::North), Position::new(3, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position one step away in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the 4 cardinal adjacent positions, in bounds or not.
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four sides of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions, in the order neighbours are listed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Grid offset of this direction; y grows southward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// What separates a cell from its neighbour on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// Both cells belong to the same room
    Open,
    /// The cells belong to different rooms joined by a door on this side
    Door,
    /// Different rooms without a door here, or the edge of the grid
    Wall,
}

/// A generated dungeon: the grid plus the live room and component arenas.
///
/// All mutation goes through the merge and door operations defined in the
/// [`room`], [`component`] and [`grid`] modules. External readers only get
/// shared access.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub(crate) grid: Grid,
    pub(crate) rooms: SlotMap<RoomId, Room>,
    pub(crate) components: SlotMap<ComponentId, ConnectivityComponent>,
}

impl Dungeon {
    /// Creates a dungeon where every cell is its own room and its own component.
    ///
    /// Adjacency is left empty; the builder fills it in a separate phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::Dungeon;
    ///
    /// let dungeon = Dungeon::with_singleton_rooms(3, 2);
    /// assert_eq!(dungeon.room_count(), 6);
    /// assert_eq!(dungeon.component_count(), 6);
    /// ```
    pub fn with_singleton_rooms(width: usize, height: usize) -> Self {
        let mut rooms = SlotMap::with_capacity_and_key(width * height);
        let mut components = SlotMap::with_capacity_and_key(width * height);
        let mut cells = Vec::with_capacity(width * height);

        for y in 0..height {
            for x in 0..width {
                let position = Position::new(x as i32, y as i32);
                let component = components.insert(ConnectivityComponent::default());
                let room = rooms.insert(Room::singleton(position, component));
                components[component].rooms.insert(room);
                cells.push(Cell::new(position, room));
            }
        }

        Self {
            grid: Grid::from_cells(width, height, cells),
            rooms,
            components,
        }
    }

    /// Gets the grid of cells.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Gets a live room by handle.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// Iterates over all live rooms.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms.iter()
    }

    /// Handles of all live rooms, in arena order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().collect()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the handle still names a live room.
    pub fn is_room_live(&self, id: RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Gets a live connectivity component by handle.
    pub fn component(&self, id: ComponentId) -> Option<&ConnectivityComponent> {
        self.components.get(id)
    }

    /// Iterates over all live connectivity components.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &ConnectivityComponent)> {
        self.components.iter()
    }

    /// Handles of all live components, in arena order.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components.keys().collect()
    }

    /// Number of live connectivity components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component that currently owns the given room.
    pub fn component_of(&self, room: RoomId) -> Option<ComponentId> {
        self.rooms.get(room).map(Room::component)
    }

    /// Room that owns the cell at the given position.
    pub fn room_at(&self, pos: Position) -> Option<RoomId> {
        self.grid.get(pos).map(Cell::room)
    }

    /// Total number of cells held by the rooms of a component.
    pub fn component_cell_count(&self, id: ComponentId) -> usize {
        self.components
            .get(id)
            .map(|component| {
                component
                    .rooms()
                    .iter()
                    .filter_map(|room| self.rooms.get(*room))
                    .map(Room::size)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Classifies one side of a cell.
    ///
    /// Returns `None` if `pos` is outside the grid. A side facing the grid
    /// boundary is always a wall.
    pub fn edge(&self, pos: Position, direction: Direction) -> Option<Edge> {
        let cell = self.grid.get(pos)?;
        let other_pos = pos.step(direction);
        let edge = match self.grid.get(other_pos) {
            None => Edge::Wall,
            Some(other) if other.room() == cell.room() => Edge::Open,
            Some(_) if cell.has_door_to(other_pos) => Edge::Door,
            Some(_) => Edge::Wall,
        };
        Some(edge)
    }

    /// Number of distinct doors in the dungeon.
    pub fn door_count(&self) -> usize {
        self.grid.cells().map(|cell| cell.doors().len()).sum::<usize>() / 2
    }

    /// Gets a live room, treating a stale handle as a broken invariant.
    pub(crate) fn live_room(&self, id: RoomId) -> WarrenResult<&Room> {
        self.rooms
            .get(id)
            .ok_or_else(|| WarrenError::ConsistencyError(format!("{id:?} is not a live room")))
    }

    /// Mutable variant of [`Dungeon::live_room`].
    pub(crate) fn live_room_mut(&mut self, id: RoomId) -> WarrenResult<&mut Room> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| WarrenError::ConsistencyError(format!("{id:?} is not a live room")))
    }

    /// Mutable access to a live component, treating a stale handle as a broken invariant.
    pub(crate) fn live_component_mut(
        &mut self,
        id: ComponentId,
    ) -> WarrenResult<&mut ConnectivityComponent> {
        self.components
            .get_mut(id)
            .ok_or_else(|| WarrenError::ConsistencyError(format!("{id:?} is not a live component")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singleton_layout() {
        let dungeon = Dungeon::with_singleton_rooms(4, 3);

        assert_eq!(dungeon.width(), 4);
        assert_eq!(dungeon.height(), 3);
        assert_eq!(dungeon.room_count(), 12);
        assert_eq!(dungeon.component_count(), 12);

        for cell in dungeon.grid().cells() {
            let room = dungeon.room(cell.room()).unwrap();
            assert_eq!(room.size(), 1);
            assert!(room.contains(cell.position()));
            let component = dungeon.component(room.component()).unwrap();
            assert!(component.contains(cell.room()));
        }
    }

    #[test]
    fn test_edges_of_fresh_grid() {
        let dungeon = Dungeon::with_singleton_rooms(2, 2);
        let origin = Position::new(0, 0);

        assert_eq!(dungeon.edge(origin, Direction::North), Some(Edge::Wall));
        assert_eq!(dungeon.edge(origin, Direction::West), Some(Edge::Wall));
        // Different singleton rooms, no door yet
        assert_eq!(dungeon.edge(origin, Direction::East), Some(Edge::Wall));
        assert_eq!(dungeon.edge(Position::new(5, 5), Direction::East), None);
        assert_eq!(dungeon.door_count(), 0);
    }

    #[test]
    fn test_position_steps() {
        let pos = Position::new(2, 2);
        assert_eq!(pos.step(Direction::South), Position::new(2, 3));
        assert_eq!(pos.step(Direction::West), Position::new(1, 2));
        assert_eq!(pos.cardinal_adjacent_positions().len(), 4);
        assert_eq!(pos.to_string(), "(2, 2)");
    }
}
