//! # Consistency Checks
//!
//! Last-line verification of the cross references between cells, rooms and
//! components. Nothing here mutates the dungeon, so running a check twice
//! gives the same answer.

use super::{Dungeon, RoomId};
use crate::{WarrenError, WarrenResult};
use pathfinding::prelude::bfs_reach;

fn violation(message: String) -> WarrenError {
    WarrenError::ConsistencyError(message)
}

impl Dungeon {
    /// Verifies every ownership and symmetry invariant.
    ///
    /// Checks that each room's component contains it, that each cell's owner
    /// contains the cell (so no cell is unowned or double-owned), that room
    /// and component relations are symmetric, that no partner is both doored
    /// and merely adjacent, and that cell doors are mirrored and only join
    /// neighbouring cells of doored rooms.
    pub fn check_consistency(&self) -> WarrenResult<()> {
        for (component_id, component) in self.components() {
            for room_id in component.rooms() {
                let room = self.room(*room_id).ok_or_else(|| {
                    violation(format!("{component_id:?} lists retired {room_id:?}"))
                })?;
                if room.component() != component_id {
                    return Err(violation(format!(
                        "room-component mismatch: {room_id:?} in {component_id:?}"
                    )));
                }
            }
            for neighbor in component.adjacent_to() {
                let other = self.component(*neighbor).ok_or_else(|| {
                    violation(format!("{component_id:?} borders retired {neighbor:?}"))
                })?;
                if *neighbor == component_id || !other.adjacent_to().contains(&component_id) {
                    return Err(violation(format!(
                        "component adjacency mismatch: {component_id:?} and {neighbor:?}"
                    )));
                }
            }
        }

        let mut owned_cells = 0;
        for (room_id, room) in self.rooms() {
            let component = self
                .component(room.component())
                .ok_or_else(|| violation(format!("{room_id:?} points at a retired component")))?;
            if !component.contains(room_id) {
                return Err(violation(format!(
                    "{room_id:?} is missing from its component"
                )));
            }
            if room.size() == 0 {
                return Err(violation(format!("{room_id:?} has no cells")));
            }
            for pos in room.cells() {
                if self.room_at(*pos) != Some(room_id) {
                    return Err(violation(format!(
                        "cell-room mismatch: {pos} listed by {room_id:?}"
                    )));
                }
            }
            owned_cells += room.size();

            for partner in room.door_to() {
                self.check_partner(room_id, *partner)?;
                if !self
                    .room(*partner)
                    .is_some_and(|p| p.door_to().contains(&room_id))
                {
                    return Err(violation(format!(
                        "door mismatch: {room_id:?} and {partner:?}"
                    )));
                }
                if room.adjacent_to().contains(partner) {
                    return Err(violation(format!(
                        "{partner:?} is both doored and adjacent to {room_id:?}"
                    )));
                }
            }
            for partner in room.adjacent_to() {
                self.check_partner(room_id, *partner)?;
                if !self
                    .room(*partner)
                    .is_some_and(|p| p.adjacent_to().contains(&room_id))
                {
                    return Err(violation(format!(
                        "adjacency mismatch: {room_id:?} and {partner:?}"
                    )));
                }
            }
        }
        if owned_cells != self.grid.len() {
            return Err(violation(format!(
                "rooms own {owned_cells} cells but the grid has {}",
                self.grid.len()
            )));
        }

        for cell in self.grid.cells() {
            let pos = cell.position();
            for partner_pos in cell.doors() {
                let partner = self
                    .grid
                    .get(*partner_pos)
                    .ok_or_else(|| violation(format!("door from {pos} leaves the grid")))?;
                if !partner.has_door_to(pos) {
                    return Err(violation(format!(
                        "cell door mismatch: {pos} and {partner_pos}"
                    )));
                }
                if !self.grid.neighbors(pos).contains(partner_pos) {
                    return Err(violation(format!(
                        "door joins non-neighbours {pos} and {partner_pos}"
                    )));
                }
                let doored = self
                    .room(cell.room())
                    .is_some_and(|room| room.door_to().contains(&partner.room()));
                if !doored {
                    return Err(violation(format!(
                        "door at {pos} is not backed by a room door"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Verifies that the door graph joins every live room.
    pub fn check_connected(&self) -> WarrenResult<()> {
        let Some(start) = self.rooms.keys().next() else {
            return Ok(());
        };
        let reached = bfs_reach(start, |room: &RoomId| {
            self.room(*room)
                .map(|room| room.door_to().iter().copied().collect::<Vec<_>>())
                .unwrap_or_default()
        })
        .count();
        if reached != self.room_count() {
            return Err(violation(format!(
                "doors reach {reached} of {} rooms",
                self.room_count()
            )));
        }
        Ok(())
    }

    fn check_partner(&self, room_id: RoomId, partner: RoomId) -> WarrenResult<()> {
        if partner == room_id {
            return Err(violation(format!("{room_id:?} refers to itself")));
        }
        if !self.is_room_live(partner) {
            return Err(violation(format!(
                "{room_id:?} refers to retired {partner:?}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_fresh_grid_is_consistent_but_disconnected() {
        let dungeon = Dungeon::with_singleton_rooms(3, 3);
        dungeon.check_consistency().unwrap();
        assert!(matches!(
            dungeon.check_connected(),
            Err(WarrenError::ConsistencyError(_))
        ));
    }

    #[test]
    fn test_one_sided_adjacency_is_reported() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let left = dungeon.room_at(Position::new(0, 0)).unwrap();
        let right = dungeon.room_at(Position::new(1, 0)).unwrap();
        dungeon.rooms[left].adjacent_to.insert(right);

        let result = dungeon.check_consistency();
        assert!(matches!(result, Err(WarrenError::ConsistencyError(_))));
    }

    #[test]
    fn test_stolen_cell_is_reported() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let right = dungeon.room_at(Position::new(1, 0)).unwrap();
        if let Some(cell) = dungeon.grid.get_mut(Position::new(0, 0)) {
            cell.room = right;
        }

        assert!(dungeon.check_consistency().is_err());
    }

    #[test]
    fn test_single_cell_is_connected() {
        let dungeon = Dungeon::with_singleton_rooms(1, 1);
        dungeon.check_consistency().unwrap();
        dungeon.check_connected().unwrap();
    }
}
