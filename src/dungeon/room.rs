//! # Rooms
//!
//! Connected sets of cells, and the two operations that grow the dungeon:
//! merging two rooms into one, and linking two rooms with a door.

use super::{ComponentId, Dungeon, Position, RoomId};
use crate::generation::Sampler;
use crate::{WarrenError, WarrenResult};
use log::debug;
use std::collections::BTreeSet;

/// A connected set of cells.
///
/// `door_to` lists rooms reachable through a door from this room;
/// `adjacent_to` lists rooms that border this one without a door yet. Both
/// relations are symmetric and a partner never appears in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub(crate) cells: BTreeSet<Position>,
    pub(crate) door_to: BTreeSet<RoomId>,
    pub(crate) adjacent_to: BTreeSet<RoomId>,
    pub(crate) component: ComponentId,
}

impl Room {
    pub(crate) fn singleton(position: Position, component: ComponentId) -> Self {
        Self {
            cells: BTreeSet::from([position]),
            door_to: BTreeSet::new(),
            adjacent_to: BTreeSet::new(),
            component,
        }
    }

    /// Number of cells in the room.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Whether the cell at `pos` belongs to this room.
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Member cells of the room.
    pub fn cells(&self) -> &BTreeSet<Position> {
        &self.cells
    }

    /// Rooms reachable through a door.
    pub fn door_to(&self) -> &BTreeSet<RoomId> {
        &self.door_to
    }

    /// Rooms bordering this one without a door.
    pub fn adjacent_to(&self) -> &BTreeSet<RoomId> {
        &self.adjacent_to
    }

    /// Connectivity component this room belongs to.
    pub fn component(&self) -> ComponentId {
        self.component
    }
}

impl Dungeon {
    /// Merges two rooms into a new room, retiring both inputs.
    ///
    /// The new room takes the union of the cells and relations of both inputs.
    /// Every cell is re-owned and every room that referred to either input is
    /// relabelled to the result, keeping the same kind of relation. The two
    /// components are merged as well unless the rooms already share one. A door
    /// between the two inputs ends up inside the result and is removed.
    ///
    /// Merging a retired room, or a room with itself, is a
    /// [`WarrenError::DoubleRetirement`].
    pub fn merge_rooms(&mut self, a: RoomId, b: RoomId) -> WarrenResult<RoomId> {
        if a == b {
            return Err(WarrenError::DoubleRetirement(format!(
                "{a:?} cannot be merged with itself"
            )));
        }
        for id in [a, b] {
            if !self.rooms.contains_key(id) {
                return Err(WarrenError::DoubleRetirement(format!(
                    "{id:?} was already retired"
                )));
            }
        }

        let component_a = self.live_room(a)?.component;
        let component_b = self.live_room(b)?.component;
        let component = if component_a == component_b {
            component_a
        } else {
            self.merge_components(component_a, component_b)?
        };

        let first = self.take_room(a)?;
        let second = self.take_room(b)?;

        let door_to: BTreeSet<RoomId> = first
            .door_to
            .union(&second.door_to)
            .copied()
            .filter(|room| *room != a && *room != b)
            .collect();
        let adjacent_to: BTreeSet<RoomId> = first
            .adjacent_to
            .union(&second.adjacent_to)
            .copied()
            .filter(|room| *room != a && *room != b && !door_to.contains(room))
            .collect();
        let cells: BTreeSet<Position> = first.cells.union(&second.cells).copied().collect();

        let merged = self.rooms.insert(Room {
            cells: cells.clone(),
            door_to: door_to.clone(),
            adjacent_to: adjacent_to.clone(),
            component,
        });

        for pos in &cells {
            let cell = self.grid.get_mut(*pos).ok_or_else(|| {
                WarrenError::ConsistencyError(format!("room cell {pos} is outside the grid"))
            })?;
            cell.room = merged;
            cell.doors.retain(|door| !cells.contains(door));
        }

        for partner in &door_to {
            let room = self.live_room_mut(*partner)?;
            forget(room, a, b);
            room.door_to.insert(merged);
        }
        for partner in &adjacent_to {
            let room = self.live_room_mut(*partner)?;
            forget(room, a, b);
            room.adjacent_to.insert(merged);
        }

        let group = self.live_component_mut(component)?;
        group.rooms.remove(&a);
        group.rooms.remove(&b);
        group.rooms.insert(merged);

        debug!(
            "Merging {a:?} with {b:?} to produce {merged:?} ({} cells)",
            cells.len()
        );
        Ok(merged)
    }

    /// Links room `a` to bordering room `b` with a door.
    ///
    /// A bordering cell of `a` is picked uniformly and given a door into `b`.
    /// The pair moves from `adjacent_to` to `door_to` on both sides and the two
    /// components merge. Returns `a`.
    pub fn add_door(
        &mut self,
        a: RoomId,
        b: RoomId,
        sampler: &mut Sampler,
    ) -> WarrenResult<RoomId> {
        if a == b {
            return Err(WarrenError::InvalidDoor(format!(
                "{a:?} cannot have a door to itself"
            )));
        }
        let room = self.live_room(a)?;
        self.live_room(b)?;
        if !room.adjacent_to.contains(&b) {
            return Err(WarrenError::NotAdjacent(format!(
                "{b:?} is not recorded as bordering {a:?}"
            )));
        }

        let bordering: Vec<Position> = room
            .cells
            .iter()
            .copied()
            .filter(|pos| {
                self.grid
                    .neighbors(*pos)
                    .into_iter()
                    .any(|neighbor| self.room_at(neighbor) == Some(b))
            })
            .collect();
        let from = match sampler.pick(&bordering) {
            Ok(from) => *from,
            Err(_) => {
                return Err(WarrenError::NotAdjacent(format!(
                    "no cell of {a:?} touches {b:?}"
                )))
            }
        };
        let to = self.add_cell_door(from, b, sampler)?;

        let first = self.live_room_mut(a)?;
        first.adjacent_to.remove(&b);
        first.door_to.insert(b);
        let component_a = first.component;
        let second = self.live_room_mut(b)?;
        second.adjacent_to.remove(&a);
        second.door_to.insert(a);
        let component_b = second.component;

        if component_a != component_b {
            self.merge_components(component_a, component_b)?;
        }

        debug!("Connecting {a:?} with {b:?} with a door between {from} and {to}");
        Ok(a)
    }

    fn take_room(&mut self, id: RoomId) -> WarrenResult<Room> {
        self.rooms
            .remove(id)
            .ok_or_else(|| WarrenError::DoubleRetirement(format!("{id:?} was already retired")))
    }
}

/// Drops every reference to the two merged-away rooms.
fn forget(room: &mut Room, a: RoomId, b: RoomId) {
    for old in [a, b] {
        room.door_to.remove(&old);
        room.adjacent_to.remove(&old);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Direction, Edge};

    /// A 3×1 strip with adjacency filled in, the way the builder does it.
    fn strip() -> (Dungeon, [RoomId; 3]) {
        let mut dungeon = Dungeon::with_singleton_rooms(3, 1);
        let ids: Vec<RoomId> = (0..3)
            .map(|x| dungeon.room_at(Position::new(x, 0)).unwrap())
            .collect();
        let components: Vec<ComponentId> = ids
            .iter()
            .map(|id| dungeon.component_of(*id).unwrap())
            .collect();
        for i in 0..2 {
            dungeon.rooms[ids[i]].adjacent_to.insert(ids[i + 1]);
            dungeon.rooms[ids[i + 1]].adjacent_to.insert(ids[i]);
            dungeon.components[components[i]]
                .adjacent_to
                .insert(components[i + 1]);
            dungeon.components[components[i + 1]]
                .adjacent_to
                .insert(components[i]);
        }
        (dungeon, [ids[0], ids[1], ids[2]])
    }

    #[test]
    fn test_merge_rehomes_cells_and_relabels_neighbors() {
        let (mut dungeon, [left, middle, right]) = strip();

        let merged = dungeon.merge_rooms(left, middle).unwrap();

        assert!(!dungeon.is_room_live(left));
        assert!(!dungeon.is_room_live(middle));
        let room = dungeon.room(merged).unwrap();
        assert_eq!(room.size(), 2);
        assert!(room.contains(Position::new(0, 0)));
        assert!(room.contains(Position::new(1, 0)));
        assert_eq!(dungeon.room_at(Position::new(1, 0)), Some(merged));
        assert_eq!(room.adjacent_to(), &BTreeSet::from([right]));
        assert_eq!(
            dungeon.room(right).unwrap().adjacent_to(),
            &BTreeSet::from([merged])
        );
        assert_eq!(dungeon.component_count(), 2);
        dungeon.check_consistency().unwrap();
    }

    #[test]
    fn test_merge_twice_is_double_retirement() {
        let (mut dungeon, [left, middle, right]) = strip();
        dungeon.merge_rooms(left, middle).unwrap();

        let result = dungeon.merge_rooms(left, right);
        assert!(matches!(result, Err(WarrenError::DoubleRetirement(_))));

        let result = dungeon.merge_rooms(right, right);
        assert!(matches!(result, Err(WarrenError::DoubleRetirement(_))));
    }

    #[test]
    fn test_door_moves_partner_between_relations() {
        let (mut dungeon, [left, middle, right]) = strip();
        let mut sampler = Sampler::seeded(3);

        let kept = dungeon.add_door(left, middle, &mut sampler).unwrap();

        assert_eq!(kept, left);
        let room = dungeon.room(left).unwrap();
        assert!(room.door_to().contains(&middle));
        assert!(!room.adjacent_to().contains(&middle));
        let other = dungeon.room(middle).unwrap();
        assert!(other.door_to().contains(&left));
        assert!(other.adjacent_to().contains(&right));
        assert_eq!(dungeon.component_of(left), dungeon.component_of(middle));
        assert_eq!(
            dungeon.edge(Position::new(0, 0), Direction::East),
            Some(Edge::Door)
        );
        dungeon.check_consistency().unwrap();
    }

    #[test]
    fn test_door_between_non_bordering_rooms_fails() {
        let (mut dungeon, [left, _, right]) = strip();
        let mut sampler = Sampler::seeded(3);

        let result = dungeon.add_door(left, right, &mut sampler);
        assert!(matches!(result, Err(WarrenError::NotAdjacent(_))));

        let result = dungeon.add_door(left, left, &mut sampler);
        assert!(matches!(result, Err(WarrenError::InvalidDoor(_))));
    }

    #[test]
    fn test_merging_doored_rooms_removes_inner_door() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let left = dungeon.room_at(Position::new(0, 0)).unwrap();
        let right = dungeon.room_at(Position::new(1, 0)).unwrap();
        let components = dungeon.component_ids();
        dungeon.rooms[left].adjacent_to.insert(right);
        dungeon.rooms[right].adjacent_to.insert(left);
        dungeon.components[components[0]]
            .adjacent_to
            .insert(components[1]);
        dungeon.components[components[1]]
            .adjacent_to
            .insert(components[0]);
        let mut sampler = Sampler::seeded(2);
        dungeon.add_door(left, right, &mut sampler).unwrap();
        assert_eq!(dungeon.door_count(), 1);

        let merged = dungeon.merge_rooms(left, right).unwrap();

        assert_eq!(dungeon.door_count(), 0);
        assert!(dungeon.room(merged).unwrap().door_to().is_empty());
        assert_eq!(
            dungeon.edge(Position::new(0, 0), Direction::East),
            Some(Edge::Open)
        );
        assert_eq!(dungeon.component_count(), 1);
        assert!(dungeon.check_consistency().is_ok());
        dungeon.check_connected().unwrap();
    }

    #[test]
    fn test_merge_keeps_door_over_adjacency() {
        // middle has a door to left; merging middle with right must leave the
        // merged room in left's door set only.
        let (mut dungeon, [left, middle, right]) = strip();
        let mut sampler = Sampler::seeded(5);
        dungeon.add_door(left, middle, &mut sampler).unwrap();

        let merged = dungeon.merge_rooms(middle, right).unwrap();

        let room = dungeon.room(left).unwrap();
        assert!(room.door_to().contains(&merged));
        assert!(!room.adjacent_to().contains(&merged));
        assert_eq!(dungeon.component_count(), 1);
        dungeon.check_consistency().unwrap();
    }
}
