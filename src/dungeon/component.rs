//! # Connectivity Components
//!
//! Union-find classes of rooms, kept as explicit arena entries.

use super::{ComponentId, Dungeon, RoomId};
use crate::{WarrenError, WarrenResult};
use log::debug;
use std::collections::BTreeSet;

/// A set of rooms that are all reachable from each other through doors.
///
/// `adjacent_to` lists the other components this one borders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityComponent {
    pub(crate) rooms: BTreeSet<RoomId>,
    pub(crate) adjacent_to: BTreeSet<ComponentId>,
}

impl ConnectivityComponent {
    /// Rooms in this component.
    pub fn rooms(&self) -> &BTreeSet<RoomId> {
        &self.rooms
    }

    /// Components bordering this one.
    pub fn adjacent_to(&self) -> &BTreeSet<ComponentId> {
        &self.adjacent_to
    }

    /// Whether the room belongs to this component.
    pub fn contains(&self, room: RoomId) -> bool {
        self.rooms.contains(&room)
    }

    /// Number of rooms in this component.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether the component holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Dungeon {
    /// Merges two components into a new one, retiring both inputs.
    ///
    /// Every member room points at the result afterwards, and every bordering
    /// component has its references to either input replaced by the result.
    pub fn merge_components(
        &mut self,
        a: ComponentId,
        b: ComponentId,
    ) -> WarrenResult<ComponentId> {
        if a == b {
            return Err(WarrenError::DoubleRetirement(format!(
                "{a:?} cannot be merged with itself"
            )));
        }
        for id in [a, b] {
            if !self.components.contains_key(id) {
                return Err(WarrenError::DoubleRetirement(format!(
                    "{id:?} was already retired"
                )));
            }
        }

        let first = self.take_component(a)?;
        let second = self.take_component(b)?;

        let rooms: BTreeSet<RoomId> = first.rooms.union(&second.rooms).copied().collect();
        let adjacent_to: BTreeSet<ComponentId> = first
            .adjacent_to
            .union(&second.adjacent_to)
            .copied()
            .filter(|component| *component != a && *component != b)
            .collect();

        let merged = self.components.insert(ConnectivityComponent {
            rooms: rooms.clone(),
            adjacent_to: adjacent_to.clone(),
        });

        for room in &rooms {
            self.live_room_mut(*room)?.component = merged;
        }
        for neighbor in &adjacent_to {
            let component = self.live_component_mut(*neighbor)?;
            component.adjacent_to.remove(&a);
            component.adjacent_to.remove(&b);
            component.adjacent_to.insert(merged);
        }

        debug!("Merging {a:?} with {b:?} to produce {merged:?}");
        Ok(merged)
    }

    fn take_component(&mut self, id: ComponentId) -> WarrenResult<ConnectivityComponent> {
        self.components
            .remove(id)
            .ok_or_else(|| WarrenError::DoubleRetirement(format!("{id:?} was already retired")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_merge_components_relabels_rooms_and_neighbors() {
        let mut dungeon = Dungeon::with_singleton_rooms(3, 1);
        let rooms: Vec<RoomId> = (0..3)
            .map(|x| dungeon.room_at(Position::new(x, 0)).unwrap())
            .collect();
        let ids: Vec<ComponentId> = rooms
            .iter()
            .map(|room| dungeon.component_of(*room).unwrap())
            .collect();
        dungeon.components[ids[0]].adjacent_to.insert(ids[1]);
        dungeon.components[ids[1]].adjacent_to.extend([ids[0], ids[2]]);
        dungeon.components[ids[2]].adjacent_to.insert(ids[1]);

        let merged = dungeon.merge_components(ids[0], ids[1]).unwrap();

        assert_eq!(dungeon.component_count(), 2);
        let component = dungeon.component(merged).unwrap();
        assert_eq!(component.len(), 2);
        assert!(!component.is_empty());
        assert!(component.contains(rooms[0]) && component.contains(rooms[1]));
        assert_eq!(component.adjacent_to(), &BTreeSet::from([ids[2]]));
        assert_eq!(
            dungeon.component(ids[2]).unwrap().adjacent_to(),
            &BTreeSet::from([merged])
        );
        assert_eq!(dungeon.component_of(rooms[0]), Some(merged));
        assert_eq!(dungeon.component_of(rooms[1]), Some(merged));
        assert_eq!(dungeon.component_cell_count(merged), 2);
    }

    #[test]
    fn test_retired_component_cannot_merge_again() {
        let mut dungeon = Dungeon::with_singleton_rooms(2, 1);
        let ids = dungeon.component_ids();
        dungeon.merge_components(ids[0], ids[1]).unwrap();

        let result = dungeon.merge_components(ids[0], ids[1]);
        assert!(matches!(result, Err(WarrenError::DoubleRetirement(_))));
    }
}
