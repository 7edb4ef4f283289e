//! # Dungeon Builder
//!
//! Grows a fully connected dungeon out of single-cell rooms.
//!
//! The builder starts with one room and one connectivity component per cell.
//! Each iteration picks a random component, a random bordering component, and
//! a bordering room pair between them. Small pairs are merged into one room;
//! larger ones are linked with a door. Either way the two components become
//! one, so a `W × H` grid is finished after exactly `W·H − 1` iterations.

use crate::{
    ComponentId, Dungeon, GenerationConfig, Generator, RoomId, Sampler, WarrenResult,
};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Where a build currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildPhase {
    /// Nothing built yet
    Uninitialized,
    /// Every cell has its singleton room and component
    CellsCreated,
    /// Room and component adjacency is filled in
    AdjacencyComputed,
    /// Merge loop running with this many live components
    Merging { remaining: usize },
    /// All invariants verified; terminal
    Validated,
}

/// What to do with a bordering room pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkDecision {
    /// Union the two rooms into one
    Merge,
    /// Keep the rooms distinct and add a door between them
    Link,
}

/// Counters collected while building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Merge loop iterations
    pub iterations: usize,
    /// Iterations that merged two rooms
    pub merges: usize,
    /// Iterations that linked two rooms with a door
    pub links: usize,
    /// Largest room produced by the merge branch
    pub largest_merged_room: usize,
}

/// Orchestrates generation of one dungeon per call.
#[derive(Debug, Clone)]
pub struct DungeonBuilder {
    config: GenerationConfig,
    phase: BuildPhase,
    report: BuildReport,
}

impl DungeonBuilder {
    /// Creates a builder for the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{BuildPhase, DungeonBuilder, GenerationConfig};
    ///
    /// let builder = DungeonBuilder::new(GenerationConfig::for_testing(1)).unwrap();
    /// assert_eq!(builder.phase(), BuildPhase::Uninitialized);
    /// ```
    pub fn new(config: GenerationConfig) -> WarrenResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: BuildPhase::Uninitialized,
            report: BuildReport::default(),
        })
    }

    /// Configuration this builder generates with.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Phase reached by the last build.
    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Counters of the last build.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Builds a complete, validated dungeon.
    ///
    /// Any error is fatal for this build; the partially built dungeon is
    /// dropped and nothing is retried.
    pub fn construct_dungeon(&mut self, sampler: &mut Sampler) -> WarrenResult<Dungeon> {
        self.phase = BuildPhase::Uninitialized;
        self.report = BuildReport::default();

        let mut dungeon = self.create_cells();
        self.fill_adjacency(&mut dungeon);

        while dungeon.component_count() > 1 {
            self.phase = BuildPhase::Merging {
                remaining: dungeon.component_count(),
            };
            debug!(
                "Components: {}, rooms: {}",
                dungeon.component_count(),
                dungeon.room_count()
            );
            self.merge_or_link_rooms(&mut dungeon, sampler)?;
            self.report.iterations += 1;
        }

        self.validate(&dungeon)?;
        self.phase = BuildPhase::Validated;

        info!(
            "Built {}x{} dungeon: {} rooms (target {}), {} doors, {} merges, {} links",
            dungeon.width(),
            dungeon.height(),
            dungeon.room_count(),
            self.config.target_rooms,
            dungeon.door_count(),
            self.report.merges,
            self.report.links
        );
        Ok(dungeon)
    }

    /// Applies the merge-or-link rule to two room sizes.
    ///
    /// A room above the first stop size always gets a door, as does a pair
    /// whose combined size would exceed the maximum room size.
    pub fn decide(&self, size_a: usize, size_b: usize) -> LinkDecision {
        if size_a > self.config.first_stop_size
            || size_b > self.config.first_stop_size
            || size_a + size_b > self.config.max_room_size
        {
            LinkDecision::Link
        } else {
            LinkDecision::Merge
        }
    }

    fn create_cells(&mut self) -> Dungeon {
        let dungeon = Dungeon::with_singleton_rooms(self.config.width, self.config.height);
        self.phase = BuildPhase::CellsCreated;
        dungeon
    }

    /// Seeds each singleton room and component with its cell's neighbours.
    fn fill_adjacency(&mut self, dungeon: &mut Dungeon) {
        let links: Vec<(RoomId, BTreeSet<RoomId>)> = dungeon
            .grid
            .cells()
            .map(|cell| {
                let neighbors = dungeon
                    .grid
                    .neighbors(cell.position())
                    .into_iter()
                    .filter_map(|pos| dungeon.room_at(pos))
                    .collect();
                (cell.room(), neighbors)
            })
            .collect();

        for (room_id, neighbors) in links {
            let components: BTreeSet<ComponentId> = neighbors
                .iter()
                .filter_map(|neighbor| dungeon.component_of(*neighbor))
                .collect();
            if let Some(room) = dungeon.rooms.get_mut(room_id) {
                room.adjacent_to = neighbors;
                let component_id = room.component;
                if let Some(component) = dungeon.components.get_mut(component_id) {
                    component.adjacent_to = components;
                }
            }
        }

        self.phase = BuildPhase::AdjacencyComputed;
    }

    fn merge_or_link_rooms(
        &mut self,
        dungeon: &mut Dungeon,
        sampler: &mut Sampler,
    ) -> WarrenResult<()> {
        let first = sampler.pick_from(dungeon.component_ids())?;
        let bordering = dungeon
            .component(first)
            .map(|component| component.adjacent_to().iter().copied())
            .into_iter()
            .flatten();
        let second = sampler.pick_from(bordering)?;

        self.connect_components(dungeon, first, second, sampler)
    }

    fn connect_components(
        &mut self,
        dungeon: &mut Dungeon,
        first: ComponentId,
        second: ComponentId,
        sampler: &mut Sampler,
    ) -> WarrenResult<()> {
        debug!("Picked {first:?} and {second:?}");
        let in_second = |room: &RoomId| dungeon.component_of(*room) == Some(second);

        let rooms: Vec<RoomId> = dungeon
            .component(first)
            .map(|component| component.rooms().iter().copied().collect())
            .unwrap_or_default();
        let room_a = *sampler.pick_where(&rooms, |room| {
            dungeon
                .room(*room)
                .is_some_and(|room| room.adjacent_to().iter().any(in_second))
        })?;
        let room_b = sampler.pick_from(
            dungeon
                .live_room(room_a)?
                .adjacent_to()
                .iter()
                .copied()
                .filter(in_second),
        )?;

        self.link_rooms(dungeon, room_a, room_b, sampler)
    }

    fn link_rooms(
        &mut self,
        dungeon: &mut Dungeon,
        room_a: RoomId,
        room_b: RoomId,
        sampler: &mut Sampler,
    ) -> WarrenResult<()> {
        let size_a = dungeon.live_room(room_a)?.size();
        let size_b = dungeon.live_room(room_b)?.size();

        match self.decide(size_a, size_b) {
            LinkDecision::Link => {
                dungeon.add_door(room_a, room_b, sampler)?;
                self.report.links += 1;
            }
            LinkDecision::Merge => {
                let merged = dungeon.merge_rooms(room_a, room_b)?;
                let size = dungeon.live_room(merged)?.size();
                self.report.merges += 1;
                self.report.largest_merged_room = self.report.largest_merged_room.max(size);
            }
        }
        Ok(())
    }
}

impl Generator<Dungeon> for DungeonBuilder {
    fn generate(&mut self, sampler: &mut Sampler) -> WarrenResult<Dungeon> {
        self.construct_dungeon(sampler)
    }

    fn validate(&self, dungeon: &Dungeon) -> WarrenResult<()> {
        dungeon.check_consistency()?;
        dungeon.check_connected()
    }

    fn generator_type(&self) -> &'static str {
        "DungeonBuilder"
    }
}
