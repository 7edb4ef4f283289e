//! # Viewer Session
//!
//! The state a viewer reads between redraws, and the two triggers it can fire:
//! regenerate the whole dungeon, or move the highlight to the next room.

use crate::generation::utils;
use crate::{
    BuildReport, Dungeon, DungeonBuilder, GenerationConfig, RoomId, RoomPathSelector, Sampler,
    ViewerInput, WarrenResult,
};
use log::info;

/// A generated dungeon together with its selected path and highlighted room.
///
/// Regeneration replaces everything at once; readers never see a
/// half-built dungeon.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    config: GenerationConfig,
    sampler: Sampler,
    dungeon: Dungeon,
    report: BuildReport,
    path: Vec<RoomId>,
    room_order: Vec<RoomId>,
    room_index: usize,
}

impl ViewerSession {
    /// Builds the first dungeon with a sampler seeded from the config.
    pub fn new(config: GenerationConfig) -> WarrenResult<Self> {
        let sampler = utils::create_sampler(&config);
        Self::with_sampler(config, sampler)
    }

    /// Builds the first dungeon drawing from the given sampler.
    pub fn with_sampler(config: GenerationConfig, mut sampler: Sampler) -> WarrenResult<Self> {
        let (dungeon, report, path) = generate(&config, &mut sampler)?;
        let room_order = dungeon.room_ids();
        Ok(Self {
            config,
            sampler,
            dungeon,
            report,
            path,
            room_order,
            room_index: 0,
        })
    }

    /// Discards the current dungeon and builds a new one.
    ///
    /// The sampler keeps running, so each regeneration gives a different
    /// layout while the whole sequence stays reproducible from the seed.
    pub fn regenerate(&mut self) -> WarrenResult<()> {
        let (dungeon, report, path) = generate(&self.config, &mut self.sampler)?;
        self.room_order = dungeon.room_ids();
        self.dungeon = dungeon;
        self.report = report;
        self.path = path;
        self.room_index = 0;
        Ok(())
    }

    /// Moves the highlight to the next room, wrapping around.
    pub fn advance_room(&mut self) {
        if !self.room_order.is_empty() {
            self.room_index = (self.room_index + 1) % self.room_order.len();
        }
    }

    /// Applies a viewer input. Returns `false` when the viewer should close.
    pub fn handle_input(&mut self, input: ViewerInput) -> WarrenResult<bool> {
        match input {
            ViewerInput::AdvanceRoom => self.advance_room(),
            ViewerInput::Regenerate => self.regenerate()?,
            ViewerInput::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// The highlighted room.
    pub fn current_room(&self) -> Option<RoomId> {
        self.room_order.get(self.room_index).copied()
    }

    /// Index of the highlighted room.
    pub fn room_index(&self) -> usize {
        self.room_index
    }

    /// Whether the room is part of the selected path.
    pub fn is_picked(&self, room: RoomId) -> bool {
        self.path.contains(&room)
    }

    /// The current dungeon.
    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    /// The selected path, in pick order.
    pub fn path(&self) -> &[RoomId] {
        &self.path
    }

    /// Counters from building the current dungeon.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Configuration every regeneration uses.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

fn generate(
    config: &GenerationConfig,
    sampler: &mut Sampler,
) -> WarrenResult<(Dungeon, BuildReport, Vec<RoomId>)> {
    let mut builder = DungeonBuilder::new(config.clone())?;
    let dungeon = builder.construct_dungeon(sampler)?;
    let length = utils::path_length(config, sampler, dungeon.room_count());
    let path = RoomPathSelector::new().select(&dungeon, length, sampler)?;
    info!(
        "Selected {} of {} rooms (seed {})",
        path.len(),
        dungeon.room_count(),
        sampler.seed()
    );
    Ok((dungeon, builder.report().clone(), path))
}
