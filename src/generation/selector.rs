//! # Room Path Selection
//!
//! Grows a connected subset of rooms with a weighted random walk over doors.

use crate::{Dungeon, RoomId, Sampler, WarrenError, WarrenResult};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Read-only view of a door graph.
pub trait DoorGraph {
    /// Node handle type.
    type Node: Copy + Ord + Debug;

    /// Every node of the graph.
    fn nodes(&self) -> Vec<Self::Node>;

    /// Nodes sharing a door with `node`.
    fn door_neighbors(&self, node: Self::Node) -> Vec<Self::Node>;
}

impl DoorGraph for Dungeon {
    type Node = RoomId;

    fn nodes(&self) -> Vec<RoomId> {
        self.room_ids()
    }

    fn door_neighbors(&self, node: RoomId) -> Vec<RoomId> {
        self.room(node)
            .map(|room| room.door_to().iter().copied().collect())
            .unwrap_or_default()
    }
}

impl<N> DoorGraph for BTreeMap<N, BTreeSet<N>>
where
    N: Copy + Ord + Debug,
{
    type Node = N;

    fn nodes(&self) -> Vec<N> {
        self.keys().copied().collect()
    }

    fn door_neighbors(&self, node: N) -> Vec<N> {
        self.get(&node)
            .map(|neighbors| neighbors.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Picks a connected run of rooms through a finished dungeon.
///
/// Each step picks a source room among the picked rooms that still have an
/// unpicked door neighbour, then one of those neighbours. The `k`-th room
/// picked has weight `k`, so growth favours recently discovered rooms over the
/// first few.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomPathSelector;

impl RoomPathSelector {
    /// Creates a new selector.
    pub fn new() -> Self {
        Self
    }

    /// Selects `n` distinct rooms; every room after the first shares a door
    /// with one picked before it.
    ///
    /// Fails with [`WarrenError::Exhausted`] when no picked room has an
    /// unpicked door neighbour left, which is what happens when `n` exceeds the
    /// number of reachable rooms. Asking for zero rooms yields an empty path.
    pub fn select<G: DoorGraph>(
        &self,
        graph: &G,
        n: usize,
        sampler: &mut Sampler,
    ) -> WarrenResult<Vec<G::Node>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let exhausted = |picked: usize| WarrenError::Exhausted {
            requested: n,
            picked,
        };

        let nodes = graph.nodes();
        let first = match sampler.pick(&nodes) {
            Ok(first) => *first,
            Err(WarrenError::EmptySequence) => return Err(exhausted(0)),
            Err(error) => return Err(error),
        };

        let mut picked = vec![first];
        let mut in_path = BTreeSet::from([first]);
        // Picked rooms that may still have an unpicked door neighbour, each
        // with its weight. The k-th picked room carries weight k.
        let mut sources = vec![(first, 1)];

        while picked.len() < n {
            sources.retain(|(node, _)| {
                graph
                    .door_neighbors(*node)
                    .iter()
                    .any(|next| !in_path.contains(next))
            });
            let source = match sampler.pick_weighted(&sources, |(_, weight)| *weight) {
                Ok((source, _)) => *source,
                Err(WarrenError::EmptySequence) => return Err(exhausted(picked.len())),
                Err(error) => return Err(error),
            };

            let frontier: Vec<G::Node> = graph
                .door_neighbors(source)
                .into_iter()
                .filter(|next| !in_path.contains(next))
                .collect();
            let next = *sampler.pick(&frontier)?;

            picked.push(next);
            in_path.insert(next);
            sources.push((next, picked.len()));
        }

        debug!("Selected path of {} rooms: {picked:?}", picked.len());
        Ok(picked)
    }
}
