//! Snapshot buffer with time-bracketed interpolation
//!
//! Snapshots are kept strictly ascending by tick. For a fractional render
//! target the buffer finds the pair (prev, next) with
//! `prev.tick <= target < next.tick` and blends their positions. Entries
//! older than `prev` are no longer reachable and are dropped by [`SnapshotBuffer::trim`].

use shared::{lerp_position, Position, Snapshot};
use std::collections::VecDeque;

/// The pair of buffered snapshots enclosing a render target.
#[derive(Debug, Clone, Copy)]
pub struct Bracket<'a> {
    /// Latest snapshot at or before the target, if any.
    pub prev: Option<&'a Snapshot>,
    /// Earliest snapshot strictly after the target, if any.
    pub next: Option<&'a Snapshot>,
    next_index: usize,
}

impl Bracket<'_> {
    /// Interpolation factor for `target`, when both ends are present.
    pub fn alpha(&self, target: f64) -> Option<f64> {
        let (prev, next) = (self.prev?, self.next?);
        let span = (next.tick - prev.tick) as f64;
        Some(1.0 - (next.tick as f64 - target) / span)
    }
}

/// Result of sampling the buffer at a render target.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Interpolated { alpha: f64, positions: Vec<Position> },
    /// No snapshot at or before the target yet.
    InsufficientHistory,
    /// No snapshot after the target; rendering has caught up with the data.
    Starved,
}

/// Blends two position lists entity by entity.
///
/// `next` decides the entity set: entities missing from `prev` are taken
/// from `next` unchanged.
pub fn interpolate_positions(prev: &[Position], next: &[Position], alpha: f32) -> Vec<Position> {
    next.iter()
        .enumerate()
        .map(|(index, &to)| match prev.get(index) {
            Some(&from) => lerp_position(from, to, alpha),
            None => to,
        })
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct SnapshotBuffer {
    snapshots: VecDeque<Snapshot>,
}

impl SnapshotBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot newer than every buffered one.
    ///
    /// Returns `false` and leaves the buffer untouched otherwise, so the
    /// buffer stays strictly ascending.
    pub fn push(&mut self, snapshot: Snapshot) -> bool {
        if let Some(newest) = self.snapshots.back() {
            if snapshot.tick <= newest.tick {
                return false;
            }
        }
        self.snapshots.push_back(snapshot);
        true
    }

    /// Index of the first snapshot with `tick > target`.
    fn next_index(&self, target: f64) -> usize {
        self.snapshots
            .partition_point(|snapshot| snapshot.tick as f64 <= target)
    }

    pub fn bracket(&self, target: f64) -> Bracket<'_> {
        let next_index = self.next_index(target);
        let prev = match next_index {
            0 => None,
            index => self.snapshots.get(index - 1),
        };
        Bracket {
            prev,
            next: self.snapshots.get(next_index),
            next_index,
        }
    }

    /// Interpolated entity positions at `target`. Does not modify the buffer.
    pub fn sample(&self, target: f64) -> Sample {
        let bracket = self.bracket(target);
        match (bracket.prev, bracket.next) {
            (_, None) => Sample::Starved,
            (None, Some(_)) => Sample::InsufficientHistory,
            (Some(prev), Some(next)) => {
                let alpha = bracket.alpha(target).unwrap_or(0.0);
                Sample::Interpolated {
                    alpha,
                    positions: interpolate_positions(
                        &prev.entity_positions,
                        &next.entity_positions,
                        alpha as f32,
                    ),
                }
            }
        }
    }

    /// Drops every snapshot older than the bracket's `prev` for `target`.
    ///
    /// Returns the number of snapshots removed.
    pub fn trim(&mut self, target: f64) -> usize {
        let bracket = self.bracket(target);
        let keep_from = bracket.next_index.saturating_sub(1);
        self.snapshots.drain(..keep_from);
        keep_from
    }

    pub fn newest_tick(&self) -> Option<u64> {
        self.snapshots.back().map(|snapshot| snapshot.tick)
    }

    pub fn oldest_tick(&self) -> Option<u64> {
        self.snapshots.front().map(|snapshot| snapshot.tick)
    }

    pub fn ticks(&self) -> Vec<u64> {
        self.snapshots.iter().map(|snapshot| snapshot.tick).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
