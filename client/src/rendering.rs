use log::{debug, info};
use shared::Position;

/// Positions handed to a render sink for one frame. Entities are identified by
/// their index in each slice.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub client_id: usize,
    pub tick: u64,
    pub paused: bool,
    /// Positions exactly as last received from the server.
    pub raw: &'a [Position],
    /// Interpolated, clock-corrected positions.
    pub interpolated: &'a [Position],
}

impl<'a> RenderFrame<'a> {
    pub fn raw_entries(&self) -> impl Iterator<Item = (usize, Position)> + 'a {
        let raw: &'a [Position] = self.raw;
        raw.iter().copied().enumerate()
    }

    pub fn interpolated_entries(&self) -> impl Iterator<Item = (usize, Position)> + 'a {
        let interpolated: &'a [Position] = self.interpolated;
        interpolated.iter().copied().enumerate()
    }
}

/// Consumer of computed positions, called once per frame.
pub trait RenderSink {
    fn present(&mut self, frame: &RenderFrame<'_>);
}

/// Writes frames to the log, one summary line every `every` frames.
pub struct LogSink {
    every: u64,
    frames: u64,
}

impl LogSink {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }

        info!(
            "frame {} client {} tick {}{}: {} raw, {} interpolated",
            self.frames,
            frame.client_id,
            frame.tick,
            if frame.paused { " (paused)" } else { "" },
            frame.raw.len(),
            frame.interpolated.len()
        );
        for (index, position) in frame.interpolated_entries() {
            debug!("  entity {}: ({:.3}, {:.3})", index, position.x, position.y);
        }
    }
}

/// Owned copy of a presented frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub client_id: usize,
    pub tick: u64,
    pub paused: bool,
    pub raw: Vec<Position>,
    pub interpolated: Vec<Position>,
}

/// Keeps every presented frame in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<RecordedFrame>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingSink {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        self.frames.push(RecordedFrame {
            client_id: frame.client_id,
            tick: frame.tick,
            paused: frame.paused,
            raw: frame.raw.to_vec(),
            interpolated: frame.interpolated.to_vec(),
        });
    }
}
