use crate::driver::FrameDriver;
use crate::time::TimeSource;
use client::RenderSink;
use log::{debug, info};
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Drives `driver` from a fixed-rate timer until `frames` frames have run,
/// or forever when `frames` is `None`.
///
/// Frame deltas come from `time`, so a late timer tick shows up as a longer
/// frame rather than as extra frames.
pub async fn run_realtime(
    driver: &mut FrameDriver,
    time: &mut dyn TimeSource,
    sink: &mut dyn RenderSink,
    fps: f64,
    frames: Option<u64>,
) {
    let mut frame_timer = interval(Duration::from_secs_f64(1.0 / fps.max(1.0)));
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Frame loop running at {} fps", fps);

    let mut ran = 0u64;
    while frames.map_or(true, |limit| ran < limit) {
        frame_timer.tick().await;
        let report = driver.frame(time, sink);
        ran += 1;

        if let Some(tick) = report.sent_tick {
            debug!("Frame {}: server sent tick {}", ran, tick);
        }
    }

    info!("Frame loop finished after {} frames", ran);
}
