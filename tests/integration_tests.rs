//! Integration tests for the snapshot interpolation pipeline
//!
//! These tests drive the server, the simulated links and the clients together
//! and check the behaviour that only shows up across crate boundaries.

use assert_approx_eq::assert_approx_eq;
use client::{ClientGameState, FrameOutcome, RecordingSink, Sample, SnapshotBuffer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use server::{Ball, GameState, Server};
use shared::{
    ConfigError, NetworkConditions, Position, SeededRandom, SimulatedTransport, SimulationConfig,
    Snapshot,
};
use sim::{run_realtime, FrameDriver, SystemTimeSource};

const FRAME: f64 = 1.0 / 60.0;

fn snapshot(tick: u64, x: f32, y: f32) -> Snapshot {
    Snapshot::new(tick, vec![Position::new(x, y)])
}

fn config(latency_ms: f64, jitter_ms: f64, packet_loss: f64) -> SimulationConfig {
    SimulationConfig {
        tick_rate_hz: 20.0,
        latency_ms,
        jitter_ms,
        packet_loss,
        interpolation_delay_ticks: 2.0,
    }
}

fn seeded_driver(config: SimulationConfig, clients: usize, seed: u64) -> FrameDriver {
    FrameDriver::new(config, 6, clients, Box::new(SeededRandom::new(seed)))
        .expect("valid simulation setup")
}

/// REFERENCE SCENARIOS
mod scenario_tests {
    use super::*;

    /// A snapshot from tick 10 over a 60ms, jitter-free, lossless link
    /// arrives after exactly 30ms
    #[test]
    fn snapshot_arrives_after_half_latency() {
        let mut world = GameState::new();
        world.add_ball(Ball::new(Position::new(0.5, 0.5), 0.2, -0.1));
        let mut server = Server::new(20.0, world).unwrap();
        let mut links = vec![SimulatedTransport::new()];
        let mut rng = SeededRandom::new(1);

        let mut sent = None;
        while sent.is_none() {
            if let Some(snapshot) = server.update(0.01) {
                if snapshot.tick == 10 {
                    sent = Some(snapshot);
                }
            }
        }
        let sent = sent.unwrap();
        server.broadcast(&sent, &mut links, &NetworkConditions::perfect(60.0), &mut rng);

        let link = &mut links[0];
        assert_approx_eq!(link.in_flight()[0].time_remaining(), 0.03, 1e-12);

        let mut delivered = Vec::new();
        link.advance(0.02, |snapshot| delivered.push(snapshot));
        assert!(delivered.is_empty());
        assert_approx_eq!(link.in_flight()[0].time_remaining(), 0.01, 1e-12);

        let mut fresh = SimulatedTransport::new();
        fresh.send(&sent, &NetworkConditions::perfect(60.0), &mut rng);
        fresh.advance(0.03, |snapshot| delivered.push(snapshot));
        assert_eq!(delivered, vec![sent]);
    }

    /// Total packet loss leaves the buffer empty and the clock paused
    #[test]
    fn total_loss_keeps_clock_paused() {
        let mut driver = seeded_driver(config(100.0, 20.0, 1.0), 1, 2);
        let mut sink = RecordingSink::new();

        for _ in 0..300 {
            let report = driver.step(FRAME, &mut sink);
            assert_eq!(report.delivered, 0);
            assert_eq!(report.outcomes, vec![FrameOutcome::Paused]);
        }

        let client = &driver.clients()[0];
        assert!(client.buffer().is_empty());
        assert!(client.clock().is_paused());
        assert!(client.interpolated_positions().is_empty());
    }

    /// Target 6 between (5, (0,0)) and (7, (10,10)) gives alpha 0.5 and (5,5)
    #[test]
    fn midpoint_between_buffered_snapshots() {
        let mut buffer = SnapshotBuffer::new();
        buffer.push(snapshot(5, 0.0, 0.0));
        buffer.push(snapshot(7, 10.0, 10.0));

        match buffer.sample(6.0) {
            Sample::Interpolated { alpha, positions } => {
                assert_approx_eq!(alpha, 0.5, 1e-12);
                assert_eq!(positions, vec![Position::new(5.0, 5.0)]);
            }
            other => panic!("expected interpolation, got {:?}", other),
        }
    }

    /// With only (7, (10,10)) buffered, target 6 has no history: nothing
    /// updates and nothing fails
    #[test]
    fn missing_history_is_not_an_error() {
        let mut buffer = SnapshotBuffer::new();
        buffer.push(snapshot(7, 10.0, 10.0));

        assert!(buffer.bracket(6.0).prev.is_none());
        assert_eq!(buffer.sample(6.0), Sample::InsufficientHistory);

        let mut client = ClientGameState::new(0.05, 1.0);
        client.update(0.0);
        client.receive(snapshot(7, 10.0, 10.0));
        assert_eq!(client.update(0.0), FrameOutcome::InsufficientHistory);
        assert!(client.interpolated_positions().is_empty());
        assert_eq!(client.buffer().ticks(), vec![7]);
    }

    /// A paused clock snaps to the first accepted tick
    #[test]
    fn paused_clock_resumes_at_accepted_tick() {
        let mut client = ClientGameState::new(0.05, 2.0);
        assert_eq!(client.update(FRAME), FrameOutcome::Paused);

        assert!(client.receive(snapshot(42, 0.3, 0.7)));

        let clock = client.clock_state();
        assert_eq!(clock.tick, 42);
        assert_eq!(clock.accumulator, 0.0);
        assert!(!clock.paused);
    }
}

/// PROPERTIES OVER RANDOM DELIVERY ORDERS
mod property_tests {
    use super::*;

    fn shuffled_deliveries(rng: &mut StdRng) -> Vec<u64> {
        let mut ticks: Vec<u64> = (0..60).collect();
        ticks.shuffle(rng);
        // duplicates as well as reordering
        let extra: Vec<u64> = (0..15).map(|_| rng.gen_range(0..60)).collect();
        ticks.extend(extra);
        ticks
    }

    #[test]
    fn last_accepted_tick_never_decreases() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let mut client = ClientGameState::new(0.05, 2.0);
            let mut previous = None;

            for tick in shuffled_deliveries(&mut rng) {
                client.receive(snapshot(tick, 0.0, 0.0));
                assert!(client.last_accepted_tick() >= previous);
                previous = client.last_accepted_tick();
                client.update(rng.gen_range(0.0..0.05));
            }
        }
    }

    #[test]
    fn buffer_stays_strictly_ascending() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut client = ClientGameState::new(0.05, 1.5);

        for tick in shuffled_deliveries(&mut rng) {
            client.receive(snapshot(tick, tick as f32, 0.0));
            assert_ascending(&client.buffer().ticks());

            client.update(rng.gen_range(0.0..0.08));
            assert_ascending(&client.buffer().ticks());
        }
    }

    fn assert_ascending(ticks: &[u64]) {
        assert!(
            ticks.windows(2).all(|pair| pair[0] < pair[1]),
            "buffer out of order: {:?}",
            ticks
        );
    }

    #[test]
    fn tick_duration_never_below_floor() {
        let mut rng = StdRng::seed_from_u64(29);
        let base = 0.05;
        let mut client = ClientGameState::new(base, 2.0);
        let mut server_tick = 0u64;

        for _ in 0..500 {
            // occasional large jumps ahead push the offset average up
            server_tick += rng.gen_range(1..30);
            client.receive(snapshot(server_tick, 0.0, 0.0));
            client.update(rng.gen_range(0.0..0.2));
            assert!(client.clock().tick_duration() >= 0.9 * base - 1e-12);
        }
    }

    #[test]
    fn sampling_twice_gives_same_result() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut buffer = SnapshotBuffer::new();
        for tick in (0..40).step_by(3) {
            buffer.push(snapshot(tick, rng.gen(), rng.gen()));
        }

        for _ in 0..100 {
            let target = rng.gen_range(-5.0..45.0);
            assert_eq!(buffer.sample(target), buffer.sample(target));
        }
    }
}

/// FULL PIPELINE RUNS
mod end_to_end_tests {
    use super::*;

    #[test]
    fn transport_accounts_for_every_snapshot() {
        let mut driver = seeded_driver(config(120.0, 40.0, 0.25), 3, 7);
        let mut sink = RecordingSink::new();

        for _ in 0..600 {
            driver.step(FRAME, &mut sink);
        }

        let view = driver.debug_view();
        for client in &view.clients {
            let stats = client.transport_stats;
            assert_eq!(stats.sent, view.snapshots_sent);
            assert_eq!(stats.decode_failures, 0);
            assert_eq!(
                stats.sent,
                stats.dropped + stats.delivered + client.in_flight as u64
            );
            assert_eq!(
                stats.delivered,
                client.client_stats.accepted + client.client_stats.stale_discarded
            );
        }
    }

    #[test]
    fn heavy_jitter_reorders_and_discards_stale() {
        let mut driver = seeded_driver(config(100.0, 80.0, 0.0), 1, 13);
        let mut sink = RecordingSink::new();

        for _ in 0..900 {
            driver.step(FRAME, &mut sink);
        }

        let client = &driver.debug_view().clients[0];
        assert!(client.client_stats.stale_discarded > 0);
        assert!(client.client_stats.accepted > 0);
    }

    #[test]
    fn interpolated_positions_stay_in_world() {
        let mut driver = seeded_driver(config(80.0, 10.0, 0.05), 1, 3);
        let mut sink = RecordingSink::new();

        for _ in 0..600 {
            driver.step(FRAME, &mut sink);
        }

        let interpolated_frames: Vec<_> = sink
            .frames
            .iter()
            .filter(|frame| !frame.interpolated.is_empty())
            .collect();
        assert!(!interpolated_frames.is_empty());
        for frame in interpolated_frames {
            assert_eq!(frame.interpolated.len(), 6);
            for position in &frame.interpolated {
                assert!((-1e-5..=1.0 + 1e-5).contains(&position.x));
                assert!((-1e-5..=1.0 + 1e-5).contains(&position.y));
            }
        }
    }

    #[test]
    fn recovers_after_outage() {
        let mut driver = seeded_driver(config(100.0, 0.0, 1.0), 1, 5);
        let mut sink = RecordingSink::new();

        for _ in 0..120 {
            driver.step(FRAME, &mut sink);
        }
        assert!(driver.clients()[0].clock().is_paused());

        driver.set_config(config(100.0, 0.0, 0.0)).unwrap();
        let mut resumed = false;
        let mut interpolated = false;
        for _ in 0..120 {
            let report = driver.step(FRAME, &mut sink);
            resumed |= !driver.clients()[0].clock().is_paused();
            interpolated |= matches!(report.outcomes[0], FrameOutcome::Interpolated { .. });
        }

        assert!(resumed);
        assert!(interpolated);
        let client = &driver.debug_view().clients[0];
        assert!(client.client_stats.resumes >= 1);
        assert!(client.clock.tick > 0);
    }

    #[test]
    fn clients_on_separate_links_diverge_under_loss() {
        let mut driver = seeded_driver(config(100.0, 30.0, 0.3), 2, 19);
        let mut sink = RecordingSink::new();

        for _ in 0..600 {
            driver.step(FRAME, &mut sink);
        }

        let view = driver.debug_view();
        assert_ne!(
            view.clients[0].transport_stats,
            view.clients[1].transport_stats
        );
    }

    #[test]
    fn realtime_loop_drives_the_pipeline() {
        let mut driver = seeded_driver(config(40.0, 0.0, 0.0), 1, 9);
        let mut time = SystemTimeSource::new();
        let mut sink = RecordingSink::new();

        tokio_test::block_on(run_realtime(
            &mut driver,
            &mut time,
            &mut sink,
            200.0,
            Some(40),
        ));

        let view = driver.debug_view();
        assert_eq!(view.frames, 40);
        assert_eq!(sink.frames.len(), 40);
        assert!(view.server_tick > 0);
    }
}

/// CONFIGURATION VALIDATION
mod config_tests {
    use super::*;

    #[test]
    fn rejects_each_invalid_field() {
        let cases = [
            (
                SimulationConfig {
                    tick_rate_hz: 0.0,
                    ..SimulationConfig::default()
                },
                ConfigError::InvalidTickRate(0.0),
            ),
            (config(-1.0, 0.0, 0.0), ConfigError::NegativeLatency(-1.0)),
            (config(50.0, -2.0, 0.0), ConfigError::NegativeJitter(-2.0)),
            (config(50.0, 0.0, -0.1), ConfigError::PacketLossOutOfRange(-0.1)),
            (
                SimulationConfig {
                    interpolation_delay_ticks: -1.0,
                    ..SimulationConfig::default()
                },
                ConfigError::NegativeInterpolationDelay(-1.0),
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(config(f64::NAN, 0.0, 0.0).validate().is_err());
        assert!(config(50.0, f64::INFINITY, 0.0).validate().is_err());
        assert!(config(50.0, 0.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn rejected_change_keeps_running_config() {
        let mut driver = seeded_driver(config(100.0, 20.0, 0.05), 1, 1);
        let original = *driver.config();

        assert!(driver.set_config(config(100.0, 20.0, 2.0)).is_err());
        driver.step(FRAME, &mut RecordingSink::new());

        assert_eq!(driver.config(), &original);
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert!(NetworkConditions::default().validate().is_ok());
    }
}
