use clap::Parser;
use client::LogSink;
use log::info;
use shared::{
    RandomSource, SeededRandom, SimulationConfig, DEFAULT_ENTITY_COUNT, DEFAULT_INTERPOLATION_DELAY_TICKS,
    DEFAULT_JITTER_MS, DEFAULT_LATENCY_MS, DEFAULT_PACKET_LOSS, DEFAULT_TICK_RATE_HZ,
};
use sim::{run_realtime, FrameDriver, SystemTimeSource};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Snapshot interpolation netcode simulator")]
struct Args {
    /// Server tick rate (ticks per second)
    #[clap(short, long, default_value_t = DEFAULT_TICK_RATE_HZ)]
    tick_rate: f64,
    /// Round-trip latency in milliseconds
    #[clap(short, long, default_value_t = DEFAULT_LATENCY_MS)]
    latency: f64,
    /// Uniform delay noise in milliseconds
    #[clap(short, long, default_value_t = DEFAULT_JITTER_MS)]
    jitter: f64,
    /// Probability of dropping a snapshot, from 0 to 1
    #[clap(short, long, default_value_t = DEFAULT_PACKET_LOSS)]
    packet_loss: f64,
    /// Rendering lag in ticks
    #[clap(short, long, default_value_t = DEFAULT_INTERPOLATION_DELAY_TICKS)]
    interpolation_delay: f64,
    /// Number of bouncing entities in the world
    #[clap(short, long, default_value_t = DEFAULT_ENTITY_COUNT)]
    entities: usize,
    /// Number of clients, each on its own link
    #[clap(short, long, default_value = "1")]
    clients: usize,
    /// Seed for reproducible runs
    #[clap(short, long)]
    seed: Option<u64>,
    /// Stop after this many frames (runs until Ctrl+C when omitted)
    #[clap(short, long)]
    frames: Option<u64>,
    /// Frame rate of the real-time loop
    #[clap(long, default_value = "60")]
    fps: f64,
    /// Log a frame summary every N frames
    #[clap(long, default_value = "60")]
    log_every: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = SimulationConfig {
        tick_rate_hz: args.tick_rate,
        latency_ms: args.latency,
        jitter_ms: args.jitter,
        packet_loss: args.packet_loss,
        interpolation_delay_ticks: args.interpolation_delay,
    };

    let rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            Box::new(SeededRandom::new(seed))
        }
        None => Box::new(SeededRandom::from_entropy()),
    };

    let mut driver = FrameDriver::new(config, args.entities, args.clients, rng)?;
    let mut time = SystemTimeSource::new();
    let mut sink = LogSink::new(args.log_every);

    tokio::select! {
        _ = run_realtime(&mut driver, &mut time, &mut sink, args.fps, args.frames) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    let view = driver.debug_view();
    info!(
        "Server reached tick {} after {} frames, {} snapshots sent",
        view.server_tick, view.frames, view.snapshots_sent
    );
    for client in &view.clients {
        info!(
            "Client {}: tick {}{}, last accepted {:?}, {} buffered, accepted {}, stale {}, pauses {}, dropped {}/{}",
            client.id,
            client.clock.tick,
            if client.clock.paused { " (paused)" } else { "" },
            client.last_accepted_tick,
            client.buffered_ticks.len(),
            client.client_stats.accepted,
            client.client_stats.stale_discarded,
            client.client_stats.pauses,
            client.transport_stats.dropped,
            client.transport_stats.sent
        );
    }

    Ok(())
}
