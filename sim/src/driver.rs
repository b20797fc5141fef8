//! The frame pipeline tying server, links and clients together

use crate::time::{FrameTimer, TimeSource};
use client::{ClientGameState, ClientStats, ClockState, FrameOutcome, RenderSink};
use log::{debug, info, warn};
use server::{GameState, Server};
use shared::{ConfigError, RandomSource, SimulatedTransport, SimulationConfig, TransportStats};

/// What one call to [`FrameDriver::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub rdt: f64,
    /// Tick of the snapshot the server dispatched this frame, if any.
    pub sent_tick: Option<u64>,
    /// Snapshots handed to clients across all links.
    pub delivered: usize,
    /// One entry per client, in client order.
    pub outcomes: Vec<FrameOutcome>,
}

/// Read-only view of one client and its link.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDebugView {
    pub id: usize,
    pub clock: ClockState,
    pub render_target: f64,
    pub last_accepted_tick: Option<u64>,
    pub buffered_ticks: Vec<u64>,
    pub in_flight: usize,
    pub client_stats: ClientStats,
    pub transport_stats: TransportStats,
}

/// Read-only view of the whole simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugView {
    pub frames: u64,
    pub config: SimulationConfig,
    pub server_tick: u64,
    pub server_tick_duration: f64,
    pub snapshots_sent: u64,
    pub clients: Vec<ClientDebugView>,
}

/// Owns every piece of the simulation and runs it one frame at a time.
///
/// Each client has its own link from the server. A frame runs the server,
/// then the links, then the clients, then presents each client.
pub struct FrameDriver {
    config: SimulationConfig,
    pending_config: Option<SimulationConfig>,
    server: Server,
    links: Vec<SimulatedTransport>,
    clients: Vec<ClientGameState>,
    rng: Box<dyn RandomSource>,
    timer: FrameTimer,
    frames: u64,
}

impl FrameDriver {
    pub fn new(
        config: SimulationConfig,
        entity_count: usize,
        client_count: usize,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if client_count == 0 {
            return Err(ConfigError::Empty("client"));
        }

        let world = GameState::with_random_balls(entity_count, rng.as_mut());
        let server = Server::new(config.tick_rate_hz, world)?;

        let links = (0..client_count).map(|_| SimulatedTransport::new()).collect();
        let clients = (0..client_count)
            .map(|id| {
                ClientGameState::new(config.tick_duration(), config.interpolation_delay_ticks)
                    .with_id(id)
            })
            .collect();

        info!(
            "Simulation ready: {} Hz, {} entities, {} clients, {}ms latency, {}ms jitter, {:.0}% loss",
            config.tick_rate_hz,
            entity_count,
            client_count,
            config.latency_ms,
            config.jitter_ms,
            config.packet_loss * 100.0
        );

        Ok(Self {
            config,
            pending_config: None,
            server,
            links,
            clients,
            rng,
            timer: FrameTimer::new(),
            frames: 0,
        })
    }

    /// Validates `config` and schedules it for the start of the next frame.
    ///
    /// An invalid configuration is rejected and the running one is kept.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.pending_config = Some(config);
        Ok(())
    }

    fn apply_pending_config(&mut self) {
        let Some(config) = self.pending_config.take() else {
            return;
        };

        if config.tick_rate_hz != self.config.tick_rate_hz {
            if let Err(e) = self.server.set_tick_rate(config.tick_rate_hz) {
                warn!("Keeping previous tick rate: {}", e);
                return;
            }
            for client in &mut self.clients {
                client.set_base_tick_duration(config.tick_duration());
            }
        }
        for client in &mut self.clients {
            client.set_interpolation_delay(config.interpolation_delay_ticks);
        }

        debug!("Applied configuration {:?}", config);
        self.config = config;
    }

    /// Runs one frame using the time source for the frame delta.
    pub fn frame(&mut self, time: &mut dyn TimeSource, sink: &mut dyn RenderSink) -> FrameReport {
        let rdt = self.timer.delta(time.now());
        self.step(rdt, sink)
    }

    /// Runs one frame of `rdt` seconds.
    pub fn step(&mut self, rdt: f64, sink: &mut dyn RenderSink) -> FrameReport {
        self.apply_pending_config();
        self.frames += 1;

        let conditions = self.config.conditions();
        let sent_tick = match self.server.update(rdt) {
            Some(snapshot) => {
                self.server
                    .broadcast(&snapshot, &mut self.links, &conditions, self.rng.as_mut());
                Some(snapshot.tick)
            }
            None => None,
        };

        let mut delivered = 0;
        for (link, client) in self.links.iter_mut().zip(self.clients.iter_mut()) {
            delivered += link.advance(rdt, |snapshot| {
                client.receive(snapshot);
            });
        }

        let mut outcomes = Vec::with_capacity(self.clients.len());
        for client in &mut self.clients {
            outcomes.push(client.update(rdt));
            sink.present(&client.render_frame());
        }

        FrameReport {
            rdt,
            sent_tick,
            delivered,
            outcomes,
        }
    }

    pub fn debug_view(&self) -> DebugView {
        let clients = self
            .clients
            .iter()
            .zip(&self.links)
            .map(|(client, link)| ClientDebugView {
                id: client.id(),
                clock: client.clock_state(),
                render_target: client.render_target(),
                last_accepted_tick: client.last_accepted_tick(),
                buffered_ticks: client.buffer().ticks(),
                in_flight: link.pending(),
                client_stats: client.stats(),
                transport_stats: link.stats(),
            })
            .collect();

        DebugView {
            frames: self.frames,
            config: self.config,
            server_tick: self.server.tick(),
            server_tick_duration: self.server.tick_duration(),
            snapshots_sent: self.server.snapshots_sent(),
            clients,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn clients(&self) -> &[ClientGameState] {
        &self.clients
    }

    pub fn links(&self) -> &[SimulatedTransport] {
        &self.links
    }
}
