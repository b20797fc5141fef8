use log::info;
use shared::{Position, RandomSource, Snapshot};

/// Largest speed component given to a randomly spawned ball, in units per second.
pub const MAX_BALL_SPEED: f32 = 0.5;

/// A ball bouncing inside the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Position,
    pub vel_x: f32,
    pub vel_y: f32,
}

impl Ball {
    pub fn new(position: Position, vel_x: f32, vel_y: f32) -> Self {
        Self {
            position,
            vel_x,
            vel_y,
        }
    }

    fn step(&mut self, dt: f32) {
        self.position.x += self.vel_x * dt;
        self.position.y += self.vel_y * dt;

        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.vel_x = self.vel_x.abs();
        } else if self.position.x > 1.0 {
            self.position.x = 1.0;
            self.vel_x = -self.vel_x.abs();
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.vel_y = self.vel_y.abs();
        } else if self.position.y > 1.0 {
            self.position.y = 1.0;
            self.vel_y = -self.vel_y.abs();
        }
    }
}

/// Authoritative world state.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub tick: u64,
    pub balls: Vec<Ball>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `count` balls at random positions with random velocities.
    pub fn with_random_balls(count: usize, rng: &mut dyn RandomSource) -> Self {
        let mut state = Self::new();
        for _ in 0..count {
            let position = Position::new(rng.next_unit() as f32, rng.next_unit() as f32);
            let speed = MAX_BALL_SPEED as f64;
            let vel_x = rng.uniform(-speed, speed) as f32;
            let vel_y = rng.uniform(-speed, speed) as f32;
            state.add_ball(Ball::new(position, vel_x, vel_y));
        }
        info!("Spawned {} balls", count);
        state
    }

    pub fn add_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    /// Advances the world by exactly one tick of length `dt`.
    pub fn step(&mut self, dt: f32) {
        for ball in &mut self.balls {
            ball.step(dt);
        }
        self.tick += 1;
    }

    pub fn positions(&self) -> Vec<Position> {
        self.balls.iter().map(|ball| ball.position).collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.tick, self.positions())
    }
}
