//! Host-side ball physics.
//!
//! Only the host runs [`step`]; everyone else mirrors the frames it
//! broadcasts. The physics is deliberately arcade-grade: reflections
//! gain speed, bounces pick up random spin, and a serve is a coin
//! flip. None of that is an accident — see the field docs on
//! [`SimConfig`](crate::SimConfig).

use rand::Rng;
use volley_protocol::BallFrame;

use crate::{SimConfig, Viewport};

/// A side of the court. `Left` is seat 0 (the host's side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The score-array index for this side.
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Ball state in the local viewport's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Ball {
    /// A motionless ball at the viewport center — the state a
    /// non-host shows between a score and the host's next frame.
    pub fn centered(view: &Viewport) -> Self {
        Self {
            x: view.width / 2.0,
            y: view.height / 2.0,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Normalizes this ball against the local viewport for the wire.
    pub fn to_frame(&self, view: &Viewport) -> BallFrame {
        BallFrame {
            x: self.x / view.width,
            y: self.y / view.height,
            vx: self.vx / view.width,
            vy: self.vy / view.height,
        }
    }

    /// Rescales a received frame into the local viewport.
    pub fn from_frame(frame: BallFrame, view: &Viewport) -> Self {
        Self {
            x: frame.x * view.width,
            y: frame.y * view.height,
            vx: frame.vx * view.width,
            vy: frame.vy * view.height,
        }
    }
}

/// Re-initializes the ball at center with a randomized serve.
///
/// Direction is a random coin flip toward either side; vertical
/// velocity is uniform in ±serve-speed; speed scales with viewport
/// width, bounded by the config.
pub fn serve(ball: &mut Ball, view: &Viewport, cfg: &SimConfig) {
    let mut rng = rand::rng();
    let speed = cfg.serve_speed(view);

    ball.x = view.width / 2.0;
    ball.y = view.height / 2.0;
    ball.vx = if rng.random_bool(0.5) { speed } else { -speed };
    ball.vy = rng.random_range(-1.0..1.0) * speed;

    tracing::debug!(vx = ball.vx, vy = ball.vy, "ball served");
}

/// Advances the ball by one step of at most `cfg.max_step` seconds.
///
/// `paddles` holds the pixel y of each paddle's top edge, left then
/// right. Returns the side that scored, if the ball crossed a goal
/// line without a paddle hit this step. The caller is responsible for
/// re-serving after a goal.
pub fn step(
    ball: &mut Ball,
    paddles: [f64; 2],
    view: &Viewport,
    cfg: &SimConfig,
    dt: f64,
) -> Option<Side> {
    let dt = dt.min(cfg.max_step);
    let r = cfg.ball_radius;

    ball.x += ball.vx * dt;
    ball.y += ball.vy * dt;

    // Top/bottom walls: clamp to the boundary and reflect.
    if ball.y < r {
        ball.y = r;
        ball.vy = -ball.vy;
    }
    if ball.y > view.height - r {
        ball.y = view.height - r;
        ball.vy = -ball.vy;
    }

    // Left paddle face.
    if ball.x - r < cfg.paddle_width {
        let py = paddles[0];
        if ball.y > py && ball.y < py + cfg.paddle_height {
            ball.x = cfg.paddle_width + r;
            bounce(ball, cfg);
        }
    }

    // Right paddle face.
    if ball.x + r > view.width - cfg.paddle_width {
        let py = paddles[1];
        if ball.y > py && ball.y < py + cfg.paddle_height {
            ball.x = view.width - cfg.paddle_width - r;
            bounce(ball, cfg);
        }
    }

    // Goal lines. A bounce above already pulled the ball back in
    // bounds, so reaching here means the paddle was missed.
    if ball.x < 0.0 {
        return Some(Side::Right);
    }
    if ball.x > view.width {
        return Some(Side::Left);
    }

    None
}

/// Reflects the ball off a paddle: flip and amplify vx, jitter vy.
fn bounce(ball: &mut Ball, cfg: &SimConfig) {
    let mut rng = rand::rng();
    ball.vx *= -cfg.bounce_multiplier;
    ball.vy += rng.random_range(-1.0..1.0) * cfg.spin_jitter;
}

// =========================================================================
// Tests
// =========================================================================
