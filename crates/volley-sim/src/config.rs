//! Simulation configuration and viewport geometry.

/// The local drawing area, in pixels.
///
/// Each client simulates/mirrors in its own pixel space and
/// normalizes against this when producing or consuming wire frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Tunables for the paddle-and-ball simulation.
///
/// Defaults reproduce the classic feel: 12×120 px paddles, an 8 px
/// ball, serves at 1/100th of the viewport width per frame (bounded),
/// and rallies that speed up 5% per paddle hit. Velocities are in
/// pixels per second; the frame-rate-ish constants below are already
/// converted from a 60 Hz reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Paddle thickness in pixels. Also the x-coordinate of each
    /// paddle's hitting face (left face at `paddle_width`, right at
    /// `viewport.width - paddle_width`).
    pub paddle_width: f64,

    /// Paddle length in pixels. A paddle's vertical track is
    /// `viewport.height - paddle_height`, which is what normalized
    /// paddle positions are fractions of.
    pub paddle_height: f64,

    /// Ball radius in pixels; doubles as the wall collision margin.
    pub ball_radius: f64,

    /// Horizontal speed multiplier applied on every paddle bounce.
    /// Strictly greater than 1 — rallies accelerate by design, the
    /// reflection is deliberately energy-non-conserving.
    pub bounce_multiplier: f64,

    /// Maximum magnitude of the random vertical perturbation added on
    /// a paddle bounce (px/s). Adds unpredictability; intentionally
    /// not a physically exact reflection.
    pub spin_jitter: f64,

    /// Serve speed as a fraction of viewport width per second.
    pub serve_speed_per_width: f64,

    /// Lower bound on serve speed (px/s).
    pub min_serve_speed: f64,

    /// Upper bound on serve speed (px/s).
    pub max_serve_speed: f64,

    /// Maximum integration step in seconds. Larger `dt` values (e.g.
    /// after a render stall) are clamped to this so the ball cannot
    /// tunnel through a paddle in one step.
    pub max_step: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            paddle_width: 12.0,
            paddle_height: 120.0,
            ball_radius: 8.0,
            bounce_multiplier: 1.05,
            spin_jitter: 60.0,
            serve_speed_per_width: 0.6,
            min_serve_speed: 360.0,
            max_serve_speed: 720.0,
            max_step: 0.05,
        }
    }
}

impl SimConfig {
    /// The serve speed for a given viewport, bounded to
    /// `[min_serve_speed, max_serve_speed]`.
    pub fn serve_speed(&self, view: &Viewport) -> f64 {
        (view.width * self.serve_speed_per_width)
            .clamp(self.min_serve_speed, self.max_serve_speed)
    }
}
