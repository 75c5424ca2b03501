//! The per-player game state machine.
//!
//! [`GameClient`] is everything a client needs between the socket and
//! the screen: it produces the registration event, consumes relayed
//! server events, and (if it is the host) runs the ball. It does no
//! I/O of its own — embedders feed it events and drain the outbound
//! ones it returns.

use volley_protocol::{
    BallFrame, ClientEvent, PaddleFrame, ScoreFrame, ServerEvent,
};

use crate::ball::{self, Ball};
use crate::config::{SimConfig, Viewport};

/// Client-side state for one participant in one match.
///
/// Lifecycle: construct, send [`join`](Self::join), feed every
/// received [`ServerEvent`] to [`handle`](Self::handle). Once the
/// client [`is_running`](Self::is_running), drive it from the render
/// loop: [`move_paddle`](Self::move_paddle) on pointer input and
/// [`tick`](Self::tick) once per frame. The host (index 0) emits ball
/// and score events from `tick`; a non-host emits nothing there and
/// mirrors whatever arrives.
#[derive(Debug, Clone)]
pub struct GameClient {
    name: String,
    view: Viewport,
    cfg: SimConfig,
    running: bool,
    index: usize,
    ball: Ball,
    paddles: [f64; 2],
    score: [u32; 2],
}

impl GameClient {
    /// Creates a client that will register under `name` and render
    /// into `view`.
    pub fn new(name: impl Into<String>, view: Viewport) -> Self {
        Self::with_config(name, view, SimConfig::default())
    }

    /// Same as [`new`](Self::new) with explicit tunables.
    pub fn with_config(
        name: impl Into<String>,
        view: Viewport,
        cfg: SimConfig,
    ) -> Self {
        let ball = Ball::centered(&view);
        let paddle = (view.height - cfg.paddle_height) / 2.0;
        Self {
            name: name.into(),
            view,
            cfg,
            running: false,
            index: 0,
            ball,
            paddles: [paddle, paddle],
            score: [0, 0],
        }
    }

    /// The registration event to send as soon as the socket is up.
    pub fn join(&self) -> ClientEvent {
        ClientEvent::SetUsername {
            name: self.name.clone(),
        }
    }

    /// Whether a match is in progress.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// This client's session index: 0 = left/host, 1 = right.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this client is the authoritative simulator.
    pub fn is_host(&self) -> bool {
        self.index == 0
    }

    /// Current score, `[left, right]`.
    pub fn score(&self) -> [u32; 2] {
        self.score
    }

    /// Current ball state in local pixel space.
    pub fn ball(&self) -> Ball {
        self.ball
    }

    /// A paddle's top edge in local pixels. `index` is 0 or 1.
    pub fn paddle(&self, index: usize) -> f64 {
        self.paddles[index]
    }

    /// Applies a server event to local state.
    pub fn handle(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Start { players } => self.on_start(&players),
            ServerEvent::OpponentPaddleMove(frame) => {
                self.on_opponent_paddle(frame);
            }
            ServerEvent::BallUpdate(frame) => {
                // The host is the sole simulator; a mirrored frame
                // must never overwrite its own ball.
                if !self.is_host() {
                    self.ball = Ball::from_frame(frame, &self.view);
                }
            }
            ServerEvent::Score(frame) => {
                if !self.is_host() {
                    self.score = frame.score;
                    // Host re-serves; until its next frame arrives,
                    // show the ball parked at center.
                    self.ball = Ball::centered(&self.view);
                }
            }
            ServerEvent::OpponentLeft => {
                tracing::info!(name = %self.name, "opponent left, match over");
                self.running = false;
            }
        }
    }

    fn on_start(&mut self, players: &[String; 2]) {
        // Index is derived from the position of our own name in the
        // roster. Ambiguous when both players chose the same name —
        // position() then yields 0 for both, same as the not-found
        // fallback, and both simulate. Accepted: names are labels,
        // not identity.
        self.index = players
            .iter()
            .position(|n| *n == self.name)
            .unwrap_or(0);
        self.running = true;
        self.score = [0, 0];

        tracing::info!(
            name = %self.name,
            index = self.index,
            host = self.is_host(),
            "match started"
        );

        if self.is_host() {
            ball::serve(&mut self.ball, &self.view, &self.cfg);
        } else {
            self.ball = Ball::centered(&self.view);
        }
    }

    fn on_opponent_paddle(&mut self, frame: PaddleFrame) {
        let index = usize::from(frame.index.min(1));
        // Our own paddle is driven by local input only.
        if index == self.index {
            return;
        }
        self.paddles[index] = frame.y * self.track();
    }

    /// Moves this client's paddle so its center follows `pointer_y`
    /// (local pixels), clamped to the track. Returns the frame to send
    /// to the relay, or `None` when no match is running.
    pub fn move_paddle(&mut self, pointer_y: f64) -> Option<ClientEvent> {
        if !self.running {
            return None;
        }
        let track = self.track();
        let top = (pointer_y - self.cfg.paddle_height / 2.0).clamp(0.0, track);
        self.paddles[self.index] = top;

        Some(ClientEvent::PaddleMove(PaddleFrame {
            index: self.index as u8,
            y: top / track,
        }))
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Only the host produces anything here: a `ballUpdate` every
    /// tick, plus a `score` and a fresh-serve `ballUpdate` when a
    /// goal is scored. Non-hosts always return an empty vec.
    pub fn tick(&mut self, dt: f64) -> Vec<ClientEvent> {
        if !self.running || !self.is_host() {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(2);
        let scored = ball::step(
            &mut self.ball,
            self.paddles,
            &self.view,
            &self.cfg,
            dt,
        );

        if let Some(side) = scored {
            self.score[side.index()] += 1;
            tracing::debug!(score = ?self.score, "goal");
            out.push(ClientEvent::Score(ScoreFrame { score: self.score }));
            ball::serve(&mut self.ball, &self.view, &self.cfg);
        }

        out.push(ClientEvent::BallUpdate(self.ball.to_frame(&self.view)));
        out
    }

    /// The vertical range a paddle top can occupy.
    fn track(&self) -> f64 {
        self.view.height - self.cfg.paddle_height
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn start(players: [&str; 2]) -> ServerEvent {
        ServerEvent::Start {
            players: [players[0].into(), players[1].into()],
        }
    }

    #[test]
    fn test_join_emits_set_username() {
        let client = GameClient::new("Alice", view());
        assert_eq!(
            client.join(),
            ClientEvent::SetUsername {
                name: "Alice".into()
            }
        );
    }

    #[test]
    fn test_not_running_until_start() {
        let mut client = GameClient::new("Alice", view());
        assert!(!client.is_running());
        assert!(client.move_paddle(300.0).is_none());
        assert!(client.tick(0.016).is_empty());

        client.handle(start(["Alice", "Bob"]));
        assert!(client.is_running());
    }

    #[test]
    fn test_index_derived_from_roster_position() {
        let mut first = GameClient::new("Alice", view());
        let mut second = GameClient::new("Bob", view());
        first.handle(start(["Alice", "Bob"]));
        second.handle(start(["Alice", "Bob"]));

        assert_eq!(first.index(), 0);
        assert!(first.is_host());
        assert_eq!(second.index(), 1);
        assert!(!second.is_host());
    }

    #[test]
    fn test_unknown_name_falls_back_to_index_zero() {
        let mut client = GameClient::new("Mallory", view());
        client.handle(start(["Alice", "Bob"]));
        assert_eq!(client.index(), 0);
        assert!(client.is_host());
    }

    #[test]
    fn test_host_serves_on_start_non_host_parks_at_center() {
        let mut host = GameClient::new("Alice", view());
        host.handle(start(["Alice", "Bob"]));
        assert_ne!(host.ball().vx, 0.0, "host starts with a live serve");

        let mut mirror = GameClient::new("Bob", view());
        mirror.handle(start(["Alice", "Bob"]));
        assert_eq!(mirror.ball(), Ball::centered(&view()));
    }

    #[test]
    fn test_move_paddle_centers_on_pointer_and_normalizes() {
        let mut client = GameClient::new("Bob", view());
        client.handle(start(["Alice", "Bob"]));

        // Pointer at 300 → top at 300 - 60 = 240, track is 480.
        let event = client.move_paddle(300.0).unwrap();
        assert_eq!(client.paddle(1), 240.0);
        assert_eq!(
            event,
            ClientEvent::PaddleMove(PaddleFrame {
                index: 1,
                y: 0.5
            })
        );
    }

    #[test]
    fn test_move_paddle_clamps_to_track() {
        let mut client = GameClient::new("Alice", view());
        client.handle(start(["Alice", "Bob"]));

        client.move_paddle(-500.0);
        assert_eq!(client.paddle(0), 0.0);

        client.move_paddle(5000.0);
        assert_eq!(client.paddle(0), 480.0);
    }

    #[test]
    fn test_opponent_paddle_denormalized_into_local_viewport() {
        let mut client = GameClient::new("Alice", view());
        client.handle(start(["Alice", "Bob"]));

        client.handle(ServerEvent::OpponentPaddleMove(PaddleFrame {
            index: 1,
            y: 0.5,
        }));

        // 0.5 of the local 480 px track.
        assert_eq!(client.paddle(1), 240.0);
    }

    #[test]
    fn test_opponent_frame_cannot_move_own_paddle() {
        let mut client = GameClient::new("Alice", view());
        client.handle(start(["Alice", "Bob"]));
        client.move_paddle(100.0);
        let own = client.paddle(0);

        client.handle(ServerEvent::OpponentPaddleMove(PaddleFrame {
            index: 0,
            y: 0.9,
        }));
        assert_eq!(client.paddle(0), own);
    }

    #[test]
    fn test_non_host_tick_emits_nothing() {
        let mut client = GameClient::new("Bob", view());
        client.handle(start(["Alice", "Bob"]));
        assert!(!client.is_host());
        assert!(client.tick(0.016).is_empty());
    }

    #[test]
    fn test_host_tick_emits_ball_update() {
        let mut host = GameClient::new("Alice", view());
        host.handle(start(["Alice", "Bob"]));

        let events = host.tick(0.016);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ClientEvent::BallUpdate(_)));
    }

    #[test]
    fn test_host_scores_once_per_crossing_and_reserves() {
        let mut host = GameClient::new("Alice", view());
        host.handle(start(["Alice", "Bob"]));

        // Park both paddles out of the way and aim the ball straight
        // at the left goal line.
        host.paddles = [500.0, 500.0];
        host.ball = Ball {
            x: 3.0,
            y: 100.0,
            vx: -400.0,
            vy: 0.0,
        };

        let events = host.tick(0.05);
        assert_eq!(host.score(), [0, 1]);
        assert_eq!(
            events[0],
            ClientEvent::Score(ScoreFrame { score: [0, 1] })
        );
        // Goal is followed by a fresh serve, broadcast in the same
        // batch — the ball is live at center again, not off-court.
        assert_eq!(host.ball().x, 400.0);
        assert!(matches!(events[1], ClientEvent::BallUpdate(_)));
        assert_eq!(events.len(), 2);

        // The next tick must not re-count the old crossing.
        host.tick(0.016);
        assert_eq!(host.score(), [0, 1]);
    }

    #[test]
    fn test_non_host_mirrors_ball_and_score() {
        let mut mirror = GameClient::new("Bob", view());
        mirror.handle(start(["Alice", "Bob"]));

        mirror.handle(ServerEvent::BallUpdate(BallFrame {
            x: 0.25,
            y: 0.5,
            vx: 0.1,
            vy: 0.0,
        }));
        assert_eq!(mirror.ball().x, 200.0);
        assert_eq!(mirror.ball().y, 300.0);

        mirror.handle(ServerEvent::Score(ScoreFrame { score: [2, 5] }));
        assert_eq!(mirror.score(), [2, 5]);
        // Score resets the mirrored ball to center until the host's
        // next frame lands.
        assert_eq!(mirror.ball(), Ball::centered(&view()));
    }

    #[test]
    fn test_host_ignores_mirrored_ball_frames() {
        let mut host = GameClient::new("Alice", view());
        host.handle(start(["Alice", "Bob"]));
        let before = host.ball();

        host.handle(ServerEvent::BallUpdate(BallFrame {
            x: 0.9,
            y: 0.9,
            vx: 0.0,
            vy: 0.0,
        }));
        assert_eq!(host.ball(), before);
    }

    #[test]
    fn test_opponent_left_stops_the_match() {
        let mut client = GameClient::new("Alice", view());
        client.handle(start(["Alice", "Bob"]));
        assert!(client.is_running());

        client.handle(ServerEvent::OpponentLeft);
        assert!(!client.is_running());
        assert!(client.move_paddle(300.0).is_none());
        assert!(client.tick(0.016).is_empty());
    }
}
