//! Periodic drivers for a game session
//!
//! Two threads share one `Session` behind a mutex:
//! - tick driver: one `sim::tick` per frame, cancelled permanently at game over
//! - row-descent driver: `sim::descend_rows` on a slower fixed period
//!
//! Every mutation and every snapshot read takes the same lock, so ticks,
//! descents and presentation reads never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SimError;
use crate::settings::Settings;
use crate::sim::{GameState, LaunchIntent, Snapshot, TickInput, descend_rows, tick};

/// Engine state plus the input queued for the next tick
#[derive(Debug)]
pub struct Session {
    pub state: GameState,
    pub input: TickInput,
}

/// Owns the driver threads for one session
pub struct Scheduler {
    session: Arc<Mutex<Session>>,
    stop: Arc<AtomicBool>,
    tick_period: Duration,
    descent_period: Duration,
    tick_handle: Option<JoinHandle<()>>,
    descent_handle: Option<JoinHandle<()>>,
    started: bool,
}

impl Scheduler {
    /// Wrap a session; no thread runs until `start`
    pub fn new(state: GameState, settings: &Settings) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                state,
                input: TickInput::default(),
            })),
            stop: Arc::new(AtomicBool::new(false)),
            tick_period: Duration::from_millis(settings.tick_period_ms()),
            descent_period: Duration::from_millis(settings.row_descent_ms.max(1)),
            tick_handle: None,
            descent_handle: None,
            started: false,
        }
    }

    /// Start both drivers. Only the first call has any effect.
    pub fn start(&mut self) {
        if self.started {
            log::warn!("Scheduler already started");
            return;
        }
        self.started = true;

        let session = self.session.clone();
        let stop = self.stop.clone();
        let period = self.tick_period;
        self.tick_handle = Some(thread::spawn(move || run_tick_driver(&session, &stop, period)));

        let session = self.session.clone();
        let stop = self.stop.clone();
        let period = self.descent_period;
        self.descent_handle = Some(thread::spawn(move || {
            run_descent_driver(&session, &stop, period)
        }));

        log::info!(
            "Scheduler started: tick every {:?}, rows descend every {:?}",
            self.tick_period,
            self.descent_period
        );
    }

    /// Stop both drivers and wait for them. Irreversible.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        for handle in [self.tick_handle.take(), self.descent_handle.take()]
            .into_iter()
            .flatten()
        {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("Scheduler driver thread panicked");
            }
        }
    }

    /// True while the tick driver is alive
    pub fn is_running(&self) -> bool {
        self.tick_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn is_game_over(&self) -> bool {
        lock(&self.session).state.is_game_over()
    }

    pub fn time_ticks(&self) -> u64 {
        lock(&self.session).state.time_ticks
    }

    /// Consistent copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.session).state.snapshot()
    }

    /// Run `f` against the state under the session lock
    pub fn with_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&lock(&self.session).state)
    }

    pub fn set_paddle_move_left(&self, on: bool) {
        lock(&self.session).input.move_left = on;
    }

    pub fn set_paddle_move_right(&self, on: bool) {
        lock(&self.session).input.move_right = on;
    }

    /// Position the paddle directly on the next tick (unclamped)
    pub fn set_paddle_absolute_x(&self, x: i32) {
        lock(&self.session).input.paddle_x = Some(x);
    }

    /// Queue a launch with a raw `-1 | 0 | 1` intent
    ///
    /// The intent is validated here; an invalid value queues nothing. A valid
    /// launch is dropped if the ball is already in flight.
    pub fn launch_ball(&self, movement: i32) -> Result<(), SimError> {
        let intent = LaunchIntent::try_from(movement)?;
        let mut session = lock(&self.session);
        if session.state.ball.launched {
            log::warn!("Launch ignored: ball already in flight");
            return Ok(());
        }
        session.input.launch = Some(intent);
        Ok(())
    }

    /// Queue a launch with a random intent (pointer click)
    pub fn launch_ball_random(&self) {
        let mut session = lock(&self.session);
        if !session.state.ball.launched {
            session.input.launch_random = true;
        }
    }

    /// Queue a launch in the direction the paddle is held (space bar)
    pub fn launch_ball_from_paddle(&self) {
        let mut session = lock(&self.session);
        if !session.state.ball.launched {
            session.input.launch_from_paddle = true;
        }
    }

    pub fn set_idle_mode(&self, on: bool) {
        lock(&self.session).input.idle_mode = on;
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    match session.lock() {
        Ok(guard) => guard,
        Err(e) => {
            log::error!("Session lock poisoned: {e}");
            e.into_inner()
        }
    }
}

/// Sleep for `period` unless stopped first. Returns false if stopped.
fn wait(stop: &AtomicBool, period: Duration) -> bool {
    let deadline = Instant::now() + period;
    loop {
        if stop.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::park_timeout(deadline - now);
    }
}

fn run_tick_driver(session: &Mutex<Session>, stop: &AtomicBool, period: Duration) {
    loop {
        {
            let mut guard = lock(session);
            let Session { state, input } = &mut *guard;
            tick(state, input);
            input.clear_one_shot();

            if state.is_game_over() {
                log::info!("Tick driver cancelled at tick {}", state.time_ticks);
                return;
            }
        }

        if !wait(stop, period) {
            return;
        }
    }
}

fn run_descent_driver(session: &Mutex<Session>, stop: &AtomicBool, period: Duration) {
    loop {
        {
            let mut guard = lock(session);
            if guard.state.is_game_over() {
                log::info!("Row-descent driver stopped at game over");
                return;
            }
            descend_rows(&mut guard.state);
        }

        if !wait(stop, period) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Block, GamePhase};
    use glam::{IVec2, Vec2};

    fn fast_settings() -> Settings {
        Settings {
            frame_rate: 200,
            row_descent_ms: 60_000,
            ..Settings::default()
        }
    }

    /// Poll `cond` for up to two seconds
    fn eventually(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    #[test]
    fn test_nothing_runs_before_start() {
        let settings = fast_settings();
        let scheduler = Scheduler::new(GameState::new(&settings), &settings);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(scheduler.time_ticks(), 0);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.snapshot().blocks[0].y, 90);
    }

    #[test]
    fn test_ticks_advance_and_stop() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();
        assert!(eventually(|| scheduler.time_ticks() >= 3));
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
        let ticks = scheduler.time_ticks();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(scheduler.time_ticks(), ticks);
    }

    #[test]
    fn test_descent_fires_on_start_and_stop_is_prompt() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();
        assert!(eventually(|| scheduler.snapshot().blocks[0].y == 90 + 32));

        let begin = Instant::now();
        scheduler.stop();
        assert!(begin.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_descent_repeats_on_its_own_period() {
        let settings = Settings {
            frame_rate: 50,
            row_descent_ms: 20,
            ..Settings::default()
        };
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();
        assert!(eventually(|| scheduler.snapshot().blocks[0].y >= 90 + 3 * 32));
        scheduler.stop();
    }

    #[test]
    fn test_game_over_cancels_tick_driver() {
        let settings = fast_settings();
        let mut state = GameState::new(&settings);
        state.lives = 1;
        state.ball.launched = true;
        state.ball.pos = Vec2::new(100.0, 580.0);
        state.ball.direction = IVec2::new(1, 1);

        let mut scheduler = Scheduler::new(state, &settings);
        scheduler.start();
        assert!(eventually(|| scheduler.is_game_over()));
        assert!(eventually(|| !scheduler.is_running()));

        let frozen = scheduler.snapshot();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(scheduler.snapshot(), frozen);
        scheduler.stop();
    }

    #[test]
    fn test_no_descent_after_game_over() {
        let settings = Settings {
            row_descent_ms: 10,
            ..fast_settings()
        };
        let mut state = GameState::with_blocks(&settings, vec![Block::new(100, 100)]);
        state.phase = GamePhase::GameOver;

        let mut scheduler = Scheduler::new(state, &settings);
        scheduler.start();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(scheduler.with_state(|s| s.blocks[0].pos.y), 100);
        assert_eq!(scheduler.time_ticks(), 0);
        scheduler.stop();
    }

    #[test]
    fn test_launch_through_scheduler() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);

        assert_eq!(scheduler.launch_ball(3), Err(SimError::InvalidLaunchIntent(3)));
        scheduler.start();
        thread::sleep(Duration::from_millis(20));
        assert!(!scheduler.snapshot().ball.launched);

        scheduler.launch_ball(1).unwrap();
        assert!(eventually(|| scheduler.snapshot().ball.launched));
        assert_eq!(scheduler.with_state(|s| s.ball.direction.x), 1);
        scheduler.stop();
    }

    #[test]
    fn test_random_launch_through_scheduler() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();

        scheduler.launch_ball_random();
        assert!(eventually(|| scheduler.snapshot().ball.launched));
        let direction = scheduler.with_state(|s| s.ball.direction);
        assert_eq!(direction.y, -1);
        assert!((-1..=1).contains(&direction.x));
        scheduler.stop();
    }

    #[test]
    fn test_space_launch_uses_held_direction() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.set_paddle_move_left(true);
        scheduler.launch_ball_from_paddle();
        scheduler.start();

        assert!(eventually(|| scheduler.snapshot().ball.launched));
        assert_eq!(scheduler.with_state(|s| s.ball.direction), IVec2::new(-1, -1));
        scheduler.stop();
    }

    #[test]
    fn test_paddle_input_through_scheduler() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();

        scheduler.set_paddle_absolute_x(120);
        assert!(eventually(|| scheduler.snapshot().paddle.x == 120));

        scheduler.set_paddle_move_left(true);
        assert!(eventually(|| scheduler.snapshot().paddle.x < 120));
        scheduler.set_paddle_move_left(false);
        scheduler.stop();

        let snap = scheduler.snapshot();
        assert_eq!(snap.ball.x, (snap.paddle.x + 50) as f32 - 5.0);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let settings = fast_settings();
        let mut scheduler = Scheduler::new(GameState::new(&settings), &settings);
        scheduler.start();
        scheduler.start();
        assert!(eventually(|| scheduler.time_ticks() > 0));
        scheduler.stop();
        // Stopped schedulers never restart
        scheduler.start();
        assert!(!scheduler.is_running());
    }
}
