//! Frame scheduling and the per-frame driver
//!
//! The display refresh is an external primitive: register a callback once,
//! it fires once, re-register for the next frame. `FrameDriver` owns the one
//! outstanding handle, the running flag, the frame clock and the pause state.
//! Stopping (explicitly or by drop) cancels the outstanding handle exactly
//! once, so no callback is left pending after teardown.

use thiserror::Error;

use super::time::FrameClock;
use crate::persistence::KeyValueStore;
use crate::session::GameSession;
use crate::sim::PauseState;

/// Identifier of a pending display-refresh callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("could not schedule the next frame: {0}")]
    Request(String),
}

/// Register-once, fire-once, cancellable display-refresh scheduling
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, SchedulerError>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> Result<FrameHandle, SchedulerError> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}

/// Scheduler driven by hand: the owner decides when the pending frame fires
///
/// Used by the native headless run and by tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    outstanding: Option<FrameHandle>,
    requested: u32,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, as the display refresh would
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.outstanding.take()
    }

    pub fn outstanding(&self) -> Option<FrameHandle> {
        self.outstanding
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, SchedulerError> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.outstanding = Some(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
        }
        self.cancelled.push(handle);
    }
}

/// Per-frame loop: clock, pause state machine, step, render, reschedule
pub struct FrameDriver<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    running: bool,
    clock: FrameClock,
    pause: PauseState,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(scheduler: S, max_step: f32) -> Self {
        Self {
            scheduler,
            pending: None,
            running: false,
            clock: FrameClock::new(max_step),
            pause: PauseState::Running,
        }
    }

    /// Begin scheduling frames; no-op when already running
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.clock.reset();
        self.schedule_next();
    }

    /// Stop the loop and cancel the outstanding frame; safe to call repeatedly
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause
    }

    pub fn toggle_pause(&mut self) -> PauseState {
        self.pause = self.pause.toggled();
        log::info!("Pause state: {:?}", self.pause);
        self.pause
    }

    pub fn set_paused(&mut self, paused: bool) {
        let next = if paused {
            PauseState::Paused
        } else {
            PauseState::Running
        };
        if next != self.pause {
            self.pause = next;
            log::info!("Pause state: {:?}", self.pause);
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Handle one display refresh at `now_ms`
    ///
    /// Returns false (and does nothing) once the driver is stopped.
    pub fn on_frame<K: KeyValueStore>(&mut self, now_ms: f64, session: &mut GameSession<K>) -> bool {
        if !self.running {
            return false;
        }
        // the handle that brought us here has fired
        self.pending = None;

        let dt = self.clock.tick(now_ms);
        let controls = session.sample_controls();
        if controls.toggle_pause {
            self.toggle_pause();
        }
        if !self.pause.is_paused() {
            session.step(&controls, dt);
        }
        session.render(self.pause);

        self.schedule_next();
        true
    }

    fn schedule_next(&mut self) {
        match self.scheduler.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(e) => {
                log::error!("Frame loop halted: {}", e);
                self.running = false;
            }
        }
    }
}

impl<S: FrameScheduler> Drop for FrameDriver<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::tuning::Tuning;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn session() -> GameSession<MemoryStore> {
        GameSession::mount(MemoryStore::new(), Tuning::default())
    }

    /// Fire pending frames until `frames` have run
    fn run<S: FrameScheduler>(
        driver: &mut FrameDriver<S>,
        fire: impl Fn(&mut S) -> bool,
        session: &mut GameSession<MemoryStore>,
        now_ms: &mut f64,
        frames: u32,
    ) {
        for _ in 0..frames {
            assert!(fire(driver.scheduler_mut()), "no frame was pending");
            *now_ms += FRAME_MS;
            assert!(driver.on_frame(*now_ms, session));
        }
    }

    fn fire_manual(s: &mut ManualScheduler) -> bool {
        s.fire().is_some()
    }

    #[test]
    fn test_start_registers_one_frame_and_reregisters() {
        let mut driver = FrameDriver::new(ManualScheduler::new(), 0.033);
        let mut session = session();
        let mut now = 0.0;

        driver.start();
        driver.start();
        assert_eq!(driver.scheduler().requested(), 1);

        run(&mut driver, fire_manual, &mut session, &mut now, 5);
        assert_eq!(driver.scheduler().requested(), 6);
        assert!(driver.scheduler().outstanding().is_some());
    }

    #[test]
    fn test_stop_cancels_exactly_once() {
        let mut driver = FrameDriver::new(ManualScheduler::new(), 0.033);
        let mut session = session();
        let mut now = 0.0;
        driver.start();
        run(&mut driver, fire_manual, &mut session, &mut now, 3);

        let pending = driver.scheduler().outstanding();
        driver.stop();
        driver.stop();
        assert_eq!(driver.scheduler().cancelled(), &[pending.unwrap()]);
        assert!(driver.scheduler().outstanding().is_none());

        // a stale callback after teardown does nothing
        let before = session.state().clone();
        assert!(!driver.on_frame(now + FRAME_MS, &mut session));
        assert_eq!(session.state(), &before);
        assert!(driver.scheduler().outstanding().is_none());
    }

    #[test]
    fn test_drop_cancels_outstanding_frame() {
        let mut scheduler = ManualScheduler::new();
        {
            let mut driver = FrameDriver::new(&mut scheduler, 0.033);
            driver.start();
        }
        assert_eq!(scheduler.cancelled().len(), 1);
        assert!(scheduler.outstanding().is_none());
    }

    #[test]
    fn test_pause_key_freezes_simulation() {
        let mut driver = FrameDriver::new(ManualScheduler::new(), 0.033);
        let mut session = session();
        let mut now = 0.0;
        driver.start();

        session.key_down("ArrowUp");
        run(&mut driver, fire_manual, &mut session, &mut now, 20);
        assert!(session.state().vehicle.speed > 0.0);

        session.key_down(" ");
        run(&mut driver, fire_manual, &mut session, &mut now, 1);
        assert_eq!(driver.pause_state(), PauseState::Paused);

        let frozen = session.state().clone();
        let frame = session.framebuffer().clone();
        run(&mut driver, fire_manual, &mut session, &mut now, 10);
        assert_eq!(session.state(), &frozen);
        assert_eq!(session.framebuffer(), &frame);

        // holding space does not unpause; a fresh press does
        session.key_down(" ");
        run(&mut driver, fire_manual, &mut session, &mut now, 1);
        assert_eq!(driver.pause_state(), PauseState::Paused);
        session.key_up(" ");
        session.key_down("Escape");
        run(&mut driver, fire_manual, &mut session, &mut now, 2);
        assert_eq!(driver.pause_state(), PauseState::Running);
        assert!(session.state().world.distance_travelled > frozen.world.distance_travelled);
    }

    #[test]
    fn test_explicit_pause_is_idempotent() {
        let mut driver = FrameDriver::new(ManualScheduler::new(), 0.033);
        driver.set_paused(true);
        driver.set_paused(true);
        assert_eq!(driver.pause_state(), PauseState::Paused);
        assert_eq!(driver.toggle_pause(), PauseState::Running);
    }

    #[test]
    fn test_stall_is_clamped_to_max_step() {
        let mut driver = FrameDriver::new(ManualScheduler::new(), 0.033);
        let mut session = session();
        driver.start();
        session.key_down("w");

        driver.scheduler_mut().fire();
        driver.on_frame(0.0, &mut session);
        driver.scheduler_mut().fire();
        // ten seconds in a background tab
        driver.on_frame(10_000.0, &mut session);

        let tuning = Tuning::default();
        let max_speed_gain = tuning.vehicle.accel * 0.033 + 1e-4;
        assert!(session.state().vehicle.speed <= max_speed_gain);
    }

    struct FailingScheduler;

    impl FrameScheduler for FailingScheduler {
        fn request_frame(&mut self) -> Result<FrameHandle, SchedulerError> {
            Err(SchedulerError::Request("no display".to_string()))
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {}
    }

    #[test]
    fn test_scheduling_failure_halts_loop() {
        let mut driver = FrameDriver::new(FailingScheduler, 0.033);
        driver.start();
        assert!(!driver.is_running());
    }
}
