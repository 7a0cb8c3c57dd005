use pixel_racer::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use pixel_racer::persistence::{BEST_KEY, KeyValueStore, MemoryStore};
use pixel_racer::platform::{FrameDriver, ManualScheduler};
use pixel_racer::sim::PauseState;
use pixel_racer::{GameSession, Tuning};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// A mounted screen plus a hand-fired frame loop
struct Harness {
    session: GameSession<MemoryStore>,
    driver: FrameDriver<ManualScheduler>,
    now: f64,
}

impl Harness {
    fn mount(store: MemoryStore) -> Self {
        let tuning = Tuning::default();
        let max_step = tuning.distance.max_step;
        let mut driver = FrameDriver::new(ManualScheduler::new(), max_step);
        driver.start();
        Self {
            session: GameSession::mount(store, tuning),
            driver,
            now: 0.0,
        }
    }

    fn frames(&mut self, n: u32) {
        for _ in 0..n {
            assert!(self.driver.scheduler_mut().fire().is_some());
            self.driver.on_frame(self.now, &mut self.session);
            self.now += FRAME_MS;
        }
    }

    fn unmount(mut self) -> MemoryStore {
        self.driver.stop();
        assert!(self.driver.scheduler().outstanding().is_none());
        self.session.into_store()
    }
}

#[test]
fn test_stored_best_seeds_new_session() {
    let session = GameSession::mount(MemoryStore::with_entry(BEST_KEY, "123"), Tuning::default());
    assert_eq!(session.state().world.best_meters, 123.0);
}

#[test]
fn test_garbage_best_reads_as_zero() {
    for raw in ["", "fast", "NaN", "-5", "inf"] {
        let session = GameSession::mount(MemoryStore::with_entry(BEST_KEY, raw), Tuning::default());
        assert_eq!(session.state().world.best_meters, 0.0, "stored {:?}", raw);
    }
}

#[test]
fn test_best_survives_remount() {
    let mut game = Harness::mount(MemoryStore::new());
    game.session.key_down("ArrowUp");
    game.frames(120);

    let driven = game.session.state().world.session_meters;
    assert!(driven > 0.0);
    assert_eq!(game.session.state().world.best_meters, driven);

    let store = game.unmount();
    let again = Harness::mount(store);
    assert_eq!(again.session.state().world.best_meters, driven);
    assert_eq!(again.session.state().world.session_meters, 0.0);
}

#[test]
fn test_short_run_keeps_longer_stored_best() {
    let mut game = Harness::mount(MemoryStore::with_entry(BEST_KEY, "1000"));
    game.session.key_down("w");
    game.frames(60);

    assert!(game.session.state().world.session_meters < 1000.0);
    assert_eq!(game.session.state().world.best_meters, 1000.0);
    let store = game.unmount();
    assert_eq!(store.get(BEST_KEY).unwrap().as_deref(), Some("1000"));
}

#[test]
fn test_paused_frames_are_frozen() {
    let mut game = Harness::mount(MemoryStore::new());
    game.session.key_down("ArrowUp");
    game.session.key_down("ArrowLeft");
    game.frames(30);

    game.driver.set_paused(true);
    game.frames(1);
    let state = game.session.state().clone();
    let frame = game.session.framebuffer().clone();
    assert_eq!((frame.width(), frame.height()), (LOGICAL_WIDTH, LOGICAL_HEIGHT));

    game.frames(30);
    assert_eq!(game.driver.pause_state(), PauseState::Paused);
    assert_eq!(game.session.state(), &state);
    assert_eq!(game.session.framebuffer(), &frame);

    // same state without the overlay
    game.session.render(PauseState::Running);
    assert_ne!(game.session.framebuffer(), &frame);
}

#[test]
fn test_releasing_keys_lets_car_coast_down() {
    let mut game = Harness::mount(MemoryStore::new());
    game.session.key_down("ArrowUp");
    game.frames(60);
    let cruising = game.session.state().vehicle.speed;
    assert!(cruising > 0.0);

    // window blur
    game.session.release_keys();
    game.frames(60);
    let coasting = game.session.state().vehicle.speed;
    assert!(coasting < cruising);
    assert!(coasting >= 0.0);
}

#[test]
fn test_car_stays_on_road_while_steering_hard() {
    let tuning = Tuning::default();
    let mut game = Harness::mount(MemoryStore::new());
    game.session.key_down("ArrowUp");
    game.session.key_down("ArrowRight");
    for _ in 0..300 {
        game.frames(1);
        let state = game.session.state();
        let road = pixel_racer::sim::RoadSample::at(state.world.vehicle_world_y(), &tuning.road);
        let lateral = state.vehicle.lateral;
        assert!(lateral <= road.right_edge - tuning.collision.margin + 1e-3);
        assert!(lateral >= road.left_edge + tuning.collision.margin - 1e-3);
    }
}
