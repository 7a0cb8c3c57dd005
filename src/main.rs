//! Pixel Racer entry point
//!
//! On the web this mounts the game on `#canvas`. Natively there is no window;
//! the binary runs the game headless under the autopilot, which is handy for
//! checking a tuning file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // a host page may already have installed a logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Pixel Racer starting...");

    let handle = pixel_racer::platform::web::mount_game("canvas".to_string()).await?;
    // the page owns the game for its whole lifetime
    std::mem::forget(handle);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pixel_racer::persistence::MemoryStore;
    use pixel_racer::platform::{FrameDriver, ManualScheduler};
    use pixel_racer::sim::{Controls, autopilot};
    use pixel_racer::{GameSession, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// What a headless run achieved
    pub struct RunSummary {
        pub frames: u32,
        pub meters: f64,
        pub best: f64,
        pub top_speed: f32,
    }

    /// Press and release the keys that produce `controls`
    fn drive(session: &mut GameSession<MemoryStore>, controls: &Controls) {
        let keys = [
            ("ArrowUp", controls.accelerate),
            ("ArrowDown", controls.brake),
            ("ArrowLeft", controls.steer_left),
            ("ArrowRight", controls.steer_right),
        ];
        for (key, held) in keys {
            if held {
                session.key_down(key);
            } else {
                session.key_up(key);
            }
        }
    }

    pub fn run(tuning: Tuning, frames: u32) -> RunSummary {
        let max_step = tuning.distance.max_step;
        let mut session = GameSession::mount(MemoryStore::new(), tuning);
        let mut driver = FrameDriver::new(ManualScheduler::new(), max_step);
        driver.start();

        let mut now = 0.0;
        let mut top_speed = 0.0f32;
        let mut ran = 0;
        while ran < frames && driver.scheduler_mut().fire().is_some() {
            let controls = autopilot(session.state(), session.tuning());
            drive(&mut session, &controls);
            driver.on_frame(now, &mut session);
            now += FRAME_MS;
            ran += 1;

            top_speed = top_speed.max(session.state().vehicle.speed);
            if ran % 600 == 0 {
                log::info!(
                    "frame {}: {:.0} m at {:.1} px/s",
                    ran,
                    session.state().world.session_meters,
                    session.state().vehicle.speed
                );
            }
        }
        driver.stop();

        RunSummary {
            frames: ran,
            meters: session.state().world.session_meters,
            best: session.state().world.best_meters,
            top_speed,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use pixel_racer::Tuning;

    env_logger::init();
    log::info!("Pixel Racer (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the playable web version");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let tuning = Tuning::from_json(&json)?;
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        None => Tuning::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse()?,
        None => 60 * 60,
    };

    let summary = headless::run(tuning, frames);
    println!(
        "Drove {:.0} m in {} frames (top speed {:.1} px/s, best {:.0} m)",
        summary.meters, summary.frames, summary.top_speed, summary.best
    );
    Ok(())
}
