//! Mounting the game on a browser canvas
//!
//! Everything the mounted screen registers with the browser (the animation
//! frame request and every event listener) is owned by `App` and released
//! when it is torn down. Teardown runs once, whether it comes from
//! `GameHandle::unmount`, from dropping the handle, or from a failed mount.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, EventTarget, HtmlCanvasElement, KeyboardEvent, Window};

use super::scheduler::{FrameDriver, FrameHandle, FrameScheduler, SchedulerError};
use super::storage::SessionStore;
use super::viewport::fit_display;
use crate::consts::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::renderer::{PresentError, Presenter};
use crate::session::GameSession;
use crate::settings::Settings;

/// A registered DOM event listener, removed on drop
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` as a `FrameScheduler`
///
/// One closure is registered for every frame; it forwards the timestamp to
/// the app if the app is still alive.
pub struct RafScheduler {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl RafScheduler {
    fn new(window: Window, app: Weak<RefCell<App>>) -> Self {
        let callback = Closure::wrap(Box::new(move |now_ms: f64| {
            let Some(app) = app.upgrade() else {
                return;
            };
            if let Ok(mut app) = app.try_borrow_mut() {
                app.frame(now_ms);
            }
        }) as Box<dyn FnMut(f64)>);
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, SchedulerError> {
        self.window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| SchedulerError::Request(format!("{:?}", e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

/// The mounted game screen and every browser resource it holds
struct App {
    driver: FrameDriver<RafScheduler>,
    session: GameSession<SessionStore>,
    presenter: Presenter,
    window: Window,
    canvas: HtmlCanvasElement,
    settings: Settings,
    listeners: Vec<EventListener>,
    mounted: bool,
}

impl App {
    fn frame(&mut self, now_ms: f64) {
        if !self.driver.on_frame(now_ms, &mut self.session) {
            return;
        }
        match self.presenter.present(self.session.framebuffer()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.presenter.reconfigure(),
            Err(e) => log::warn!("Frame not presented: {}", e),
        }
    }

    fn key_down(&mut self, event: &KeyboardEvent) {
        if self.session.key_down(&event.key()).handled {
            event.prevent_default();
        }
    }

    fn key_up(&mut self, event: &KeyboardEvent) {
        if self.session.key_up(&event.key()).handled {
            event.prevent_default();
        }
    }

    fn focus_lost(&mut self, reason: &str) {
        self.session.release_keys();
        if self.settings.auto_pause_on_blur && !self.driver.pause_state().is_paused() {
            self.driver.set_paused(true);
            log::info!("Auto-paused ({})", reason);
        }
    }

    fn resize(&mut self) {
        let (width, height) = size_canvas(&self.window, &self.canvas, &self.settings);
        self.presenter.resize(width, height);
    }

    fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.driver.stop();
        self.listeners.clear();
        log::info!("Game screen unmounted");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Size the canvas to the largest integer scale that fits its container
///
/// Returns the backing-store size in physical pixels.
fn size_canvas(window: &Window, canvas: &HtmlCanvasElement, settings: &Settings) -> (u32, u32) {
    let (container_w, container_h) = match canvas.parent_element() {
        Some(parent) => (parent.client_width(), parent.client_height()),
        None => {
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            (w as i32, h as i32)
        }
    };
    let display = fit_display(
        container_w.max(0) as u32,
        container_h.max(0) as u32,
        settings.max_display_width,
        settings.max_display_height,
    );

    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", display.width));
    let _ = style.set_property("height", &format!("{}px", display.height));
    let _ = style.set_property("image-rendering", "pixelated");

    let dpr = window.device_pixel_ratio().max(1.0);
    let width = (f64::from(display.width) * dpr).round() as u32;
    let height = (f64::from(display.height) * dpr).round() as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    log::debug!("Canvas {}x{} at {}x scale", width, height, display.scale);
    (width, height)
}

async fn create_presenter(
    canvas: &HtmlCanvasElement,
    width: u32,
    height: u32,
) -> Result<Presenter, PresentError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    Presenter::new(surface, &adapter, (LOGICAL_WIDTH, LOGICAL_HEIGHT), width, height).await
}

/// Listener for `event` on `target` that forwards to the app while it lives
fn listen<F>(
    target: &EventTarget,
    event: &'static str,
    app: &Rc<RefCell<App>>,
    mut handler: F,
) -> Result<EventListener, JsValue>
where
    F: FnMut(&mut App, web_sys::Event) + 'static,
{
    let app = Rc::downgrade(app);
    EventListener::new(target, event, move |e| {
        let Some(app) = app.upgrade() else {
            return;
        };
        if let Ok(mut app) = app.try_borrow_mut() {
            handler(&mut *app, e);
        }
    })
}

fn install_listeners(
    window: &Window,
    document: &Document,
    app: &Rc<RefCell<App>>,
) -> Result<Vec<EventListener>, JsValue> {
    let document_for_visibility = document.clone();
    Ok(vec![
        listen(window, "keydown", app, |app, e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                app.key_down(key);
            }
        })?,
        listen(window, "keyup", app, |app, e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                app.key_up(key);
            }
        })?,
        listen(window, "blur", app, |app, _| app.focus_lost("window blur"))?,
        listen(document, "visibilitychange", app, move |app, _| {
            if document_for_visibility.visibility_state() == web_sys::VisibilityState::Hidden {
                app.focus_lost("tab hidden");
            }
        })?,
        listen(window, "resize", app, |app, _| app.resize())?,
    ])
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Handle to a mounted game screen
#[wasm_bindgen]
pub struct GameHandle {
    app: Option<Rc<RefCell<App>>>,
}

#[wasm_bindgen]
impl GameHandle {
    /// Flip the pause state; returns whether the game is now paused
    pub fn toggle_pause(&self) -> bool {
        self.with_app(|app| app.driver.toggle_pause().is_paused())
            .unwrap_or(false)
    }

    pub fn set_paused(&self, paused: bool) {
        self.with_app(|app| app.driver.set_paused(paused));
    }

    pub fn is_paused(&self) -> bool {
        self.with_app(|app| app.driver.pause_state().is_paused())
            .unwrap_or(false)
    }

    /// Best distance in meters, including the current session
    pub fn best_distance(&self) -> f64 {
        self.with_app(|app| app.session.state().world.best_meters)
            .unwrap_or(0.0)
    }

    /// Stop the game and release every browser resource; safe to repeat
    pub fn unmount(&mut self) {
        if let Some(app) = self.app.take() {
            if let Ok(mut app) = app.try_borrow_mut() {
                app.teardown();
            }
        }
    }
}

impl GameHandle {
    fn with_app<R>(&self, f: impl FnOnce(&mut App) -> R) -> Option<R> {
        let app = self.app.as_ref()?;
        let mut app = app.try_borrow_mut().ok()?;
        Some(f(&mut *app))
    }
}

/// Mount the game on the canvas with id `canvas_id` and start the loop
#[wasm_bindgen]
pub async fn mount_game(canvas_id: String) -> Result<GameHandle, JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&canvas_id)
        .ok_or_else(|| js_error(format!("no element #{}", canvas_id)))?
        .dyn_into()
        .map_err(|_| js_error(format!("#{} is not a canvas", canvas_id)))?;

    let store = SessionStore::open(&window);
    let settings = Settings::load(&store);
    let (width, height) = size_canvas(&window, &canvas, &settings);
    let presenter = create_presenter(&canvas, width, height).await.map_err(js_error)?;
    let session = GameSession::mount(store, settings.tuning.clone());
    let max_step = settings.tuning.distance.max_step;

    let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
        RefCell::new(App {
            driver: FrameDriver::new(RafScheduler::new(window.clone(), weak.clone()), max_step),
            session,
            presenter,
            window: window.clone(),
            canvas,
            settings,
            listeners: Vec::new(),
            mounted: true,
        })
    });

    // on error the app is dropped here, which tears it down
    let listeners = install_listeners(&window, &document, &app)?;
    {
        let mut app = app.borrow_mut();
        app.listeners = listeners;
        app.driver.start();
    }
    log::info!("Game screen mounted on #{}", canvas_id);

    Ok(GameHandle { app: Some(app) })
}
