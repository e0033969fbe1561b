//! Application wiring: canvas acquisition, the frame loop, DOM events and
//! teardown. One `App` owns the whole viewer for the lifetime of the page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlCanvasElement, Window};

use orbitview_core::{decode_glb, ViewerSession};

use crate::input;
use crate::loader;
use crate::renderer::Renderer;
use crate::tilt_card;

pub const CANVAS_ID: &str = "viewer-canvas";
pub const MODEL_URL: &str = "assets/model.glb";

/// Cap on the device pixel ratio, bounding GPU cost on dense displays
const MAX_PIXEL_RATIO: f64 = 2.0;

pub struct App {
    canvas: HtmlCanvasElement,
    session: RefCell<ViewerSession>,
    renderer: RefCell<Renderer>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
    // Kept apart from `listeners`: its callback is the one running dispose,
    // so it must survive the teardown that drops the others
    unload_listener: RefCell<Option<EventListener>>,
    disposed: Cell<bool>,
}

impl App {
    /// Boot the viewer against the host document. A missing canvas is fatal:
    /// the error is returned before any scene or GPU object is constructed.
    pub async fn boot() -> Result<Rc<Self>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| {
                JsValue::from_str(&format!("canvas element with id '{CANVAS_ID}' not found"))
            })?
            .dyn_into()
            .map_err(|_| JsValue::from_str("element is not a canvas"))?;

        let renderer = Renderer::new(canvas.clone()).await?;
        let app = Rc::new(Self {
            canvas,
            session: RefCell::new(ViewerSession::new()),
            renderer: RefCell::new(renderer),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            unload_listener: RefCell::new(None),
            disposed: Cell::new(false),
        });

        app.apply_resize();
        app.install_listeners(&window, &document);
        app.spawn_model_load();
        app.schedule_frame();
        Ok(app)
    }

    fn schedule_frame(self: &Rc<Self>) {
        let app = Rc::clone(self);
        let handle = request_animation_frame(move |_timestamp| {
            app.frame.borrow_mut().take();
            app.on_frame();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        self.session.borrow_mut().advance_frame();
        self.renderer.borrow_mut().render(&self.session.borrow());
        self.schedule_frame();
    }

    /// Cancel the pending animation frame; the loop stays stopped
    pub fn stop(&self) {
        self.frame.borrow_mut().take();
    }

    /// Release GPU resources and DOM listeners exactly once; later frames
    /// are no-ops
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.stop();
        self.listeners.borrow_mut().clear();
        self.renderer.borrow_mut().dispose();
    }

    /// Kick off the single asset load attempt. Progress is logged; exactly
    /// one of success or failure is recorded on the session.
    fn spawn_model_load(self: &Rc<Self>) {
        let app = Rc::clone(self);
        spawn_local(async move {
            let fetched = loader::fetch_bytes(MODEL_URL, |loaded, total| match total {
                Some(total) if total > 0 => {
                    log::info!(
                        "loading model: {:.2}%",
                        loaded as f64 / total as f64 * 100.0
                    );
                }
                _ => log::info!("loading model: {loaded} bytes"),
            })
            .await;

            match fetched {
                Ok(bytes) => match decode_glb(&bytes) {
                    Ok(model) => {
                        let mut session = app.session.borrow_mut();
                        session.install_model(model);
                        if let Some(model) = session.model() {
                            app.renderer.borrow_mut().upload_model(model);
                        }
                        log::info!("model loaded");
                    }
                    Err(err) => {
                        app.session.borrow_mut().mark_failed();
                        log::error!("model decode failed: {err}");
                    }
                },
                Err(err) => {
                    app.session.borrow_mut().mark_failed();
                    log::error!("model fetch failed: {err:?}");
                }
            }
        });
    }

    fn install_listeners(self: &Rc<Self>, window: &Window, document: &Document) {
        let mut listeners = Vec::new();

        let app = Rc::clone(self);
        listeners.push(EventListener::new(window, "resize", move |_event| {
            app.apply_resize();
        }));

        let app = Rc::clone(self);
        let unload = EventListener::new(window, "beforeunload", move |_event| {
            app.dispose();
        });

        input::install(self, window, &mut listeners);
        tilt_card::install(document, &mut listeners);
        *self.listeners.borrow_mut() = listeners;
        *self.unload_listener.borrow_mut() = Some(unload);
    }

    pub(crate) fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub(crate) fn session(&self) -> &RefCell<ViewerSession> {
        &self.session
    }

    /// Square render target bounded by the container width and the size cap.
    /// No-op when the canvas has no containing element.
    fn apply_resize(&self) {
        let Some(container) = self.canvas.parent_element() else {
            return;
        };
        let width = container.client_width().max(0) as u32;
        let size = self.session.borrow_mut().resize(width);
        self.renderer.borrow_mut().resize(size, pixel_ratio());
    }
}

fn pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .min(MAX_PIXEL_RATIO)
}
