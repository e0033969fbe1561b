//! OrbitView Web - browser front end
//!
//! Ties the core viewer state to the host page: a wgpu renderer on a canvas,
//! a requestAnimationFrame loop, streaming asset loading, and the DOM event
//! wiring (orbit input, resize, unload, card tilt).

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod input;
#[cfg(target_arch = "wasm32")]
mod loader;
#[cfg(target_arch = "wasm32")]
mod renderer;
#[cfg(target_arch = "wasm32")]
mod tilt_card;

#[cfg(target_arch = "wasm32")]
pub use app::App;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use crate::app::App;

    thread_local! {
        static APP: RefCell<Option<Rc<App>>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    /// Boot the viewer. Fails when the expected canvas element is missing.
    #[wasm_bindgen]
    pub async fn boot() -> Result<(), JsValue> {
        let app = App::boot().await?;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        Ok(())
    }
}
