//! DOM wiring for the decorative card tilt
//!
//! Looks up the container and card elements once at startup; when either is
//! missing the effect is silently disabled and the viewer runs without it.

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

use orbitview_core::TiltAngles;

pub const CONTAINER_SELECTOR: &str = ".container";
pub const CARD_SELECTOR: &str = ".card";

pub fn install(document: &Document, listeners: &mut Vec<EventListener>) {
    let container = match document.query_selector(CONTAINER_SELECTOR) {
        Ok(Some(el)) => el,
        _ => return,
    };
    let card: HtmlElement = match document.query_selector(CARD_SELECTOR) {
        Ok(Some(el)) => match el.dyn_into() {
            Ok(card) => card,
            Err(_) => return,
        },
        _ => return,
    };

    let move_card = card.clone();
    listeners.push(EventListener::new(
        &container,
        "mousemove",
        move |event: &Event| {
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let Some((vw, vh)) = viewport_size() else {
                return;
            };
            let angles =
                TiltAngles::from_pointer(event.client_x() as f32, event.client_y() as f32, vw, vh);
            apply(&move_card, &angles);
        },
    ));

    listeners.push(EventListener::new(
        &container,
        "mouseleave",
        move |_event: &Event| {
            apply(&card, &TiltAngles::rest());
        },
    ));
}

fn viewport_size() -> Option<(f32, f32)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

fn apply(card: &HtmlElement, angles: &TiltAngles) {
    if card
        .style()
        .set_property("transform", &angles.css_transform())
        .is_err()
    {
        log::warn!("could not update card transform");
    }
}
