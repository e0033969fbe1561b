//! Pointer, wheel and touch input driving the orbit controls

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Event, MouseEvent, TouchEvent, WheelEvent, Window};

use crate::app::App;

/// Radians of orbit per pixel of drag
const ROTATE_SENSITIVITY: f32 = 0.005;

/// Distance units per wheel delta unit
const ZOOM_SENSITIVITY: f32 = 0.01;

/// Distance units per pixel of pinch
const PINCH_SENSITIVITY: f32 = 0.05;

pub fn install(app: &Rc<App>, window: &Window, listeners: &mut Vec<EventListener>) {
    let dragging = Rc::new(Cell::new(false));
    let last_pos = Rc::new(Cell::new((0.0_f32, 0.0_f32)));
    let pinch_dist = Rc::new(Cell::new(None::<f32>));

    {
        let dragging = Rc::clone(&dragging);
        let last_pos = Rc::clone(&last_pos);
        listeners.push(EventListener::new(
            app.canvas(),
            "mousedown",
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                dragging.set(true);
                last_pos.set((event.client_x() as f32, event.client_y() as f32));
            },
        ));
    }

    {
        let app = Rc::clone(app);
        let dragging = Rc::clone(&dragging);
        let last_pos = Rc::clone(&last_pos);
        listeners.push(EventListener::new(window, "mousemove", move |event: &Event| {
            if !dragging.get() {
                return;
            }
            let Some(event) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let (x, y) = (event.client_x() as f32, event.client_y() as f32);
            let (px, py) = last_pos.replace((x, y));
            app.session().borrow_mut().controls.rotate(
                -(x - px) * ROTATE_SENSITIVITY,
                -(y - py) * ROTATE_SENSITIVITY,
            );
        }));
    }

    {
        let dragging = Rc::clone(&dragging);
        listeners.push(EventListener::new(window, "mouseup", move |_event| {
            dragging.set(false);
        }));
    }

    {
        let canvas = app.canvas().clone();
        let app = Rc::clone(app);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "wheel",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                event.prevent_default();
                app.session()
                    .borrow_mut()
                    .controls
                    .zoom(event.delta_y() as f32 * ZOOM_SENSITIVITY);
            },
        ));
    }

    {
        let last_pos = Rc::clone(&last_pos);
        let pinch_dist = Rc::clone(&pinch_dist);
        listeners.push(EventListener::new(
            app.canvas(),
            "touchstart",
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let touches = event.touches();
                if let Some(touch) = touches.item(0) {
                    last_pos.set((touch.client_x() as f32, touch.client_y() as f32));
                }
                pinch_dist.set(pinch_distance(event));
            },
        ));
    }

    {
        let canvas = app.canvas().clone();
        let app = Rc::clone(app);
        let last_pos = Rc::clone(&last_pos);
        let pinch_dist = Rc::clone(&pinch_dist);
        listeners.push(EventListener::new_with_options(
            &canvas,
            "touchmove",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                event.prevent_default();
                if let Some(dist) = pinch_distance(event) {
                    // Two fingers: pinch to zoom
                    if let Some(prev) = pinch_dist.replace(Some(dist)) {
                        app.session()
                            .borrow_mut()
                            .controls
                            .zoom((prev - dist) * PINCH_SENSITIVITY);
                    }
                } else if let Some(touch) = event.touches().item(0) {
                    let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
                    let (px, py) = last_pos.replace((x, y));
                    app.session().borrow_mut().controls.rotate(
                        -(x - px) * ROTATE_SENSITIVITY,
                        -(y - py) * ROTATE_SENSITIVITY,
                    );
                }
            },
        ));
    }

    {
        let pinch_dist = Rc::clone(&pinch_dist);
        listeners.push(EventListener::new(
            app.canvas(),
            "touchend",
            move |_event| {
                pinch_dist.set(None);
            },
        ));
    }
}

fn pinch_distance(event: &TouchEvent) -> Option<f32> {
    let touches = event.touches();
    if touches.length() < 2 {
        return None;
    }
    let a = touches.item(0)?;
    let b = touches.item(1)?;
    let dx = (a.client_x() - b.client_x()) as f32;
    let dy = (a.client_y() - b.client_y()) as f32;
    Some((dx * dx + dy * dy).sqrt())
}
