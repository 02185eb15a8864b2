//! Browser implementations of the host seams: `<canvas>` + 2D context,
//! `requestAnimationFrame` and the window `resize` event.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use super::surface::{
    ColorStop, DrawContext, FrameHandle, FrameScheduler, ListenerHandle, ResizeNotifier, Rgba,
    Surface,
};
use crate::constants::REDUCED_MOTION_QUERY;

/// A `<canvas>` that tracks the window's inner size.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    window: Window,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, window: Window) -> Self {
        Self { canvas, window }
    }

    /// Look up `<canvas id="...">`. `None` when missing or not a canvas.
    pub fn from_id(window: &Window, document: &Document, id: &str) -> Option<Self> {
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        Some(Self::new(canvas, window.clone()))
    }
}

fn dimension(value: Result<JsValue, JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or(0, |v| v as u32)
}

impl Surface for CanvasSurface {
    fn context(&self) -> Option<Rc<dyn DrawContext>> {
        let context = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Rc::new(CanvasContext(context)))
    }

    fn viewport_size(&self) -> (u32, u32) {
        (dimension(self.window.inner_width()), dimension(self.window.inner_height()))
    }

    fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }
}

pub struct CanvasContext(pub CanvasRenderingContext2d);

impl DrawContext for CanvasContext {
    fn clear(&self, width: f64, height: f64) {
        self.0.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_disc(&self, x: f64, y: f64, radius: f64, color: Rgba) {
        let context = &self.0;
        context.set_fill_style_str(&color.to_css());
        context.begin_path();
        let _ = context.arc(x, y, radius, 0.0, TAU);
        context.fill();
    }

    fn stroke_gradient_line(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        stops: &[ColorStop; 3],
        line_width: f64,
    ) {
        let context = &self.0;
        let gradient = context.create_linear_gradient(from.0, from.1, to.0, to.1);
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset as f32, &stop.color.to_css());
        }
        context.set_stroke_style_canvas_gradient(&gradient);
        context.set_line_width(line_width);
        context.begin_path();
        context.move_to(from.0, from.1);
        context.line_to(to.0, to.1);
        context.stroke();
    }
}

/// `requestAnimationFrame` / `cancelAnimationFrame`.
pub struct AnimationFrameScheduler {
    window: Window,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
        // One-shot closure that frees itself once invoked. A cancelled frame
        // leaks its (empty-bodied) closure, which only happens on detach.
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        self.window
            .request_animation_frame(closure.unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

/// Window `resize` listeners. The JS closures stay alive until
/// unsubscribed or until this value is dropped.
pub struct WindowResize {
    window: Window,
    next_id: Cell<u32>,
    listeners: RefCell<HashMap<u32, Closure<dyn FnMut()>>>,
}

impl WindowResize {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    fn remove_listener(&self, closure: &Closure<dyn FnMut()>) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
}

impl ResizeNotifier for WindowResize {
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> Option<ListenerHandle> {
        let closure = Closure::<dyn FnMut()>::new(move || callback());
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .ok()?;

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.listeners.borrow_mut().insert(id, closure);
        Some(ListenerHandle(id))
    }

    fn unsubscribe(&self, handle: ListenerHandle) {
        let removed = self.listeners.borrow_mut().remove(&handle.0);
        if let Some(closure) = removed {
            self.remove_listener(&closure);
        }
    }
}

impl Drop for WindowResize {
    fn drop(&mut self) {
        for (_, closure) in self.listeners.borrow_mut().drain() {
            self.remove_listener(&closure);
        }
    }
}

/// Whether the user asked the OS/browser for reduced motion.
pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map_or(false, |query| query.matches())
}

// wasm-bindgen tests ----------------------------------------------------------
