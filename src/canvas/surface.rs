//! Host-facing seams of the background animation.
//!
//! The animator never touches `web_sys` directly. It draws through
//! [`DrawContext`], sizes itself through [`Surface`], paces itself through
//! [`FrameScheduler`] and hears about viewport changes through
//! [`ResizeNotifier`]. The browser implementations live in
//! [`super::web`]; the tests drive the same code with in-memory fakes.

use std::rc::Rc;

/// Straight-alpha colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn new((r, g, b): (u8, u8, u8), a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation as accepted by canvas fill/stroke styles.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One stop of a linear gradient, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// The 2D drawing operations the starfield needs.
pub trait DrawContext {
    /// Clear the rectangle `(0, 0, width, height)`.
    fn clear(&self, width: f64, height: f64);

    /// Fill a full circle.
    fn fill_disc(&self, x: f64, y: f64, radius: f64, color: Rgba);

    /// Stroke a straight segment with a linear gradient running from `from`
    /// to `to`.
    fn stroke_gradient_line(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        stops: &[ColorStop; 3],
        line_width: f64,
    );
}

/// A drawable target with a resizable backing store.
pub trait Surface {
    /// Acquire the drawing context, `None` when the host cannot provide one.
    fn context(&self) -> Option<Rc<dyn DrawContext>>;

    /// Dimensions the surface should currently adopt (e.g. the viewport).
    fn viewport_size(&self) -> (u32, u32);

    /// Resize the backing store.
    fn set_size(&self, width: u32, height: u32);

    /// Current backing store size.
    fn size(&self) -> (u32, u32);
}

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Opaque id of a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// "Run this before the next repaint" primitive.
pub trait FrameScheduler {
    /// Schedule `callback`, which receives the host timestamp in
    /// milliseconds. Returns `None` when scheduling failed.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle>;

    /// Cancel a callback previously scheduled with
    /// [`request_frame`](Self::request_frame). Unknown or already fired
    /// handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Viewport resize subscription.
pub trait ResizeNotifier {
    fn subscribe(&self, callback: Rc<dyn Fn()>) -> Option<ListenerHandle>;

    /// Remove a listener. Unknown handles are ignored.
    fn unsubscribe(&self, handle: ListenerHandle);
}
