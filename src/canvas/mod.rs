//! The animated star field behind the page.

pub mod animator;
pub mod frame_loop;
pub mod particles;
pub mod starfield;
pub mod surface;
pub mod web;

pub use animator::BackgroundAnimator;
pub use frame_loop::FrameLoop;
pub use starfield::Starfield;
