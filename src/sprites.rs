//! Floating astronaut sprites drifting across the viewport.
//!
//! Each sprite sweeps left to right, bobs vertically through a fixed set of
//! keyframes and spins, with per-sprite randomised periods. The motion is a
//! pure function of time ([`SpriteMotion::pose_at`]); the DOM layer only
//! writes the resulting transform. When the user prefers reduced motion the
//! sprites are still mounted but keep their rest pose.

use std::cell::Cell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::canvas::surface::FrameScheduler;
use crate::canvas::FrameLoop;
use crate::config::SpriteConfig;
use crate::constants::{
    SPRITE_BOB_KEYFRAMES_PX, SPRITE_END_X_VW, SPRITE_ROTATION_PERIOD_SECS, SPRITE_START_X_VW,
};

/// CSS `ease-in-out`, i.e. `cubic-bezier(0.42, 0, 0.58, 1)`, for progress
/// `t` in `[0, 1]`.
pub fn ease_in_out(t: f64) -> f64 {
    const X1: f64 = 0.42;
    const X2: f64 = 0.58;

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // x(s) is monotonic on [0, 1], so bisect for the curve parameter.
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..48 {
        let mid = (lo + hi) / 2.0;
        if bezier(mid, X1, X2) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bezier((lo + hi) / 2.0, 0.0, 1.0)
}

/// One coordinate of a cubic Bezier anchored at 0 and 1.
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn fract(x: f64) -> f64 {
    x - x.floor()
}

/// Offset of a sprite from its anchor, applied as a CSS transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpritePose {
    pub x_vw: f64,
    pub y_px: f64,
    pub rotation_deg: f64,
}

impl SpritePose {
    /// No offset: the sprite sits at its anchor.
    pub const REST: SpritePose = SpritePose { x_vw: 0.0, y_px: 0.0, rotation_deg: 0.0 };

    pub fn to_css_transform(&self) -> String {
        if *self == Self::REST {
            return "none".to_string();
        }
        format!(
            "translate({:.3}vw, {:.3}px) rotate({:.3}deg)",
            self.x_vw, self.y_px, self.rotation_deg
        )
    }
}

/// Randomised timing of one sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteMotion {
    /// Vertical anchor, percent of the viewport height.
    pub start_y_pct: f64,
    /// Seconds for one left-to-right sweep.
    pub sweep_secs: f64,
    /// Seconds for one pass through the bob keyframes.
    pub bob_secs: f64,
    pub delay_secs: f64,
}

impl SpriteMotion {
    /// Motion for the `index`-th sprite. Later sprites sit lower and start
    /// later so they do not move in lockstep.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Self {
        let i = index as f64;
        Self {
            start_y_pct: 5.0 + i * 5.0 + rng.gen::<f64>() * 50.0,
            sweep_secs: 20.0 + rng.gen::<f64>() * 10.0,
            bob_secs: 4.0 + rng.gen::<f64>() * 10.0,
            delay_secs: i * 3.0,
        }
    }

    pub fn pose_at(&self, t_secs: f64, reduced_motion: bool) -> SpritePose {
        if reduced_motion || t_secs < self.delay_secs {
            return SpritePose::REST;
        }
        let local = t_secs - self.delay_secs;

        let sweep = fract(local / self.sweep_secs);
        let x_vw = SPRITE_START_X_VW + (SPRITE_END_X_VW - SPRITE_START_X_VW) * sweep;

        let segments = (SPRITE_BOB_KEYFRAMES_PX.len() - 1) as f64;
        let phase = fract(local / self.bob_secs) * segments;
        let segment = (phase.floor() as usize).min(SPRITE_BOB_KEYFRAMES_PX.len() - 2);
        let from = SPRITE_BOB_KEYFRAMES_PX[segment];
        let to = SPRITE_BOB_KEYFRAMES_PX[segment + 1];
        let y_px = from + (to - from) * ease_in_out(phase - segment as f64);

        let rotation_deg = 360.0 * fract(local / SPRITE_ROTATION_PERIOD_SECS);

        SpritePose { x_vw, y_px, rotation_deg }
    }
}

struct SpriteNodes {
    nodes: Vec<(HtmlElement, SpriteMotion)>,
    origin_ms: Cell<Option<f64>>,
}

impl SpriteNodes {
    /// Pose every sprite for a frame timestamp. The first frame seen
    /// becomes t = 0.
    fn apply(&self, timestamp_ms: f64) {
        let origin = self.origin_ms.get().unwrap_or(timestamp_ms);
        self.origin_ms.set(Some(origin));
        let t_secs = (timestamp_ms - origin) / 1000.0;
        for (node, motion) in &self.nodes {
            set_transform(node, &motion.pose_at(t_secs, false));
        }
    }

    fn rest(&self) {
        for (node, _) in &self.nodes {
            set_transform(node, &SpritePose::REST);
        }
    }
}

fn set_transform(node: &HtmlElement, pose: &SpritePose) {
    let _ = node.style().set_property("transform", &pose.to_css_transform());
}

/// The mounted sprite elements plus the loop animating them.
pub struct SpriteLayer {
    sprites: Rc<SpriteNodes>,
    frames: Option<FrameLoop>,
}

impl SpriteLayer {
    /// Create the sprite elements under `container` and, unless
    /// `reduced_motion` is set, start animating them.
    pub fn mount(
        document: &Document,
        container: &Element,
        scheduler: Rc<dyn FrameScheduler>,
        config: &SpriteConfig,
        reduced_motion: bool,
    ) -> Result<Self, JsValue> {
        let mut rng = StdRng::from_entropy();
        let mut nodes = Vec::with_capacity(config.count);
        for index in 0..config.count {
            let motion = SpriteMotion::random(&mut rng, index);
            let node = create_sprite(document, config, &motion)?;
            container.append_child(&node)?;
            nodes.push((node, motion));
        }

        let sprites = Rc::new(SpriteNodes { nodes, origin_ms: Cell::new(None) });
        sprites.rest();

        if reduced_motion {
            crate::console_log!(log_1, "Reduced motion requested, sprites stay static");
            return Ok(Self { sprites, frames: None });
        }

        let frames = FrameLoop::new(scheduler);
        let animated = sprites.clone();
        frames.start(Rc::new(move |timestamp: f64| animated.apply(timestamp)));
        Ok(Self { sprites, frames: Some(frames) })
    }

    pub fn is_animating(&self) -> bool {
        self.frames.as_ref().map_or(false, |f| f.is_running())
    }

    /// Stop animating and remove the elements. Idempotent.
    pub fn detach(&mut self) {
        if let Some(frames) = self.frames.take() {
            frames.stop();
        }
        for (node, _) in &self.sprites.nodes {
            node.remove();
        }
    }
}

impl Drop for SpriteLayer {
    fn drop(&mut self) {
        self.detach();
    }
}

fn create_sprite(
    document: &Document,
    config: &SpriteConfig,
    motion: &SpriteMotion,
) -> Result<HtmlElement, JsValue> {
    let wrapper = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    wrapper.set_class_name("floating-sprite");
    wrapper.set_attribute("aria-hidden", "true")?;

    let style = wrapper.style();
    style.set_property("position", "fixed")?;
    style.set_property("pointer-events", "none")?;
    style.set_property("left", &format!("{}vw", SPRITE_START_X_VW))?;
    style.set_property("top", &format!("{:.3}%", motion.start_y_pct))?;
    style.set_property("will-change", "transform")?;

    let image = document.create_element("img")?;
    image.set_attribute("src", &config.image_src)?;
    image.set_attribute("alt", "")?;
    image.set_attribute("width", &config.size_px.to_string())?;
    image.set_attribute("height", &config.size_px.to_string())?;
    wrapper.append_child(&image)?;

    Ok(wrapper)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::canvas::web::AnimationFrameScheduler;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(count: usize, reduced_motion: bool) -> (Element, SpriteLayer) {
        let window = web_sys::window().expect("window");
        let document = window.document().expect("document");
        let container = document.create_element("div").expect("container");
        let config = SpriteConfig { count, ..SpriteConfig::default() };
        let layer = SpriteLayer::mount(
            &document,
            &container,
            Rc::new(AnimationFrameScheduler::new(window)),
            &config,
            reduced_motion,
        )
        .expect("mount sprites");
        (container, layer)
    }

    fn sprite(container: &Element, index: u32) -> HtmlElement {
        container
            .children()
            .item(index)
            .expect("sprite node")
            .dyn_into::<HtmlElement>()
            .expect("html element")
    }

    #[wasm_bindgen_test]
    fn reduced_motion_mounts_static_sprites() {
        let (container, layer) = mount(3, true);
        assert_eq!(container.child_element_count(), 3);
        assert!(!layer.is_animating());
        for index in 0..3 {
            let style = sprite(&container, index).style();
            assert_eq!(style.get_property_value("transform").expect("transform"), "none");
        }
    }

    #[wasm_bindgen_test]
    fn sprites_are_hidden_from_assistive_tech_and_pointer() {
        let (container, _layer) = mount(2, true);
        for index in 0..2 {
            let node = sprite(&container, index);
            assert_eq!(node.get_attribute("aria-hidden").as_deref(), Some("true"));
            assert_eq!(
                node.style().get_property_value("pointer-events").expect("pointer-events"),
                "none"
            );
        }
    }

    #[wasm_bindgen_test]
    fn detach_removes_nodes_and_can_repeat() {
        let (container, mut layer) = mount(4, false);
        assert!(layer.is_animating());

        layer.detach();
        assert!(!layer.is_animating());
        assert_eq!(container.child_element_count(), 0);

        layer.detach();
        assert_eq!(container.child_element_count(), 0);
    }
}
