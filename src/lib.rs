use std::rc::Rc;

use wasm_bindgen::prelude::*;

mod macros;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod sprites;

use canvas::web::{prefers_reduced_motion, AnimationFrameScheduler, CanvasSurface, WindowResize};
use canvas::BackgroundAnimator;
use config::{SpriteConfig, StarfieldConfig};
use sprites::SpriteLayer;

// Main entry point for the WASM module
#[wasm_bindgen(start)]
pub fn start() {
    // Initialize better panic messages
    console_error_panic_hook::set_once();
}

/// Handle to the animated star field drawn on a `<canvas>`.
///
/// Construction never throws: a missing canvas or 2D context leaves an
/// inert handle whose `isRunning()` is `false`.
#[wasm_bindgen]
pub struct SpaceBackground {
    animator: Option<BackgroundAnimator>,
}

#[wasm_bindgen]
impl SpaceBackground {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: Option<String>, options: JsValue) -> SpaceBackground {
        let canvas_id = canvas_id.unwrap_or_else(|| constants::DEFAULT_CANVAS_ID.to_string());
        let animator = attach_background(&canvas_id, StarfieldConfig::from_js(options));
        SpaceBackground { animator }
    }

    /// Stop the animation and release the resize listener. Safe to call
    /// more than once.
    pub fn detach(&mut self) {
        if let Some(animator) = &self.animator {
            animator.detach();
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.animator.as_ref().map_or(false, |a| a.is_running())
    }

    #[wasm_bindgen(js_name = starCount)]
    pub fn star_count(&self) -> usize {
        self.animator.as_ref().map_or(0, |a| a.star_count())
    }
}

fn attach_background(canvas_id: &str, config: StarfieldConfig) -> Option<BackgroundAnimator> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let Some(surface) = CanvasSurface::from_id(&window, &document, canvas_id) else {
        console_log!(log_1, "Canvas #{} not found, background disabled", canvas_id);
        return None;
    };

    let animator = BackgroundAnimator::new(
        Rc::new(AnimationFrameScheduler::new(window.clone())),
        Rc::new(WindowResize::new(window)),
        config,
    );
    animator.attach(Rc::new(surface));
    Some(animator)
}

/// Handle to the floating sprite decoration.
#[wasm_bindgen]
pub struct FloatingSprites {
    layer: Option<SpriteLayer>,
}

#[wasm_bindgen]
impl FloatingSprites {
    /// Mount the sprites under `#container_id`, or under `<body>` when no
    /// id is given.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: Option<String>, options: JsValue) -> FloatingSprites {
        let config = SpriteConfig::from_js(options);
        let layer = match mount_sprites(container_id.as_deref(), &config) {
            Ok(layer) => layer,
            Err(e) => {
                console_log!(warn_1, "Failed to mount sprites: {:?}", e);
                None
            }
        };
        FloatingSprites { layer }
    }

    pub fn detach(&mut self) {
        if let Some(layer) = self.layer.as_mut() {
            layer.detach();
        }
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.layer.as_ref().map_or(false, |l| l.is_animating())
    }
}

fn mount_sprites(
    container_id: Option<&str>,
    config: &SpriteConfig,
) -> Result<Option<SpriteLayer>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let container = match container_id {
        Some(id) => document.get_element_by_id(id),
        None => document.body().map(Into::into),
    };
    let Some(container) = container else {
        console_log!(log_1, "Sprite container not found, sprites disabled");
        return Ok(None);
    };

    let reduced_motion = prefers_reduced_motion(&window);
    let layer = SpriteLayer::mount(
        &document,
        &container,
        Rc::new(AnimationFrameScheduler::new(window)),
        config,
        reduced_motion,
    )?;
    Ok(Some(layer))
}
