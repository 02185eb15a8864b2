//! Tunable parameters for the starfield and the floating sprites.
//!
//! Both structs deserialize from a plain JS options object (camelCase keys,
//! every key optional) so the page can override a single value without
//! restating the rest:
//!
//! ```js
//! new SpaceBackground("space-background", { spawnProbability: 0.02 });
//! ```

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::constants::*;

/// Parameters of the star field and the shooting stars.
///
/// All per-tick quantities (`life_decay`, `spawn_probability`, velocities)
/// assume one tick per animation frame at [`BASELINE_FPS`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StarfieldConfig {
    /// Surface area covered by one static star.
    pub area_per_star: f64,
    pub star_radius_max: f64,
    pub star_opacity_min: f64,
    pub star_opacity_max: f64,
    pub streak_speed_min: f64,
    pub streak_speed_max: f64,
    pub streak_length_min: f64,
    pub streak_length_max: f64,
    pub life_decay: f64,
    /// Chance of spawning one shooting star on any given tick.
    pub spawn_probability: f64,
    /// Distance outside the surface at which streaks enter.
    pub spawn_offset: f64,
    /// Streaks further than this outside the surface are dropped.
    pub bounds_padding: f64,
    /// Divisor applied to `velocity * length` to get the visible trail.
    pub trail_scale: f64,
    pub line_width_min: f64,
    pub line_width_max: f64,
    /// Frame rate the host actually ticks at. When set, [`resolved`]
    /// rescales the per-tick rates from [`BASELINE_FPS`] to it.
    ///
    /// [`resolved`]: StarfieldConfig::resolved
    pub target_fps: Option<f64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            area_per_star: DEFAULT_AREA_PER_STAR,
            star_radius_max: DEFAULT_STAR_RADIUS_MAX,
            star_opacity_min: DEFAULT_STAR_OPACITY_MIN,
            star_opacity_max: DEFAULT_STAR_OPACITY_MAX,
            streak_speed_min: DEFAULT_STREAK_SPEED_MIN,
            streak_speed_max: DEFAULT_STREAK_SPEED_MAX,
            streak_length_min: DEFAULT_STREAK_LENGTH_MIN,
            streak_length_max: DEFAULT_STREAK_LENGTH_MAX,
            life_decay: DEFAULT_STREAK_LIFE_DECAY,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            spawn_offset: DEFAULT_SPAWN_OFFSET,
            bounds_padding: DEFAULT_BOUNDS_PADDING,
            trail_scale: DEFAULT_TRAIL_SCALE,
            line_width_min: DEFAULT_LINE_WIDTH_MIN,
            line_width_max: DEFAULT_LINE_WIDTH_MAX,
            target_fps: None,
        }
    }
}

impl StarfieldConfig {
    /// Parse an options object handed in from JS. `undefined`/`null` yield
    /// the defaults; anything unparsable also falls back to the defaults
    /// after a console warning.
    pub fn from_js(value: JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        match serde_wasm_bindgen::from_value::<StarfieldConfig>(value) {
            Ok(cfg) => cfg.resolved(),
            Err(e) => {
                crate::console_log!(warn_1, "Invalid starfield options, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Sanitize, then apply `target_fps` if one was given. The target is
    /// consumed so resolving twice does not rescale twice.
    pub fn resolved(mut self) -> Self {
        let target_fps = self.target_fps.take();
        let cfg = self.sanitized();
        match target_fps {
            Some(fps) => cfg.recalibrated_for_fps(fps),
            None => cfg,
        }
    }

    /// Clamp values that would make sampling panic or the scene degenerate.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.area_per_star > 0.0) {
            self.area_per_star = defaults.area_per_star;
        }
        if !(self.trail_scale > 0.0) {
            self.trail_scale = defaults.trail_scale;
        }
        self.star_radius_max = self.star_radius_max.max(0.0);
        self.spawn_probability = clamp_unit(self.spawn_probability);
        self.life_decay = if self.life_decay > 0.0 { self.life_decay } else { defaults.life_decay };
        self.star_opacity_min = clamp_unit(self.star_opacity_min);
        self.star_opacity_max = clamp_unit(self.star_opacity_max);
        self.bounds_padding = self.bounds_padding.max(0.0);
        self.spawn_offset = self.spawn_offset.max(0.0);

        order(&mut self.star_opacity_min, &mut self.star_opacity_max);
        order(&mut self.streak_speed_min, &mut self.streak_speed_max);
        order(&mut self.streak_length_min, &mut self.streak_length_max);
        order(&mut self.line_width_min, &mut self.line_width_max);
        self
    }

    /// Expected number of ticks between two shooting stars. Spawning is a
    /// Bernoulli trial per tick, so the gap is geometric with mean `1 / p`.
    pub fn mean_spawn_interval_ticks(&self) -> f64 {
        if self.spawn_probability > 0.0 {
            1.0 / self.spawn_probability
        } else {
            f64::INFINITY
        }
    }

    /// Rescale the per-tick rates for a host that ticks at `fps` instead of
    /// [`BASELINE_FPS`], keeping spawn pacing and streak lifetime constant
    /// in wall-clock terms.
    pub fn recalibrated_for_fps(&self, fps: f64) -> Self {
        if !(fps > 0.0) {
            return self.clone();
        }
        let ratio = BASELINE_FPS / fps;
        Self {
            spawn_probability: clamp_unit(self.spawn_probability * ratio),
            life_decay: self.life_decay * ratio,
            streak_speed_min: self.streak_speed_min * ratio,
            streak_speed_max: self.streak_speed_max * ratio,
            ..self.clone()
        }
    }
}

/// Parameters of the floating sprite decoration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpriteConfig {
    pub count: usize,
    pub image_src: String,
    pub size_px: u32,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_SPRITE_COUNT,
            image_src: DEFAULT_SPRITE_IMAGE.to_string(),
            size_px: DEFAULT_SPRITE_SIZE_PX,
        }
    }
}

impl SpriteConfig {
    pub fn from_js(value: JsValue) -> Self {
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            crate::console_log!(warn_1, "Invalid sprite options, using defaults: {}", e);
            Self::default()
        })
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn order(lo: &mut f64, hi: &mut f64) {
    if *lo > *hi {
        std::mem::swap(lo, hi);
    }
}
