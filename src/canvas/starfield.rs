use rand::Rng;

use super::particles::{generate_field, StaticParticle, StreakParticle};
use super::surface::{ColorStop, DrawContext, Rgba};
use crate::config::StarfieldConfig;
use crate::constants::{STAR_RGB, STREAK_HEAD_RGB, STREAK_MID_ALPHA_FACTOR, STREAK_MID_RGB};

/// The star field scene: a static layer regenerated on resize plus the
/// shooting stars currently in flight.
pub struct Starfield<R: Rng> {
    config: StarfieldConfig,
    rng: R,
    width: u32,
    height: u32,
    stars: Vec<StaticParticle>,
    streaks: Vec<StreakParticle>,
}

impl<R: Rng> Starfield<R> {
    pub fn new(config: StarfieldConfig, rng: R) -> Self {
        Self {
            config: config.resolved(),
            rng,
            width: 0,
            height: 0,
            stars: Vec::new(),
            streaks: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn stars(&self) -> &[StaticParticle] {
        &self.stars
    }

    pub fn streaks(&self) -> &[StreakParticle] {
        &self.streaks
    }

    /// Adopt new dimensions and replace the whole static layer. Streaks in
    /// flight are kept as they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.stars = generate_field(&mut self.rng, width, height, &self.config);
    }

    /// Add a streak directly, bypassing the spawn trial.
    pub fn inject_streak(&mut self, streak: StreakParticle) {
        self.streaks.push(streak);
    }

    /// Drop every streak in flight. The static layer is untouched.
    pub fn clear_streaks(&mut self) {
        self.streaks.clear();
    }

    /// Advance every streak one tick and drop the ones that burnt out or
    /// left the padded bounds.
    pub fn update(&mut self) {
        let (w, h) = (self.width as f64, self.height as f64);
        let decay = self.config.life_decay;
        let padding = self.config.bounds_padding;

        self.streaks.retain_mut(|s| {
            s.advance(decay);
            !s.is_expired() && s.in_bounds(w, h, padding)
        });
    }

    /// Bernoulli trial for a new streak. Returns whether one was spawned.
    pub fn maybe_spawn(&mut self) -> bool {
        if !self.rng.gen_bool(self.config.spawn_probability) {
            return false;
        }
        let streak = StreakParticle::spawn(
            &mut self.rng,
            self.width as f64,
            self.height as f64,
            &self.config,
        );
        self.streaks.push(streak);
        true
    }

    /// One full frame: clear, paint the static layer, move and paint the
    /// streaks, then roll for a new one.
    pub fn render(&mut self, ctx: &dyn DrawContext) {
        ctx.clear(self.width as f64, self.height as f64);

        for star in &self.stars {
            ctx.fill_disc(star.x, star.y, star.radius, Rgba::new(STAR_RGB, star.opacity));
        }

        self.update();
        self.draw_streaks(ctx);
        self.maybe_spawn();
    }

    fn draw_streaks(&mut self, ctx: &dyn DrawContext) {
        let (min_w, max_w) = (self.config.line_width_min, self.config.line_width_max);
        for streak in &self.streaks {
            let stops = [
                ColorStop { offset: 0.0, color: Rgba::new(STREAK_HEAD_RGB, streak.opacity) },
                ColorStop {
                    offset: 0.5,
                    color: Rgba::new(STREAK_MID_RGB, streak.opacity * STREAK_MID_ALPHA_FACTOR),
                },
                ColorStop { offset: 1.0, color: Rgba::new(STREAK_HEAD_RGB, 0.0) },
            ];
            let line_width = min_w + self.rng.gen::<f64>() * (max_w - min_w);
            ctx.stroke_gradient_line(
                (streak.x, streak.y),
                streak.tail(self.config.trail_scale),
                &stops,
                line_width,
            );
        }
    }
}
