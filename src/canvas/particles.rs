use rand::Rng;

use crate::config::StarfieldConfig;

/// Uniform sample from `[min, max)`; collapses to `min` for empty ranges
/// instead of panicking like `gen_range` would.
fn sample<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.gen::<f64>() * (max - min)
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

/// A fixed background star.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticParticle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl StaticParticle {
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        config: &StarfieldConfig,
    ) -> StaticParticle {
        StaticParticle {
            x: rng.gen::<f64>() * width,
            y: rng.gen::<f64>() * height,
            radius: rng.gen::<f64>() * config.star_radius_max,
            opacity: sample(rng, config.star_opacity_min, config.star_opacity_max),
        }
    }
}

/// Number of static stars for a `width` x `height` surface.
pub fn field_size(width: u32, height: u32, config: &StarfieldConfig) -> usize {
    let area = width as f64 * height as f64;
    (area / config.area_per_star).floor() as usize
}

/// Generate a full static field sized to the surface area.
pub fn generate_field<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    config: &StarfieldConfig,
) -> Vec<StaticParticle> {
    let count = field_size(width, height, config);
    let (w, h) = (width as f64, height as f64);
    (0..count)
        .map(|_| StaticParticle::random(rng, w, h, config))
        .collect()
}

/// Edge a shooting star enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Left,
}

/// A shooting star.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakParticle {
    pub edge: SpawnEdge,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub length: f64,
    /// Remaining life, starts at 1.0.
    pub life: f64,
    pub opacity: f64,
}

impl StreakParticle {
    /// Spawn a streak just outside the top or left edge, heading inwards.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        width: f64,
        height: f64,
        config: &StarfieldConfig,
    ) -> StreakParticle {
        let edge = if rng.gen_bool(0.5) { SpawnEdge::Top } else { SpawnEdge::Left };
        let speed_x = sample(rng, config.streak_speed_min, config.streak_speed_max);
        let speed_y = sample(rng, config.streak_speed_min, config.streak_speed_max);

        let (x, y, vx, vy) = match edge {
            SpawnEdge::Top => (
                rng.gen::<f64>() * width,
                -config.spawn_offset,
                speed_x * random_sign(rng),
                speed_y,
            ),
            SpawnEdge::Left => (
                -config.spawn_offset,
                rng.gen::<f64>() * height,
                speed_x,
                speed_y * random_sign(rng),
            ),
        };

        StreakParticle {
            edge,
            x,
            y,
            vx,
            vy,
            length: sample(rng, config.streak_length_min, config.streak_length_max),
            life: 1.0,
            opacity: 1.0,
        }
    }

    /// Move one tick along the velocity and age by `decay`.
    pub fn advance(&mut self, decay: f64) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= decay;
        self.opacity = self.life;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Whether the head is inside the surface grown by `padding` on every side.
    pub fn in_bounds(&self, width: f64, height: f64, padding: f64) -> bool {
        self.x >= -padding
            && self.y >= -padding
            && self.x <= width + padding
            && self.y <= height + padding
    }

    /// End of the visible trail, behind the head against the direction of travel.
    pub fn tail(&self, trail_scale: f64) -> (f64, f64) {
        let k = self.length / trail_scale;
        (self.x - self.vx * k, self.y - self.vy * k)
    }
}
