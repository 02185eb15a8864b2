// Default values for the starfield - these are the single source of truth for defaults

// Static star field
pub const DEFAULT_AREA_PER_STAR: f64 = 1000.0; // one star per 1000 px²
pub const DEFAULT_STAR_RADIUS_MAX: f64 = 2.0;
pub const DEFAULT_STAR_OPACITY_MIN: f64 = 0.2;
pub const DEFAULT_STAR_OPACITY_MAX: f64 = 1.0;

// Shooting stars
pub const DEFAULT_STREAK_SPEED_MIN: f64 = 2.0;
pub const DEFAULT_STREAK_SPEED_MAX: f64 = 5.0;
pub const DEFAULT_STREAK_LENGTH_MIN: f64 = 20.0;
pub const DEFAULT_STREAK_LENGTH_MAX: f64 = 100.0;
pub const DEFAULT_STREAK_LIFE_DECAY: f64 = 0.01; // per tick, ~100 ticks of life
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.01; // per tick, mean gap of 100 ticks
pub const DEFAULT_SPAWN_OFFSET: f64 = 50.0;
pub const DEFAULT_BOUNDS_PADDING: f64 = 100.0;
pub const DEFAULT_TRAIL_SCALE: f64 = 10.0;
pub const DEFAULT_LINE_WIDTH_MIN: f64 = 1.0;
pub const DEFAULT_LINE_WIDTH_MAX: f64 = 3.0;

/// Frame rate the per-tick constants above were tuned for.
pub const BASELINE_FPS: f64 = 60.0;

// Colours
pub const STAR_RGB: (u8, u8, u8) = (255, 255, 255);
pub const STREAK_HEAD_RGB: (u8, u8, u8) = (255, 255, 255);
pub const STREAK_MID_RGB: (u8, u8, u8) = (135, 206, 250); // light sky blue
pub const STREAK_MID_ALPHA_FACTOR: f64 = 0.8;

// Floating sprites
pub const DEFAULT_SPRITE_COUNT: usize = 8;
pub const DEFAULT_SPRITE_IMAGE: &str = "/astro.png";
pub const DEFAULT_SPRITE_SIZE_PX: u32 = 40;
pub const SPRITE_START_X_VW: f64 = -10.0;
pub const SPRITE_END_X_VW: f64 = 110.0;
pub const SPRITE_BOB_KEYFRAMES_PX: [f64; 4] = [0.0, -50.0, 50.0, 0.0];
pub const SPRITE_ROTATION_PERIOD_SECS: f64 = 5.0;

// DOM
pub const DEFAULT_CANVAS_ID: &str = "space-background";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
