// Shared simulation and scene tuning constants.
//
// Everything configurable per page lives in `BackgroundConfig`; the values here
// shape the motion itself and are not exposed as options.

// Default palette (0xRRGGBB)
pub const DEFAULT_PALETTE: [u32; 9] = [
    0x00A9A4, // teal green
    0xFFD166, // spark yellow
    0xF472B6, // pink
    0x9333EA, // violet
    0x2563EB, // blue
    0xDC2626, // red
    0x65A30D, // lime
    0xF59E0B, // orange
    0x06B6D4, // cyan
];

// Motion field
pub const FIELD_POSITION_SCALE: f32 = 0.25;

// Trail lines
pub const TRAIL_SPEED_MIN: f32 = 0.15;
pub const TRAIL_SPEED_SPAN: f32 = 0.15;
pub const TRAIL_PHASE_SPAN: f32 = 100.0;
pub const TRAIL_SMOOTHING_MIN: f32 = 0.25;
pub const TRAIL_SMOOTHING_SPAN: f32 = 0.2;
pub const TRAIL_HEADING_BLEND: f32 = 0.35; // per tick, toward the field sample
pub const TRAIL_STEP_BASE: f32 = 0.028;
pub const TRAIL_STEP_SPEED_GAIN: f32 = 0.02;
pub const TRAIL_START_RADIUS_FRACTION: f32 = 0.6; // of bounds
pub const TRAIL_START_Y_SHIFT: f32 = -1.5;
pub const TRAIL_OPACITY: f32 = 0.85;

// Color cycling
pub const COLOR_STEP_MIN: f32 = 0.02;
pub const COLOR_STEP_JITTER: f32 = 0.02;

// Growth branches
pub const FOREST_SEED_SALT: u64 = 0x6272_616E_6368_6573; // "branches"
pub const BRANCH_SEED_RADIUS: f32 = 0.5;
pub const BRANCH_MAX_POINTS_MIN: usize = 60;
pub const BRANCH_MAX_POINTS_SPAN: usize = 80;
pub const BRANCH_STEP_LENGTH: f32 = 0.08;
pub const BRANCH_CHILD_STEP_SCALE: f32 = 0.8;
pub const BRANCH_MIN_STEP_LENGTH: f32 = 0.03;
pub const BRANCH_DAMPING: f32 = 0.92;
pub const BRANCH_OUTWARD_BIAS: f32 = 0.02;
pub const BRANCH_WOBBLE: f32 = 0.03;
pub const BRANCH_CONTINUITY_BLEND: f32 = 0.3;
pub const BRANCH_SHARP_TURN_EVERY: usize = 8;
pub const BRANCH_SHARP_TURN_KICK: f32 = 0.35;
pub const BRANCH_SPAWN_CHANCE: f32 = 0.015;
pub const BRANCH_SPAWN_MIN_POINTS: usize = 10; // strictly more than this many
pub const BRANCH_CHILD_MAX_ANGLE: f32 = 0.6; // radians
pub const BRANCH_OPACITY: f32 = 0.8;

// Dust
pub const DUST_RADIUS_FRACTION: f32 = 0.9; // of bounds
pub const DUST_OPACITY_BASE: f32 = 0.2;
pub const DUST_OPACITY_SWING: f32 = 0.1;
pub const DUST_OPACITY_RATE: f64 = 0.0005; // per millisecond
pub const DUST_POINT_SIZE: f32 = 0.06; // world units
pub const DUST_COLOR: u32 = 0xFFFFFF;

// Scene rotation
pub const AUTO_ROTATE_Y: f32 = 0.003; // radians per frame
pub const SCROLL_TILT_X: f32 = 0.25;
pub const SCROLL_TURN_Y: f32 = 0.5;
pub const ROTATION_EASE: f32 = 0.05;
pub const SWAY_Z_AMPLITUDE: f32 = 0.08;
pub const SWAY_Z_RATE: f64 = 0.0001; // per millisecond

// Camera and viewport
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;
pub const FOG_COLOR: u32 = 0xFFFFFF;
