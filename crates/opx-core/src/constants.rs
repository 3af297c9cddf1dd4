use glam::Vec3;

use crate::easing::Easing;

// Shared animation tuning constants. Band boundaries are scroll progress in
// [0, 1] unless a name says otherwise.

// Scroll sampling
pub const VELOCITY_SMOOTHING: f32 = 0.5; // blend factor toward the raw px/s reading

// Pointer tilt (whole logo group)
pub const TILT_DAMPING: f32 = 0.1; // k in current += (target - current) * k
pub const TILT_ROLL_PER_POINTER_X: f32 = 0.1; // radians of Z roll at pointer x = ±1
pub const TILT_PITCH_PER_POINTER_Y: f32 = 0.05; // radians of X pitch at pointer y = ±1

// Gentle hover applied to logo groups
pub const FLOAT_SPEED: f32 = 1.0;
pub const FLOAT_ROTATION_INTENSITY: f32 = 0.1;
pub const FLOAT_HEIGHT_INTENSITY: f32 = 0.3;

// Camera dolly
pub const CAMERA_INITIAL_Z: f32 = 12.0; // where the canvas camera starts before following
pub const CAMERA_START_Z: f32 = 10.0;
pub const CAMERA_HOLD_END: f32 = 0.4;
pub const CAMERA_HOLD_Z: f32 = 9.4; // gentle forward creep while the logo exits
pub const CAMERA_PUSH_END: f32 = 0.8;
pub const CAMERA_PUSH_Z: f32 = 7.0;
pub const CAMERA_PULL_Z: f32 = 15.0; // pulled back for the content section
pub const CAMERA_HOLD_EASING: Easing = Easing::Linear;
pub const CAMERA_PUSH_EASING: Easing = Easing::QuadInOut;
pub const CAMERA_PULL_EASING: Easing = Easing::CubicOut;
pub const CAMERA_FOLLOW_RATE: f32 = 2.0; // per second
pub const CAMERA_FOV_DESKTOP_DEG: f32 = 60.0;
pub const CAMERA_FOV_MOBILE_DEG: f32 = 70.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Scene-level fades
pub const ATMOSPHERIC_FADE_START: f32 = 0.2;
pub const ATMOSPHERIC_FADE_END: f32 = 0.4;
pub const SECONDARY_FADE_START: f32 = 0.4; // falcon and palm cloud
pub const SECONDARY_FADE_END: f32 = 0.6;

// Opening logo
pub const LOGO_PIECE_RADIUS: f32 = 0.9; // world radius of a normalized logo piece
pub const LOGO_POINT_SIZE: f32 = 0.045;
pub const LOGO_COLOR: [f32; 3] = [0.8, 0.85, 0.95]; // frosted glass
pub const LOGO_GLYPH_SAMPLES: usize = 60; // fallback outline samples per unit length
pub const LOGO_MAX_POINTS: usize = 1500; // per piece, after subsampling an asset
pub const LOGO_EDGE_MARGIN: f32 = 2.0; // how far past the viewport edge pieces park
pub const LOGO_ENTRY_DURATION_SEC: f32 = 2.0;
pub const LOGO_ENTRY_EASING: Easing = Easing::CubicOut;
pub const LOGO_ENTRY_START_SCALE: f32 = 0.5;
pub const LOGO_EXIT_EASING: Easing = Easing::CubicOut;
pub const LOGO_O_SLOT: Vec3 = Vec3::new(-2.7, 0.2, 0.0);
pub const LOGO_P_SLOT: Vec3 = Vec3::new(-0.7, -0.6, 0.0);
pub const LOGO_X_SLOT: Vec3 = Vec3::new(1.3, -1.0, 0.0);
pub const LOGO_X_EXIT_START: f32 = 0.1; // X leaves first
pub const LOGO_X_EXIT_END: f32 = 0.2;
pub const LOGO_P_EXIT_START: f32 = 0.2;
pub const LOGO_P_EXIT_END: f32 = 0.25;
pub const LOGO_O_SHIFT_START: f32 = 0.23; // O slides into P's slot
pub const LOGO_O_SHIFT_END: f32 = 0.3;
pub const LOGO_O_SHIFT_EASING: Easing = Easing::CubicOut;
pub const LOGO_O_EXIT_START: f32 = 0.3;
pub const LOGO_O_EXIT_END: f32 = 0.4;

// Closing logo assembly, phases local to [ASSEMBLY_START, ASSEMBLY_END]
pub const ASSEMBLY_START: f32 = 0.95;
pub const ASSEMBLY_END: f32 = 1.0;
pub const ASSEMBLY_O_APPEAR_END: f32 = 0.2;
pub const ASSEMBLY_P_APPEAR_START: f32 = 0.2;
pub const ASSEMBLY_P_APPEAR_END: f32 = 0.4;
pub const ASSEMBLY_X_APPEAR_START: f32 = 0.4;
pub const ASSEMBLY_X_APPEAR_END: f32 = 0.6;
pub const ASSEMBLY_TURN_START: f32 = 0.6;
pub const ASSEMBLY_TURN_RADIANS: f32 = std::f32::consts::PI * 0.2; // 36 degrees
pub const ASSEMBLY_EASING: Easing = Easing::CubicOut;
pub const ASSEMBLY_O_RISE_FROM: Vec3 = Vec3::new(0.0, -5.0, 0.0);
pub const ASSEMBLY_O_SLOT: Vec3 = Vec3::new(-3.5, 0.2, 0.0);
pub const ASSEMBLY_P_SLOT: Vec3 = Vec3::new(-1.5, -0.9, 0.0);
pub const ASSEMBLY_X_SLOT: Vec3 = Vec3::new(1.3, -1.0, 0.0);
pub const ASSEMBLY_ARRIVAL_SCALE: f32 = 0.5; // P and X grow from half size

// Atmospheric nebula
pub const NEBULA_COUNT: usize = 500;
pub const NEBULA_RADIUS_MIN: f32 = 15.0;
pub const NEBULA_RADIUS_SPAN: f32 = 25.0;
pub const NEBULA_POINT_SIZE: f32 = 0.2;
pub const NEBULA_SPIN_RATE: f32 = 0.05; // rad/s about Y
pub const NEBULA_SCROLL_SPIN: f32 = std::f32::consts::FRAC_PI_2; // extra Y turn over the full scroll
pub const NEBULA_WOBBLE: f32 = 0.1;
pub const NEBULA_BASE_OPACITY: f32 = 0.3;
pub const NEBULA_SCROLL_OPACITY: f32 = 0.4;
pub const NEBULA_PALETTE: [[f32; 3]; 5] = [
    [0.0, 0.941, 1.0],   // cyan
    [1.0, 0.110, 0.969], // magenta
    [0.486, 0.227, 0.929], // purple
    [1.0, 0.843, 0.0],   // gold
    [0.102, 1.0, 0.639], // mint
];

// Gold swarm
pub const GOLD_COUNT: usize = 600;
pub const GOLD_RADIUS_MIN: f32 = 1.0;
pub const GOLD_RADIUS_SPAN: f32 = 12.0;
pub const GOLD_HEIGHT_SPAN: f32 = 10.0;
pub const GOLD_DEPTH_SQUASH: f32 = 0.8;
pub const GOLD_DEPTH_OFFSET: f32 = 1.0;
pub const GOLD_SIZE_MIN: f32 = 0.05;
pub const GOLD_SIZE_SPAN: f32 = 0.25;
pub const GOLD_BASE_OPACITY: f32 = 0.3;
pub const GOLD_FADE_START: f32 = 0.65;
pub const GOLD_FADE_END: f32 = 0.85;
// Opacity reached where the fade-out begins, so the swarm never jumps
pub const GOLD_PEAK_OPACITY: f32 = GOLD_BASE_OPACITY + (1.0 - GOLD_BASE_OPACITY) * GOLD_FADE_START;
pub const GOLD_SCROLL_DRIFT: f32 = 0.25; // steady push along x and y at sin(pi p) = 1
pub const GOLD_JITTER: f32 = 0.03; // per-particle wander amplitude
pub const GOLD_VORTEX_PER_PROGRESS: f32 = 0.3;
pub const GOLD_VORTEX_WEIGHT: f32 = 0.15;
pub const GOLD_SPREAD_PER_PROGRESS: f32 = 2.5;
pub const GOLD_SPREAD_MAX: f32 = 2.0;
pub const GOLD_PULSE: f32 = 0.25;

// Star field
pub const STAR_COUNT: usize = 2000;
pub const STAR_RADIUS: f32 = 90.0;
pub const STAR_DEPTH: f32 = 50.0;
pub const STAR_POINT_SIZE: f32 = 0.6;
pub const STAR_BASE_SPEED: f32 = 0.5;
pub const STAR_SCROLL_SPEED: f32 = 2.0; // extra twinkle/spin speed at full progress
pub const STAR_SPIN_PER_SPEED: f32 = 0.01; // rad/s of spin per unit speed
pub const STAR_SCROLL_GROWTH: f32 = 0.5; // group scale is 1 + growth * progress

// Palm cloud
pub const PALM_SAMPLE_TARGET: usize = 3000; // vertices sampled from the asset
pub const PALM_ASSET_SCALE: f32 = 0.2;
pub const PALM_ASSET_DROP: f32 = 7.0;
pub const PALM_GRADIENT_RADIUS: f32 = 8.0;
pub const PALM_NEAR_COLOR: [f32; 3] = [1.0, 1.0, 0.0]; // yellow by the logo
pub const PALM_FAR_COLOR: [f32; 3] = [0.1, 0.4, 0.1]; // dark green at the rim
pub const PALM_FALLBACK_GRID: usize = 20;
pub const PALM_FALLBACK_SPACING: f32 = 0.5;
pub const PALM_FALLBACK_GRADIENT_RADIUS: f32 = 6.65; // 1.4 x the grid half-width
pub const PALM_POINT_SIZE: f32 = 0.15;
pub const PALM_RISE_FROM: f32 = -15.0;
pub const PALM_RISE_SPAN: f32 = 30.0;
pub const PALM_TURN_RATE: f32 = 0.3; // fraction of a full turn over the scroll
pub const PALM_TURN_RATE_REDUCED: f32 = 0.1;
pub const PALM_POINTER_REACH: f32 = 3.0; // pointer NDC to local units
pub const PALM_REPEL_RADIUS: f32 = 2.0;
pub const PALM_REPEL_STRENGTH: f32 = 0.3;
pub const PALM_RELAX: f32 = 0.1;
pub const PALM_WAVE: f32 = 0.05;

// Falcon
pub const FALCON_ORBIT_RADIUS: f32 = 7.0;
pub const FALCON_SPEED: f32 = 1.0;
pub const FALCON_SPEED_REDUCED: f32 = 0.5;
pub const FALCON_BOB: f32 = 2.0;
pub const FALCON_LOOK_AHEAD: f32 = 0.1;
pub const FALCON_RADIUS: f32 = 1.2; // world radius of the normalized model
pub const FALCON_POINT_SIZE: f32 = 0.06;
pub const FALCON_COLOR: [f32; 3] = [0.85, 0.8, 0.7];
pub const FALCON_MAX_POINTS: usize = 2000;

// Pointer trail
pub const TRAIL_SPEED_THRESHOLD: f32 = 0.003;
pub const TRAIL_SPAWN_PER_SPEED: f32 = 30.0;
pub const TRAIL_SPAWN_PER_SPEED_MOBILE: f32 = 15.0;
pub const TRAIL_MAX_PER_EVENT: usize = 3;
pub const TRAIL_MAX_PER_EVENT_MOBILE: usize = 2;
pub const TRAIL_MAX_LIVE: usize = 80;
pub const TRAIL_MAX_LIVE_MOBILE: usize = 40;
pub const TRAIL_LIFE_MIN: f32 = 1.0;
pub const TRAIL_LIFE_SPAN: f32 = 0.5;
pub const TRAIL_DECAY_PER_SEC: f32 = 0.7;
pub const TRAIL_ANGLE_JITTER: f32 = 0.2;
pub const TRAIL_SPEED_MIN: f32 = 2.0;
pub const TRAIL_SPEED_SPAN: f32 = 2.0;
pub const TRAIL_SIZE_MIN: f32 = 0.04;
pub const TRAIL_SIZE_SPAN: f32 = 0.06;
pub const TRAIL_COLOR: [f32; 3] = [0.7, 0.9, 1.0];
pub const TRAIL_INTENSITY: f32 = 3.0;

// Content panels (DOM sections)
pub const PANEL_ENTRY_STARTS: [f32; 4] = [0.7, 0.775, 0.85, 0.925];
pub const PANEL_ENTRY_SPAN: f32 = 0.075;
pub const PANEL_EXIT_SPAN: f32 = 0.0375; // overlaps the next panel's entry
pub const PANEL_LAST_EXIT_START: f32 = 0.975; // clears room for the closing logo
pub const PANEL_SLIDE_PX: f32 = 100.0;
pub const PANEL_BLUR_PX: f32 = 8.0;
pub const PANEL_EXIT_SCALE_DROP: f32 = 0.5;
pub const PANEL_MIN_SCALE: f32 = 0.1;
pub const PANEL_EXIT_SPAN_DEFAULT: f32 = 0.15; // exit band after a free-standing panel's end
pub const PANEL_FLOAT_PX: f32 = 4.0;
pub const PANEL_FLOAT_RATE: f32 = 0.5;
pub const PANEL_ROLL_AMPLITUDE: f32 = 0.01;
pub const PANEL_ROLL_RATE: f32 = 0.3;

// Liquid backdrop behind the content
pub const BACKDROP_FADE_START: f32 = 0.8;
pub const BACKDROP_FADE_END: f32 = 0.95;
pub const BACKDROP_DISPLACEMENT: f32 = 0.3;

// Post-processing
pub const POST_VELOCITY_SCALE: f32 = 1.0 / 60.0; // px/s to px per 60 Hz frame
pub const BLOOM_MIN: f32 = 0.3;
pub const BLOOM_MAX: f32 = 1.2;
pub const BLOOM_REDUCED: f32 = 0.5;
pub const BLOOM_THRESHOLD: f32 = 0.7;
pub const CHROMA_BASE_OFFSET: f32 = 0.0005;
pub const CHROMA_REDUCED_OFFSET: f32 = 0.0001;
pub const CHROMA_VELOCITY_GAIN: f32 = 0.0001;
pub const CHROMA_VELOCITY_MAX: f32 = 0.003;
pub const CHROMA_VELOCITY_BOOST: f32 = 5.0;
pub const VIGNETTE_OFFSET: f32 = 0.3;
pub const VIGNETTE_MIN: f32 = 0.3;
pub const VIGNETTE_MAX: f32 = 0.7;
pub const VIGNETTE_REDUCED: f32 = 0.4;
pub const BRIGHTNESS_BASE: f32 = -0.05;
pub const BRIGHTNESS_SPAN: f32 = 0.1;
pub const CONTRAST_BASE: f32 = 0.1;
pub const CONTRAST_SPAN: f32 = 0.15;
pub const HUE_SPAN: f32 = 0.1;
pub const SATURATION_BASE: f32 = 0.05;
pub const SATURATION_SPAN: f32 = 0.1;
pub const GRAIN_BASE: f32 = 0.02;
pub const GRAIN_REDUCED: f32 = 0.005;
pub const GRAIN_VELOCITY_GAIN: f32 = 0.0002;
pub const GRAIN_VELOCITY_MAX: f32 = 0.08;
pub const TONEMAP_WHITE_POINT: f32 = 4.0;
pub const BOKEH_MIN: f32 = 1.0;
pub const BOKEH_MAX: f32 = 3.0;
pub const BOKEH_REDUCED: f32 = 0.5;

// Adaptive quality
pub const FPS_WINDOW_MS: f64 = 1000.0;
pub const LOW_FPS_THRESHOLD: u32 = 30;
