/// Browser and renderer constants for the web front-end.
///
/// Scene behaviour (bands, easings, particle tuning) lives in the core crate;
/// this file only holds what the page glue and the GPU passes need.
// DOM ids the page provides or the overlay creates
pub const CANVAS_ID: &str = "scene-canvas";
pub const CONTENT_ID: &str = "scroll-content";
pub const BACKDROP_ID: &str = "liquid-backdrop";

// Page length in viewport heights; sets the scrollable extent
pub const SCROLL_LENGTH_VH: f32 = 800.0;

// Viewports narrower than this count as mobile (CSS px)
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Pointer moves kept between two frames; older ones are dropped
pub const POINTER_QUEUE_MAX: usize = 32;

// Longest frame step fed to the renderer's clock (s)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;

// Consecutive low-FPS windows before the quality tier steps down
pub const QUALITY_DOWNGRADE_STREAK: u32 = 2;

// Directory the point-cloud assets are served from
pub const ASSET_BASE_PATH: &str = "models/";

// Clear colour (#050510) and linear fog range (world units)
pub const CLEAR_RGB: [f64; 3] = [5.0 / 255.0, 5.0 / 255.0, 16.0 / 255.0];
pub const FOG_NEAR: f32 = 5.0;
pub const FOG_FAR: f32 = 35.0;

// Bloom targets are this many times smaller than the canvas
pub const BLOOM_DOWNSAMPLE: u32 = 2;

// Sprite instance buffer starts with room for this many sprites and grows
pub const SPRITE_INITIAL_CAPACITY: usize = 4096;

// Overlay panel motion is expressed in CSS px; blur is capped to stay cheap
pub const PANEL_MAX_BLUR_PX: f32 = 12.0;
pub const BACKDROP_MAX_BLUR_PX: f32 = 24.0;
