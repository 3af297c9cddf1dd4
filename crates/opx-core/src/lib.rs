pub mod animators;
pub mod assets;
pub mod band;
pub mod constants;
pub mod easing;
pub mod params;
pub mod pose;
pub mod quality;
pub mod scene;
pub mod scroll;
pub mod smoothing;
pub mod state;

pub use animators::{Animator, Sprite};
pub use assets::{AssetError, AssetId, AssetSlot, PointCloud};
pub use band::{Band, BandTable, BandTableError, Interpolate};
pub use easing::Easing;
pub use params::{ParamsError, SceneParams};
pub use pose::Pose;
pub use quality::{DeviceProfile, PerformanceMonitor, QualitySettings, QualityTier};
pub use scene::{Scene, SceneFrame};
pub use scroll::{shared_scroll, ScrollReader, ScrollSampler, ScrollState, ScrollWriter};
pub use state::{Camera, FrameInput};
