//! Adaptive quality: a frame-rate monitor and device tiering.

use std::fmt;
use std::str::FromStr;

use crate::constants::{FPS_WINDOW_MS, LOW_FPS_THRESHOLD};
use crate::params::ParamsError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    pub fn step_down(self) -> Self {
        match self {
            QualityTier::High => QualityTier::Medium,
            _ => QualityTier::Low,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        })
    }
}

impl FromStr for QualityTier {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            _ => Err(ParamsError::InvalidValue {
                key: "quality",
                value: s.to_string(),
            }),
        }
    }
}

/// What the tier buys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualitySettings {
    pub tier: QualityTier,
    /// Upper bound on star-field points; other clouds scale with it.
    pub particle_budget: usize,
    pub dpr_min: f64,
    pub dpr_max: f64,
    pub target_fps: u32,
}

impl QualitySettings {
    pub fn for_tier(tier: QualityTier) -> Self {
        match tier {
            QualityTier::Low => Self {
                tier,
                particle_budget: 300,
                dpr_min: 0.5,
                dpr_max: 1.0,
                target_fps: 30,
            },
            QualityTier::Medium => Self {
                tier,
                particle_budget: 1000,
                dpr_min: 1.0,
                dpr_max: 1.5,
                target_fps: 45,
            },
            QualityTier::High => Self {
                tier,
                particle_budget: 2000,
                dpr_min: 1.0,
                dpr_max: 2.0,
                target_fps: 60,
            },
        }
    }

    /// Phones always get the low tier with a smaller budget.
    pub fn for_device(tier: QualityTier, mobile: bool) -> Self {
        if mobile {
            Self {
                particle_budget: 200,
                ..Self::for_tier(QualityTier::Low)
            }
        } else {
            Self::for_tier(tier)
        }
    }

    /// A tier forced from the query string wins, on phones too. Otherwise
    /// the detected tier goes through [`Self::for_device`].
    pub fn select(forced: Option<QualityTier>, detected: QualityTier, mobile: bool) -> Self {
        match forced {
            Some(tier) => Self::for_tier(tier),
            None => Self::for_device(detected, mobile),
        }
    }

    /// Fraction of the full particle counts this tier draws.
    pub fn particle_scale(&self) -> f32 {
        (self.particle_budget as f32 / Self::for_tier(QualityTier::High).particle_budget as f32)
            .clamp(0.05, 1.0)
    }

    pub fn clamp_dpr(&self, dpr: f64) -> f64 {
        if dpr.is_finite() {
            dpr.clamp(self.dpr_min, self.dpr_max)
        } else {
            self.dpr_min
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self::for_tier(QualityTier::default())
    }
}

/// Hardware hints gathered by the front-end. Missing values score nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceProfile {
    pub gpu_name: Option<String>,
    pub device_memory_gb: Option<f64>,
    pub hardware_concurrency: Option<u32>,
    pub fast_connection: bool,
    pub mobile: bool,
}

impl DeviceProfile {
    pub fn score(&self) -> f64 {
        let mut score = 1.0;
        if let Some(name) = &self.gpu_name {
            if ["GeForce", "Radeon", "Apple", "nvidia", "amd", "apple"]
                .iter()
                .any(|v| name.contains(v))
            {
                score += 2.0;
            }
        }
        if let Some(mem) = self.device_memory_gb.filter(|m| m.is_finite() && *m > 0.0) {
            score += (mem / 4.0).min(2.0);
        }
        if let Some(cores) = self.hardware_concurrency.filter(|c| *c > 0) {
            score += (cores as f64 / 4.0).min(1.0);
        }
        if self.fast_connection {
            score += 1.0;
        }
        score
    }

    pub fn tier(&self) -> QualityTier {
        let score = self.score();
        if score <= 2.0 {
            QualityTier::Low
        } else if score >= 5.0 {
            QualityTier::High
        } else {
            QualityTier::Medium
        }
    }
}

/// Frames-per-second over fixed one-second windows.
#[derive(Clone, Debug)]
pub struct PerformanceMonitor {
    frame_count: u32,
    window_start_ms: Option<f64>,
    fps: u32,
    low_performance: bool,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self {
            frame_count: 0,
            window_start_ms: None,
            fps: 60,
            low_performance: false,
        }
    }
}

impl PerformanceMonitor {
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn is_low_performance(&self) -> bool {
        self.low_performance
    }

    /// Count one frame. Returns the new FPS reading when a window closes.
    pub fn update(&mut self, now_ms: f64) -> Option<u32> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frame_count += 1;
        let elapsed = now_ms - start;
        if !elapsed.is_finite() || elapsed < FPS_WINDOW_MS {
            return None;
        }
        self.fps = (self.frame_count as f64 * 1000.0 / elapsed).round() as u32;
        self.frame_count = 0;
        self.window_start_ms = Some(now_ms);
        self.low_performance = self.fps < LOW_FPS_THRESHOLD;
        Some(self.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_reports_once_per_window() {
        let mut m = PerformanceMonitor::default();
        let mut reports = Vec::new();
        for i in 0..=120 {
            if let Some(fps) = m.update(i as f64 * 1000.0 / 60.0) {
                reports.push(fps);
            }
        }
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|f| (59..=61).contains(f)));
        assert!(!m.is_low_performance());
    }

    #[test]
    fn slow_frames_flag_low_performance() {
        let mut m = PerformanceMonitor::default();
        for i in 0..=20 {
            m.update(i as f64 * 100.0);
        }
        assert!(m.fps() < LOW_FPS_THRESHOLD);
        assert!(m.is_low_performance());
    }

    #[test]
    fn device_scores_map_to_tiers() {
        assert_eq!(DeviceProfile::default().tier(), QualityTier::Low);
        let desktop = DeviceProfile {
            gpu_name: Some("NVIDIA GeForce RTX".into()),
            device_memory_gb: Some(8.0),
            hardware_concurrency: Some(8),
            fast_connection: false,
            mobile: false,
        };
        assert_eq!(desktop.score(), 6.0);
        assert_eq!(desktop.tier(), QualityTier::High);
        let mid = DeviceProfile {
            device_memory_gb: Some(4.0),
            hardware_concurrency: Some(4),
            ..DeviceProfile::default()
        };
        assert_eq!(mid.tier(), QualityTier::Medium);
    }

    #[test]
    fn mobile_overrides_tier() {
        let s = QualitySettings::for_device(QualityTier::High, true);
        assert_eq!(s.tier, QualityTier::Low);
        assert_eq!(s.particle_budget, 200);
        assert_eq!(s.clamp_dpr(3.0), 1.0);
        assert_eq!(s.clamp_dpr(f64::NAN), 0.5);
        assert_eq!(QualityTier::High.step_down(), QualityTier::Medium);
        assert_eq!(QualityTier::Low.step_down(), QualityTier::Low);
    }

    #[test]
    fn forced_tier_wins_on_mobile() {
        let forced = QualitySettings::select(Some(QualityTier::High), QualityTier::Low, true);
        assert_eq!(forced, QualitySettings::for_tier(QualityTier::High));
        let detected = QualitySettings::select(None, QualityTier::High, true);
        assert_eq!(detected, QualitySettings::for_device(QualityTier::High, true));
        assert_eq!(
            QualitySettings::select(None, QualityTier::Medium, false).tier,
            QualityTier::Medium
        );
    }

    #[test]
    fn browser_adapter_names_count_as_discrete_gpus() {
        let base = DeviceProfile::default().score();
        for name in ["ANGLE (NVIDIA, NVIDIA GeForce RTX 3060)", "Apple M2", "AMD Radeon Pro"] {
            let p = DeviceProfile {
                gpu_name: Some(name.into()),
                ..DeviceProfile::default()
            };
            assert_eq!(p.score(), base + 2.0, "{name}");
        }
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<QualityTier>(), Ok(QualityTier::High));
        assert!("ultra".parse::<QualityTier>().is_err());
    }
}
