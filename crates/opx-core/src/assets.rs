//! Point-cloud assets and their procedural stand-ins.
//!
//! Assets are fetched by the front-end and handed to the core as raw bytes.
//! A fetch may fail or never finish; every consumer reads through an
//! [`AssetSlot`] and either substitutes a fallback or skips drawing.

use std::f32::consts::{PI, TAU};
use std::fmt;

use fnv::FnvHashMap;
use glam::Vec3;
use thiserror::Error;

use crate::constants::{PALM_ASSET_DROP, PALM_FALLBACK_GRID, PALM_FALLBACK_SPACING};

/// Magic prefix of the binary point-cloud format.
pub const POINT_CLOUD_MAGIC: [u8; 4] = *b"OPXP";
const HEADER_LEN: usize = 8;
const POINT_STRIDE: usize = 12;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("point cloud is {0} bytes, shorter than its header")]
    TooShort(usize),
    #[error("point cloud has a bad magic prefix")]
    BadMagic,
    #[error("point cloud declares {expected} bytes of points but carries {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("point cloud holds no points")]
    Empty,
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Model-space points. Colour and size are decided by the animator that
/// draws them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Vec3>,
}

impl PointCloud {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Decode `OPXP | u32 count | count × (f32 x, f32 y, f32 z)`, all
    /// little-endian.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        if bytes.len() < HEADER_LEN {
            return Err(AssetError::TooShort(bytes.len()));
        }
        if bytes[..4] != POINT_CLOUD_MAGIC {
            return Err(AssetError::BadMagic);
        }
        let count = u32::from_le(bytemuck::pod_read_unaligned::<u32>(&bytes[4..8])) as usize;
        if count == 0 {
            return Err(AssetError::Empty);
        }
        let body = &bytes[HEADER_LEN..];
        let expected = count.saturating_mul(POINT_STRIDE);
        if body.len() != expected {
            return Err(AssetError::LengthMismatch {
                expected,
                actual: body.len(),
            });
        }
        let mut points = Vec::with_capacity(count);
        for (index, chunk) in body.chunks_exact(POINT_STRIDE).enumerate() {
            let raw: [u32; 3] = bytemuck::pod_read_unaligned(chunk);
            let p = Vec3::new(
                f32::from_bits(u32::from_le(raw[0])),
                f32::from_bits(u32::from_le(raw[1])),
                f32::from_bits(u32::from_le(raw[2])),
            );
            if !p.is_finite() {
                return Err(AssetError::NonFinite { index });
            }
            points.push(p);
        }
        Ok(Self { points })
    }

    /// Inverse of [`PointCloud::decode`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.points.len() * POINT_STRIDE);
        out.extend_from_slice(&POINT_CLOUD_MAGIC);
        out.extend_from_slice(&(self.points.len() as u32).to_le_bytes());
        for p in &self.points {
            for c in p.to_array() {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out
    }

    /// Centre on the bounding-box midpoint and scale so the farthest point
    /// sits at distance 1. A single-point cloud collapses to the origin.
    pub fn normalized(&self) -> Self {
        if self.points.is_empty() {
            return self.clone();
        }
        let (min, max) = self
            .points
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        let center = (min + max) * 0.5;
        let radius = self
            .points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0_f32, f32::max);
        let inv = if radius > f32::EPSILON { 1.0 / radius } else { 0.0 };
        Self {
            points: self.points.iter().map(|p| (*p - center) * inv).collect(),
        }
    }

    /// Keep at most `max` points with an even stride. Deterministic.
    pub fn subsampled(&self, max: usize) -> Self {
        if max == 0 {
            return Self::default();
        }
        if self.points.len() <= max {
            return self.clone();
        }
        let step = self.points.len() as f32 / max as f32;
        Self {
            points: (0..max)
                .map(|i| self.points[((i as f32 * step) as usize).min(self.points.len() - 1)])
                .collect(),
        }
    }
}

/// Loading state of one asset.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AssetSlot<T> {
    #[default]
    Pending,
    Ready(T),
    Failed(AssetError),
}

impl<T> AssetSlot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSlot::Pending)
    }

    pub fn resolve(&mut self, result: Result<T, AssetError>) {
        *self = match result {
            Ok(v) => AssetSlot::Ready(v),
            Err(e) => AssetSlot::Failed(e),
        };
    }
}

/// The point-cloud assets the scene knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    LogoO,
    LogoP,
    LogoX,
    Palm,
    Falcon,
}

impl AssetId {
    pub const ALL: [AssetId; 5] = [
        AssetId::LogoO,
        AssetId::LogoP,
        AssetId::LogoX,
        AssetId::Palm,
        AssetId::Falcon,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetId::LogoO => "logo-o.bin",
            AssetId::LogoP => "logo-p.bin",
            AssetId::LogoX => "logo-x.bin",
            AssetId::Palm => "palm.bin",
            AssetId::Falcon => "falcon.bin",
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Loading state for every [`AssetId`].
#[derive(Debug)]
pub struct AssetRegistry {
    slots: FnvHashMap<AssetId, AssetSlot<PointCloud>>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        let slots = AssetId::ALL
            .iter()
            .map(|id| (*id, AssetSlot::Pending))
            .collect();
        Self { slots }
    }

    pub fn slot(&self, id: AssetId) -> &AssetSlot<PointCloud> {
        static PENDING: AssetSlot<PointCloud> = AssetSlot::Pending;
        self.slots.get(&id).unwrap_or(&PENDING)
    }

    /// Record a fetch outcome. Failures are logged and kept so the slot never
    /// returns to pending.
    pub fn resolve(&mut self, id: AssetId, result: Result<PointCloud, AssetError>) {
        if let Err(e) = &result {
            log::warn!("[assets] {id} unavailable, using fallback: {e}");
        }
        self.slots.entry(id).or_default().resolve(result);
    }

    pub fn pending(&self) -> impl Iterator<Item = AssetId> + '_ {
        AssetId::ALL
            .into_iter()
            .filter(|id| self.slot(*id).is_pending())
    }
}

/// Logo letters drawn procedurally while their assets are missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    O,
    P,
    X,
}

impl Glyph {
    pub fn asset(self) -> AssetId {
        match self {
            Glyph::O => AssetId::LogoO,
            Glyph::P => AssetId::LogoP,
            Glyph::X => AssetId::LogoX,
        }
    }
}

/// Stroked outline of a letter, normalized to unit radius.
pub fn glyph_outline(glyph: Glyph, samples_per_unit: usize) -> PointCloud {
    let n = samples_per_unit.max(4);
    let mut points = Vec::new();
    let mut arc = |center: Vec3, radius: f32, from: f32, to: f32| {
        let steps = ((to - from).abs() * radius * n as f32).ceil().max(2.0) as usize;
        for i in 0..=steps {
            let a = from + (to - from) * i as f32 / steps as f32;
            points.push(center + Vec3::new(a.cos(), a.sin(), 0.0) * radius);
        }
    };
    match glyph {
        Glyph::O => {
            arc(Vec3::ZERO, 1.0, 0.0, TAU);
            arc(Vec3::ZERO, 0.7, 0.0, TAU);
        }
        Glyph::P => {
            arc(Vec3::new(-0.1, 0.45, 0.0), 0.55, -PI * 0.5, PI * 0.5);
        }
        Glyph::X => {}
    }
    let mut line = |a: Vec3, b: Vec3| {
        let steps = (a.distance(b) * n as f32).ceil().max(2.0) as usize;
        for i in 0..=steps {
            points.push(a.lerp(b, i as f32 / steps as f32));
        }
    };
    match glyph {
        Glyph::O => {}
        Glyph::P => {
            line(Vec3::new(-0.65, -1.0, 0.0), Vec3::new(-0.65, 1.0, 0.0));
            line(Vec3::new(-0.65, 1.0, 0.0), Vec3::new(-0.1, 1.0, 0.0));
            line(Vec3::new(-0.65, -0.1, 0.0), Vec3::new(-0.1, -0.1, 0.0));
        }
        Glyph::X => {
            line(Vec3::new(-0.8, -1.0, 0.0), Vec3::new(0.8, 1.0, 0.0));
            line(Vec3::new(-0.8, 1.0, 0.0), Vec3::new(0.8, -1.0, 0.0));
        }
    }
    PointCloud::new(points).normalized()
}

/// Undulating grid used in place of the palm model, already in palm-group
/// local space.
pub fn palm_fallback_grid() -> PointCloud {
    let center = (PALM_FALLBACK_GRID - 1) as f32 * PALM_FALLBACK_SPACING * 0.5;
    let mut points = Vec::with_capacity(PALM_FALLBACK_GRID * PALM_FALLBACK_GRID);
    for i in 0..PALM_FALLBACK_GRID {
        for j in 0..PALM_FALLBACK_GRID {
            let x = i as f32 * PALM_FALLBACK_SPACING - center;
            let z = j as f32 * PALM_FALLBACK_SPACING - center;
            let y = (i as f32 * 0.5).sin() * (j as f32 * 0.5).cos() * 2.0 - PALM_ASSET_DROP;
            points.push(Vec3::new(x, y, z));
        }
    }
    PointCloud::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cloud() -> PointCloud {
        PointCloud::new(vec![
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::new(4.0, -2.0, 1.0),
        ])
    }

    #[test]
    fn decode_reads_encoded_points() {
        let cloud = sample_cloud();
        assert_eq!(PointCloud::decode(&cloud.encode()), Ok(cloud));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert_eq!(PointCloud::decode(b"OPX"), Err(AssetError::TooShort(3)));
        assert_eq!(
            PointCloud::decode(b"NOPE\x01\0\0\0"),
            Err(AssetError::BadMagic)
        );
        assert_eq!(PointCloud::decode(b"OPXP\0\0\0\0"), Err(AssetError::Empty));

        let mut bytes = sample_cloud().encode();
        bytes.pop();
        assert!(matches!(
            PointCloud::decode(&bytes),
            Err(AssetError::LengthMismatch { expected: 36, actual: 35 })
        ));

        let bad = PointCloud::new(vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)]);
        assert_eq!(
            PointCloud::decode(&bad.encode()),
            Err(AssetError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn normalized_fits_unit_sphere() {
        let n = sample_cloud().normalized();
        let r = n.points.iter().map(|p| p.length()).fold(0.0, f32::max);
        assert!((r - 1.0).abs() < 1e-5);

        let single = PointCloud::new(vec![Vec3::splat(5.0)]).normalized();
        assert_eq!(single.points, vec![Vec3::ZERO]);
    }

    #[test]
    fn subsample_is_bounded_and_stable() {
        let big = PointCloud::new((0..1000).map(|i| Vec3::splat(i as f32)).collect());
        let a = big.subsampled(100);
        assert_eq!(a.len(), 100);
        assert_eq!(a, big.subsampled(100));
        assert_eq!(sample_cloud().subsampled(10).len(), 3);
        assert!(big.subsampled(0).is_empty());
    }

    #[test]
    fn registry_starts_pending_and_keeps_failures() {
        let mut reg = AssetRegistry::new();
        assert_eq!(reg.pending().count(), AssetId::ALL.len());
        reg.resolve(AssetId::Palm, Err(AssetError::Fetch("404".into())));
        assert!(matches!(reg.slot(AssetId::Palm), AssetSlot::Failed(_)));
        reg.resolve(AssetId::LogoO, Ok(sample_cloud()));
        assert!(reg.slot(AssetId::LogoO).ready().is_some());
        assert_eq!(reg.pending().count(), AssetId::ALL.len() - 2);
    }

    #[test]
    fn fallbacks_are_populated() {
        for g in [Glyph::O, Glyph::P, Glyph::X] {
            let c = glyph_outline(g, 24);
            assert!(c.len() > 20, "{g:?}");
            assert!(c.points.iter().all(|p| p.length() <= 1.0 + 1e-4));
        }
        let palm = palm_fallback_grid();
        assert_eq!(palm.len(), PALM_FALLBACK_GRID * PALM_FALLBACK_GRID);
        assert!(palm.points.iter().all(|p| p.y <= -5.0 + 1e-4 && p.y >= -9.0 - 1e-4));
    }
}
