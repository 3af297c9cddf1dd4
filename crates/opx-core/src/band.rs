//! Declarative band tables.
//!
//! A [`BandTable`] partitions progress into ordered, non-overlapping bands.
//! Each band eases its [`Tween`] from `from` to `to` across its sub-range.
//! Outside every band the table holds the nearest settled value: the first
//! band's `from` before it starts, and the previous band's `to` in gaps and
//! after the last band. Animators are built from these tables instead of
//! hand-written threshold chains.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use thiserror::Error;

use crate::easing::{band_fraction, Easing};

/// Values that can be blended by a band and compared for continuity.
pub trait Interpolate: Clone {
    fn lerp(&self, to: &Self, t: f32) -> Self;
    /// Magnitude of the difference between two values.
    fn distance(&self, other: &Self) -> f32;
}

impl Interpolate for f32 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
    #[inline]
    fn distance(&self, other: &Self) -> f32 {
        (self - other).abs()
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Vec2::lerp(*self, *to, t)
    }
    #[inline]
    fn distance(&self, other: &Self) -> f32 {
        Vec2::distance(*self, *other)
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn lerp(&self, to: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *to, t)
    }
    #[inline]
    fn distance(&self, other: &Self) -> f32 {
        Vec3::distance(*self, *other)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tween<T> {
    pub from: T,
    pub to: T,
}

impl<T: Clone> Tween<T> {
    pub fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    pub fn hold(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
        }
    }
}

/// One `{start, end, easing, effect}` record.
#[derive(Clone, Debug, PartialEq)]
pub struct Band<T> {
    pub start: f32,
    pub end: f32,
    pub easing: Easing,
    pub effect: Tween<T>,
}

impl<T: Interpolate> Band<T> {
    pub fn new(start: f32, end: f32, easing: Easing, from: T, to: T) -> Self {
        Self {
            start,
            end,
            easing,
            effect: Tween::new(from, to),
        }
    }

    pub fn hold(start: f32, end: f32, value: T) -> Self {
        Self {
            start,
            end,
            easing: Easing::Linear,
            effect: Tween::hold(value),
        }
    }

    /// Eased fraction of this band reached at progress `p`.
    #[inline]
    pub fn fraction(&self, p: f32) -> f32 {
        self.easing.apply(band_fraction(p, self.start, self.end))
    }

    #[inline]
    pub fn value_at(&self, p: f32) -> T {
        self.effect.from.lerp(&self.effect.to, self.fraction(p))
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandTableError {
    #[error("band table has no bands")]
    Empty,
    #[error("band {index} has bounds outside [0, 1]: {start}..{end}")]
    OutOfRange { index: usize, start: f32, end: f32 },
    #[error("band {index} ends before it starts: {start}..{end}")]
    Inverted { index: usize, start: f32, end: f32 },
    #[error("band {index} starts at {start} before the previous band ends at {prev_end}")]
    Overlap {
        index: usize,
        start: f32,
        prev_end: f32,
    },
}

#[derive(Clone, Debug)]
pub struct BandTable<T> {
    bands: SmallVec<[Band<T>; 4]>,
}

impl<T: Interpolate> BandTable<T> {
    pub fn new(bands: impl IntoIterator<Item = Band<T>>) -> Result<Self, BandTableError> {
        let bands: SmallVec<[Band<T>; 4]> = bands.into_iter().collect();
        if bands.is_empty() {
            return Err(BandTableError::Empty);
        }
        let mut prev_end = 0.0_f32;
        for (index, b) in bands.iter().enumerate() {
            let in_unit = |v: f32| (0.0..=1.0).contains(&v);
            if !in_unit(b.start) || !in_unit(b.end) {
                return Err(BandTableError::OutOfRange {
                    index,
                    start: b.start,
                    end: b.end,
                });
            }
            if b.end < b.start {
                return Err(BandTableError::Inverted {
                    index,
                    start: b.start,
                    end: b.end,
                });
            }
            if index > 0 && b.start < prev_end {
                return Err(BandTableError::Overlap {
                    index,
                    start: b.start,
                    prev_end,
                });
            }
            prev_end = b.end;
        }
        Ok(Self { bands })
    }

    /// Table with a single band covering all of \[0, 1\].
    pub fn single(easing: Easing, from: T, to: T) -> Self {
        Self::from_band(Band::new(0.0, 1.0, easing, from, to))
    }

    /// Table holding one band, with its bounds clamped into \[0, 1\] and put
    /// in order so construction cannot fail.
    pub fn from_band(mut band: Band<T>) -> Self {
        let a = crate::scroll::clamp_progress(band.start);
        let b = crate::scroll::clamp_progress(band.end);
        band.start = a.min(b);
        band.end = a.max(b);
        let mut bands = SmallVec::new();
        bands.push(band);
        Self { bands }
    }

    pub fn bands(&self) -> &[Band<T>] {
        &self.bands
    }

    /// Band boundaries in ascending order, duplicates included.
    pub fn boundaries(&self) -> impl Iterator<Item = f32> + '_ {
        self.bands.iter().flat_map(|b| [b.start, b.end])
    }

    /// Value at progress `p`; `p` is clamped into \[0, 1\] first.
    pub fn sample(&self, p: f32) -> T {
        let p = crate::scroll::clamp_progress(p);
        let mut active: Option<&Band<T>> = None;
        for b in &self.bands {
            if p >= b.start {
                active = Some(b);
            } else {
                break;
            }
        }
        match active {
            Some(b) => b.value_at(p),
            // the constructor rejects empty tables, so `first` exists
            None => self.bands[0].effect.from.clone(),
        }
    }

    /// Progress values where adjacent settled values disagree by more than
    /// `tolerance`, i.e. where the table would jump.
    pub fn discontinuities(&self, tolerance: f32) -> Vec<f32> {
        self.bands
            .windows(2)
            .filter(|w| w[0].effect.to.distance(&w[1].effect.from) > tolerance)
            .map(|w| w[1].start)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade_table() -> BandTable<f32> {
        BandTable::new([
            Band::new(0.2, 0.4, Easing::Linear, 0.0, 1.0),
            Band::hold(0.4, 0.6, 1.0),
            Band::new(0.7, 0.9, Easing::CubicOut, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn holds_outside_bands() {
        let t = fade_table();
        assert_eq!(t.sample(0.0), 0.0);
        assert_eq!(t.sample(0.65), 1.0);
        assert_eq!(t.sample(1.0), 0.0);
    }

    #[test]
    fn interpolates_inside_band() {
        let t = fade_table();
        assert!((t.sample(0.3) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn sample_clamps_progress() {
        let t = fade_table();
        assert_eq!(t.sample(-4.0), t.sample(0.0));
        assert_eq!(t.sample(9.0), t.sample(1.0));
        assert_eq!(t.sample(f32::NAN), t.sample(0.0));
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            BandTable::<f32>::new(Vec::new()).unwrap_err(),
            BandTableError::Empty
        );
        assert!(matches!(
            BandTable::new([Band::hold(0.5, 1.2, 0.0_f32)]),
            Err(BandTableError::OutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            BandTable::new([Band::hold(0.6, 0.3, 0.0_f32)]),
            Err(BandTableError::Inverted { index: 0, .. })
        ));
        assert!(matches!(
            BandTable::new([Band::hold(0.0, 0.5, 0.0_f32), Band::hold(0.4, 0.6, 0.0)]),
            Err(BandTableError::Overlap { index: 1, .. })
        ));
    }

    #[test]
    fn reports_discontinuities() {
        let jumpy = BandTable::new([
            Band::new(0.0, 0.5, Easing::Linear, 0.0_f32, 1.0),
            Band::new(0.5, 1.0, Easing::Linear, 3.0, 4.0),
        ])
        .unwrap();
        assert_eq!(jumpy.discontinuities(1e-4), vec![0.5]);
        assert!(fade_table().discontinuities(1e-4).is_empty());
    }

    #[test]
    fn zero_width_band_is_a_step() {
        let t = BandTable::new([Band::new(0.5, 0.5, Easing::Linear, 0.0_f32, 2.0)]).unwrap();
        assert_eq!(t.sample(0.49), 0.0);
        assert_eq!(t.sample(0.5), 2.0);
    }
}
