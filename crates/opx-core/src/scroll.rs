//! Scroll sampling and the shared progress cell.
//!
//! The page has exactly one writer of scroll state (the [`ScrollSampler`]) and
//! any number of readers (the entity animators). The split is enforced by
//! types: [`shared_scroll`] hands out a single non-cloneable [`ScrollWriter`]
//! and a cloneable [`ScrollReader`].

use std::cell::Cell;
use std::rc::Rc;

use crate::constants::VELOCITY_SMOOTHING;

/// Normalized scroll position and a relative velocity signal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Fraction of the scrollable distance traversed, always in \[0, 1\].
    pub progress: f32,
    /// Signed scroll speed in pixels per second. Only meaningful relatively.
    pub velocity: f32,
}

impl ScrollState {
    /// Build a state, clamping progress and scrubbing non-finite input.
    pub fn new(progress: f32, velocity: f32) -> Self {
        Self {
            progress: clamp_progress(progress),
            velocity: if velocity.is_finite() { velocity } else { 0.0 },
        }
    }
}

/// Clamp any progress value into \[0, 1\]; NaN maps to 0.
#[inline]
pub fn clamp_progress(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// `clamp(offset / extent, 0, 1)`, with 0 for a zero or broken extent.
#[inline]
pub fn normalized_progress(offset: f64, extent: f64) -> f32 {
    if !offset.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    (offset / extent).clamp(0.0, 1.0) as f32
}

/// Create the shared cell, returning its only writer and a first reader.
pub fn shared_scroll() -> (ScrollWriter, ScrollReader) {
    let cell = Rc::new(Cell::new(ScrollState::default()));
    (ScrollWriter { cell: cell.clone() }, ScrollReader { cell })
}

/// Write half of the shared scroll cell. Deliberately not `Clone`.
#[derive(Debug)]
pub struct ScrollWriter {
    cell: Rc<Cell<ScrollState>>,
}

impl ScrollWriter {
    pub fn publish(&self, state: ScrollState) {
        self.cell.set(ScrollState::new(state.progress, state.velocity));
    }

    pub fn reader(&self) -> ScrollReader {
        ScrollReader {
            cell: self.cell.clone(),
        }
    }
}

/// Read-only view of the shared scroll cell.
#[derive(Clone, Debug)]
pub struct ScrollReader {
    cell: Rc<Cell<ScrollState>>,
}

impl ScrollReader {
    #[inline]
    pub fn get(&self) -> ScrollState {
        self.cell.get()
    }
}

/// Converts raw scroll offsets into [`ScrollState`] and publishes it.
#[derive(Debug)]
pub struct ScrollSampler {
    writer: ScrollWriter,
    last_offset: Option<f64>,
    last_time_sec: f64,
    velocity: f32,
}

impl ScrollSampler {
    pub fn new(writer: ScrollWriter) -> Self {
        Self {
            writer,
            last_offset: None,
            last_time_sec: 0.0,
            velocity: 0.0,
        }
    }

    pub fn reader(&self) -> ScrollReader {
        self.writer.reader()
    }

    /// Sample one scroll reading and publish the resulting state.
    ///
    /// `timestamp_sec` must be monotonic; a reading that does not advance the
    /// clock keeps the previous velocity rather than dividing by zero.
    pub fn sample(&mut self, offset_px: f64, extent_px: f64, timestamp_sec: f64) -> ScrollState {
        let progress = normalized_progress(offset_px, extent_px);
        let offset = if offset_px.is_finite() { offset_px } else { 0.0 };

        if let Some(prev) = self.last_offset {
            let dt = timestamp_sec - self.last_time_sec;
            if dt.is_finite() && dt > 0.0 {
                let raw = ((offset - prev) / dt) as f32;
                if raw.is_finite() {
                    self.velocity += (raw - self.velocity) * VELOCITY_SMOOTHING;
                }
                self.last_offset = Some(offset);
                self.last_time_sec = timestamp_sec;
            }
        } else {
            self.last_offset = Some(offset);
            self.last_time_sec = timestamp_sec;
        }

        let state = ScrollState::new(progress, self.velocity);
        self.writer.publish(state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_and_guards_zero_extent() {
        assert_eq!(normalized_progress(50.0, 100.0), 0.5);
        assert_eq!(normalized_progress(-20.0, 100.0), 0.0);
        assert_eq!(normalized_progress(500.0, 100.0), 1.0);
        assert_eq!(normalized_progress(10.0, 0.0), 0.0);
        assert_eq!(normalized_progress(f64::NAN, 100.0), 0.0);
        assert_eq!(normalized_progress(10.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn readers_see_published_state() {
        let (writer, reader) = shared_scroll();
        let second = reader.clone();
        writer.publish(ScrollState::new(0.25, 12.0));
        assert_eq!(reader.get().progress, 0.25);
        assert_eq!(second.get().velocity, 12.0);
    }

    #[test]
    fn publish_clamps_out_of_range_progress() {
        let (writer, reader) = shared_scroll();
        writer.publish(ScrollState {
            progress: 3.0,
            velocity: f32::NAN,
        });
        assert_eq!(reader.get(), ScrollState::new(1.0, 0.0));
    }

    #[test]
    fn sampler_velocity_follows_scroll_direction() {
        let (writer, _) = shared_scroll();
        let mut sampler = ScrollSampler::new(writer);
        sampler.sample(0.0, 1000.0, 0.0);
        let down = sampler.sample(100.0, 1000.0, 0.1);
        assert!(down.velocity > 0.0);
        let mut up = down;
        for i in 0..10 {
            up = sampler.sample(100.0 - 50.0 * (i + 1) as f64, 1000.0, 0.2 + 0.1 * i as f64);
        }
        assert!(up.velocity < 0.0);
        assert_eq!(up.progress, 0.0);
    }

    #[test]
    fn sampler_keeps_velocity_when_clock_stalls() {
        let (writer, _) = shared_scroll();
        let mut sampler = ScrollSampler::new(writer);
        sampler.sample(0.0, 1000.0, 1.0);
        let a = sampler.sample(200.0, 1000.0, 1.5);
        let b = sampler.sample(400.0, 1000.0, 1.5);
        assert_eq!(a.velocity, b.velocity);
        assert!(b.velocity.is_finite());
        assert_eq!(b.progress, 0.4);
    }
}
