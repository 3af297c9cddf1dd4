//! Runtime configuration read from the page query string.

use thiserror::Error;

use crate::quality::QualityTier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Scene options a visitor (or a test harness) can override with
/// `?quality=low|medium|high&reduced_motion=1&seed=7&assets=0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneParams {
    /// Forced quality tier; detected from the device when `None`.
    pub quality: Option<QualityTier>,
    /// Force reduced motion regardless of the OS preference.
    pub reduced_motion: bool,
    /// Seed for procedural particle layouts.
    pub seed: u64,
    /// Fetch point-cloud assets; when off every entity uses its fallback.
    pub load_assets: bool,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            quality: None,
            reduced_motion: false,
            seed: 42,
            load_assets: true,
        }
    }
}

impl SceneParams {
    /// Parse a `location.search` string, with or without the leading `?`.
    /// Unknown keys are ignored. A malformed value leaves its key at the
    /// default and is returned alongside the params; the other keys still
    /// apply.
    pub fn from_query(query: &str) -> (Self, Vec<ParamsError>) {
        let mut params = Self::default();
        let mut errors = Vec::new();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if let Err(e) = params.apply(key, value) {
                errors.push(e);
            }
        }
        (params, errors)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ParamsError> {
        match key {
            "quality" => self.quality = Some(value.parse()?),
            "reduced_motion" => self.reduced_motion = parse_flag("reduced_motion", value)?,
            "seed" => {
                self.seed = value.parse().map_err(|_| ParamsError::InvalidValue {
                    key: "seed",
                    value: value.to_string(),
                })?
            }
            "assets" => self.load_assets = parse_flag("assets", value)?,
            _ => {}
        }
        Ok(())
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ParamsError> {
    match value {
        "" | "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(ParamsError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        assert_eq!(SceneParams::from_query(""), (SceneParams::default(), vec![]));
        assert_eq!(SceneParams::from_query("?"), (SceneParams::default(), vec![]));
    }

    #[test]
    fn parses_known_keys() {
        let (p, errors) =
            SceneParams::from_query("?quality=low&reduced_motion&seed=7&assets=0&lang=de");
        assert!(errors.is_empty());
        assert_eq!(p.quality, Some(QualityTier::Low));
        assert!(p.reduced_motion);
        assert_eq!(p.seed, 7);
        assert!(!p.load_assets);
    }

    #[test]
    fn reports_malformed_values() {
        let (p, errors) = SceneParams::from_query("seed=abc");
        assert_eq!(p, SceneParams::default());
        assert!(matches!(
            errors.as_slice(),
            [ParamsError::InvalidValue { key: "seed", .. }]
        ));
        assert_eq!(SceneParams::from_query("assets=maybe").1.len(), 1);
        assert_eq!(SceneParams::from_query("quality=ultra").1.len(), 1);
    }

    #[test]
    fn bad_value_does_not_discard_other_keys() {
        let (p, errors) = SceneParams::from_query("?reduced_motion=1&seed=abc&quality=high");
        assert!(p.reduced_motion);
        assert_eq!(p.quality, Some(QualityTier::High));
        assert_eq!(p.seed, SceneParams::default().seed);
        assert_eq!(errors.len(), 1);
    }
}
