//! Startup configuration: compiled-in defaults with optional per-page
//! overrides (the front-end reads them from `data-*` attributes).

use crate::constants::{AUTO_ROTATE_SPEED, DEFAULT_ASSET_PATH};
use std::str::FromStr;

pub const ASSET_ATTR: &str = "data-asset";
pub const AUTO_ROTATE_SPEED_ATTR: &str = "data-auto-rotate-speed";
pub const SCROLL_PULSE_ATTR: &str = "data-scroll-pulse";
pub const TONE_MAPPING_ATTR: &str = "data-tone-mapping";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToneMapping {
    #[default]
    None,
    AcesFilmic,
}

impl ToneMapping {
    /// Selector value consumed by `output.wgsl`.
    #[inline]
    pub fn shader_mode(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::AcesFilmic => 1,
        }
    }
}

impl FromStr for ToneMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(ToneMapping::None),
            "aces" | "aces-filmic" => Ok(ToneMapping::AcesFilmic),
            other => Err(format!("unknown tone mapping '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub asset_path: String,
    pub auto_rotate_speed: f32,
    pub scroll_pulse: bool,
    pub tone_mapping: ToneMapping,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_path: DEFAULT_ASSET_PATH.to_string(),
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            scroll_pulse: false,
            tone_mapping: ToneMapping::None,
        }
    }
}

impl SceneConfig {
    /// Apply overrides from `lookup(attribute_name)`. Values that fail to
    /// parse are logged and leave the default in place.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ASSET_ATTR) {
            let path = path.trim();
            if path.is_empty() {
                log::warn!("[config] empty {}; keeping {}", ASSET_ATTR, self.asset_path);
            } else {
                self.asset_path = path.to_string();
            }
        }
        if let Some(speed) = parse_attr::<f32>(&lookup, AUTO_ROTATE_SPEED_ATTR) {
            if speed.is_finite() {
                self.auto_rotate_speed = speed;
            } else {
                log::warn!("[config] non-finite {}; ignored", AUTO_ROTATE_SPEED_ATTR);
            }
        }
        if let Some(pulse) = parse_attr::<bool>(&lookup, SCROLL_PULSE_ATTR) {
            self.scroll_pulse = pulse;
        }
        if let Some(tm) = parse_attr::<ToneMapping>(&lookup, TONE_MAPPING_ATTR) {
            self.tone_mapping = tm;
        }
        self
    }
}

fn parse_attr<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("[config] ignoring {}=\"{}\": {}", name, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_mapping_parses_case_insensitively() {
        assert_eq!("ACES".parse::<ToneMapping>(), Ok(ToneMapping::AcesFilmic));
        assert!("reinhard".parse::<ToneMapping>().is_err());
    }
}
