//! Configuration for the viewer zoom controller.
//! Every field has a default so a page may override any subset of them.

use serde::{Deserialize, Serialize};

/// Id of the optional `<script type="application/json">` holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "ksxr-zoom-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Id of the element the viewer widget draws into.
    pub container_id: String,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per button click or wheel tick.
    pub step: f64,
    /// Scale the controller starts with before any interaction.
    pub initial_scale: f64,
    /// Scale restored by reset; offsets are pulled toward zero near it.
    pub default_scale: f64,
    /// Half-width of the band around `default_scale` where re-centering applies.
    pub snap_band: f64,
    /// Above this scale the container shows a move cursor.
    pub move_cursor_threshold: f64,
    /// Panning is only allowed strictly above this scale.
    pub drag_threshold: f64,
    pub init_delay_ms: i32,
    pub settle_delay_ms: i32,
    pub resize_delay_ms: i32,
    /// Text the indicator shows until the first zoom or reset.
    pub initial_label: String,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            container_id: "KeyShotXR".to_string(),
            min_scale: 0.05,
            max_scale: 2.0,
            step: 0.05,
            initial_scale: 1.0,
            default_scale: 0.8,
            snap_band: 0.05,
            move_cursor_threshold: 0.85,
            drag_threshold: 0.81,
            init_delay_ms: 500,
            settle_delay_ms: 10,
            resize_delay_ms: 100,
            initial_label: "80%".to_string(),
        }
    }
}

impl ZoomConfig {
    /// Parses a JSON override document; missing keys keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let cfg: ZoomConfig = serde_json::from_str(raw)?;
        Ok(cfg.sanitized())
    }

    /// Effective settings as JSON, for the mount log line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    // Keeps the scale range ordered and the step positive so zooming always terminates.
    fn sanitized(mut self) -> Self {
        let d = ZoomConfig::default();
        if !(self.min_scale > 0.0) {
            self.min_scale = d.min_scale;
        }
        if !(self.max_scale >= self.min_scale) {
            self.max_scale = self.min_scale.max(d.max_scale);
        }
        if !(self.step > 0.0) {
            self.step = d.step;
        }
        if !(self.snap_band > 0.0) {
            self.snap_band = d.snap_band;
        }
        self.initial_scale = self.initial_scale.clamp(self.min_scale, self.max_scale);
        self.default_scale = self.default_scale.clamp(self.min_scale, self.max_scale);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_viewer_constants() {
        let cfg = ZoomConfig::default();
        assert_eq!(cfg.container_id, "KeyShotXR");
        assert_eq!(cfg.min_scale, 0.05);
        assert_eq!(cfg.max_scale, 2.0);
        assert_eq!(cfg.step, 0.05);
        assert_eq!(cfg.initial_scale, 1.0);
        assert_eq!(cfg.default_scale, 0.8);
        assert_eq!(cfg.initial_label, "80%");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ZoomConfig::from_json(r#"{"container_id":"viewer","max_scale":3.0}"#).unwrap();
        assert_eq!(cfg.container_id, "viewer");
        assert_eq!(cfg.max_scale, 3.0);
        assert_eq!(cfg.step, 0.05);
        assert_eq!(cfg.settle_delay_ms, 10);
    }

    #[test]
    fn effective_config_is_logged_as_json() {
        let cfg = ZoomConfig::from_json(r#"{"container_id":"viewer","step":0.1}"#).unwrap();
        let json = cfg.to_json();
        assert!(json.contains(r#""container_id":"viewer""#));
        assert!(json.contains(r#""step":0.1"#));
        assert_eq!(ZoomConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ZoomConfig::from_json("{not json").is_err());
        assert!(ZoomConfig::from_json(r#"{"step":"big"}"#).is_err());
    }

    #[test]
    fn inverted_range_and_bad_step_are_repaired() {
        let cfg = ZoomConfig::from_json(r#"{"min_scale":0.5,"max_scale":0.1,"step":-1}"#).unwrap();
        assert!(cfg.max_scale >= cfg.min_scale);
        assert_eq!(cfg.step, 0.05);
        assert!(cfg.initial_scale >= cfg.min_scale && cfg.initial_scale <= cfg.max_scale);
    }
}
