// Zoom/pan state for the viewer image
use crate::model::ZoomConfig;
use crate::util::format_percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Scrolling up (negative delta) zooms in.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Limits {
    min: f64,
    max: f64,
    step: f64,
    default: f64,
    snap_band: f64,
    drag_threshold: f64,
    move_cursor_threshold: f64,
}

#[derive(Debug, Clone)]
pub struct ZoomState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub dragging: bool,
    pub last_x: f64,
    pub last_y: f64,
    limits: Limits,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(&ZoomConfig::default())
    }
}

impl ZoomState {
    pub fn new(cfg: &ZoomConfig) -> Self {
        Self {
            scale: cfg.initial_scale,
            offset_x: 0.0,
            offset_y: 0.0,
            dragging: false,
            last_x: 0.0,
            last_y: 0.0,
            limits: Limits {
                min: cfg.min_scale,
                max: cfg.max_scale,
                step: cfg.step,
                default: cfg.default_scale,
                snap_band: cfg.snap_band,
                drag_threshold: cfg.drag_threshold,
                move_cursor_threshold: cfg.move_cursor_threshold,
            },
        }
    }

    /// Steps the scale one notch. `focus` is the pointer position relative to the
    /// container center; the image point under it stays put. Returns false when
    /// already at the bound in that direction.
    pub fn zoom(&mut self, direction: ZoomDirection, focus: Option<(f64, f64)>) -> bool {
        let l = self.limits;
        let old_scale = self.scale;
        let new_scale = match direction {
            ZoomDirection::In => {
                if old_scale >= l.max {
                    return false;
                }
                (old_scale + l.step).min(l.max)
            }
            ZoomDirection::Out => {
                if old_scale <= l.min {
                    return false;
                }
                (old_scale - l.step).max(l.min)
            }
        };
        if let Some((fx, fy)) = focus {
            // image-space point under the pointer, relative to the image center
            let image_x = (fx - self.offset_x) / old_scale;
            let image_y = (fy - self.offset_y) / old_scale;
            self.offset_x = fx - image_x * new_scale;
            self.offset_y = fy - image_y * new_scale;
        }
        self.scale = new_scale;
        self.pull_toward_center();
        true
    }

    // Near the default scale the pan offset decays linearly, reaching zero at the default.
    fn pull_toward_center(&mut self) {
        let l = self.limits;
        let distance = (self.scale - l.default).abs();
        if distance >= l.snap_band {
            return;
        }
        let factor = 1.0 - distance / l.snap_band;
        if factor > 0.0 {
            self.offset_x *= 1.0 - factor;
            self.offset_y *= 1.0 - factor;
        }
    }

    pub fn reset(&mut self) {
        self.scale = self.limits.default;
        self.offset_x = 0.0;
        self.offset_y = 0.0;
    }

    pub fn can_pan(&self) -> bool {
        self.scale > self.limits.drag_threshold
    }

    /// Idle -> Dragging. Rejected (stays idle) at or below the drag threshold.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        if !self.can_pan() {
            return false;
        }
        self.dragging = true;
        self.last_x = x;
        self.last_y = y;
        true
    }

    /// Applies the pointer delta since the last position. No-op when idle.
    pub fn drag_to(&mut self, x: f64, y: f64) -> bool {
        if !self.dragging {
            return false;
        }
        self.offset_x += x - self.last_x;
        self.offset_y += y - self.last_y;
        self.last_x = x;
        self.last_y = y;
        true
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn transform_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset_x, self.offset_y, self.scale
        )
    }

    pub fn cursor(&self) -> &'static str {
        if self.scale > self.limits.move_cursor_threshold {
            "move"
        } else {
            ""
        }
    }

    pub fn indicator_text(&self) -> String {
        format_percent(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn at_default() -> ZoomState {
        let mut z = ZoomState::default();
        z.reset();
        z
    }

    fn image_point(z: &ZoomState, fx: f64, fy: f64) -> (f64, f64) {
        ((fx - z.offset_x) / z.scale, (fy - z.offset_y) / z.scale)
    }

    #[test]
    fn starts_at_initial_scale() {
        let z = ZoomState::default();
        assert_eq!(z.scale, 1.0);
        assert_eq!((z.offset_x, z.offset_y), (0.0, 0.0));
        assert!(!z.dragging);
    }

    #[test]
    fn reset_restores_default_and_centers() {
        let mut z = ZoomState::default();
        z.zoom(ZoomDirection::In, Some((120.0, -40.0)));
        z.begin_drag(0.0, 0.0);
        z.drag_to(33.0, 12.0);
        z.reset();
        assert_eq!(z.scale, 0.8);
        assert_eq!(z.offset_x, 0.0);
        assert_eq!(z.offset_y, 0.0);
    }

    #[test]
    fn four_clicks_from_default_reach_full_size() {
        let mut z = at_default();
        for _ in 0..4 {
            assert!(z.zoom(ZoomDirection::In, None));
        }
        assert!((z.scale - 1.0).abs() < EPS);
        assert_eq!(z.indicator_text(), "100%");
        assert!(z.zoom(ZoomDirection::In, None));
        assert!((z.scale - 1.05).abs() < EPS);
        assert_eq!(z.indicator_text(), "105%");
    }

    #[test]
    fn zoom_in_stops_at_max() {
        let mut z = ZoomState::default();
        let mut clicks = 0;
        while z.zoom(ZoomDirection::In, None) {
            clicks += 1;
            assert!(clicks < 1000);
        }
        assert_eq!(z.scale, 2.0);
        assert!(!z.zoom(ZoomDirection::In, None));
        assert_eq!(z.scale, 2.0);
        assert_eq!(z.indicator_text(), "200%");
    }

    #[test]
    fn zoom_out_stops_at_min() {
        let mut z = ZoomState::default();
        while z.zoom(ZoomDirection::Out, None) {}
        assert_eq!(z.scale, 0.05);
        let before = z.clone();
        assert!(!z.zoom(ZoomDirection::Out, Some((50.0, 50.0))));
        assert_eq!(z.scale, before.scale);
        assert_eq!(z.offset_x, before.offset_x);
        assert_eq!(z.indicator_text(), "5%");
    }

    #[test]
    fn mixed_sequence_stays_in_bounds() {
        let cfg = ZoomConfig::default();
        let mut z = ZoomState::new(&cfg);
        let mut seed: u32 = 12345;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let dir = if (seed >> 16) % 3 == 0 {
                ZoomDirection::Out
            } else {
                ZoomDirection::In
            };
            let focus = ((seed % 400) as f64 - 200.0, ((seed >> 8) % 300) as f64 - 150.0);
            z.zoom(dir, Some(focus));
            assert!(z.scale >= cfg.min_scale && z.scale <= cfg.max_scale);
        }
    }

    #[test]
    fn pointer_zoom_keeps_point_under_pointer() {
        let mut z = ZoomState::default();
        z.scale = 1.2;
        z.offset_x = 30.0;
        z.offset_y = -10.0;
        let (fx, fy) = (140.0, -75.0);
        let before = image_point(&z, fx, fy);
        assert!(z.zoom(ZoomDirection::In, Some((fx, fy))));
        let after = image_point(&z, fx, fy);
        assert!((before.0 - after.0).abs() < 1e-6);
        assert!((before.1 - after.1).abs() < 1e-6);

        let before = image_point(&z, fx, fy);
        assert!(z.zoom(ZoomDirection::Out, Some((fx, fy))));
        let after = image_point(&z, fx, fy);
        assert!((before.0 - after.0).abs() < 1e-6);
        assert!((before.1 - after.1).abs() < 1e-6);
    }

    #[test]
    fn zoom_without_pointer_keeps_offsets() {
        let mut z = ZoomState::default();
        z.scale = 1.5;
        z.offset_x = 20.0;
        z.offset_y = 5.0;
        z.zoom(ZoomDirection::In, None);
        assert_eq!((z.offset_x, z.offset_y), (20.0, 5.0));
    }

    #[test]
    fn landing_on_default_scale_recenters() {
        let mut z = ZoomState::default();
        z.scale = 0.85;
        z.offset_x = 40.0;
        z.offset_y = -20.0;
        z.zoom(ZoomDirection::Out, None);
        assert!((z.scale - 0.8).abs() < EPS);
        assert!(z.offset_x.abs() < 1e-6);
        assert!(z.offset_y.abs() < 1e-6);
    }

    #[test]
    fn near_default_scale_pulls_offsets_partially() {
        let mut z = ZoomState::default();
        z.scale = 0.77;
        z.offset_x = 100.0;
        z.zoom(ZoomDirection::In, None);
        // 0.82: factor = 1 - 0.02/0.05 = 0.6, offset keeps 40%
        assert!((z.offset_x - 40.0).abs() < 1e-6);
    }

    #[test]
    fn band_edges_leave_offsets_alone() {
        // binary-exact values so both ends land exactly on default ± band
        let cfg = ZoomConfig {
            step: 0.25,
            default_scale: 0.75,
            snap_band: 0.25,
            ..ZoomConfig::default()
        };
        let mut z = ZoomState::new(&cfg);
        z.scale = 1.25;
        z.offset_x = 64.0;
        z.offset_y = -32.0;
        assert!(z.zoom(ZoomDirection::Out, None));
        assert_eq!(z.scale, 1.0);
        assert_eq!((z.offset_x, z.offset_y), (64.0, -32.0));

        z.scale = 0.25;
        assert!(z.zoom(ZoomDirection::In, None));
        assert_eq!(z.scale, 0.5);
        assert_eq!((z.offset_x, z.offset_y), (64.0, -32.0));

        // just inside the band the pull kicks in
        let mut z = ZoomState::new(&ZoomConfig { step: 0.125, ..cfg });
        z.scale = 0.5;
        z.offset_x = 64.0;
        z.offset_y = -32.0;
        assert!(z.zoom(ZoomDirection::In, None));
        assert_eq!(z.scale, 0.625);
        assert_eq!((z.offset_x, z.offset_y), (32.0, -16.0));
    }

    #[test]
    fn default_band_edges_barely_pull() {
        let mut z = ZoomState::default();
        z.scale = 0.9;
        z.offset_x = 50.0;
        assert!(z.zoom(ZoomDirection::Out, None));
        assert!((z.offset_x - 50.0).abs() < 1e-9);

        z.scale = 0.7;
        z.offset_x = 50.0;
        assert!(z.zoom(ZoomDirection::In, None));
        assert!((z.offset_x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn drag_rejected_at_or_below_threshold() {
        let mut z = at_default();
        assert!(!z.begin_drag(10.0, 10.0));
        assert!(!z.dragging);
        assert!(!z.drag_to(50.0, 50.0));
        assert_eq!((z.offset_x, z.offset_y), (0.0, 0.0));
        z.scale = 0.81;
        assert!(!z.begin_drag(10.0, 10.0));
        assert!(!z.dragging);
    }

    #[test]
    fn drag_accumulates_deltas_until_released() {
        let mut z = at_default();
        z.zoom(ZoomDirection::In, None);
        assert!(z.begin_drag(100.0, 100.0));
        assert!(z.drag_to(110.0, 95.0));
        assert!(z.drag_to(130.0, 90.0));
        assert_eq!((z.offset_x, z.offset_y), (30.0, -10.0));
        z.end_drag();
        assert!(!z.dragging);
        assert!(!z.drag_to(500.0, 500.0));
        assert_eq!((z.offset_x, z.offset_y), (30.0, -10.0));
    }

    #[test]
    fn cursor_tracks_move_threshold() {
        let mut z = at_default();
        assert_eq!(z.cursor(), "");
        z.scale = 0.9;
        assert_eq!(z.cursor(), "move");
        z.scale = 0.85;
        assert_eq!(z.cursor(), "");
    }

    #[test]
    fn transform_depends_only_on_state() {
        let mut z = ZoomState::default();
        z.offset_x = 12.5;
        z.offset_y = -3.0;
        let first = z.transform_css();
        assert_eq!(first, "translate(12.5px, -3px) scale(1)");
        assert_eq!(z.transform_css(), first);
    }

    #[test]
    fn wheel_direction_mapping() {
        assert_eq!(ZoomDirection::from_wheel_delta(-120.0), ZoomDirection::In);
        assert_eq!(ZoomDirection::from_wheel_delta(120.0), ZoomDirection::Out);
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), ZoomDirection::Out);
    }
}
