use helpers::general::{clamp01, ease_in_out};
use serde::Deserialize;

/// * `start` - (m) Distance at which the curve begins
/// * `end` - (m) Distance at which the curve ends
/// * `intensity` - Signed curvature intensity (positive bends right)
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CurvePars {
    pub start: f64,
    pub end: f64,
    pub intensity: f64,
}

/// Curves stores the named track segments and converts the traveled
/// distance into a lateral offset for the car and the road segments.
///
/// Segments may overlap in the source data; the first match in insertion
/// order wins, everything after it is ignored for that distance.
#[derive(Debug, Default)]
pub struct Curves {
    segments: Vec<CurvePars>,
    total_distance: f64,
    cur_intensity: f64,
    cur_start: f64,
    cur_end: f64,
}

impl Curves {
    pub fn new() -> Curves {
        Curves::default()
    }

    pub fn add_curve(&mut self, start: f64, end: f64, intensity: f64) {
        self.segments.push(CurvePars {
            start,
            end,
            intensity,
        });
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// update selects the active segment for the given total distance and
    /// records its intensity and span for the offset calculation.
    pub fn update(&mut self, total_distance: f64) {
        self.total_distance = total_distance;

        match self.segment_at(total_distance).copied() {
            Some(seg) => {
                self.cur_intensity = seg.intensity;
                self.cur_start = seg.start;
                self.cur_end = seg.end;
            }
            None => {
                self.cur_intensity = 0.0;
                self.cur_start = 0.0;
                self.cur_end = 0.0;
            }
        }
    }

    pub fn current_intensity(&self) -> f64 {
        self.cur_intensity
    }

    /// offset returns the eased lateral car offset for the active segment,
    /// 0 when no segment is active or the segment span is degenerate.
    pub fn offset(&self) -> f64 {
        if self.cur_intensity == 0.0 {
            return 0.0;
        }
        if self.cur_end <= self.cur_start {
            return 0.0;
        }

        let progress =
            clamp01((self.total_distance - self.cur_start) / (self.cur_end - self.cur_start));

        self.cur_intensity * 10.0 * ease_in_out(progress)
    }

    /// road_offset_at returns the eased lateral offset a road segment at
    /// the given distance should take. The road bends harder than the car
    /// (factor 50 instead of 10) so the curve reads visually.
    pub fn road_offset_at(&self, segment_distance: f64) -> f64 {
        let seg = match self.segment_at(segment_distance) {
            Some(seg) => seg,
            None => return 0.0,
        };
        if seg.end <= seg.start {
            return 0.0;
        }

        let progress = clamp01((segment_distance - seg.start) / (seg.end - seg.start));

        seg.intensity * 50.0 * ease_in_out(progress)
    }

    /// reset clears the active-segment cache but keeps the segment list.
    pub fn reset(&mut self) {
        self.total_distance = 0.0;
        self.cur_intensity = 0.0;
        self.cur_start = 0.0;
        self.cur_end = 0.0;
    }

    fn segment_at(&self, distance: f64) -> Option<&CurvePars> {
        self.segments
            .iter()
            .find(|seg| distance >= seg.start && distance <= seg.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn offset_is_zero_outside_all_segments() {
        let mut curves = Curves::new();
        curves.add_curve(200.0, 700.0, 0.01);

        curves.update(100.0);
        assert_relative_eq!(curves.offset(), 0.0);

        curves.update(800.0);
        assert_relative_eq!(curves.offset(), 0.0);
    }

    #[test]
    fn offset_reaches_full_intensity_at_segment_end() {
        let mut curves = Curves::new();
        curves.add_curve(0.0, 100.0, 0.02);

        curves.update(50.0);
        assert_relative_eq!(curves.offset(), 0.02 * 10.0 * 0.5, epsilon = 1e-12);

        curves.update(100.0);
        assert_relative_eq!(curves.offset(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn overlapping_segments_first_defined_wins() {
        let mut curves = Curves::new();
        curves.add_curve(600.0, 900.0, -0.01);
        curves.add_curve(500.0, 1000.0, 0.03);

        curves.update(650.0);
        assert_relative_eq!(curves.current_intensity(), -0.01);
    }

    #[test]
    fn degenerate_segment_yields_zero_offset() {
        let mut curves = Curves::new();
        curves.add_curve(100.0, 100.0, 0.05);
        curves.add_curve(300.0, 200.0, 0.05);

        curves.update(100.0);
        assert_relative_eq!(curves.offset(), 0.0);

        curves.update(250.0);
        assert_relative_eq!(curves.offset(), 0.0);
    }

    #[test]
    fn reset_keeps_segment_list() {
        let mut curves = Curves::new();
        curves.add_curve(0.0, 100.0, 0.01);
        curves.update(50.0);
        curves.reset();

        assert_relative_eq!(curves.current_intensity(), 0.0);

        curves.update(50.0);
        assert!(curves.current_intensity() != 0.0);
    }

    #[test]
    fn update_tracks_segment_transitions() {
        let mut curves = Curves::new();
        curves.add_curve(100.0, 200.0, 0.01);
        curves.add_curve(300.0, 400.0, -0.02);

        curves.update(150.0);
        assert_relative_eq!(curves.current_intensity(), 0.01);

        curves.update(250.0);
        assert_relative_eq!(curves.current_intensity(), 0.0);

        curves.update(350.0);
        assert_relative_eq!(curves.current_intensity(), -0.02);
    }

    #[test]
    fn road_offset_uses_wider_factor() {
        let mut curves = Curves::new();
        curves.add_curve(0.0, 100.0, 0.01);

        assert_relative_eq!(curves.road_offset_at(100.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(curves.road_offset_at(150.0), 0.0);
    }
}
