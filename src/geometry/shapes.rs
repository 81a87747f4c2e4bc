use nalgebra::Point2;
use serde::Deserialize;

use super::Polygon;
use crate::error::{Result, TorsionError};

/// Rectangle with its bottom-left corner at the origin.
pub fn rectangle(width: f64, height: f64) -> Result<Polygon> {
    Polygon::from_coords(&[[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]])
}

/// Doubly tapered precast I-beam. Flanges are centred on the web; the section
/// sits on y = 0 and is symmetric about the vertical line through the wider
/// flange's midpoint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct IBeamDimensions {
    pub height: f64,
    pub top_flange_width: f64,
    pub top_flange_depth: f64,
    /// Depth of the haunch between the top flange and the web.
    pub top_taper_depth: f64,
    pub web_width: f64,
    pub bottom_taper_depth: f64,
    pub bottom_flange_width: f64,
    pub bottom_flange_depth: f64,
}
impl IBeamDimensions {
    pub fn outline(&self) -> Result<Polygon> {
        let web_height = self.height
            - self.top_flange_depth
            - self.top_taper_depth
            - self.bottom_flange_depth
            - self.bottom_taper_depth;
        if web_height < 0.0 {
            return Err(TorsionError::DegenerateOutline(format!(
                "flange and taper depths exceed the beam height {}",
                self.height
            )));
        }
        if self.web_width > self.top_flange_width || self.web_width > self.bottom_flange_width {
            return Err(TorsionError::DegenerateOutline(
                "web is wider than a flange".to_string(),
            ));
        }
        let cx = 0.5 * self.top_flange_width.max(self.bottom_flange_width);
        let hb = 0.5 * self.bottom_flange_width;
        let ht = 0.5 * self.top_flange_width;
        let hw = 0.5 * self.web_width;
        let y_web_bottom = self.bottom_flange_depth + self.bottom_taper_depth;
        let y_web_top = y_web_bottom + web_height;
        let y_top_flange = self.height - self.top_flange_depth;

        // counter-clockwise from the bottom-left corner; the right half is
        // listed first and the left half mirrors it on the way back
        let right_half = [
            (hb, 0.0),
            (hb, self.bottom_flange_depth),
            (hw, y_web_bottom),
            (hw, y_web_top),
            (ht, y_top_flange),
            (ht, self.height),
        ];
        let mut vertices = vec![Point2::new(cx - hb, 0.0)];
        vertices.extend(right_half.iter().map(|&(dx, y)| Point2::new(cx + dx, y)));
        vertices.extend(right_half.iter().rev().map(|&(dx, y)| Point2::new(cx - dx, y)));
        // the first vertex was pushed twice (start and end of the mirrored half)
        vertices.pop();
        dedup_consecutive(&mut vertices);
        Polygon::new(vertices)
    }
}

fn dedup_consecutive(vertices: &mut Vec<Point2<f64>>) {
    vertices.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
}

/// Girder used throughout the unit tests; `inputs/job.json` describes the
/// same section.
#[cfg(test)]
pub(crate) fn sample_beam() -> IBeamDimensions {
    IBeamDimensions {
        height: 20.0,
        top_flange_width: 16.0,
        top_flange_depth: 3.0,
        top_taper_depth: 2.0,
        web_width: 4.0,
        bottom_taper_depth: 2.0,
        bottom_flange_width: 12.0,
        bottom_flange_depth: 4.0,
    }
}
