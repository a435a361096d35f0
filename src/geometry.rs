//! Maps the land and labor constraints into viewport pixel space.
//!
//! Data space is acres (x = wheat, y = barley) with y pointing up. Screen
//! space is pixels with the origin at the top-left and y pointing down. Every
//! point produced here lies inside the viewport rectangle.

use serde::{Deserialize, Serialize};

/// Both axes extend 20% past the furthest constraint intercept.
pub const HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(origin_x: i32, origin_y: i32, width: i32, height: i32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.origin_x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.origin_y + self.height
    }

    pub fn bottom_left(&self) -> ScreenPoint {
        ScreenPoint::new(self.origin_x, self.bottom())
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        (self.origin_x..=self.right()).contains(&point.x)
            && (self.origin_y..=self.bottom()).contains(&point.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(500, 200, 250, 250)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: ScreenPoint,
    pub end: ScreenPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [ScreenPoint; 3],
}

/// Largest data values the plot has to show on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataBounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl DataBounds {
    pub fn for_constraints(land: f64, labor: f64) -> Self {
        Self {
            max_x: land.max(labor),
            max_y: land.max(labor / 2.0),
        }
    }

    pub fn limit_x(&self) -> f64 {
        self.max_x * HEADROOM
    }

    pub fn limit_y(&self) -> f64 {
        self.max_y * HEADROOM
    }

    pub fn is_degenerate(&self) -> bool {
        self.max_x <= 0.0 || self.max_y <= 0.0
    }
}

/// Pixels per data unit on each axis. Zero when the bounds are degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisScale {
    pub x: f64,
    pub y: f64,
}

impl AxisScale {
    pub fn fit(bounds: &DataBounds, viewport: &Viewport) -> Self {
        Self {
            x: scale_for(viewport.width, bounds.limit_x()),
            y: scale_for(viewport.height, bounds.limit_y()),
        }
    }
}

fn scale_for(pixels: i32, limit: f64) -> f64 {
    if limit > 0.0 {
        f64::from(pixels) / limit
    } else {
        0.0
    }
}

/// Everything the plot needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintPlot {
    pub viewport: Viewport,
    pub bounds: DataBounds,
    pub scale: AxisScale,
    pub land_line: Segment,
    pub labor_line: Segment,
    /// Where `x + y = land` meets `x + 2y = labor`, before clamping.
    pub intersection: DataPoint,
    pub clamped_intersection: DataPoint,
    pub feasible_region: Option<Triangle>,
}

impl ConstraintPlot {
    pub fn is_degenerate(&self) -> bool {
        self.bounds.is_degenerate()
    }
}

struct Mapper<'a> {
    viewport: &'a Viewport,
    bounds: DataBounds,
    scale: AxisScale,
}

impl Mapper<'_> {
    fn to_screen(&self, point: DataPoint) -> ScreenPoint {
        // Offsets truncate toward zero before joining the origin.
        ScreenPoint::new(
            self.viewport.origin_x + (point.x * self.scale.x) as i32,
            self.viewport.bottom() - (point.y * self.scale.y) as i32,
        )
    }

    /// Line from `(0, y_intercept)` to `(x_intercept, 0)`, intercepts capped
    /// at the axis limits.
    fn intercept_segment(&self, x_intercept: f64, y_intercept: f64) -> Segment {
        let y = y_intercept.min(self.bounds.limit_y());
        let x = x_intercept.min(self.bounds.limit_x());
        Segment {
            start: self.to_screen(DataPoint::new(0.0, y)),
            end: self.to_screen(DataPoint::new(x, 0.0)),
        }
    }
}

/// Solves `x + y = land` and `x + 2y = labor`.
pub fn constraint_intersection(land: f64, labor: f64) -> DataPoint {
    DataPoint::new(2.0 * land - labor, labor - land)
}

pub fn plot_constraints(land: f64, labor: f64, viewport: &Viewport) -> ConstraintPlot {
    let bounds = DataBounds::for_constraints(land, labor);
    let mapper = Mapper {
        viewport,
        bounds,
        scale: AxisScale::fit(&bounds, viewport),
    };

    let land_line = mapper.intercept_segment(land, land);
    let labor_line = mapper.intercept_segment(labor, labor / 2.0);

    let intersection = constraint_intersection(land, labor);
    let clamped_intersection = DataPoint::new(
        intersection.x.clamp(0.0, bounds.limit_x()),
        intersection.y.clamp(0.0, bounds.limit_y()),
    );

    let crosses_in_quadrant = intersection.x >= 0.0 && intersection.y >= 0.0;
    let feasible_region = (crosses_in_quadrant && !bounds.is_degenerate()).then(|| Triangle {
        vertices: [
            viewport.bottom_left(),
            mapper.to_screen(clamped_intersection),
            mapper.to_screen(DataPoint::new(land.min(bounds.limit_x()), 0.0)),
        ],
    });

    ConstraintPlot {
        viewport: *viewport,
        bounds,
        scale: mapper.scale,
        land_line,
        labor_line,
        intersection,
        clamped_intersection,
        feasible_region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_intercepts() {
        let bounds = DataBounds::for_constraints(10.0, 15.0);
        assert_eq!(bounds.max_x, 15.0);
        assert_eq!(bounds.max_y, 10.0);
        assert!((bounds.limit_x() - 18.0).abs() < 1e-12);
        assert!((bounds.limit_y() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn zero_bounds_give_zero_scale() {
        let bounds = DataBounds::for_constraints(0.0, 0.0);
        let scale = AxisScale::fit(&bounds, &Viewport::default());
        assert!(bounds.is_degenerate());
        assert_eq!(scale, AxisScale { x: 0.0, y: 0.0 });
    }

    #[test]
    fn y_axis_is_inverted() {
        let viewport = Viewport::new(0, 0, 120, 120);
        let plot = plot_constraints(10.0, 20.0, &viewport);
        // land line starts high on the y-axis and ends on the x-axis
        assert!(plot.land_line.start.y < plot.land_line.end.y);
        assert_eq!(plot.land_line.end.y, viewport.bottom());
        assert_eq!(plot.land_line.start.x, viewport.origin_x);
    }

    #[test]
    fn viewport_contains_edges() {
        let viewport = Viewport::new(10, 20, 30, 40);
        assert!(viewport.contains(ScreenPoint::new(10, 20)));
        assert!(viewport.contains(ScreenPoint::new(40, 60)));
        assert!(!viewport.contains(ScreenPoint::new(41, 60)));
        assert!(!viewport.contains(ScreenPoint::new(10, 19)));
    }
}
