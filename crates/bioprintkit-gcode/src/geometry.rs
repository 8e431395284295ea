//! Toolpath geometry for scaffolds.
//!
//! Pure functions shared by the scaffold G-code emitters and the scaffold
//! preview, so both always agree on where material goes. A scaffold is
//! centered on the XY origin; its footprint is the outer size shrunk by one
//! nozzle width so the extruded perimeter lands on the requested outline.

use bioprintkit_core::{GeometryError, InfillPattern, ScaffoldSpec};
use glam::DVec2;

/// Coordinate quadrant of a point, used to pick perimeter turn directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// x >= 0, y >= 0
    First,
    /// x < 0, y >= 0
    Second,
    /// x < 0, y < 0
    Third,
    /// x >= 0, y < 0
    Fourth,
}

impl Quadrant {
    pub fn of(point: DVec2) -> Self {
        match (point.x >= 0.0, point.y >= 0.0) {
            (true, true) => Quadrant::First,
            (false, true) => Quadrant::Second,
            (false, false) => Quadrant::Third,
            (true, false) => Quadrant::Fourth,
        }
    }

    /// Unit signs of the quadrant's axes.
    pub fn signs(self) -> DVec2 {
        match self {
            Quadrant::First => DVec2::new(1.0, 1.0),
            Quadrant::Second => DVec2::new(-1.0, 1.0),
            Quadrant::Third => DVec2::new(-1.0, -1.0),
            Quadrant::Fourth => DVec2::new(1.0, -1.0),
        }
    }
}

/// Printed outline of a scaffold and the corner the toolpath starts from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaffoldFootprint {
    /// Perimeter width and height (mm)
    pub dimensions: DVec2,
    /// Starting corner of every layer (mm)
    pub origin: DVec2,
}

impl ScaffoldFootprint {
    pub fn new(size_x: f64, size_y: f64, nozzle_width: f64) -> Self {
        Self {
            dimensions: DVec2::new(size_x - nozzle_width, size_y - nozzle_width),
            origin: DVec2::new(
                size_x / 2.0 - nozzle_width / 2.0,
                size_y / 2.0 - nozzle_width / 2.0,
            ),
        }
    }

    pub fn from_spec(spec: &ScaffoldSpec) -> Self {
        Self::new(spec.size_x, spec.size_y, spec.nozzle_width)
    }

    pub fn half_extent(&self) -> DVec2 {
        self.dimensions / 2.0
    }
}

/// The four perimeter corners visited after leaving the origin.
///
/// The walk first crosses the width towards the opposite X side, then the
/// height, and closes back on the origin, whichever quadrant it starts in.
pub fn perimeter_corners(footprint: &ScaffoldFootprint) -> [DVec2; 4] {
    let signs = Quadrant::of(footprint.origin).signs();
    let size = footprint.dimensions;

    let first = footprint.origin + DVec2::new(-signs.x * size.x, 0.0);
    let second = first + DVec2::new(0.0, -signs.y * size.y);
    let third = second + DVec2::new(signs.x * size.x, 0.0);
    let fourth = third + DVec2::new(0.0, signs.y * size.y);
    [first, second, third, fourth]
}

/// Orientation of a set of parallel infill lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    /// Lines run along Y and step across X
    AlongY,
    /// Lines run along X and step across Y
    AlongX,
}

/// One pass of evenly spaced parallel infill lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlan {
    pub line_count: usize,
    /// Distance between neighbouring lines (mm)
    pub spacing: f64,
    pub direction: LineDirection,
}

impl LinePlan {
    fn from_count(
        raw_count: f64,
        extent: f64,
        direction: LineDirection,
        pattern: InfillPattern,
    ) -> Result<Self, GeometryError> {
        if !(raw_count >= 1.0) {
            return Err(GeometryError::DegenerateInfill {
                pattern: pattern.to_string(),
                lines: raw_count as i64,
            });
        }
        let line_count = raw_count as usize;
        Ok(Self {
            line_count,
            spacing: extent / line_count as f64,
            direction,
        })
    }
}

/// Line plan for striped infill.
///
/// Counts are rounded half-to-even so that a fraction of exactly .5 lands
/// on the even neighbour.
pub fn striped_plan(
    spec: &ScaffoldSpec,
    footprint: &ScaffoldFootprint,
) -> Result<LinePlan, GeometryError> {
    let size = footprint.dimensions;
    let area = size.x * size.y;
    let count = (spec.infill_fraction() * area / (spec.nozzle_width * size.y)).round_ties_even();
    LinePlan::from_count(count, size.x, LineDirection::AlongY, InfillPattern::Striped)
}

/// Line plans for both passes of grid infill.
pub fn grid_plans(
    spec: &ScaffoldSpec,
    footprint: &ScaffoldFootprint,
) -> Result<[LinePlan; 2], GeometryError> {
    let size = footprint.dimensions;
    let area = size.x * size.y;
    let count =
        (spec.infill_fraction() * area / (spec.nozzle_width * (size.x + size.y))).round_ties_even();
    Ok([
        LinePlan::from_count(count, size.x, LineDirection::AlongY, InfillPattern::Grid)?,
        LinePlan::from_count(count, size.y, LineDirection::AlongX, InfillPattern::Grid)?,
    ])
}

/// Start and end of every interior infill line of one pass.
///
/// Lines step inward from the origin by the plan spacing. Each line starts
/// where the previous one ended on the cross axis, so consecutive lines
/// alternate direction.
pub fn stripe_paths(footprint: &ScaffoldFootprint, plan: &LinePlan) -> Vec<(DVec2, DVec2)> {
    let signs = Quadrant::of(footprint.origin).signs();
    let origin = footprint.origin;
    let mut paths = Vec::with_capacity(plan.line_count.saturating_sub(1));

    match plan.direction {
        LineDirection::AlongY => {
            let mut y = origin.y;
            for i in 1..plan.line_count {
                let x = origin.x - signs.x * i as f64 * plan.spacing;
                paths.push((DVec2::new(x, y), DVec2::new(x, -y)));
                y = -y;
            }
        }
        LineDirection::AlongX => {
            let mut x = origin.x;
            for i in 1..plan.line_count {
                let y = origin.y - signs.y * i as f64 * plan.spacing;
                paths.push((DVec2::new(x, y), DVec2::new(-x, y)));
                x = -x;
            }
        }
    }
    paths
}

/// Cell size of honeycomb infill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoneycombPlan {
    /// Flat-to-flat cell width (mm)
    pub spacing: f64,
    /// Center-to-vertex radius (mm)
    pub hex_radius: f64,
}

impl HoneycombPlan {
    pub fn from_spec(spec: &ScaffoldSpec) -> Self {
        let sqrt3 = 3f64.sqrt();
        let spacing =
            (4.0 + 2.0 * sqrt3) / (3.0 * sqrt3) * spec.nozzle_width / spec.infill_fraction();
        Self {
            spacing,
            hex_radius: spacing / sqrt3,
        }
    }
}

/// Vertices of a pointy-top hexagon, counter-clockwise from the top.
pub fn hexagon(center: DVec2, radius: f64) -> [DVec2; 6] {
    std::array::from_fn(|k| {
        let angle = (90.0 + 60.0 * k as f64).to_radians();
        center + DVec2::new(radius * angle.cos(), radius * angle.sin())
    })
}

/// Most honeycomb cells a single layer may hold
pub const MAX_HONEYCOMB_CELLS: usize = 100_000;

/// Upper bound on the cells of one honeycomb layer.
pub fn honeycomb_cell_estimate(footprint: &ScaffoldFootprint, plan: &HoneycombPlan) -> usize {
    let size = footprint.dimensions;
    let radius = plan.hex_radius;
    let rows = ((size.y - 2.0 * radius) / (1.5 * radius) + 1e-6).floor() + 1.0;
    let cols = (size.x / plan.spacing + 1e-6).floor();
    if rows <= 0.0 || cols <= 0.0 {
        return 0;
    }
    (rows * cols).min(usize::MAX as f64) as usize
}

/// Honeycomb cells that fit entirely inside the footprint for one layer.
///
/// Rows are 1.5 radii apart. Alternate rows shift by one radius, and the
/// layer parity swaps which rows shift so stacked layers interlock.
/// Layouts estimated above [`MAX_HONEYCOMB_CELLS`] are rejected before any
/// cell is built.
pub fn honeycomb_cells(
    footprint: &ScaffoldFootprint,
    plan: &HoneycombPlan,
    layer: u32,
) -> Result<Vec<[DVec2; 6]>, GeometryError> {
    const EPS: f64 = 1e-9;
    let estimate = honeycomb_cell_estimate(footprint, plan);
    if estimate > MAX_HONEYCOMB_CELLS {
        return Err(GeometryError::TooManyCells {
            cells: estimate,
            max: MAX_HONEYCOMB_CELLS,
        });
    }

    let half = footprint.half_extent();
    let radius = plan.hex_radius;
    let width = plan.spacing;
    let mut cells = Vec::with_capacity(estimate);

    let mut row = 0u32;
    loop {
        let cy = -half.y + radius + row as f64 * 1.5 * radius;
        if cy + radius > half.y + EPS {
            break;
        }
        let offset = if (row + layer) % 2 == 1 { radius } else { 0.0 };
        let mut cx = -half.x + width / 2.0 + offset;
        while cx + width / 2.0 <= half.x + EPS {
            cells.push(hexagon(DVec2::new(cx, cy), radius));
            cx += width;
        }
        row += 1;
    }

    if cells.is_empty() {
        return Err(GeometryError::DegenerateInfill {
            pattern: InfillPattern::Honeycomb.to_string(),
            lines: 0,
        });
    }
    Ok(cells)
}
