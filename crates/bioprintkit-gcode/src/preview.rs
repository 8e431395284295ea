//! Display-only toolpath segments for scaffold previews.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// What a preview segment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Non-extruding move
    Travel,
    Perimeter,
    Infill,
}

/// A straight toolpath segment in machine coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewSegment {
    /// 1-based layer the segment belongs to
    pub layer: u32,
    pub kind: SegmentKind,
    pub from: DVec3,
    pub to: DVec3,
}

impl PreviewSegment {
    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// All segments of a scaffold, in toolpath order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaffoldPreview {
    pub segments: Vec<PreviewSegment>,
}

impl ScaffoldPreview {
    pub fn layer(&self, layer: u32) -> impl Iterator<Item = &PreviewSegment> {
        self.segments.iter().filter(move |s| s.layer == layer)
    }

    pub fn count(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }

    /// Axis-aligned bounds of every extruded segment.
    pub fn extruded_bounds(&self) -> Option<(DVec3, DVec3)> {
        self.segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Travel)
            .flat_map(|s| [s.from, s.to])
            .fold(None, |bounds, p| match bounds {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Follows the toolhead position and records segments as it moves.
#[derive(Debug, Default)]
pub(crate) struct PreviewPen {
    position: Option<DVec3>,
    layer: u32,
    preview: ScaffoldPreview,
}

impl PreviewPen {
    pub(crate) fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    fn current(&self) -> DVec3 {
        self.position.unwrap_or(DVec3::ZERO)
    }

    fn record(&mut self, to: DVec3, kind: SegmentKind) {
        if let Some(from) = self.position {
            if from != to {
                self.preview.segments.push(PreviewSegment {
                    layer: self.layer,
                    kind,
                    from,
                    to,
                });
            }
        }
        self.position = Some(to);
    }

    /// Vertical travel keeping XY.
    pub(crate) fn travel_z(&mut self, z: f64) {
        let to = self.current().truncate().extend(z);
        self.record(to, SegmentKind::Travel);
    }

    /// Horizontal travel keeping Z.
    pub(crate) fn travel_xy(&mut self, point: DVec2) {
        let to = point.extend(self.current().z);
        self.record(to, SegmentKind::Travel);
    }

    pub(crate) fn travel_to(&mut self, point: DVec2, z: f64) {
        self.record(point.extend(z), SegmentKind::Travel);
    }

    /// Extruding move keeping Z.
    pub(crate) fn draw_xy(&mut self, point: DVec2, kind: SegmentKind) {
        let to = point.extend(self.current().z);
        self.record(to, kind);
    }

    pub(crate) fn finish(self) -> ScaffoldPreview {
        self.preview
    }
}
