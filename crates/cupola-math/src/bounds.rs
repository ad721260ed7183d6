use glam::Vec3;

/// Axis-aligned box describing the interior volume of the station tunnel.
///
/// Invariant: `min.x <= max.x`, `min.y <= max.y`, `min.z <= max.z`.
/// The constructor enforces this by swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl TunnelBounds {
    /// Create bounds from two corners. Components are sorted so that
    /// min <= max on every axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create bounds symmetric around `center`.
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns new bounds grown by `margin` on each of the six faces.
    /// A negative margin shrinks; shrinking never inverts an axis, it
    /// collapses onto the center instead.
    pub fn expand_by(&self, margin: f32) -> TunnelBounds {
        let min = self.min - Vec3::splat(margin);
        let max = self.max + Vec3::splat(margin);
        let center = self.center();
        TunnelBounds {
            min: min.min(center),
            max: max.max(center),
        }
    }

    /// Clamp a point into the box, axis by axis.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}
