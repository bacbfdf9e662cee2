//! Canal geometry: ring, vestibule (circle plus bridge) and the cupula.
//!
//! All predicates are pure. The ear only changes where the vestibule sits and
//! on which side of the cupula particles spawn; the two layouts are exact
//! mirrors about the vertical axis through the ring center.

use crate::config::GeometryConfig;
use crate::state::Ear;
use glam::Vec2;

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn expanded(&self, by: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(by),
            max: self.max + Vec2::splat(by),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlap test against the bounding box of a circle.
    pub fn intersects_box(&self, center: Vec2, half_extent: f32) -> bool {
        center.x + half_extent >= self.min.x
            && center.x - half_extent <= self.max.x
            && center.y + half_extent >= self.min.y
            && center.y - half_extent <= self.max.y
    }
}

/// The two regions a particle may legally occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Ring,
    Vestibule,
}

/// Angle of `v` in degrees, normalized to [0, 360).
#[inline]
pub fn angle_deg(v: Vec2) -> f32 {
    normalize_deg(v.y.atan2(v.x).to_degrees())
}

#[inline]
pub fn normalize_deg(a: f32) -> f32 {
    let r = a.rem_euclid(360.0);
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Smallest absolute difference between two angles, in [0, 180].
#[inline]
pub fn angular_distance_deg(a: f32, b: f32) -> f32 {
    let d = normalize_deg(a - b);
    d.min(360.0 - d)
}

#[inline]
pub fn unit_from_deg(deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

#[derive(Clone, Debug)]
pub struct Geometry {
    pub ear: Ear,
    pub center: Vec2,
    pub outer_radius: f32,
    pub inner_radius: f32,
    pub tube_width: f32,
    pub vestibule_angle_deg: f32,
    pub vestibule_center: Vec2,
    pub vestibule_radius: f32,
    pub bridge_start: f32,
    pub bridge_end: f32,
    pub gap_half_angle_deg: f32,
    pub cupula_angle_deg: f32,
    pub cupula: Rect,
    pub spawn_angle_deg: f32,
    axis: Vec2,
}

impl Geometry {
    pub fn new(cfg: &GeometryConfig, ear: Ear) -> Self {
        let center = Vec2::from(cfg.ring_center);
        let tube_width = cfg.outer_radius - cfg.inner_radius;
        let (vestibule_angle_deg, spawn_angle_deg) = match ear {
            Ear::Right => (
                cfg.right_vestibule_angle_deg,
                cfg.cupula_angle_deg + cfg.spawn_offset_deg,
            ),
            Ear::Left => (
                cfg.left_vestibule_angle_deg,
                cfg.cupula_angle_deg - cfg.spawn_offset_deg,
            ),
        };
        let axis = unit_from_deg(vestibule_angle_deg);
        let cupula_mid = center + unit_from_deg(cfg.cupula_angle_deg) * cfg.inner_radius;
        let half_w = cfg.cupula_width * 0.5;
        // The cupula spans the tube vertically at the bottom of the ring.
        let cupula = Rect {
            min: Vec2::new(cupula_mid.x - half_w, center.y + cfg.inner_radius),
            max: Vec2::new(cupula_mid.x + half_w, center.y + cfg.outer_radius),
        };
        Self {
            ear,
            center,
            outer_radius: cfg.outer_radius,
            inner_radius: cfg.inner_radius,
            tube_width,
            vestibule_angle_deg,
            vestibule_center: center + axis * cfg.vestibule_distance,
            vestibule_radius: cfg.vestibule_radius,
            bridge_start: cfg.bridge_start,
            bridge_end: cfg.vestibule_distance,
            gap_half_angle_deg: cfg.gap_half_angle_deg,
            cupula_angle_deg: cfg.cupula_angle_deg,
            cupula,
            spawn_angle_deg: normalize_deg(spawn_angle_deg),
            axis,
        }
    }

    /// Angle of a point around the ring center.
    pub fn angle_of(&self, p: Vec2) -> f32 {
        angle_deg(p - self.center)
    }

    pub fn point_at(&self, angle_deg: f32, radius: f32) -> Vec2 {
        self.center + unit_from_deg(angle_deg) * radius
    }

    pub fn mid_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) * 0.5
    }

    pub fn inside_ring(&self, p: Vec2) -> bool {
        let d = p.distance(self.center);
        d >= self.inner_radius && d <= self.outer_radius
    }

    /// Position in the bridge frame: `x` along the vestibule axis measured from
    /// the ring center, `y` across it.
    pub fn bridge_local(&self, p: Vec2) -> Vec2 {
        let rel = p - self.center;
        Vec2::new(rel.dot(self.axis), rel.dot(self.axis.perp()))
    }

    pub fn inside_bridge(&self, p: Vec2) -> bool {
        let local = self.bridge_local(p);
        local.x >= self.bridge_start
            && local.x <= self.bridge_end
            && local.y.abs() <= self.tube_width * 0.5
    }

    pub fn inside_vestibule_chamber(&self, p: Vec2) -> bool {
        p.distance(self.vestibule_center) <= self.vestibule_radius
    }

    pub fn inside_vestibule(&self, p: Vec2) -> bool {
        self.inside_vestibule_chamber(p) || self.inside_bridge(p)
    }

    pub fn is_in_valid_space(&self, p: Vec2) -> bool {
        self.inside_ring(p) || self.inside_vestibule(p)
    }

    /// True when the bounding box of a circle at `p` overlaps the cupula.
    pub fn cupula_collision(&self, p: Vec2, radius: f32) -> bool {
        self.cupula.intersects_box(p, radius)
    }

    /// Outer-wall opening where the bridge meets the ring.
    pub fn in_vestibule_gap(&self, angle_deg: f32) -> bool {
        angular_distance_deg(angle_deg, self.vestibule_angle_deg) < self.gap_half_angle_deg
    }

    /// Unit normal of the bridge's lateral walls (positive local `y`).
    pub fn bridge_normal(&self) -> Vec2 {
        self.axis.perp()
    }

    /// Direction from the vestibule center back toward the bridge mouth.
    pub fn bridge_mouth_dir(&self) -> Vec2 {
        -self.axis
    }

    /// Half-angle of the opening the bridge cuts into the vestibule wall.
    pub fn vestibule_mouth_half_angle_deg(&self) -> f32 {
        let half = (self.tube_width * 0.5).min(self.vestibule_radius);
        (half / self.vestibule_radius).asin().to_degrees()
    }

    /// Project `p` back inside `region` keeping a particle of `radius` off the
    /// walls. Points already in valid space are returned unchanged.
    pub fn snap_into(&self, p: Vec2, radius: f32, region: Region) -> Vec2 {
        if self.is_in_valid_space(p) {
            return p;
        }
        match region {
            Region::Ring => self.clamp_to_ring(p, radius),
            Region::Vestibule => {
                let rel = p - self.vestibule_center;
                let dir = rel.try_normalize().unwrap_or(self.bridge_mouth_dir());
                let reach = (self.vestibule_radius - radius).max(0.0);
                if rel.length() <= reach {
                    p
                } else {
                    self.vestibule_center + dir * reach
                }
            }
        }
    }

    /// Radially clamp into the annulus `[inner + r, outer - r]`.
    pub fn clamp_to_ring(&self, p: Vec2, radius: f32) -> Vec2 {
        let rel = p - self.center;
        let dir = rel
            .try_normalize()
            .unwrap_or(unit_from_deg(self.spawn_angle_deg));
        let lo = self.inner_radius + radius;
        let hi = (self.outer_radius - radius).max(lo);
        self.center + dir * rel.length().clamp(lo, hi)
    }

    /// Centers of a tight 2x2 cluster at mid-tube on the spawn angle.
    pub fn spawn_cluster(&self, count: usize, spacing: f32) -> Vec<Vec2> {
        let base = self.point_at(self.spawn_angle_deg, self.mid_radius());
        let radial = unit_from_deg(self.spawn_angle_deg);
        let tangent = radial.perp();
        const GRID: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];
        (0..count)
            .map(|i| {
                let [t, r] = GRID[i % GRID.len()];
                // Extra particles beyond the grid stack outward along the tangent.
                let ring = (i / GRID.len()) as f32;
                base + tangent * (t * spacing * (1.0 + 2.0 * ring)) + radial * (r * spacing)
            })
            .collect()
    }
}
