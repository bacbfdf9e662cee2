//! Frame-to-instance conversion for the circle renderer.
//!
//! Everything on screen is a circle: walls are drawn as rows of small dots,
//! particles and indicators as discs or outlines.

use epley_core::geometry::{angle_deg, angular_distance_deg, unit_from_deg};
use epley_core::{Frame, Geometry};
use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub center: [f32; 2],
    pub radius: f32,
    /// 0 for a filled disc, otherwise outline thickness relative to radius.
    pub ring: f32,
    pub color: [f32; 4],
}

pub const MAX_INSTANCES: usize = 1024;

const DOT_SPACING: f32 = 6.0;
const DOT_RADIUS: f32 = 1.4;

const WALL: [f32; 4] = [0.63, 0.78, 1.0, 0.8];
const CUPULA: [f32; 4] = [0.94, 0.67, 0.35, 0.95];
const PARTICLE: [f32; 4] = [0.96, 0.95, 0.91, 1.0];
const STAGE_DOT: [f32; 4] = [0.91, 0.93, 0.99, 1.0];
const CUE_ON: [f32; 4] = [1.0, 0.42, 0.42, 1.0];
const CUE_OFF: [f32; 4] = [1.0, 1.0, 1.0, 0.25];
const INDICATOR: [f32; 4] = [0.35, 0.78, 0.55, 1.0];

fn with_alpha(c: [f32; 4], a: f32) -> [f32; 4] {
    [c[0], c[1], c[2], c[3] * a.clamp(0.0, 1.0)]
}

fn disc(out: &mut Vec<InstanceData>, center: Vec2, radius: f32, color: [f32; 4]) {
    if out.len() < MAX_INSTANCES && radius > 0.0 {
        out.push(InstanceData {
            center: center.to_array(),
            radius,
            ring: 0.0,
            color,
        });
    }
}

fn outline(out: &mut Vec<InstanceData>, center: Vec2, radius: f32, thickness: f32, color: [f32; 4]) {
    if out.len() < MAX_INSTANCES && radius > 0.0 {
        out.push(InstanceData {
            center: center.to_array(),
            radius,
            ring: (thickness / radius).clamp(0.0, 1.0),
            color,
        });
    }
}

/// Dots along a circle, skipping directions for which `skip` holds.
fn dot_circle(out: &mut Vec<InstanceData>, center: Vec2, radius: f32, skip: impl Fn(f32) -> bool) {
    let n = ((std::f32::consts::TAU * radius) / DOT_SPACING).ceil().max(8.0) as usize;
    for i in 0..n {
        let deg = i as f32 * 360.0 / n as f32;
        if !skip(deg) {
            disc(out, center + unit_from_deg(deg) * radius, DOT_RADIUS, WALL);
        }
    }
}

fn dot_segment(out: &mut Vec<InstanceData>, from: Vec2, to: Vec2) {
    let len = from.distance(to);
    let n = (len / DOT_SPACING).ceil().max(1.0) as usize;
    for i in 0..=n {
        disc(out, from.lerp(to, i as f32 / n as f32), DOT_RADIUS, WALL);
    }
}

fn walls(out: &mut Vec<InstanceData>, g: &Geometry) {
    dot_circle(out, g.center, g.outer_radius, |deg| g.in_vestibule_gap(deg));
    dot_circle(out, g.center, g.inner_radius, |_| false);

    let mouth = angle_deg(g.bridge_mouth_dir());
    let mouth_half = g.vestibule_mouth_half_angle_deg();
    dot_circle(out, g.vestibule_center, g.vestibule_radius, |deg| {
        angular_distance_deg(deg, mouth) < mouth_half
    });

    // Bridge side walls run from the ring's outer wall to the vestibule wall.
    let axis = unit_from_deg(g.vestibule_angle_deg);
    let half = g.tube_width * 0.5;
    let chamber_entry = (g.vestibule_radius * g.vestibule_radius - half * half).max(0.0).sqrt();
    let end = g.center.distance(g.vestibule_center) - chamber_entry;
    let start = (g.outer_radius * g.outer_radius - half * half).max(0.0).sqrt();
    for side in [-1.0, 1.0] {
        let offset = g.bridge_normal() * (half * side);
        dot_segment(out, g.center + axis * start + offset, g.center + axis * end + offset);
    }

    let mut y = g.cupula.min.y;
    while y <= g.cupula.max.y {
        let mut x = g.cupula.min.x;
        while x <= g.cupula.max.x {
            disc(out, Vec2::new(x, y), DOT_RADIUS * 1.6, CUPULA);
            x += DOT_SPACING * 0.5;
        }
        y += DOT_SPACING * 0.5;
    }
}

/// Per-window presentation settings.
#[derive(Clone, Copy, Debug)]
pub struct SceneParams {
    pub world: Vec2,
    pub show_cue: bool,
    pub indicator_radius: f32,
}

/// Build the full instance list for one frame.
pub fn build_instances(
    frame: Option<&Frame>,
    geometry: Option<&Geometry>,
    params: SceneParams,
    out: &mut Vec<InstanceData>,
) {
    out.clear();
    if let Some(g) = geometry {
        walls(out, g);
    }
    let Some(frame) = frame else {
        return;
    };

    for p in &frame.particles {
        let alpha = if p.dissolving { 0.55 } else { 1.0 };
        disc(out, p.position, p.radius, with_alpha(PARTICLE, alpha));
    }

    // Stage progress: five dots top-left, the newest one fading in.
    let a = &frame.avatar;
    for s in 1..=5u8 {
        let c = Vec2::new(16.0 + (s - 1) as f32 * 14.0, 16.0);
        let alpha = match s.cmp(&a.stage) {
            std::cmp::Ordering::Less => 1.0,
            std::cmp::Ordering::Equal => a.blend.max(if s == a.previous_stage { 1.0 } else { 0.0 }),
            std::cmp::Ordering::Greater => 0.0,
        };
        outline(out, c, 5.0, 1.2, with_alpha(STAGE_DOT, a.opacity));
        disc(out, c, 3.5, with_alpha(STAGE_DOT, alpha * a.opacity));
    }

    if params.show_cue {
        let c = Vec2::new(params.world.x - 26.0, 26.0);
        let color = if frame.cue_active { CUE_ON } else { CUE_OFF };
        outline(out, c, 14.0, 2.0, color);
        disc(out, c, 5.0, color);
    }

    if let (Some(g), true) = (geometry, frame.indicator_opacity > 0.0) {
        disc(out, g.center, params.indicator_radius, with_alpha(INDICATOR, frame.indicator_opacity));
    }
}
