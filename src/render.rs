use crate::constants::*;
use crate::input::ViewTransform;
use epley_core::{Frame, Geometry};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Canvas 2D renderer for the canal, particles and the HUD drawn in-canvas.
///
/// Drawing happens in world units: the view transform is applied once to the
/// context, so every shape below uses simulation coordinates directly.
pub struct CanvasRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    world: Vec2,
    indicator_radius: f32,
}

impl CanvasRenderer {
    pub fn new(canvas: &web::HtmlCanvasElement, world: Vec2, indicator_radius: f32) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("get_context error: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("not a 2d context: {:?}", e))?;
        Ok(Self {
            canvas: canvas.clone(),
            ctx,
            world,
            indicator_radius,
        })
    }

    pub fn view(&self) -> ViewTransform {
        ViewTransform::fit(
            self.world,
            Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32),
        )
    }

    pub fn render(&self, frame: &Frame, geometry: &Geometry, show_cue: bool, now_sec: f64) {
        let ctx = &self.ctx;
        _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);

        let view = self.view();
        _ = ctx.set_transform(
            view.scale as f64,
            0.0,
            0.0,
            view.scale as f64,
            view.offset.x as f64,
            view.offset.y as f64,
        );

        self.draw_canal(geometry);
        self.draw_particles(frame);
        self.draw_avatar(frame);
        if show_cue {
            self.draw_cue_eye(frame.cue_active, now_sec);
        }
        if frame.indicator_opacity > 0.0 {
            self.draw_indicator(geometry, frame.indicator_opacity);
        }
        ctx.set_global_alpha(1.0);
    }

    fn circle(&self, c: Vec2, r: f32) {
        self.ctx.begin_path();
        _ = self.ctx.arc(c.x as f64, c.y as f64, r.max(0.0) as f64, 0.0, TAU);
    }

    fn draw_canal(&self, g: &Geometry) {
        let ctx = &self.ctx;
        ctx.set_line_cap("butt");

        // Tube body: a thick stroke along the mid radius and along the bridge.
        ctx.set_stroke_style_str(CANAL_FILL);
        ctx.set_line_width(g.tube_width as f64);
        self.circle(g.center, g.mid_radius());
        ctx.stroke();
        let mouth = g.point_at(g.vestibule_angle_deg, g.bridge_start);
        ctx.begin_path();
        ctx.move_to(mouth.x as f64, mouth.y as f64);
        ctx.line_to(g.vestibule_center.x as f64, g.vestibule_center.y as f64);
        ctx.stroke();
        ctx.set_fill_style_str(CANAL_FILL);
        self.circle(g.vestibule_center, g.vestibule_radius);
        ctx.fill();

        ctx.set_stroke_style_str(CANAL_STROKE);
        ctx.set_line_width(CANAL_LINE_WIDTH);
        self.circle(g.center, g.outer_radius);
        ctx.stroke();
        self.circle(g.center, g.inner_radius);
        ctx.stroke();
        self.circle(g.vestibule_center, g.vestibule_radius);
        ctx.stroke();

        ctx.set_fill_style_str(CUPULA_FILL);
        let size = g.cupula.max - g.cupula.min;
        ctx.fill_rect(
            g.cupula.min.x as f64,
            g.cupula.min.y as f64,
            size.x as f64,
            size.y as f64,
        );
    }

    fn draw_particles(&self, frame: &Frame) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(PARTICLE_FILL);
        for p in frame.particles.iter().filter(|p| p.radius > 0.0) {
            ctx.set_global_alpha(if p.dissolving { DISSOLVING_ALPHA } else { 1.0 });
            self.circle(p.position, p.radius);
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_avatar(&self, frame: &Frame) {
        let ctx = &self.ctx;
        let a = &frame.avatar;
        if a.opacity <= 0.0 {
            return;
        }
        let [x, y] = AVATAR_ORIGIN;
        ctx.set_global_alpha(a.opacity as f64);
        ctx.set_stroke_style_str(CANAL_STROKE);
        ctx.set_line_width(CANAL_LINE_WIDTH);
        ctx.stroke_rect(x as f64, y as f64, AVATAR_SIZE as f64, AVATAR_SIZE as f64);

        ctx.set_fill_style_str(TEXT_FILL);
        ctx.set_font("bold 32px system-ui");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let cx = (x + AVATAR_SIZE * 0.5) as f64;
        let cy = (y + AVATAR_SIZE * 0.5) as f64;
        if a.blend < 1.0 && a.previous_stage != a.stage {
            ctx.set_global_alpha((a.opacity * (1.0 - a.blend)) as f64);
            _ = ctx.fill_text(&a.previous_stage.to_string(), cx, cy);
        }
        ctx.set_global_alpha((a.opacity * a.blend) as f64);
        _ = ctx.fill_text(&a.stage.to_string(), cx, cy);
        ctx.set_global_alpha(1.0);
    }

    fn draw_cue_eye(&self, active: bool, now_sec: f64) {
        let ctx = &self.ctx;
        let c = Vec2::new(self.world.x - AVATAR_ORIGIN[0] - CUE_EYE_RADIUS, AVATAR_ORIGIN[1] + CUE_EYE_RADIUS);
        ctx.set_stroke_style_str(if active { CUE_ON } else { CUE_OFF });
        ctx.set_line_width(CANAL_LINE_WIDTH);
        self.circle(c, CUE_EYE_RADIUS);
        ctx.stroke();
        // Torsional beat: the pupil jerks sideways while the cue is on.
        let jerk = if active {
            ((now_sec * CUE_EYE_BEAT_HZ).fract() as f32 - 0.5) * CUE_EYE_RADIUS * 0.6
        } else {
            0.0
        };
        ctx.set_fill_style_str(if active { CUE_ON } else { CUE_OFF });
        self.circle(c + Vec2::new(jerk, 0.0), CUE_EYE_RADIUS * 0.35);
        ctx.fill();
    }

    fn draw_indicator(&self, g: &Geometry, opacity: f32) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(opacity as f64);
        ctx.set_fill_style_str(INDICATOR_FILL);
        self.circle(g.center, self.indicator_radius);
        ctx.fill();
        ctx.set_fill_style_str(TEXT_FILL);
        ctx.set_font("bold 22px system-ui");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        _ = ctx.fill_text("Done", g.center.x as f64, (g.center.y - 8.0) as f64);
        ctx.set_font("13px system-ui");
        _ = ctx.fill_text("tap to restart", g.center.x as f64, (g.center.y + 14.0) as f64);
        ctx.set_global_alpha(1.0);
    }
}
