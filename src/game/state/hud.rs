//! On-screen text: heading, control help, render mode, FPS and banners.

use egui::{Align2, Color32, Id, RichText};

use crate::game::state::game_state::{Banner, BannerKind};

const MARGIN: f32 = 12.0;
const AZURE: Color32 = Color32::from_rgb(0, 128, 255);
const LIME: Color32 = Color32::from_rgb(128, 255, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub render_mode: String,
    pub fps: u32,
}

impl Status {
    pub fn mode_line(&self) -> String {
        format!("Render Mode: {}", self.render_mode)
    }

    pub fn fps_line(&self) -> String {
        format!("FPS: {}", self.fps)
    }
}

#[derive(Debug, Clone)]
pub struct Hud<'a> {
    pub heading: Option<&'a str>,
    pub controls: Option<&'a str>,
    pub status: Option<Status>,
    pub banner: Option<&'a Banner>,
}

impl Hud<'_> {
    pub fn is_empty(&self) -> bool {
        self.heading.is_none() && self.controls.is_none() && self.status.is_none() && self.banner.is_none()
    }
}

fn panel() -> egui::Frame {
    egui::Frame::none()
        .fill(Color32::from_black_alpha(170))
        .inner_margin(egui::Margin::symmetric(8.0, 4.0))
        .rounding(4.0)
}

fn boxed_label(ui: &mut egui::Ui, text: &str, color: Color32, size: f32) {
    panel().show(ui, |ui| {
        ui.label(RichText::new(text).color(color).size(size));
    });
}

/// Lays out `hud` for the current egui pass.
pub fn draw(ctx: &egui::Context, hud: &Hud) {
    if hud.heading.is_some() || hud.controls.is_some() || hud.status.is_some() {
        egui::Area::new(Id::new("hud_panel"))
            .anchor(Align2::LEFT_TOP, egui::vec2(MARGIN, MARGIN))
            .interactable(false)
            .show(ctx, |ui| {
                ui.spacing_mut().item_spacing.y = 6.0;
                if let Some(heading) = hud.heading {
                    boxed_label(ui, heading, Color32::WHITE, 26.0);
                }
                if let Some(controls) = hud.controls {
                    boxed_label(ui, controls, AZURE, 15.0);
                }
                if let Some(status) = &hud.status {
                    boxed_label(ui, &status.mode_line(), Color32::YELLOW, 17.0);
                }
            });
    }

    if let Some(status) = &hud.status {
        egui::Area::new(Id::new("hud_fps"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-MARGIN, MARGIN))
            .interactable(false)
            .show(ctx, |ui| boxed_label(ui, &status.fps_line(), LIME, 19.0));
    }

    if let Some(banner) = hud.banner {
        // Notices sit below the middle of the screen, views right on it.
        let below = ctx.screen_rect().height() * 0.3;
        let (offset, size, color) = match banner.kind {
            BannerKind::View => (0.0, 32.0, Color32::WHITE),
            BannerKind::Notice => (below, 22.0, Color32::WHITE),
            BannerKind::Failure => (below, 22.0, Color32::RED),
        };
        egui::Area::new(Id::new("hud_banner"))
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, offset))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| boxed_label(ui, &banner.text, color, size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::graphics::overlay::raw_input;

    /// Shape count once areas have settled past their first sizing frame.
    fn shape_count(hud: &Hud) -> usize {
        let ctx = egui::Context::default();
        let mut shapes = 0;
        for _ in 0..3 {
            let output = ctx.run(raw_input([1280, 720], 1.0), |ctx| draw(ctx, hud));
            shapes = output.shapes.len();
        }
        shapes
    }

    fn empty() -> Hud<'static> {
        Hud {
            heading: None,
            controls: None,
            status: None,
            banner: None,
        }
    }

    #[test]
    fn status_lines() {
        let status = Status {
            render_mode: "Lit".to_string(),
            fps: 58,
        };
        assert_eq!(status.mode_line(), "Render Mode: Lit");
        assert_eq!(status.fps_line(), "FPS: 58");
    }

    #[test]
    fn empty_hud_draws_less_than_a_full_one() {
        let full = Hud {
            heading: Some("PEACH'S CASTLE - 3D RENDER"),
            controls: Some("WASD: Move\nESC: Quit"),
            status: Some(Status {
                render_mode: "Lit".to_string(),
                fps: 60,
            }),
            banner: None,
        };
        assert!(empty().is_empty());
        assert!(!full.is_empty());
        assert!(shape_count(&full) > shape_count(&empty()));
    }

    #[test]
    fn banner_adds_shapes() {
        let banner = Banner {
            kind: BannerKind::Failure,
            text: "Screenshot failed".to_string(),
            remaining: 2.0,
        };
        let with_banner = Hud {
            banner: Some(&banner),
            ..empty()
        };
        assert!(shape_count(&with_banner) > shape_count(&empty()));
    }
}
