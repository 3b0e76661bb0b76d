//! Status bar panel: bottom bar showing link, capture state and counters.

use egui::{Color32, RichText, Ui};

use crate::frontend::{LinkStatus, StatusMessage};
use crate::types::{CaptureState, CaptureStats};

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub link: LinkStatus,
    pub source: &'a str,
    pub state: CaptureState,
    pub capacity: usize,
    pub stats: &'a CaptureStats,
    pub export_dropped: u64,
    pub message: Option<&'a StatusMessage>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Link status dot + port ===
        let (status_color, status_text) = match ctx.link {
            LinkStatus::Open => (Color32::GREEN, "Open"),
            LinkStatus::Closed => (Color32::GRAY, "Closed"),
            LinkStatus::Error => (Color32::RED, "Error"),
        };
        ui.colored_label(status_color, "●");
        let link_display = if ctx.source.is_empty() {
            status_text.to_string()
        } else {
            format!("{}: {}", status_text, ctx.source)
        };
        ui.label(RichText::new(link_display).small());

        ui.separator();

        let state_color = match ctx.state {
            CaptureState::Running => Color32::from_rgb(100, 255, 100),
            CaptureState::Paused => Color32::YELLOW,
        };
        ui.colored_label(state_color, RichText::new(ctx.state.to_string()).small());

        ui.separator();

        ui.label(RichText::new(format!("Window: {}", ctx.capacity)).small());

        ui.separator();

        let stats = ctx.stats;
        ui.label(
            RichText::new(format!(
                "Lines: {} ({:.1}% ok)",
                stats.lines_received,
                stats.acceptance_rate()
            ))
            .small(),
        );

        ui.separator();

        let rejected = stats.lines_rejected();
        let reject_color = if rejected > 0 {
            Color32::LIGHT_RED
        } else {
            Color32::GRAY
        };
        ui.colored_label(reject_color, RichText::new(format!("Rejected: {}", rejected)).small());

        if stats.fields_unrouted > 0 {
            ui.separator();
            ui.colored_label(
                Color32::GRAY,
                RichText::new(format!("Unrouted: {}", stats.fields_unrouted)).small(),
            );
        }

        if ctx.export_dropped > 0 {
            ui.separator();
            ui.colored_label(
                Color32::LIGHT_RED,
                RichText::new(format!("Export full, {} not recorded", ctx.export_dropped)).small(),
            );
        }

        // === Last message (right-aligned) ===
        if let Some(message) = ctx.message {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = if message.is_warning {
                    Color32::from_rgb(255, 180, 80)
                } else {
                    Color32::LIGHT_GRAY
                };
                ui.colored_label(color, RichText::new(&message.text).small());
            });
        }
    });
}
