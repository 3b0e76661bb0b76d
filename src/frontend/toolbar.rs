//! Toolbar panel: capacity selector, pause / resume and export.

use std::path::{Path, PathBuf};

use egui::{Color32, RichText, Ui};

use crate::capture::default_export_filename;
use crate::frontend::AppAction;
use crate::types::CaptureState;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub capacity_presets: &'a [usize],
    pub capacity: usize,
    pub state: CaptureState,
    pub export_records: usize,
    pub last_export_dir: Option<&'a Path>,
}

/// Render the toolbar, returning the actions the user triggered.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        render_capacity_group(ui, ctx, &mut actions);

        ui.separator();

        render_capture_group(ui, ctx, &mut actions);

        ui.separator();

        render_export_group(ui, ctx, &mut actions);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            match ctx.state {
                CaptureState::Running => ui.colored_label(Color32::GREEN, "Recording"),
                CaptureState::Paused => ui.colored_label(Color32::YELLOW, "Paused"),
            };
        });
    });

    actions
}

fn render_capacity_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    ui.label("Window:");

    egui::ComboBox::from_id_salt("toolbar_capacity_selector")
        .selected_text(format!("{} samples", ctx.capacity))
        .width(120.0)
        .show_ui(ui, |ui| {
            for &preset in ctx.capacity_presets {
                if ui
                    .selectable_label(preset == ctx.capacity, format!("{} samples", preset))
                    .clicked()
                    && preset != ctx.capacity
                {
                    actions.push(AppAction::SetCapacity(preset));
                }
            }
        });
}

fn render_capture_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    let paused = ctx.state == CaptureState::Paused;

    let pause = egui::Button::new(RichText::new("Pause").color(Color32::WHITE))
        .fill(Color32::from_rgb(180, 120, 40));
    if ui
        .add_enabled(!paused, pause)
        .on_hover_text("Stop plotting and recording incoming lines")
        .clicked()
    {
        actions.push(AppAction::Pause);
    }

    let resume = egui::Button::new(RichText::new("Resume").color(Color32::WHITE))
        .fill(Color32::from_rgb(50, 120, 50));
    if ui
        .add_enabled(paused, resume)
        .on_hover_text("Continue plotting")
        .clicked()
    {
        actions.push(AppAction::Resume);
    }
}

fn render_export_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    let paused = ctx.state == CaptureState::Paused;

    if ui
        .add_enabled(paused, egui::Button::new("Export CSV"))
        .on_hover_text("Save every recorded sample (pause first)")
        .clicked()
    {
        if let Some(action) = export_clicked(ctx, || pick_export_path(ctx.last_export_dir)) {
            actions.push(action);
        }
    }

    ui.label(
        RichText::new(format!("{} recorded", ctx.export_records))
            .small()
            .color(Color32::from_rgb(150, 150, 200)),
    );
}

/// Action for a click on Export. The save dialog is only opened when there
/// is something to write.
fn export_clicked(
    ctx: &ToolbarContext<'_>,
    pick_path: impl FnOnce() -> Option<PathBuf>,
) -> Option<AppAction> {
    if ctx.export_records == 0 {
        return Some(AppAction::ExportEmpty);
    }
    pick_path().map(AppAction::Export)
}

fn pick_export_path(last_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Export Data")
        .add_filter("CSV Files", &["csv"])
        .set_file_name(default_export_filename());
    if let Some(dir) = last_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}
