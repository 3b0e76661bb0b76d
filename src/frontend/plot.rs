//! Plot rendering
//!
//! The x axis is the sample index inside the rolling window (0 = oldest
//! retained sample) and the y axis is the raw value. Series are pulled from
//! the coordinator once per frame, so a capacity change between frames just
//! shows empty plots on the next one.
//!
//! # Main Types
//!
//! - [`PlotView`] - display options and the overlay / grid renderers

use egui::{Color32, Ui};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints, PlotUi};

use crate::capture::{CaptureCoordinator, Channel};
use crate::config::{PlotLayout, UiConfig};

/// Minimum height of a subplot in grid layout
const MIN_GRID_PLOT_HEIGHT: f32 = 120.0;

/// Plot view configuration
#[derive(Debug, Clone)]
pub struct PlotView {
    pub layout: PlotLayout,
    pub show_legend: bool,
    pub show_grid: bool,
    /// Line width for all plots
    pub line_width: f32,
}

impl Default for PlotView {
    fn default() -> Self {
        Self::from_config(&UiConfig::default())
    }
}

impl PlotView {
    pub fn from_config(config: &UiConfig) -> Self {
        Self {
            layout: config.layout,
            show_legend: config.show_legend,
            show_grid: config.show_grid,
            line_width: config.line_width,
        }
    }

    /// Render every channel of `capture` in the configured layout
    pub fn render(&self, ui: &mut Ui, capture: &CaptureCoordinator) {
        match self.layout {
            PlotLayout::Overlay => self.render_overlay(ui, capture),
            PlotLayout::Grid => self.render_grid(ui, capture),
        }
    }

    fn render_overlay(&self, ui: &mut Ui, capture: &CaptureCoordinator) {
        let mut plot = Plot::new("overlay_plot")
            .show_axes(true)
            .show_grid(self.show_grid)
            .include_x(0.0)
            .include_x(capture.capacity() as f64)
            .x_axis_label("Sample")
            .y_axis_label("Value");

        if self.show_legend {
            plot = plot.legend(
                Legend::default()
                    .position(Corner::RightTop)
                    .background_alpha(0.8),
            );
        }

        plot.show(ui, |plot_ui| {
            for channel in capture.channels() {
                self.draw_channel(plot_ui, channel);
            }
        });
    }

    fn render_grid(&self, ui: &mut Ui, capture: &CaptureCoordinator) {
        let channels: Vec<&Channel> = capture.channels().collect();
        if channels.is_empty() {
            ui.centered_and_justified(|ui| ui.label("No channels configured"));
            return;
        }

        let rows = grid_rows(channels.len());
        let spacing = ui.spacing().item_spacing.y;
        let height = ((ui.available_height() - spacing * rows as f32) / rows as f32)
            .max(MIN_GRID_PLOT_HEIGHT);
        let capacity = capture.capacity() as f64;

        egui::ScrollArea::vertical().show(ui, |ui| {
            for pair in channels.chunks(2) {
                ui.columns(2, |columns| {
                    for (column, channel) in columns.iter_mut().zip(pair) {
                        self.render_single_channel(column, channel, capacity, height);
                    }
                });
            }
        });
    }

    fn render_single_channel(&self, ui: &mut Ui, channel: &Channel, capacity: f64, height: f32) {
        let mut plot = Plot::new(format!("channel_plot_{}", channel.tag()))
            .show_axes(true)
            .show_grid(self.show_grid)
            .include_x(0.0)
            .include_x(capacity)
            .height(height);

        if self.show_legend {
            plot = plot.legend(Legend::default().position(Corner::RightTop));
        }

        plot.show(ui, |plot_ui| {
            self.draw_channel(plot_ui, channel);
        });
    }

    fn draw_channel(&self, plot_ui: &mut PlotUi, channel: &Channel) {
        if channel.buffer().is_empty() {
            return;
        }

        let [r, g, b, a] = channel.color();
        let color = Color32::from_rgba_unmultiplied(r, g, b, a);

        let line = Line::new(
            channel.tag().to_string(),
            PlotPoints::from(series_points(channel.buffer().iter())),
        )
        .color(color)
        .width(self.line_width);

        plot_ui.line(line);
    }
}

/// Map a chronological series to `[index, value]` points
pub fn series_points(series: impl IntoIterator<Item = f64>) -> Vec<[f64; 2]> {
    series
        .into_iter()
        .enumerate()
        .map(|(i, v)| [i as f64, v])
        .collect()
}

/// Rows needed to lay out `channels` subplots two per row
pub fn grid_rows(channels: usize) -> usize {
    channels.div_ceil(2).max(1)
}
