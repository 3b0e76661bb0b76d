//! Frontend module for SerialVis-RS
//!
//! A thin egui window over the capture pipeline. Each frame the app drains
//! the transport handle, feeds every raw line to the [`CaptureCoordinator`]
//! it owns, then renders the toolbar, the plots and the status bar.
//!
//! Panels never mutate the app directly: they return [`AppAction`]s which
//! [`SerialVisApp::handle_action`] applies after rendering.
//!
//! # Main Types
//!
//! - [`SerialVisApp`] - the `eframe::App`
//! - [`AppAction`] - user intents emitted by panels
//! - [`plot::PlotView`] - overlay / grid plot renderer

pub mod plot;
pub mod status_bar;
pub mod toolbar;

use std::path::{Path, PathBuf};

use crate::capture::CaptureCoordinator;
use crate::config::{AppConfig, UiSessionState};
use crate::error::{Result, SerialVisError};
use crate::transport::{TransportEvent, TransportHandle};
use plot::PlotView;
use status_bar::{render_status_bar, StatusBarContext};
use toolbar::{render_toolbar, ToolbarContext};

/// Actions emitted by panels
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Resize every channel window (clears them)
    SetCapacity(usize),
    Pause,
    Resume,
    /// Write the export log as CSV to the path
    Export(PathBuf),
    /// Export was requested with nothing recorded
    ExportEmpty,
}

/// State of the line source as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Open,
    Closed,
    Error,
}

/// Last message shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_warning: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_warning: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_warning: true,
        }
    }
}

/// Main application
pub struct SerialVisApp {
    config: AppConfig,
    capture: CaptureCoordinator,
    transport: Option<TransportHandle>,
    source_name: String,
    link: LinkStatus,
    session: UiSessionState,
    plot: PlotView,
    message: Option<StatusMessage>,
}

impl SerialVisApp {
    /// Create the app around an already configured pipeline
    ///
    /// A capacity remembered in `session` is restored if it is still one of
    /// the configured presets.
    pub fn new(
        config: AppConfig,
        mut capture: CaptureCoordinator,
        transport: Option<TransportHandle>,
        session: UiSessionState,
    ) -> Self {
        if let Some(capacity) = session.capacity {
            if capacity != capture.capacity()
                && config.capture.preset_index(capacity).is_some()
            {
                if let Err(e) = capture.change_buffer_capacity(capacity) {
                    tracing::warn!("Could not restore capacity {}: {}", capacity, e);
                }
            }
        }

        let (source_name, link) = match &transport {
            Some(handle) => (handle.description().to_string(), LinkStatus::Open),
            None => (String::new(), LinkStatus::Closed),
        };

        Self {
            plot: PlotView::from_config(&config.ui),
            config,
            capture,
            transport,
            source_name,
            link,
            session,
            message: None,
        }
    }

    /// Feed every line delivered by the reader thread to the pipeline
    ///
    /// Returns whether any event arrived.
    pub fn pump_transport(&mut self) -> bool {
        let events = match &self.transport {
            Some(handle) => handle.drain(),
            None => return false,
        };
        let had_events = !events.is_empty();

        for event in events {
            match event {
                TransportEvent::Lines(lines) => {
                    for line in lines {
                        self.capture.on_raw_line(&line);
                    }
                }
                TransportEvent::Error(e) => {
                    self.link = LinkStatus::Error;
                    self.message = Some(StatusMessage::warning(format!("Link error: {}", e)));
                }
                TransportEvent::Closed => {
                    if self.link != LinkStatus::Error {
                        self.link = LinkStatus::Closed;
                    }
                    tracing::info!("Line source {} closed", self.source_name);
                }
            }
        }

        had_events
    }

    /// Apply an action emitted by a panel
    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::SetCapacity(capacity) => match self.capture.change_buffer_capacity(capacity) {
                Ok(()) => {
                    self.session.capacity = Some(capacity);
                    self.message = Some(StatusMessage::info(format!(
                        "Window set to {} samples",
                        capacity
                    )));
                }
                Err(e) => self.message = Some(StatusMessage::warning(e.to_string())),
            },
            AppAction::Pause => self.capture.pause(),
            AppAction::Resume => self.capture.resume(),
            AppAction::Export(path) => match self.export_to(&path) {
                Ok(rows) => {
                    self.session.remember_export(&path);
                    self.message = Some(StatusMessage::info(format!(
                        "Exported {} samples to {}",
                        rows,
                        path.display()
                    )));
                }
                Err(e) => {
                    tracing::warn!("Export failed: {}", e);
                    self.message = Some(StatusMessage::warning(e.to_string()));
                }
            },
            AppAction::ExportEmpty => {
                let text = SerialVisError::EmptyExport.to_string();
                self.message = Some(StatusMessage::warning(text));
            }
        }
    }

    /// Write the export log to `path`, returning the number of rows
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let table = self.capture.export_table()?;
        table.save(path)?;
        Ok(table.rows().len())
    }

    pub fn capture(&self) -> &CaptureCoordinator {
        &self.capture
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn session(&self) -> &UiSessionState {
        &self.session
    }

    /// Stop the reader thread and persist the session
    pub fn shutdown(&mut self) {
        if let Some(mut handle) = self.transport.take() {
            handle.stop();
        }

        if let Err(e) = self.session.save() {
            tracing::warn!("Failed to save UI session state: {}", e);
        }
    }

    fn remember_window_size(&mut self, ctx: &egui::Context) {
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.session.window.size = (rect.width(), rect.height());
        }
    }
}

impl eframe::App for SerialVisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_events = self.pump_transport();
        self.remember_window_size(ctx);

        if had_events || self.link == LinkStatus::Open {
            ctx.request_repaint();
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let toolbar_ctx = ToolbarContext {
                capacity_presets: &self.config.capture.capacity_presets,
                capacity: self.capture.capacity(),
                state: self.capture.state(),
                export_records: self.capture.export_log().len(),
                last_export_dir: self.session.last_export_dir.as_deref(),
            };
            actions.extend(render_toolbar(ui, &toolbar_ctx));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status_ctx = StatusBarContext {
                link: self.link,
                source: &self.source_name,
                state: self.capture.state(),
                capacity: self.capture.capacity(),
                stats: self.capture.stats(),
                export_dropped: self.capture.export_log().dropped(),
                message: self.message.as_ref(),
            };
            render_status_bar(ui, &status_ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot.render(ui, &self.capture);
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shutdown();
    }
}
