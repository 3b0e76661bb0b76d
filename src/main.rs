//! SerialVis-RS - Main Entry Point
//!
//! Usage: `serialvis-rs [CONFIG_PATH]`
//!
//! Opens the configured serial port and plots the tagged readings it
//! receives. Failing to open the port is fatal.

use anyhow::Context;
use serialvis_rs::{
    capture::CaptureCoordinator,
    config::{AppConfig, UiSessionState},
    frontend::SerialVisApp,
    transport::{available_ports, SerialLineSource, TransportHandle},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serialvis_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!("{:#}", e);
        eprintln!("serialvis-rs: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    tracing::info!("Starting SerialVis-RS");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref());
    let session = UiSessionState::load();

    let capture = CaptureCoordinator::from_config(&config.capture)
        .context("Invalid capture configuration")?;

    let source = SerialLineSource::open(&config.serial).with_context(|| {
        let ports = available_ports();
        if ports.is_empty() {
            "No serial ports detected".to_string()
        } else {
            format!("Available ports: {}", ports.join(", "))
        }
    })?;
    let transport = TransportHandle::spawn(Box::new(source), config.serial.channel_buffer_size)
        .context("Failed to start the reader thread")?;

    let (width, height) = session.window.size;
    let dark_mode = config.ui.dark_mode;

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([640.0, 400.0])
            .with_title("SerialVis-RS"),
        ..Default::default()
    };

    let app = SerialVisApp::new(config, capture, Some(transport), session);

    eframe::run_native(
        "SerialVis-RS",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
