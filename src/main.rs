use market_predict::interfaces::PredictionApp;
use market_predict::interfaces::theme;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

fn main() -> anyhow::Result<()> {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!(
        "Market Predict {} starting (desktop)...",
        env!("CARGO_PKG_VERSION")
    );

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_title("Market Predict"),
        ..Default::default()
    };

    eframe::run_native(
        "Market Predict",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(theme::visuals());
            Ok(Box::new(PredictionApp::new()))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
