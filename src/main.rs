use anyhow::Context;
use eframe::egui;
use medal_browser::app::MedalBrowserApp;
use medal_browser::config::AppConfig;
use medal_browser::data;
use medal_browser::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load()?;
    let table = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading medal data from {}", config.data_path.display()))?;
    let state = AppState::new(table, config.data_path.clone(), &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Olympic Medals",
        options,
        Box::new(|_cc| Ok(Box::new(MedalBrowserApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
