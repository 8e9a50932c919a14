mod app;

use app::StudyApp;
use study_cards::config::Config;
use study_cards::database::db::init_database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    let config = Config::load();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let conn = match init_database(&config.database_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(
                "Failed to open database {}: {}",
                config.database_path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Studying as '{}' with {:?} clock",
        config.owner,
        config.clock
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([500.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Study Cards",
        options,
        Box::new(move |_cc| Ok(Box::new(StudyApp::new(conn, &config)))),
    )
}
