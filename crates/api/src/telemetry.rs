// =============================================================================
// Fazenda API - Logging Setup
// =============================================================================

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `app-YYYY-MM-DD.log` under `dir`, dated with the local calendar day.
pub fn daily_log_path(dir: &Path, day: chrono::NaiveDate) -> PathBuf {
    dir.join(format!("app-{}.log", day.format("%Y-%m-%d")))
}

/// Install the global subscriber: stdout always, plus a daily file when
/// `log_dir` is set.
pub fn init(log_dir: Option<&Path>) -> std::io::Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = daily_log_path(dir, chrono::Local::now().date_naive());
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}
