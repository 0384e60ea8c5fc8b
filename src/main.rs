use anyhow::Result;
use tracing::info;

use quotawatch::config::Config;
use quotawatch::ui::App;
use quotawatch::{logging, once};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    if cli.is_once_mode() {
        logging::setup_stderr_logging(cli.debug);
    } else {
        logging::setup_file_logging(cli.debug)?;
    }

    // Load settings
    let settings = cli.load_settings()?;
    info!(
        "Starting quotawatch (interval {}s, threshold {}%)",
        settings.poll_interval_secs, settings.low_quota_threshold
    );

    if cli.is_once_mode() {
        return once::run(settings).await;
    }

    // Run the application
    let mut app = App::new(cli, settings);
    app.run().await
}
