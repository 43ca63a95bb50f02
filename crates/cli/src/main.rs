mod doctor_commands;

use std::path::PathBuf;

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    regsnipe_browser::BrowserSession,
    regsnipe_config::Credentials,
    regsnipe_enroll::{EnrollmentFlow, RunOutcome, ScreenshotStore},
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "regsnipe", about = "regsnipe — automated UW-Madison course enrollment")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "debug")]
    log_level: String,

    /// Output console logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Plain-text run log, truncated at every start.
    #[arg(long, global = true, default_value = "regsnipe.log")]
    log_file: PathBuf,

    // Enrollment arguments (used when no subcommand is provided, or with `enroll`)
    /// Registration term to enroll for (overrides config value).
    #[arg(long, global = true, env = "REGSNIPE_SEMESTER")]
    semester: Option<String>,
    /// Run the browser without a visible window.
    #[arg(long, global = true, default_value_t = false)]
    headless: bool,
    /// Chrome profile directory (overrides config value).
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,
    /// Screenshot output directory (overrides config value).
    #[arg(long, global = true)]
    screenshots_dir: Option<PathBuf>,
    /// Give up after this many attempts (default: retry until resolved).
    #[arg(long, global = true)]
    max_attempts: Option<u32>,
    /// Path to the Chrome/Chromium binary (overrides auto-detection).
    #[arg(long, global = true)]
    chrome_path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the enrollment flow (default when no subcommand is provided).
    Enroll,
    /// Environment and configuration health check.
    Doctor,
}

/// Initialise tracing: a colorized console stream plus a plain-text log
/// file that is truncated at every start.
fn init_telemetry(cli: &Cli) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("failed to create log file {}", cli.log_file.display()))?;
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::sync::Arc::new(log_file));

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "regsnipe starting");

    match cli.command {
        // Default: run the enrollment flow when no subcommand is provided
        None | Some(Commands::Enroll) => run_enroll(cli).await,
        Some(Commands::Doctor) => doctor_commands::handle_doctor(),
    }
}

async fn run_enroll(cli: Cli) -> anyhow::Result<()> {
    let mut config = regsnipe_config::discover_and_load();

    // CLI args override config values
    if let Some(semester) = cli.semester {
        config.enrollment.semester = semester;
    }
    if let Some(dir) = cli.screenshots_dir {
        config.enrollment.screenshots_dir = dir;
    }
    if let Some(max) = cli.max_attempts {
        config.enrollment.max_attempts = Some(max);
    }
    if cli.headless {
        config.browser.headless = true;
    }
    if let Some(dir) = cli.profile_dir {
        config.browser.profile_dir = dir;
    }
    if let Some(path) = cli.chrome_path {
        config.browser.chrome_path = Some(path);
    }

    config.enrollment.validate()?;

    // Credentials are read before the browser starts, so a misconfigured
    // run fails without ever opening a window.
    let credentials = Credentials::from_env()?;

    std::fs::create_dir_all(&config.browser.profile_dir).with_context(|| {
        format!(
            "failed to create profile directory {}",
            config.browser.profile_dir.display()
        )
    })?;
    std::fs::create_dir_all(&config.enrollment.screenshots_dir).with_context(|| {
        format!(
            "failed to create screenshots directory {}",
            config.enrollment.screenshots_dir.display()
        )
    })?;

    let session = BrowserSession::launch(&config.browser).await?;
    let page = session.open_page().await?;

    let shots = ScreenshotStore::new(&config.enrollment.screenshots_dir);
    let mut flow = EnrollmentFlow::new(&page, &credentials, &config.enrollment, &shots);

    let outcome = tokio::select! {
        outcome = flow.run() => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, closing browser");
            session.close();
            std::process::exit(130);
        },
    };

    match outcome? {
        RunOutcome::Enrolled { attempts } => {
            session.close();
            info!(attempts, "enrollment complete");
            Ok(())
        },
        RunOutcome::Rejected { attempts } => {
            // Hard exit: the dialog stays up and the browser dies with the
            // process.
            error!(attempts, "enrollment rejected, giving up");
            std::process::exit(2);
        },
    }
}
