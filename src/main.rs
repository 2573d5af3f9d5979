use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Arg, Command};
use setup_copier::{
    collect_setup_files, copy_setup_files, discover_setup_folders, services::default_setups_dir,
    AliasTable, AppConfig, ConsoleNotifier, FolderDiscoveryConfig, Notifier, SetupCopyConfig,
    SetupCopyReport, Severity,
};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Side file that receives detailed error text when a run has failures.
const ERROR_LOG_FILE: &str = "setup_errors.log";

fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("setup-copier")
        .version("1.0")
        .about("Copies simulator setup files into the matching per-vehicle folders")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("setups-dir")
                .long("setups-dir")
                .value_name("DIR")
                .help("Simulator setups directory (default: ~/Documents/iRacing/setups)"),
        )
        .arg(
            Arg::new("source-dir")
                .long("source-dir")
                .value_name("DIR")
                .help("Directory holding the setup files to copy")
                .default_value("."),
        )
        .arg(
            Arg::new("alias-file")
                .long("alias-file")
                .value_name("FILE")
                .help("JSON file mapping car codes to folder names")
                .default_value("iracing-folders.json"),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .value_name("EXT")
                .help("Setup file extension to look for")
                .default_value(".sto"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Resolve destinations and report without copying anything")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize logging
    initialize_logging(matches.get_one::<String>("log-level").unwrap())?;

    // Load environment variables
    load_environment_variables();

    // Initialize configuration from command line arguments and environment
    let config = create_app_config(&matches)?;

    let notifier = ConsoleNotifier;

    // Run the application; only a setup failure is fatal
    if let Err(e) = run_application(config, &notifier) {
        let message = format!("Fatal error: {e:#}");
        error!("{message}");
        notifier.notify(&message, Severity::Error);
        std::process::exit(1);
    }

    Ok(())
}

/// Create application configuration from CLI arguments and environment.
///
/// The setups directory resolves in order: `--setups-dir`, the
/// `SETUPS_DIR` environment variable, then the platform default.
fn create_app_config(matches: &clap::ArgMatches) -> Result<AppConfig> {
    let log_level = matches.get_one::<String>("log-level").unwrap().clone();

    let setups_dir = matches
        .get_one::<String>("setups-dir")
        .map(PathBuf::from)
        .or_else(|| env::var("SETUPS_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(default_setups_dir);

    let extension = matches.get_one::<String>("extension").unwrap().clone();
    if extension.trim_matches('.').is_empty() {
        anyhow::bail!("Invalid extension value");
    }

    Ok(AppConfig {
        setup_copy: SetupCopyConfig {
            source_dir: PathBuf::from(matches.get_one::<String>("source-dir").unwrap()),
            extension,
            alias_table_path: PathBuf::from(matches.get_one::<String>("alias-file").unwrap()),
            dry_run: matches.get_flag("dry-run"),
        },
        folder_discovery: FolderDiscoveryConfig { setups_dir },
        log_level,
    })
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Load a .env file when present; absence is fine.
fn load_environment_variables() {
    if dotenvy::dotenv().is_err() {
        info!("No .env file found, using system environment variables");
    }
}

/// Main application flow
fn run_application(config: AppConfig, notifier: &dyn Notifier) -> Result<()> {
    info!("Starting setup files copy process...");

    // Destination folders; a missing setups directory aborts the run
    // before any file is touched.
    let folders = discover_setup_folders(&config.folder_discovery)?;

    // Source files; an empty set is a warning, not a failure.
    let files = collect_setup_files(&config.setup_copy)?;
    if files.is_empty() {
        let message = format!(
            "No setup files ({}) found in {}",
            config.setup_copy.extension,
            config.setup_copy.source_dir.display()
        );
        warn!("{message}");
        notifier.notify(&message, Severity::Warning);
        return Ok(());
    }

    let alias_table = AliasTable::load_optional(&config.setup_copy.alias_table_path);

    let report = copy_setup_files(&config.setup_copy, &folders, &files, alias_table.as_ref());

    print_copy_report(&report);

    if !report.errors.is_empty() {
        if let Err(e) = write_error_log(&report) {
            warn!("Could not write {ERROR_LOG_FILE}: {e:#}");
        }
    }

    notify_summary(&report, notifier, config.setup_copy.dry_run);

    info!("Setup copy process completed");
    Ok(())
}

/// Print the copy report through the durable log
fn print_copy_report(report: &SetupCopyReport) {
    info!("=== SETUP COPY REPORT ===");
    info!("Total files processed: {}", report.total_processed());
    info!("Successfully copied: {}", report.copied.len());
    info!("Errors: {}", report.errors.len());
    info!("Success rate: {:.2}%", report.success_rate() * 100.0);

    for copied in &report.copied {
        info!("  {} -> {}", copied.file, copied.folder);
    }

    if !report.errors.is_empty() {
        error!("Errors encountered:");
        for e in &report.errors {
            error!("  {e}");
        }
    }
}

/// Write the detailed error text to the durable side file.
fn write_error_log(report: &SetupCopyReport) -> Result<()> {
    let mut content = format!("Setup copy errors at {}\n", Utc::now().to_rfc3339());
    for e in &report.errors {
        content.push_str(&format!("- {e}\n"));
    }

    fs::write(ERROR_LOG_FILE, content)
        .with_context(|| format!("Failed to write error log: {ERROR_LOG_FILE}"))
}

/// Surface the end-of-run summary through the notification seam.
fn notify_summary(report: &SetupCopyReport, notifier: &dyn Notifier, dry_run: bool) {
    let verb = if dry_run { "would be copied" } else { "copied" };
    let mut lines = Vec::new();

    if !report.copied.is_empty() {
        lines.push(format!("{} file(s) {verb} successfully", report.copied.len()));
    }
    if !report.errors.is_empty() {
        lines.push(format!(
            "{} file(s) with errors, details in {ERROR_LOG_FILE}",
            report.errors.len()
        ));
    }
    if lines.is_empty() {
        lines.push("No files were processed".to_string());
    }

    let severity = if report.errors.is_empty() {
        Severity::Info
    } else {
        Severity::Error
    };
    notifier.notify(&lines.join("\n"), severity);
}
