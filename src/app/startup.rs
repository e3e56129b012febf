//! Application startup and orchestration

use crate::app::cli::args::{Args, ScanTarget};
use crate::app::cli::config::Settings;
use crate::app::cli::display::display_registry;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::plugin::api::{PluginDiscovery, PluginRegistry, UnitResolver};

/// Parse arguments, load configuration, run discovery and print the result
pub async fn startup() {
    let args = Args::parse_from_env();

    let mut settings = match Settings::load(args.config_file.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not up yet
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    settings.apply_args(&args);
    let use_color = settings.use_color();

    let logging = &settings.logging;
    let log_file = logging.file.as_ref().map(|file| file.to_string_lossy());
    if let Err(e) = init_logging(
        logging.level.as_deref(),
        logging.format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error initializing logging: {}", e);
        std::process::exit(1);
    }

    log::info!(
        "plugscout {} ({}) starting",
        env!("CARGO_PKG_VERSION"),
        crate::core::version::git_hash()
    );

    let mut discovery = PluginDiscovery::with_config(settings.discovery.clone());
    let failures = run_scans(&mut discovery, &args.scan_targets()).await;

    let registry: PluginRegistry = discovery.into_registry();
    log::info!(
        "Discovered {} plugin definitions for {} extension points",
        registry.plugin_count(),
        registry.extension_points().count()
    );
    display_registry(&registry, use_color);

    if failures > 0 {
        std::process::exit(1);
    }
}

/// Run every scan target in order, returning how many could not be scanned at all
pub async fn run_scans<R: UnitResolver>(
    discovery: &mut PluginDiscovery<R>,
    targets: &[ScanTarget],
) -> usize {
    let mut failures = 0;
    for target in targets {
        match target {
            ScanTarget::Directory(dir) => {
                if let Err(e) = discovery.scan_directory(dir).await {
                    log_error_with_context(&e, &format!("Scanning {}", dir.display()));
                    failures += 1;
                }
            }
            ScanTarget::Project(dir) => {
                discovery.scan_project(dir).await;
                discovery.scan_project_dependencies(dir).await;
            }
            ScanTarget::Packages(dir) => discovery.scan_node_modules(dir).await,
        }
    }
    failures
}
