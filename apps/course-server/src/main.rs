use anyhow::Result;
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use courses::{Courses, CoursesConfig};
use runtime::{config::default_logging_config, AppConfig, CliArgs};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod db;

/// Course management server
#[derive(Parser)]
#[command(name = "course-server")]
#[command(about = "Course management server: courses, classes, attendance and notices")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // home_dir is normalized and created while loading
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let logging = config.logging.clone().unwrap_or_else(default_logging_config);
    runtime::logging::init_logging_from_config(&logging, config.home_dir());
    tracing::info!(home_dir = %config.server.home_dir, "Course server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config, &args),
    }
}

/// The ingress section wins unless it leaves `bind_addr` empty or `--port` is given,
/// in which case the server section's host and port are used.
fn ingress_config(config: &AppConfig, args: &CliArgs) -> Result<ApiIngressConfig> {
    let mut cfg: ApiIngressConfig = config.module_config("api_ingress")?;
    if cfg.bind_addr.trim().is_empty() || args.port.is_some() {
        cfg.bind_addr = format!("{}:{}", config.server.host, config.server.port);
    }
    Ok(cfg)
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let courses_cfg: CoursesConfig = config.module_config("courses")?;
    let ingress_cfg = ingress_config(&config, &args)?;

    let db = db::connect(config.database.as_ref(), config.home_dir(), args.mock).await?;

    tracing::info!("Initializing modules...");
    let courses = Courses::default();
    courses.migrate(&db, &courses_cfg).await?;
    courses.init(db.clone(), &courses_cfg);

    let ingress = ApiIngress::new(ingress_cfg);
    let app = courses.register_rest(axum::Router::new())?;
    let router = ingress.build_router(app, Some(courses.openapi()));

    let cancel = runtime::shutdown::shutdown_token();
    let deadline = Duration::from_secs(config.server.timeout_sec);
    serve_with_deadline(ingress.serve(router, cancel.clone()), cancel, deadline).await?;

    db.close().await?;
    tracing::info!("Course server stopped");
    Ok(())
}

/// Drive `server` to completion; once `cancel` fires, give it at most
/// `deadline` to drain (zero waits indefinitely).
async fn serve_with_deadline<F>(
    server: F,
    cancel: CancellationToken,
    deadline: Duration,
) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::pin!(server);
    tokio::select! {
        res = &mut server => return res,
        _ = cancel.cancelled() => {}
    }

    if deadline.is_zero() {
        return server.await;
    }
    match tokio::time::timeout(deadline, &mut server).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!("Graceful shutdown exceeded {}s, exiting", deadline.as_secs());
            Ok(())
        }
    }
}

fn check_config(config: &AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let courses_cfg: CoursesConfig = config.module_config("courses")?;
    let ingress_cfg = ingress_config(config, args)?;
    ingress_cfg
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {e}", ingress_cfg.bind_addr))?;
    if let Some(db) = &config.database {
        db.resolved_url(config.home_dir(), false)?;
    }

    tracing::info!(
        max_name_length = courses_cfg.max_name_length,
        bind_addr = %ingress_cfg.bind_addr,
        "Configuration is valid"
    );
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_falls_back_to_server_section() {
        let mut config = AppConfig::default();
        config.server.port = 9001;
        let cfg = ingress_config(&config, &CliArgs::default()).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9001");
    }

    #[test]
    fn port_flag_overrides_configured_bind_addr() {
        let mut config = AppConfig::default();
        config.modules.insert(
            "api_ingress".into(),
            serde_json::json!({ "bind_addr": "0.0.0.0:8080" }),
        );
        let cfg = ingress_config(&config, &CliArgs::default()).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");

        let args = CliArgs {
            port: Some(7000),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        let cfg = ingress_config(&config, &args).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:7000");
    }

    #[tokio::test]
    async fn deadline_cuts_a_hanging_shutdown_short() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let hang = std::future::pending::<Result<()>>();
        let res = serve_with_deadline(hang, cancel, Duration::from_millis(20)).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn server_errors_are_returned_before_cancellation() {
        let failing = async { Err(anyhow::anyhow!("bind failed")) };
        let res = serve_with_deadline(failing, CancellationToken::new(), Duration::ZERO).await;
        assert_eq!(res.unwrap_err().to_string(), "bind failed");
    }
}
