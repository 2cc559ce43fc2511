//! NetPad Deploy - Entry Point
//!
//! CLI for publishing NetPad form/workflow bundles to a hosting provider
//! and tracking rollout status.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use netpad_deployer::app::options::AppOptions;
use netpad_deployer::app::run;
use netpad_deployer::errors::DeployerError;
use netpad_deployer::logs::{init_logging, LogOptions};
use netpad_deployer::models::bundle::Bundle;
use netpad_deployer::models::deployment::DeploymentConfig;
use netpad_deployer::settings::Settings;
use netpad_deployer::utils::version_info;

use tracing::{error, info};

const USAGE: &str = "Usage: netpad-deploy <deploy|watch|status|list|delete> [--key=value ...]
  deploy  --bundle=<path> --project=<id> --org=<id> --app-name=<name> [--target=vercel] [--env=production] [--database=provision]
  watch   --id=<deployment_id>
  status  --id=<deployment_id>
  list    --project=<project_id>
  delete  --id=<deployment_id>
Common flags: --config=<settings.json> --version";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut command: Option<String> = None;
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        } else if command.is_none() {
            command = Some(arg.clone());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version).unwrap());
        return;
    }

    // Retrieve the settings file, or fall back to defaults
    let settings = match cli_args.get("config") {
        Some(path) => match Settings::load(Path::new(path)).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Unable to read settings file {}: {}", path, e);
                return;
            }
        },
        None => Settings::default(),
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    let options = AppOptions::from_settings(&settings);

    let Some(command) = command else {
        eprintln!("{}", USAGE);
        return;
    };

    let result = dispatch(&command, &options, &cli_args).await;
    if let Err(e) = result {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn dispatch(
    command: &str,
    options: &AppOptions,
    cli_args: &HashMap<String, String>,
) -> Result<(), DeployerError> {
    match command {
        "deploy" => {
            let bundle_path = require_arg(cli_args, "bundle")?;
            let bundle = read_bundle(Path::new(&bundle_path)).await?;
            let config = DeploymentConfig {
                project_id: require_arg(cli_args, "project")?,
                organization_id: require_arg(cli_args, "org")?,
                app_name: require_arg(cli_args, "app-name")?,
                target: arg_or(cli_args, "target", "vercel"),
                environment: arg_or(cli_args, "env", "production"),
                database: arg_or(cli_args, "database", "provision"),
                environment_variables: Default::default(),
            };

            let progress = run::deploy(options, &config, &bundle, await_shutdown_signal()).await?;
            if let Some(error) = progress.error() {
                return Err(DeployerError::UpstreamError(error.to_string()));
            }
            Ok(())
        }
        "watch" => {
            let id = require_arg(cli_args, "id")?;
            run::watch(options, &id, await_shutdown_signal()).await?;
            Ok(())
        }
        "status" => {
            let id = require_arg(cli_args, "id")?;
            run::status(options, &id).await?;
            Ok(())
        }
        "list" => {
            let project_id = require_arg(cli_args, "project")?;
            run::list(options, &project_id).await?;
            Ok(())
        }
        "delete" => {
            let id = require_arg(cli_args, "id")?;
            run::delete(options, &id).await
        }
        other => Err(DeployerError::ConfigError(format!(
            "unknown command '{}'\n{}",
            other, USAGE
        ))),
    }
}

fn require_arg(cli_args: &HashMap<String, String>, key: &str) -> Result<String, DeployerError> {
    cli_args
        .get(key)
        .cloned()
        .ok_or_else(|| DeployerError::ConfigError(format!("missing required flag --{}=", key)))
}

fn arg_or(cli_args: &HashMap<String, String>, key: &str, default: &str) -> String {
    cli_args
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

async fn read_bundle(path: &Path) -> Result<Bundle, DeployerError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let bundle = serde_json::from_str(&raw)?;
    Ok(bundle)
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).unwrap();
        let mut sigint = signal(SignalKind::interrupt()).unwrap();

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("Ctrl+C received, shutting down...");
    }
}
