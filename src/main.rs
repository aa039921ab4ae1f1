use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

mod cli;
mod config;
mod domain;
mod error;
mod infrastructure;
mod services;
mod tools;
mod ui;

use cli::Cli;
use config::Environment;
use infrastructure::{ContainerEngine, SystemRunner};
use services::BuildService;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    // Reports own stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let env = Environment::from_process();
    ui::configure_color(&env);

    if let Err(e) = run(cli, env).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, env: Environment) -> Result<()> {
    if !cli.rest.is_empty() {
        warn!(
            "Ignoring unrecognised arguments {:?}; running without --push",
            cli.rest
        );
    }
    let push = cli.push_enabled();

    let manifest = config::load_manifest(&cli.manifest)?;
    let engine = ContainerEngine::discover(&env);
    info!(
        "Loaded {}: revision {}, {} version(s), {} registry(ies), engine {}, push {}",
        cli.manifest.display(),
        manifest.revision,
        manifest.versions.len(),
        manifest.registries.len(),
        engine.program(),
        if push { "enabled" } else { "disabled" }
    );

    let mut service =
        BuildService::new(SystemRunner, engine, env, std::io::stdout()).with_push(push);

    for (version, tags) in &manifest.versions {
        service
            .build_version(version, tags, &manifest.revision, &manifest.registries)
            .await?;
    }

    info!("✅ Built {} image tag(s)", service.built());
    Ok(())
}
