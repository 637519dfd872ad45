use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emos::api;
use emos::client::{self, BackendClient, HttpProbe, Offline, ProcessBackend};
use emos::config::{get_config_path, ShellConfig};
use emos::shell::loader::BuiltinModules;
use emos::shell::registry::FeatureRegistry;
use emos::shell::units::UnitSelection;
use emos::shell::{repl, Shell};
use emos_core::models::FeatureId;

#[derive(Parser)]
#[command(name = "emos")]
#[command(about = "Materials exploration feature panels in the terminal")]
struct Cli {
    /// Config file (default: <config dir>/emos/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overrides config and probing
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the EMOS backend
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = api::DEFAULT_PORT)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Interactive shell (default)
    Shell {
        /// Never contact the backend
        #[arg(long)]
        offline: bool,
    },
    /// Run one feature and print the finished panel
    Run {
        /// Feature id
        id: u32,

        /// Input as key=value, repeatable
        #[arg(short, long = "input", value_name = "KEY=VALUE")]
        inputs: Vec<String>,

        /// Never contact the backend
        #[arg(long)]
        offline: bool,
    },
    /// List the feature catalog
    Features,
    /// Check the backend's health endpoint
    Health,
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

/// Initialize tracing with output to stderr (shell modes) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "emos=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Shell modes: stdout carries the rendered view
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn show_config(cli: &Cli, config: &ShellConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if write {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => {
                config.save()?;
                get_config_path()?
            }
        };
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn load_config(cli: &Cli) -> ShellConfig {
    let mut config = match &cli.config {
        Some(path) => ShellConfig::load_from(path),
        None => ShellConfig::load(),
    };
    if let Some(url) = &cli.backend {
        config.backend_url = Some(url.clone());
    }
    config
}

async fn connect(config: &ShellConfig) -> BackendClient {
    let url = client::resolve_backend_url(&config.resolve_options(), &HttpProbe::new()).await;
    tracing::info!("Using backend {}", url);
    BackendClient::new(url)
}

fn build_shell<B: ProcessBackend>(config: &ShellConfig, backend: B) -> Shell<BuiltinModules, B> {
    let shell = Shell::new(
        FeatureRegistry::builtin(),
        BuiltinModules,
        backend,
        config.timings.clone(),
    )
    .with_units(UnitSelection::from_config(config));
    match config.seed {
        Some(seed) => shell.with_seed(seed),
        None => shell,
    }
}

async fn run_once<B: ProcessBackend>(
    mut shell: Shell<BuiltinModules, B>,
    id: u32,
    inputs: &[String],
) -> anyhow::Result<()> {
    shell.open_feature(FeatureId(id)).await;
    for input in inputs {
        let (key, value) = input
            .split_once('=')
            .with_context(|| format!("Input '{}' is not key=value", input))?;
        shell.set_input(key.trim(), value)?;
    }

    shell.start_processing()?;
    shell.wait_for_processing().await;
    println!("{}", shell.render());
    Ok(())
}

async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting EMOS backend on port {}", port);

    let app = api::create_router(api::BackendState::new());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("EMOS backend listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let config = load_config(&cli);

    match cli.command {
        Some(Commands::Serve { port, ref host }) => serve(host, port).await?,
        Some(Commands::Run {
            id,
            ref inputs,
            offline,
        }) => {
            if offline {
                run_once(build_shell(&config, Offline), id, inputs).await?;
            } else {
                let backend = connect(&config).await;
                run_once(build_shell(&config, backend), id, inputs).await?;
            }
        }
        Some(Commands::Features) => {
            for entry in FeatureRegistry::builtin().entries() {
                println!("{:>3}  {:<28} {}", entry.id, entry.name, entry.description);
            }
        }
        Some(Commands::Health) => {
            let backend = connect(&config).await;
            match backend.health().await {
                Ok(()) => {
                    let features = backend.features().await.unwrap_or_default();
                    println!(
                        "{} is up ({} features)",
                        backend.base_url(),
                        features.len()
                    );
                }
                Err(e) => {
                    println!("{} is down: {}", backend.base_url(), e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Config { write }) => show_config(&cli, &config, write)?,
        Some(Commands::Shell { offline: true }) => {
            repl::run(build_shell(&config, Offline)).await?;
        }
        Some(Commands::Shell { offline: false }) | None => {
            let backend = connect(&config).await;
            repl::run(build_shell(&config, backend)).await?;
        }
    }

    Ok(())
}
