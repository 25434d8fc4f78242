use anyhow::Context;
use clap::{Parser, Subcommand};
use collector_confgen::options::{DEFAULT_AUDIT_IGNORE_OLDER_SECS, DEFAULT_SECRETS_DIR};
use collector_confgen::topology::{Secrets, Topology};
use collector_confgen::{GeneratorOptions, SecretRendering};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "collector-confgen")]
#[command(about = "Generate collector configuration from a log forwarding topology", long_about = None)]
struct Cli {
    /// Log filter (e.g. "info", "collector_confgen=debug").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the configuration (validates the topology first).
    Generate {
        #[arg(long)]
        topology: String,

        /// JSON map of secret name => { key: value }.
        #[arg(long)]
        secrets: Option<String>,

        /// Write here instead of stdout.
        #[arg(short = 'o', long)]
        out: Option<String>,

        /// Write secret values into the config instead of env references.
        #[arg(long)]
        inline_secrets: bool,

        #[arg(long, default_value = DEFAULT_SECRETS_DIR)]
        secrets_dir: String,

        #[arg(long, default_value_t = DEFAULT_AUDIT_IGNORE_OLDER_SECS)]
        audit_ignore_older_secs: u64,
    },

    /// Only validate the topology.
    Validate {
        #[arg(long)]
        topology: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.cmd {
        Commands::Generate {
            topology,
            secrets,
            out,
            inline_secrets,
            secrets_dir,
            audit_ignore_older_secs,
        } => {
            let spec = read_topology(&topology)?;
            let secret_map: Secrets = match &secrets {
                Some(path) => serde_json::from_str(
                    &std::fs::read_to_string(path).with_context(|| format!("read secrets file {}", path))?,
                )
                .with_context(|| format!("parse secrets file {}", path))?,
                None => Secrets::new(),
            };

            let options = GeneratorOptions {
                secret_rendering: if inline_secrets {
                    SecretRendering::Inline
                } else {
                    SecretRendering::Indirect
                },
                secrets_dir,
                audit_ignore_older_secs,
            };
            debug!(?options, "generator options");

            let conf = collector_confgen::generate(&spec, &secret_map, &options)
                .with_context(|| format!("generate configuration for {}", topology))?;

            match out {
                Some(path) => {
                    std::fs::write(&path, conf).with_context(|| format!("write {}", path))?;
                    info!(path = %path, "wrote configuration");
                }
                None => print!("{}", conf),
            }
        }
        Commands::Validate { topology } => {
            let spec = read_topology(&topology)?;
            let validated = spec
                .validate_and_build()
                .with_context(|| format!("validate {}", topology))?;
            println!(
                "{}: {} pipelines, {} outputs",
                topology,
                validated.pipelines.len(),
                validated.referenced_outputs().len()
            );
        }
    }

    Ok(())
}

fn read_topology(path: &str) -> Result<Topology> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read topology file {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parse topology file {}", path))
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level).with_context(|| format!("bad log level {:?}", level))?;
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install tracing subscriber")?;
    Ok(())
}
