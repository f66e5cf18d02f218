use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cancerai_core::PatientRecord;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod artifacts;

#[derive(Parser)]
#[command(name = "cancerai", version, about = "Cancer survival and drug-response prediction")]
struct Cli {
    /// Directory holding the classifier and encoder artifacts.
    #[arg(long, env = "CANCERAI_MODEL_DIR", default_value = "models", global = true)]
    model_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the prediction API over HTTP.
    Serve {
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
    /// Score one JSON patient record and print the report.
    Predict {
        #[arg(value_enum)]
        model: Model,

        /// Path to a JSON record, or `-` for stdin.
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    Survival,
    DrugResponse,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("cancerai v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { host, port } => serve(&cli.model_dir, &host, port),
        Command::Predict { model, input } => predict(&cli.model_dir, model, &input),
    }
}

fn serve(model_dir: &Path, host: &str, port: u16) -> anyhow::Result<()> {
    let ctx = artifacts::load_context(model_dir)?;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))?;

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        cancerai_server::serve(listener, ctx)
            .await
            .context("serving HTTP")
    })
}

fn predict(model_dir: &Path, model: Model, input: &Path) -> anyhow::Result<()> {
    let record = read_record(input)?;
    let ctx = artifacts::load_context(model_dir)?;

    let report = match model {
        Model::Survival => serde_json::to_string_pretty(&ctx.predict_survival(&record)?)?,
        Model::DrugResponse => serde_json::to_string_pretty(&ctx.predict_drug_response(&record)?)?,
    };
    println!("{report}");
    Ok(())
}

fn read_record(input: &Path) -> anyhow::Result<PatientRecord> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };
    let value: serde_json::Value = serde_json::from_str(&json).context("parsing patient record")?;
    Ok(PatientRecord::from_value(value))
}
