use anyhow::Result;
use clap::Parser;
use exporter::{run_cli, Args};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    let args = Args::parse();
    run_cli(&args)
}
