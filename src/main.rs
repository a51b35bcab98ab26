use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // stderr only: stdout carries result JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filewise=info"));
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(filter).with_target(false).init();

    filewise::cli::run()
}
