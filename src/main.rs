use anyhow::Result;
use clap::Parser;
use fragasm::AssemblyArgs;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = AssemblyArgs::parse();

    info!("fragasm v{}", env!("CARGO_PKG_VERSION"));
    fragasm::run(&args)?;
    info!("Assembly complete!");

    Ok(())
}
