//! rescache - Entry Point
//!
//! Binary entry point for the cache maintenance command. Lives in the
//! facade crate next to the library it drives.

use clap::Parser;
use rescache::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
