use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Writes the JSON schema of `workouts.json` in the data folder
    /// (an array of workouts, each with an id and a start/destination pair)
    JsonSchema {
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> anyhow::Result<()> {
    let GenerateSubcommands::JsonSchema { out } = subcommand;

    let schema = stride_core::schema::generate_json_schema()?;
    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, schema)?;

    info!("Wrote workout list schema to {}", out.display());

    Ok(())
}
