use std::path::PathBuf;

use anyhow::{anyhow, Context};
use voxsolid_lib::fill_interior;
use voxsolid_lib::io::vol_format;

/// Command line arguments for the `fill` subcommand
#[derive(Clone, Debug, clap::Parser)]
pub struct FillSubcommandArgs {
    /// Path to the input volume container with the surface occupancy grid
    #[arg(value_name = "INPUT_VOLUME")]
    pub input_file: PathBuf,
    /// Path for writing the solid occupancy volume
    #[arg(short = 'o', long)]
    pub output_file: PathBuf,
    /// Whether to overwrite existing files without asking
    #[arg(long)]
    pub overwrite: bool,
}

/// Executes the `fill` subcommand
pub fn fill_subcommand(cmd_args: &FillSubcommandArgs) -> Result<(), anyhow::Error> {
    let input_file = &cmd_args.input_file;
    let output_file = &cmd_args.output_file;

    // Check if file already exists
    if !cmd_args.overwrite && output_file.exists() {
        return Err(anyhow!(
            "Output file \"{}\" already exists. Use overwrite flag to ignore this.",
            output_file.display()
        ));
    }

    let volume = vol_format::volume_from_vol_u8(input_file).with_context(|| {
        format!(
            "Failed to load occupancy volume from file \"{}\"",
            input_file.display()
        )
    })?;

    let solid = fill_interior(&volume).context("Failed to segment the interior of the volume")?;

    vol_format::volume_to_vol_u8(&solid, output_file).with_context(|| {
        format!(
            "Failed to write solid volume to file \"{}\"",
            output_file.display()
        )
    })?;

    Ok(())
}
