use std::path::PathBuf;

use anyhow::{anyhow, Context};
use voxsolid_lib::extract_isosurface;
use voxsolid_lib::io::{off_format, vol_format};

/// Command line arguments for the `extract` subcommand
#[derive(Clone, Debug, clap::Parser)]
pub struct ExtractSubcommandArgs {
    /// Path to the input volume container with the signed distance volume
    #[arg(value_name = "INPUT_VOLUME")]
    pub input_file: PathBuf,
    /// Path for writing the extracted surface mesh as an OFF file
    #[arg(short = 'o', long)]
    pub output_file: PathBuf,
    /// The iso level at which to extract the surface
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    pub level: f32,
    /// Whether to overwrite existing files without asking
    #[arg(long)]
    pub overwrite: bool,
}

/// Executes the `extract` subcommand
pub fn extract_subcommand(cmd_args: &ExtractSubcommandArgs) -> Result<(), anyhow::Error> {
    let input_file = &cmd_args.input_file;
    let output_file = &cmd_args.output_file;

    // Check if file already exists
    if !cmd_args.overwrite && output_file.exists() {
        return Err(anyhow!(
            "Output file \"{}\" already exists. Use overwrite flag to ignore this.",
            output_file.display()
        ));
    }

    let volume = vol_format::volume_from_vol_f32(input_file).with_context(|| {
        format!(
            "Failed to load signed distance volume from file \"{}\"",
            input_file.display()
        )
    })?;

    let mesh = extract_isosurface(&volume, cmd_args.level)
        .context("Failed to extract the isosurface of the volume")?;

    off_format::mesh_to_off(&mesh, output_file).with_context(|| {
        format!(
            "Failed to write surface mesh to file \"{}\"",
            output_file.display()
        )
    })?;

    Ok(())
}
