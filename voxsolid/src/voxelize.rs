use std::path::PathBuf;

use anyhow::{anyhow, Context};
use voxsolid_lib::io::{off_format, vol_format};
use voxsolid_lib::{sample_sdf, voxelize_surface};

use crate::cli::Switch;

/// Output volume type of the `voxelize` subcommand
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum VoxelizeMode {
    /// Binary surface occupancy volume (uint8)
    Occ,
    /// Signed distance volume (float32)
    Sdf,
}

/// Command line arguments for the `voxelize` subcommand
#[derive(Clone, Debug, clap::Parser)]
pub struct VoxelizeSubcommandArgs {
    /// Path to the input OFF file with the surface mesh to voxelize
    #[arg(value_name = "INPUT_MESH")]
    pub input_file: PathBuf,
    /// Path for writing the volume container
    #[arg(short = 'o', long)]
    pub output_file: PathBuf,
    /// The type of volume to generate
    #[arg(long, value_enum, default_value_t = VoxelizeMode::Occ)]
    pub mode: VoxelizeMode,
    /// Extent of the volume along the z-axis
    #[arg(long, default_value = "32")]
    pub depth: usize,
    /// Extent of the volume along the y-axis
    #[arg(long, default_value = "32")]
    pub height: usize,
    /// Extent of the volume along the x-axis
    #[arg(long, default_value = "32")]
    pub width: usize,
    /// Place signed distance samples at cell centers instead of lattice nodes (only used in sdf mode)
    #[arg(
        long,
        default_value = "off",
        value_name = "off|on",
        ignore_case = true,
        require_equals = true
    )]
    pub cell_centers: Switch,
    /// Whether to overwrite existing files without asking
    #[arg(long)]
    pub overwrite: bool,
}

/// Executes the `voxelize` subcommand
pub fn voxelize_subcommand(cmd_args: &VoxelizeSubcommandArgs) -> Result<(), anyhow::Error> {
    let input_file = &cmd_args.input_file;
    let output_file = &cmd_args.output_file;
    let dims = [cmd_args.depth, cmd_args.height, cmd_args.width];

    // Check if file already exists
    if !cmd_args.overwrite && output_file.exists() {
        return Err(anyhow!(
            "Output file \"{}\" already exists. Use overwrite flag to ignore this.",
            output_file.display()
        ));
    }

    let mesh = off_format::surface_mesh_from_off::<f32, _>(input_file).with_context(|| {
        format!(
            "Failed to load surface mesh from file \"{}\"",
            input_file.display()
        )
    })?;

    match cmd_args.mode {
        VoxelizeMode::Occ => {
            let volume =
                voxelize_surface(&mesh, dims).context("Failed to voxelize the surface mesh")?;
            vol_format::volume_to_vol_u8(&volume, output_file)
        }
        VoxelizeMode::Sdf => {
            let volume = sample_sdf(&mesh, dims, cmd_args.cell_centers.into_bool())
                .context("Failed to sample the signed distance field of the mesh")?;
            vol_format::volume_to_vol_f32(&volume, output_file)
        }
    }
    .with_context(|| {
        format!(
            "Failed to write volume to file \"{}\"",
            output_file.display()
        )
    })?;

    Ok(())
}
