use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use voxsolid_lib::io::off_format;
use walkdir::WalkDir;

use crate::cli::Switch;
use crate::logging;

/// Command line arguments for the `normalize` subcommand
#[derive(Clone, Debug, clap::Parser)]
pub struct NormalizeSubcommandArgs {
    /// Path to an input OFF file or a directory that is scanned recursively for OFF files
    #[arg(value_name = "INPUT_MESH_OR_DIR")]
    pub input_path: PathBuf,
    /// Path of the output file, or of the output directory if the input is a directory
    #[arg(short = 'o', long)]
    pub output_path: PathBuf,
    /// Center the mesh inside of the unit cube by padding the shorter axes
    #[arg(
        long,
        default_value = "off",
        value_name = "off|on",
        ignore_case = true,
        require_equals = true
    )]
    pub pad: Switch,
    /// Whether to overwrite existing files without asking
    #[arg(long)]
    pub overwrite: bool,
}

/// Executes the `normalize` subcommand
pub fn normalize_subcommand(cmd_args: &NormalizeSubcommandArgs) -> Result<(), anyhow::Error> {
    let pad = cmd_args.pad.into_bool();

    if cmd_args.input_path.is_dir() {
        normalize_directory(cmd_args, pad)
    } else {
        if !cmd_args.overwrite && cmd_args.output_path.exists() {
            return Err(anyhow!(
                "Output file \"{}\" already exists. Use overwrite flag to ignore this.",
                cmd_args.output_path.display()
            ));
        }
        normalize_mesh_file(&cmd_args.input_path, &cmd_args.output_path, pad)
    }
}

/// Normalizes all OFF files below the input directory into the output directory in parallel
fn normalize_directory(
    cmd_args: &NormalizeSubcommandArgs,
    pad: bool,
) -> Result<(), anyhow::Error> {
    let input_dir = &cmd_args.input_path;
    let output_dir = &cmd_args.output_path;

    let mut tasks: Vec<(PathBuf, PathBuf)> = Vec::new();
    for entry in WalkDir::new(input_dir) {
        let entry = entry.with_context(|| {
            format!("Failed to scan input directory \"{}\"", input_dir.display())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let input_file = entry.path();
        if input_file
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("off"))
        {
            // Mirror the directory layout below the input directory
            let relative = input_file
                .strip_prefix(input_dir)
                .expect("walked files are below the input directory");
            tasks.push((input_file.to_path_buf(), output_dir.join(relative)));
        }
    }

    if tasks.is_empty() {
        return Err(anyhow!(
            "No OFF files found below input directory \"{}\"",
            input_dir.display()
        ));
    }
    info!(
        "Normalizing {} meshes from \"{}\" into \"{}\"",
        tasks.len(),
        input_dir.display(),
        output_dir.display()
    );

    if !cmd_args.overwrite {
        for (_, output_file) in &tasks {
            if output_file.exists() {
                return Err(anyhow!(
                    "Output file \"{}\" already exists. Use overwrite flag to ignore this.",
                    output_file.display()
                ));
            }
        }
    }

    let progress = ProgressBar::new(tasks.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .context("Failed to construct the progress bar style")?,
    );
    logging::set_progress_bar(Some(progress.downgrade()));

    let result = tasks.par_iter().try_for_each(|(input_file, output_file)| {
        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory \"{}\"", parent.display())
            })?;
        }
        let result = normalize_mesh_file(input_file, output_file, pad);
        progress.inc(1);
        result
    });

    logging::set_progress_bar(None);
    progress.finish_and_clear();

    result
}

/// Reads a single OFF file, rescales it into the unit cube and writes it back out
fn normalize_mesh_file(
    input_file: &Path,
    output_file: &Path,
    pad: bool,
) -> Result<(), anyhow::Error> {
    let mut mesh = off_format::surface_mesh_from_off::<f64, _>(input_file).with_context(|| {
        format!(
            "Failed to load surface mesh from file \"{}\"",
            input_file.display()
        )
    })?;

    mesh.scale_to_unit_cube(pad);

    off_format::mesh_to_off(&mesh, output_file).with_context(|| {
        format!(
            "Failed to write surface mesh to file \"{}\"",
            output_file.display()
        )
    })?;

    Ok(())
}
