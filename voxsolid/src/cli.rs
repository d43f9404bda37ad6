//! Command line interface of the `voxsolid` tool.

use anyhow::Context;
use clap::Parser;
use log::info;

use crate::{extract, fill, logging, normalize, voxelize};

static HELP_TEMPLATE: &str = "{before-help}{name} (v{version}) - {author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}";

#[derive(Clone, Debug, clap::Parser)]
#[command(
    name = "voxsolid",
    author = "Viktor Hassan <viktor.hassan@posteo.net>",
    about = "Solidification of voxelized surface meshes (occupancy/SDF voxelization, interior segmentation, isosurface extraction)",
    version,
    propagate_version = true,
    help_template = HELP_TEMPLATE,
)]
struct CommandlineArgs {
    /// Enable quiet mode (no output except for severe panic messages), overrides verbosity level
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
    /// Print more verbose output, use multiple "v"s for even more verbose output (-v, -vv)
    #[arg(short, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,
    /// Subcommands
    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Clone, Debug, clap::Parser)]
enum Subcommand {
    /// Voxelize a surface mesh into an occupancy or signed distance volume
    #[command(help_template = HELP_TEMPLATE)]
    Voxelize(voxelize::VoxelizeSubcommandArgs),
    /// Segment the interior of an occupancy volume and write the solid volume
    #[command(help_template = HELP_TEMPLATE)]
    Fill(fill::FillSubcommandArgs),
    /// Extract an isosurface mesh from a signed distance volume
    #[command(help_template = HELP_TEMPLATE)]
    Extract(extract::ExtractSubcommandArgs),
    /// Normalize surface meshes into the unit cube
    #[command(help_template = HELP_TEMPLATE)]
    Normalize(normalize::NormalizeSubcommandArgs),
}

/// A simple on/off switch for command line arguments.
///
/// For example an argument defined as:
/// ```rust ignore
/// /// Enable sampling at cell centers instead of lattice nodes
/// #[arg(
///     long,
///     default_value = "off",
///     value_name = "off|on",
///     ignore_case = true,
///     require_equals = true
/// )]
/// pub cell_centers: Switch,
/// ```
/// can be used in the CLI as `--cell-centers=on` or `--cell-centers=off`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum Switch {
    Off,
    On,
}

impl Switch {
    pub(crate) fn into_bool(self) -> bool {
        match self {
            Switch::Off => false,
            Switch::On => true,
        }
    }
}

/// Runs the voxsolid CLI with the provided command line arguments.
///
/// This function behaves like the binary `voxsolid` command line tool including output to stdout
/// and stderr. Note that the first argument is always ignored - this is typically the binary name
/// when called using `std::env::args()` from the terminal:
/// ```
/// voxsolid::cli::run_voxsolid(["voxsolid", "--version"]);
/// ```
/// If no placeholder for the binary name is provided it will return an error (and print a help message):
/// ```should_panic
/// voxsolid::cli::run_voxsolid(["--version"]);
/// ```
pub fn run_voxsolid<I, T>(args: I) -> Result<(), anyhow::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    run_voxsolid_impl(args).inspect_err(logging::log_error)
}

fn run_voxsolid_impl<I, T>(args: I) -> Result<(), anyhow::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cmd_args = CommandlineArgs::parse_from(args);

    let verbosity = VerbosityLevel::from(cmd_args.verbosity);
    let is_quiet = cmd_args.quiet;

    logging::initialize_logging(verbosity, is_quiet).context("Failed to initialize logging")?;
    logging::log_program_info();

    // Delegate to subcommands
    let result = match &cmd_args.subcommand {
        Subcommand::Voxelize(cmd_args) => voxelize::voxelize_subcommand(cmd_args),
        Subcommand::Fill(cmd_args) => fill::fill_subcommand(cmd_args),
        Subcommand::Extract(cmd_args) => extract::extract_subcommand(cmd_args),
        Subcommand::Normalize(cmd_args) => normalize::normalize_subcommand(cmd_args),
    };

    info!(
        "Finished at {}.",
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
    );

    result
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum VerbosityLevel {
    None,
    Verbose,
    VeryVerbose,
    VeryVeryVerbose,
}

impl From<u8> for VerbosityLevel {
    fn from(value: u8) -> Self {
        match value {
            0 => VerbosityLevel::None,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::VeryVeryVerbose,
        }
    }
}

impl VerbosityLevel {
    /// Maps this verbosity level to a log filter
    pub fn into_filter(self) -> Option<log::LevelFilter> {
        match self {
            VerbosityLevel::None => None,
            VerbosityLevel::Verbose => Some(log::LevelFilter::Info),
            VerbosityLevel::VeryVerbose => Some(log::LevelFilter::Debug),
            VerbosityLevel::VeryVeryVerbose => Some(log::LevelFilter::Trace),
        }
    }
}
