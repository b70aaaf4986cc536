use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod domains;
pub mod emit;
pub mod intern;
pub mod merge;
pub mod version;

use emit::{ArgSpec, TimestampSource};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode frames from command-line arguments.
    Emit(EmitArgs),
    /// Merge every domain file below a directory into one table.
    Merge(MergeArgs),
    /// List the domains of a domain file or aggregate table.
    Domains(DomainsArgs),
    /// Allocate (or look up) the message id of a format string.
    Intern(InternArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Emit(args) => emit::run(args, format),
        Command::Merge(args) => merge::run(args, format),
        Command::Domains(args) => domains::run(args, format),
        Command::Intern(args) => intern::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OrderArg {
    Little,
    Big,
    Native,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Domain id written to the header.
    #[arg(long, short = 'd', default_value_t = 0)]
    pub domain: u32,
    /// Message id written to the header.
    #[arg(long, short = 'm', default_value_t = 0)]
    pub message: u32,
    /// Frame argument as KIND:VALUE (kinds: i8 i16 i32 u8 u16 u32 f32 f64 str). Repeatable.
    #[arg(long = "arg", short = 'a', value_name = "KIND:VALUE", value_parser = emit::parse_arg_spec)]
    pub args: Vec<ArgSpec>,
    /// Timestamp source: zero, counter, uptime, or a fixed number.
    #[arg(long, default_value = "zero", value_parser = emit::parse_timestamp)]
    pub timestamp: TimestampSource,
    /// Byte order for header fields and numeric payloads.
    #[arg(long, value_enum, default_value = "little")]
    pub byte_order: OrderArg,
    /// Tag u8 arguments with `u` for compatibility with older streams.
    #[arg(long)]
    pub legacy_u8_tag: bool,
    /// Fail instead of truncating text longer than 65535 bytes.
    #[arg(long)]
    pub reject_long_text: bool,
    /// Number of identical frames to emit.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub repeat: u64,
    /// Append a newline after every frame.
    #[arg(long)]
    pub newline: bool,
    /// Append frames to this file instead of reporting them.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory searched recursively for domain files.
    pub dir: PathBuf,
    /// Aggregate table to write.
    pub out: PathBuf,
    /// Let a later domain file replace an earlier one with the same id.
    #[arg(long)]
    pub allow_duplicates: bool,
    /// Maximum directory depth searched below DIR.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DomainsArgs {
    /// Domain file or aggregate table.
    pub file: PathBuf,
    /// Also list every message format string.
    #[arg(long)]
    pub messages: bool,
}

#[derive(Args, Debug)]
pub struct InternArgs {
    /// Domain file to update.
    pub file: PathBuf,
    /// Format string to intern.
    pub format_string: String,
    /// Create the domain file if it does not exist.
    #[arg(long)]
    pub create: bool,
    /// Domain id for a newly created file.
    #[arg(long, default_value_t = 0)]
    pub domain: u32,
    /// Display name for a newly created file.
    #[arg(long, default_value = "unnamed domain")]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
