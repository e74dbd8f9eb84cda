use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nest_codec::Format;
use nest_map::KeyPath;
use nest_source::Location;

#[derive(Parser, Debug)]
#[command(
    name = "nest",
    about = "Nest: a nested key-value store kept in files, directories, or pipes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Encoding for data written to stdout (binary, json, pretty)
    #[arg(short, long, global = true)]
    pub format: Option<Format>,

    /// Source to read: a file, a directory, or `file:`/`dir:` prefixed path
    #[arg(short, long, global = true, value_name = "SOURCE")]
    pub input: Option<Location>,

    /// Source to write; defaults to the input, then stdout
    #[arg(short, long, global = true, value_name = "SOURCE")]
    pub output: Option<Location>,

    /// Seal the output with a password
    #[arg(short, long, global = true)]
    pub encrypt: bool,

    /// Extension of leaf files in directory sources
    #[arg(long, global = true, value_name = "EXT")]
    pub leaf_ext: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true, env = "NEST_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a value at a path that is currently empty
    Create(WriteArgs),
    /// Print the value at a path
    Read(ReadArgs),
    /// Replace the value at an existing path; an empty object deletes it
    Update(WriteArgs),
    /// Remove the value at a path and any containers left empty
    Delete(PathArgs),
    /// List the keys below a path
    List(PathArgs),
    /// Print the whole tree
    Print,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Dotted key path, e.g. `db.password`
    pub path: KeyPath,
    /// JSON object, string, or byte array; anything else is stored as text
    pub value: String,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Dotted key path; the root when omitted
    pub path: Option<KeyPath>,
    /// Write leaf contents verbatim instead of encoding them
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct PathArgs {
    /// Dotted key path; the root when omitted
    pub path: Option<KeyPath>,
}
