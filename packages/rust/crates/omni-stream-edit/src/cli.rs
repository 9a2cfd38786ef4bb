use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "omni-stream-edit")]
#[command(about = "Replay an assistant transcript through the edit extractor and print the edits.")]
pub(crate) struct Cli {
    /// Transcript file (default: stdin)
    pub(crate) transcript: Option<PathBuf>,

    /// Feed the transcript in chunks of this many characters (0 = one chunk)
    #[arg(long, default_value_t = 0)]
    pub(crate) chunk_size: usize,

    /// Print the final update as JSON
    #[arg(long)]
    pub(crate) json: bool,

    /// Print only the user-facing message with code and markers removed
    #[arg(long)]
    pub(crate) clean: bool,

    /// Settings YAML (default: system + user stream-edit.yaml)
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,

    /// Log lifecycle events at debug level
    #[arg(short, long)]
    pub(crate) verbose: bool,
}
