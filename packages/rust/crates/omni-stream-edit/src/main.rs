//! omni-stream-edit CLI: replay a transcript chunk by chunk.
//!
//! Logging: set `RUST_LOG=omni_stream_edit=debug` to see lifecycle events on stderr.

mod cli;

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_stream_edit::{
    EditObserver, EditOperation, EditStreamSession, ExtractorSettings, StreamUpdate,
    extract_clean_response_with, load_settings,
};

use crate::cli::Cli;

/// Prints lifecycle notifications as they happen.
struct ConsoleObserver {
    enabled: bool,
}

impl EditObserver for ConsoleObserver {
    fn on_edit_detected(&mut self, operation: &EditOperation, file_path: &str) {
        if self.enabled {
            eprintln!("detected  {file_path} {}", label(operation));
        }
    }

    fn on_edit_complete(&mut self, operation: &EditOperation, file_path: &str) {
        if self.enabled {
            eprintln!("complete  {file_path} {}", label(operation));
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_stream_edit=debug"
        } else {
            "omni_stream_edit=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = match &cli.settings {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            ExtractorSettings::from_yaml_str(&raw)
                .with_context(|| format!("invalid settings {}", path.display()))?
        }
        None => load_settings(),
    };

    let transcript = match &cli.transcript {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read transcript from stdin")?;
            raw
        }
    };

    if cli.clean {
        println!("{}", extract_clean_response_with(&transcript, &settings));
        return Ok(());
    }

    let mut session = EditStreamSession::with_settings(settings);
    let mut observer = ConsoleObserver {
        enabled: !cli.json,
    };
    let mut update = StreamUpdate::default();
    for chunk in split_chunks(&transcript, cli.chunk_size) {
        update = session.append(chunk, &mut observer);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&update)?);
    } else {
        print_summary(&update);
    }
    Ok(())
}

fn split_chunks(text: &str, size: usize) -> Vec<&str> {
    if size == 0 || text.is_empty() {
        return vec![text];
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            chunks.push(&text[start..idx]);
            start = idx;
        }
    }
    chunks.push(&text[start..]);
    chunks
}

fn label(operation: &EditOperation) -> String {
    let locator = operation
        .target
        .name
        .as_deref()
        .or(operation.target.code_snippet.as_deref())
        .unwrap_or("?");
    format!(
        "[{:?} {}%] {locator}",
        operation.kind, operation.confidence
    )
}

fn print_summary(update: &StreamUpdate) {
    for error in &update.parse.errors {
        println!("error: {error}");
    }
    for (file_path, state) in &update.file_states {
        println!("{file_path}: {}", state.as_str());
    }
    for operation in &update.in_progress_edits {
        println!("\nwriting {} {}", operation.file_path, label(operation));
    }
    for operation in &update.complete_edits {
        println!("\n{} {}", operation.file_path, label(operation));
        if !operation.description.is_empty() {
            println!("  {}", operation.description);
        }
        print!("{}", operation.preview_diff());
    }
}

#[cfg(test)]
mod tests {
    use super::split_chunks;

    #[test]
    fn test_split_chunks_on_char_boundaries() {
        assert_eq!(split_chunks("abcde", 2), vec!["ab", "cd", "e"]);
        assert_eq!(split_chunks("héllo", 2), vec!["hé", "ll", "o"]);
        assert_eq!(split_chunks("abc", 0), vec!["abc"]);
    }
}
