use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a source could not turn a card name into image bytes.
///
/// `NotFound` means the source answered but knows no such card; the other
/// variants are transport-level failures. Both send the pipeline on to the
/// next source, they are just logged at different levels.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{source_name} has no card named {card:?}")]
    NotFound {
        source_name: &'static str,
        card: String,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}

/// Failures that abort the whole run.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("could not read deck file {}: {source}", .path.display())]
    DeckRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("deck file line {line}: could not parse {text:?}")]
    DeckLine { line: usize, text: String },

    #[error("{} already exists, not overwriting", .path.display())]
    DestinationExists { path: PathBuf },

    #[error("{tool} failed: {detail}")]
    Tool { tool: &'static str, detail: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}
