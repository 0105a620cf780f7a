//! Error types for a publish run.
//!
//! Every failure is fatal. Variants mirror the stage that produced them so the
//! message printed by the binary says what went wrong and where.

use std::path::PathBuf;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Fatal conditions raised while rewriting a working set.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Command-line arguments could not be understood.
    #[error("{0}")]
    Usage(String),

    /// A path argument was not absolute.
    #[error("Path {0} must be absolute")]
    RelativePath(String),

    /// A manifest could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying port error.
        #[source]
        source: PortError,
    },

    /// A manifest is not well-formed markup.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: xmltree::ParseError,
    },

    /// The document root is not a project element.
    #[error("Expected a <Project> root element in {} but found <{root}>", path.display())]
    UnexpectedRoot {
        /// File that failed.
        path: PathBuf,
        /// Name of the root element found instead.
        root: String,
    },

    /// A project reference has no `Include` attribute.
    #[error("Could not understand project reference for {}", path.display())]
    MalformedReference {
        /// File holding the reference.
        path: PathBuf,
    },

    /// No file with zero outstanding dependencies is left, so the graph has a
    /// cycle or points outside the working set.
    #[error(
        "Not all dependencies are contained in tree (unresolved: {})",
        format_paths(.remaining)
    )]
    UnresolvableGraph {
        /// Files that could not be resolved.
        remaining: Vec<PathBuf>,
    },

    /// A reference edit targeted an entry that no longer exists.
    #[error("Cannot find reference {0}")]
    MissingReference(String),

    /// A reference edit targeted a group that no longer exists.
    #[error("Cannot find item group {0} for reference {1}")]
    MissingGroup(usize, String),

    /// A document could not be written back to text.
    #[error("Failed to serialize {}: {message}", path.display())]
    Serialize {
        /// File that failed.
        path: PathBuf,
        /// Emitter message.
        message: String,
    },

    /// A rewritten manifest could not be stored.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying port error.
        #[source]
        source: PortError,
    },

    /// The async runtime could not be started.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// A loader task panicked or was cancelled.
    #[error("Loader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}
