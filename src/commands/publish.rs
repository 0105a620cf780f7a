//! `packref --version <VERSION> <PATH>...`: the publish run.
//!
//! Paths are validated up front, manifests are loaded in parallel, the
//! rewrite runs once over the whole set, and only then is anything written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::error::{PublishError, Result};
use crate::paths;
use crate::ports::FileSystem;
use crate::project::ProjectFile;
use crate::rewrite::{rewrite, RewriteSummary};

/// Inputs for one publish run.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Release version applied to every manifest and package reference.
    pub version: String,
    /// Manifest paths as given on the command line.
    pub paths: Vec<String>,
    /// Skip the final write-back.
    pub dry_run: bool,
}

impl From<&Cli> for PublishOptions {
    fn from(cli: &Cli) -> Self {
        Self { version: cli.version.clone(), paths: cli.paths.clone(), dry_run: cli.dry_run }
    }
}

/// Outcome of a publish run.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// What the rewrite did.
    pub summary: RewriteSummary,
    /// Files written, in input order. Empty on a dry run.
    pub written: Vec<PathBuf>,
}

/// Execute a publish run.
///
/// # Errors
///
/// Returns an error if a path is relative, a manifest cannot be read or
/// parsed, the dependency graph cannot be resolved, or a write fails. Nothing
/// is written unless every earlier step succeeded.
pub fn run(ctx: &ServiceContext, options: &PublishOptions) -> Result<PublishReport> {
    let paths = prepare_paths(&options.paths)?;
    if paths.is_empty() {
        info!("No project files given, nothing to do");
        return Ok(PublishReport::default());
    }

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let mut files = runtime.block_on(load_all(ctx, &paths, &options.version))?;

    let summary = rewrite(&mut files, &options.version)?;

    let rendered = files
        .iter()
        .map(|file| file.render().map(|text| (file, text)))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::new();
    for (file, text) in rendered {
        if options.dry_run {
            info!("Would write file {}", file.path.display());
            debug!("{text}");
            continue;
        }
        info!("Writing file {}", file.path.display());
        debug!("{} bytes before, {} bytes after", file.source.len(), text.len());
        ctx.fs
            .write(&file.path, &text)
            .map_err(|source| PublishError::Write { path: file.path.clone(), source })?;
        written.push(file.path.clone());
    }

    info!(
        "Replaced {} project references across {} files ({} skipped without package name)",
        summary.replaced,
        files.len(),
        summary.skipped.len()
    );
    Ok(PublishReport { summary, written })
}

/// Trims, validates and deduplicates path arguments, keeping first occurrences.
///
/// # Errors
///
/// Returns [`PublishError::RelativePath`] for the first path that is not absolute.
pub fn prepare_paths(raw: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for arg in raw {
        let arg = arg.trim();
        if !paths::is_absolute(arg) {
            return Err(PublishError::RelativePath(arg.to_string()));
        }
        let path = paths::normalize(arg);
        if seen.insert(path.clone()) {
            paths.push(path);
        }
    }
    Ok(paths)
}

/// Reads and parses every manifest in parallel.
///
/// Results keep the order of `paths`; the first failure aborts the load.
///
/// # Errors
///
/// Returns the first read, parse, or extraction error encountered.
pub async fn load_all(
    ctx: &ServiceContext,
    paths: &[PathBuf],
    version: &str,
) -> Result<Vec<ProjectFile>> {
    let loads = paths.iter().map(|path| {
        let fs = Arc::clone(&ctx.fs);
        let path = path.clone();
        let version = version.to_string();
        async move {
            tokio::task::spawn_blocking(move || load_project(fs.as_ref(), &path, &version))
                .await
                .unwrap_or_else(|err| Err(PublishError::Task(err)))
        }
    });
    try_join_all(loads).await
}

fn load_project(fs: &dyn FileSystem, path: &Path, version: &str) -> Result<ProjectFile> {
    let source = fs
        .read_to_string(path)
        .map_err(|source| PublishError::Read { path: path.to_path_buf(), source })?;
    let file = ProjectFile::load(path, source, version)?;
    debug!(
        "Loaded {} ({} project references, package {:?})",
        path.display(),
        file.edges.len(),
        file.package_name.as_deref()
    );
    Ok(file)
}
