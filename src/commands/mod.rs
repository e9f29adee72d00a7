pub mod render;
pub mod sample;
pub mod scores;

use std::{fs, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::{cli::Cli, config::Config};

/// Configuration from `--config`, or defaults.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    let Some(path) = &cli.config else { return Ok(Config::default()) };
    debug!(path = %path.display(), "loading configuration");
    Config::load_from_file(path)
        .with_context(|| format!("[config] Failed to load {}", path.display()))
}

/// Command-line path if given, else the configured one.
pub(crate) fn input_path(flag: Option<&PathBuf>, configured: Option<&PathBuf>, what: &str) -> Result<PathBuf> {
    match flag.or(configured) {
        Some(path) => Ok(path.clone()),
        None => bail!("no {what} file given; pass it on the command line or set it under [input]"),
    }
}

/// Refuse stdout and existing files (unless `force`). Touches nothing on disk.
pub(crate) fn check_output(path: &Path, force: bool) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    if !force && path.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", path.display());
    }
    Ok(())
}

/// Create the missing parent directories of an output file.
pub(crate) fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    Ok(())
}
