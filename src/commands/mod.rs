pub mod build;
pub mod run_static;
pub mod serve;

use std::path::{Path, PathBuf};

/// Resolve the config file argument against the current directory.
pub fn resolve_config_path(config_file: &Path) -> Result<PathBuf, anyhow::Error> {
    if config_file.is_relative() {
        Ok(std::env::current_dir()?.join(config_file))
    } else {
        Ok(config_file.to_path_buf())
    }
}
