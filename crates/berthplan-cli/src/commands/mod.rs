pub mod import;
pub mod run;
pub mod show;

use std::path::Path;

use anyhow::Context;
use berthplan_core::BerthplanConfig;
use berthplan_state::StateStore;

/// Open the redb store named by the config, creating the file if needed.
pub fn open_store(config: &BerthplanConfig, data_dir: &Path) -> anyhow::Result<StateStore> {
    let path = config.store_path(data_dir);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    StateStore::open(&path).with_context(|| format!("failed to open store {}", path.display()))
}

/// Open an existing store; a missing file is an error instead of a new store.
pub fn open_existing_store(
    config: &BerthplanConfig,
    data_dir: &Path,
) -> anyhow::Result<StateStore> {
    let path = config.store_path(data_dir);
    if !path.is_file() {
        anyhow::bail!("no store found at {}", path.display());
    }
    StateStore::open(&path).with_context(|| format!("failed to open store {}", path.display()))
}
