use std::path::Path;

use anyhow::Context;
use berthplan_state::{StateStore, StoreSnapshot};
use tracing::info;

pub fn import(store: &StateStore, file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    load(store, &snapshot)?;
    println!(
        "✓ Imported {} applications, {} berths, {} leases",
        snapshot.applications.len(),
        snapshot.berths.len(),
        snapshot.leases.len()
    );
    Ok(())
}

/// Upsert every record of `snapshot` into the store, all or nothing.
fn load(store: &StateStore, snapshot: &StoreSnapshot) -> anyhow::Result<()> {
    store
        .import(snapshot)
        .context("import rejected, store left unchanged")?;
    info!(
        applications = snapshot.applications.len(),
        berths = snapshot.berths.len(),
        leases = snapshot.leases.len(),
        "fixture imported"
    );
    Ok(())
}
