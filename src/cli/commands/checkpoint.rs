//! Checkpoint catalog command handlers

use std::path::Path;

use crate::models::Checkpoint;
use crate::state::SharedState;

pub async fn cmd_checkpoint_add(state: &SharedState, checkpoint: Checkpoint) -> anyhow::Result<()> {
    if state.store.get_checkpoint(checkpoint.id).await?.is_some() {
        println!("Checkpoint {} already exists.", checkpoint.id);
        return Ok(());
    }

    state.store.create_checkpoint(&checkpoint).await?;
    println!("✓ Added checkpoint {checkpoint}");

    Ok(())
}

pub async fn cmd_checkpoint_list(state: &SharedState) -> anyhow::Result<()> {
    let checkpoints = state.store.get_all_checkpoints().await?;

    if checkpoints.is_empty() {
        println!("No checkpoints in the catalog.");
        println!();
        println!("Load some with: scanledger checkpoint seed checkpoints.json");
        return Ok(());
    }

    println!("Checkpoints ({} total)", checkpoints.len());
    println!("{:-<70}", "");

    for c in checkpoints {
        println!("{c}");
        println!("  WCAG: {} | Benefits: {}", c.wcaglevels, c.benefits);
    }

    Ok(())
}

pub async fn cmd_checkpoint_show(state: &SharedState, id: i32) -> anyhow::Result<()> {
    match state.store.get_checkpoint(id).await? {
        Some(checkpoint) => println!("{}", serde_json::to_string_pretty(&checkpoint)?),
        None => println!("Checkpoint {id} not found."),
    }

    Ok(())
}

pub async fn cmd_checkpoint_seed(state: &SharedState, path: &str) -> anyhow::Result<()> {
    let count = state.store.seed_checkpoints(Path::new(path)).await?;
    println!("✓ Loaded {count} checkpoints from {path}");

    Ok(())
}
