use crate::entities::{checkpoints, prelude::*};
use crate::models::Checkpoint;
use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};
use tracing::info;

/// Repository for the checkpoint catalog
pub struct CheckpointRepository {
    conn: DatabaseConnection,
}

impl CheckpointRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(c: checkpoints::Model) -> Checkpoint {
        Checkpoint {
            id: c.id,
            name: c.name,
            wcaglevels: c.wcaglevels,
            benefits: c.benefits,
            regex: c.regex,
        }
    }

    fn active_model(checkpoint: &Checkpoint) -> checkpoints::ActiveModel {
        checkpoints::ActiveModel {
            id: Set(checkpoint.id),
            name: Set(checkpoint.name.clone()),
            wcaglevels: Set(checkpoint.wcaglevels.clone()),
            benefits: Set(checkpoint.benefits.clone()),
            regex: Set(checkpoint.regex.clone()),
        }
    }

    /// Insert with the caller's id. Fails if the id is taken.
    pub async fn create(&self, checkpoint: &Checkpoint) -> Result<()> {
        Checkpoints::insert(Self::active_model(checkpoint))
            .exec(&self.conn)
            .await
            .with_context(|| format!("Failed to insert checkpoint {}", checkpoint.id))?;

        info!("Added checkpoint {}", checkpoint);
        Ok(())
    }

    /// Insert many checkpoints in one transaction
    pub async fn create_many(&self, batch: &[Checkpoint]) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;
        for checkpoint in batch {
            Checkpoints::insert(Self::active_model(checkpoint))
                .exec(&txn)
                .await
                .with_context(|| format!("Failed to insert checkpoint {}", checkpoint.id))?;
        }
        txn.commit().await?;

        info!("Seeded {} checkpoints", batch.len());
        Ok(batch.len())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Checkpoint>> {
        let result = Checkpoints::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query checkpoint")?;
        Ok(result.map(Self::map_model))
    }

    pub async fn get_all(&self) -> Result<Vec<Checkpoint>> {
        let rows = Checkpoints::find()
            .order_by_asc(checkpoints::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list checkpoints")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }
}
