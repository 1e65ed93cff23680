use crate::{compositions, scanner_state, StorageError};
use async_trait::async_trait;
use soul_core::{
    error::Result,
    types::{Composition, CompositionId, NewComposition, ScanVersion, SourceTags, Timestamp},
    CompositionCatalog, SoulError, StateStore,
};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
///
/// Serves as both the scanner's state store and its composition catalog.
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Register a composition and bump the library version
    pub async fn add_composition(&self, composition: NewComposition) -> Result<Composition> {
        let mut tx = self.pool.begin().await?;
        let created = compositions::insert(&mut tx, &composition).await?;
        let version = scanner_state::bump_current_version(&mut *tx).await?;
        tx.commit().await?;

        tracing::debug!(
            "Added composition {} ({}), library version {}",
            created.id,
            created.file_path,
            version
        );
        Ok(created)
    }

    /// Delete a composition and bump the library version
    pub async fn remove_composition(&self, id: CompositionId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        if !compositions::delete(&mut tx, id).await? {
            return Err(SoulError::not_found("Composition", id.to_string()));
        }
        scanner_state::bump_current_version(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_composition(&self, id: CompositionId) -> Result<Option<Composition>> {
        Ok(compositions::get_by_id(&self.pool, id).await?)
    }

    pub async fn get_all_compositions(&self) -> Result<Vec<Composition>> {
        Ok(compositions::get_all(&self.pool).await?)
    }

    /// Force the next pass to be a full rescan
    pub async fn bump_current_version(&self) -> Result<ScanVersion> {
        Ok(scanner_state::bump_current_version(&self.pool).await?)
    }
}

#[async_trait]
impl StateStore for LocalStorageContext {
    async fn current_version(&self) -> Result<ScanVersion> {
        Ok(scanner_state::get(&self.pool, scanner_state::KEY_CURRENT_VERSION).await?)
    }

    async fn set_current_version(&self, version: ScanVersion) -> Result<()> {
        Ok(scanner_state::set(&self.pool, scanner_state::KEY_CURRENT_VERSION, version).await?)
    }

    async fn last_version(&self) -> Result<ScanVersion> {
        Ok(scanner_state::get(&self.pool, scanner_state::KEY_LAST_VERSION).await?)
    }

    async fn set_last_version(&self, version: ScanVersion) -> Result<()> {
        Ok(scanner_state::set(&self.pool, scanner_state::KEY_LAST_VERSION, version).await?)
    }

    async fn last_complete_scan_time(&self) -> Result<Timestamp> {
        Ok(scanner_state::get(&self.pool, scanner_state::KEY_LAST_COMPLETE_SCAN_TIME).await?)
    }

    async fn set_last_complete_scan_time(&self, time: Timestamp) -> Result<()> {
        Ok(
            scanner_state::set(&self.pool, scanner_state::KEY_LAST_COMPLETE_SCAN_TIME, time)
                .await?,
        )
    }
}

#[async_trait]
impl CompositionCatalog for LocalStorageContext {
    async fn select_next_candidate(&self, cutoff: Timestamp) -> Result<Option<Composition>> {
        if cutoff < 0 {
            return Err(StorageError::InvalidInput(format!("negative cutoff {cutoff}")).into());
        }
        Ok(compositions::select_next_to_scan(&self.pool, cutoff).await?)
    }

    async fn update_composition_tags(
        &self,
        composition: &Composition,
        tags: &SourceTags,
    ) -> Result<()> {
        Ok(compositions::update_by_source_tags(&self.pool, composition.id, tags).await?)
    }

    async fn set_last_file_scan_time(
        &self,
        composition: &Composition,
        scanned_at: Timestamp,
    ) -> Result<()> {
        Ok(compositions::set_last_file_scan_time(&self.pool, composition.id, scanned_at).await?)
    }
}
