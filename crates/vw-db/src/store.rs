use deadpool_diesel::postgres::Pool;

use crate::{
    errors::DatabaseError,
    models::{NewPlatform, NewSnapshot, Platform, Snapshot, SnapshotWithPlatform},
    pool::VaultwatchPool,
};

/// Persistence of platforms and their snapshots.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn upsert_platform(&self, platform: NewPlatform) -> Result<Platform, DatabaseError>;

    async fn insert_snapshot(&self, snapshot: NewSnapshot) -> Result<Snapshot, DatabaseError>;

    async fn latest_snapshot(&self, platform_key: &str)
    -> Result<Option<Snapshot>, DatabaseError>;

    async fn list_snapshots(
        &self,
        platform_key: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SnapshotWithPlatform>, DatabaseError>;
}

#[derive(Clone)]
pub struct PgSnapshotStore {
    pool: Pool,
}

impl PgSnapshotStore {
    pub const fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn upsert_platform(&self, platform: NewPlatform) -> Result<Platform, DatabaseError> {
        self.pool
            .interact_with_context(format!("upsert platform: {}", platform.key), move |conn| {
                Platform::upsert(&platform, conn)
            })
            .await
    }

    async fn insert_snapshot(&self, snapshot: NewSnapshot) -> Result<Snapshot, DatabaseError> {
        self.pool
            .interact_with_context(
                format!("insert snapshot for platform {}", snapshot.platform_id),
                move |conn| Snapshot::create(&snapshot, conn),
            )
            .await
    }

    async fn latest_snapshot(
        &self,
        platform_key: &str,
    ) -> Result<Option<Snapshot>, DatabaseError> {
        let key = platform_key.to_string();
        self.pool
            .interact_with_context(format!("latest snapshot: {platform_key}"), move |conn| {
                Snapshot::find_latest_for_platform(&key, conn)
            })
            .await
    }

    async fn list_snapshots(
        &self,
        platform_key: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SnapshotWithPlatform>, DatabaseError> {
        let key = platform_key.map(str::to_string);
        self.pool
            .interact_with_context("list snapshots".to_string(), move |conn| {
                Snapshot::find_recent_with_platform(key.as_deref(), limit, conn)
            })
            .await
    }
}
