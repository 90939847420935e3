//! In-memory snapshot store for tests.

use std::{collections::HashSet, sync::Mutex};

use chrono::Utc;

use crate::{
    errors::DatabaseError,
    models::{NewPlatform, NewSnapshot, Platform, Snapshot, SnapshotWithPlatform},
    store::SnapshotStore,
};

#[derive(Default)]
struct State {
    platforms: Vec<Platform>,
    snapshots: Vec<Snapshot>,
}

#[derive(Default)]
pub struct MemorySnapshotStore {
    state: Mutex<State>,
    failing_platforms: Mutex<HashSet<String>>,
}

impl MemorySnapshotStore {
    /// Make snapshot inserts for this platform key fail.
    pub fn fail_inserts_for(&self, platform_key: &str) {
        self.failing_platforms
            .lock()
            .unwrap()
            .insert(platform_key.to_string());
    }

    pub fn platforms(&self) -> Vec<Platform> {
        self.state.lock().unwrap().platforms.clone()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.state.lock().unwrap().snapshots.clone()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn upsert_platform(&self, platform: NewPlatform) -> Result<Platform, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();

        if let Some(existing) = state.platforms.iter_mut().find(|p| p.key == platform.key) {
            existing.name = platform.name;
            existing.network = platform.network;
            if platform.vault_addr.is_some() {
                existing.vault_addr = platform.vault_addr;
            }
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let created = Platform {
            id: i32::try_from(state.platforms.len()).unwrap() + 1,
            key: platform.key,
            name: platform.name,
            network: platform.network,
            vault_addr: platform.vault_addr,
            created_at: now,
            updated_at: now,
        };
        state.platforms.push(created.clone());
        Ok(created)
    }

    async fn insert_snapshot(&self, snapshot: NewSnapshot) -> Result<Snapshot, DatabaseError> {
        let mut state = self.state.lock().unwrap();
        let platform = state
            .platforms
            .iter()
            .find(|p| p.id == snapshot.platform_id)
            .ok_or_else(|| DatabaseError::UnknownPlatform {
                operation: format!("insert snapshot for platform {}", snapshot.platform_id),
            })?;

        if self.failing_platforms.lock().unwrap().contains(&platform.key) {
            return Err(DatabaseError::unavailable(
                "insert snapshot",
                "connection reset by peer",
            ));
        }

        let created = Snapshot {
            id: i64::try_from(state.snapshots.len()).unwrap() + 1,
            platform_id: snapshot.platform_id,
            taken_at: snapshot.taken_at,
            apy_1d: snapshot.apy_1d,
            apy_7d: snapshot.apy_7d,
            apy_30d: snapshot.apy_30d,
            tvl_usd: snapshot.tvl_usd,
            balance_usd: snapshot.balance_usd,
            earnings_to_date: snapshot.earnings_to_date,
            created_at: Utc::now(),
        };
        state.snapshots.push(created.clone());
        Ok(created)
    }

    async fn latest_snapshot(
        &self,
        platform_key: &str,
    ) -> Result<Option<Snapshot>, DatabaseError> {
        Ok(self
            .list_snapshots(Some(platform_key), 1)
            .await?
            .into_iter()
            .next()
            .map(|row| row.snapshot))
    }

    async fn list_snapshots(
        &self,
        platform_key: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SnapshotWithPlatform>, DatabaseError> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<SnapshotWithPlatform> = state
            .snapshots
            .iter()
            .filter_map(|snapshot| {
                let platform = state
                    .platforms
                    .iter()
                    .find(|p| p.id == snapshot.platform_id)?;
                platform_key
                    .is_none_or(|key| platform.key == key)
                    .then(|| SnapshotWithPlatform {
                        snapshot: snapshot.clone(),
                        platform: platform.clone(),
                    })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.snapshot
                .taken_at
                .cmp(&a.snapshot.taken_at)
                .then(b.snapshot.id.cmp(&a.snapshot.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }
}
