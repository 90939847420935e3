use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::Platform,
    schema::{platforms, snapshots},
};

#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    ToSchema,
)]
#[diesel(table_name = snapshots)]
#[diesel(belongs_to(Platform))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Snapshot {
    pub id: i64,
    pub platform_id: i32,
    pub taken_at: DateTime<Utc>,
    pub apy_1d: Option<f64>,
    pub apy_7d: Option<f64>,
    pub apy_30d: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub balance_usd: Option<f64>,
    pub earnings_to_date: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Insertable)]
#[diesel(table_name = snapshots)]
pub struct NewSnapshot {
    pub platform_id: i32,
    pub taken_at: DateTime<Utc>,
    pub apy_1d: Option<f64>,
    pub apy_7d: Option<f64>,
    pub apy_30d: Option<f64>,
    pub tvl_usd: Option<f64>,
    pub balance_usd: Option<f64>,
    pub earnings_to_date: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotWithPlatform {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub platform: Platform,
}

impl From<(Snapshot, Platform)> for SnapshotWithPlatform {
    fn from((snapshot, platform): (Snapshot, Platform)) -> Self {
        Self { snapshot, platform }
    }
}

impl Snapshot {
    pub fn create(new_snapshot: &NewSnapshot, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        diesel::insert_into(snapshots::table)
            .values(new_snapshot)
            .returning(Self::as_returning())
            .get_result(conn)
    }

    /// Most recent snapshot of the platform identified by `platform_key`
    pub fn find_latest_for_platform(
        platform_key: &str,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<Self>> {
        snapshots::table
            .inner_join(platforms::table)
            .filter(platforms::key.eq(platform_key))
            .order(snapshots::taken_at.desc())
            .select(Self::as_select())
            .first(conn)
            .optional()
    }

    /// Latest snapshots first, optionally restricted to one platform
    pub fn find_recent_with_platform(
        platform_key: Option<&str>,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<SnapshotWithPlatform>> {
        let mut query = snapshots::table
            .inner_join(platforms::table)
            .order(snapshots::taken_at.desc())
            .limit(limit)
            .select((Self::as_select(), Platform::as_select()))
            .into_boxed();

        if let Some(key) = platform_key {
            query = query.filter(platforms::key.eq(key));
        }

        let rows: Vec<(Self, Platform)> = query.load(conn)?;
        Ok(rows.into_iter().map(SnapshotWithPlatform::from).collect())
    }
}
