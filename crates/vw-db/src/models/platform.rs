use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::platforms;

#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, ToSchema,
)]
#[diesel(table_name = platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Platform {
    pub id: i32,
    pub key: String,
    pub name: String,
    pub network: String,
    pub vault_addr: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Platform identity to upsert. A `None` address leaves the stored one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Insertable)]
#[diesel(table_name = platforms)]
pub struct NewPlatform {
    pub key: String,
    pub name: String,
    pub network: String,
    pub vault_addr: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = platforms)]
struct PlatformSync<'a> {
    name: &'a str,
    network: &'a str,
    vault_addr: Option<&'a str>,
    updated_at: DateTime<Utc>,
}

impl Platform {
    /// Insert the platform or sync name, network and (when given) address of the existing row.
    pub fn upsert(new_platform: &NewPlatform, conn: &mut diesel::PgConnection) -> QueryResult<Self> {
        let sync = PlatformSync {
            name: &new_platform.name,
            network: &new_platform.network,
            vault_addr: new_platform.vault_addr.as_deref(),
            updated_at: Utc::now(),
        };

        diesel::insert_into(platforms::table)
            .values(new_platform)
            .on_conflict(platforms::key)
            .do_update()
            .set(&sync)
            .returning(Self::as_returning())
            .get_result(conn)
    }
}
