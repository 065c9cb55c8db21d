use std::sync::Arc;

use chrono_tz::Tz;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use reqwest::{Client, RequestBuilder};
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::{
        BusRoute, BusSchedule, Category, Deal, Event, MenuItem, OnDutyPharmacy, Pharmacy,
        ServiceData, Venue,
    },
    config::SyncConfig,
    database::{sqlite::SqliteDatabase, Record},
    error::{Error, Result},
    timing::local_now,
};

/// Periodically pulls every table from the hosted datastore's REST endpoint
/// into the local mirror. Read-only: nothing is ever written back.
pub struct Syncer {
    connection_pool: Arc<Pool<SqliteConnectionManager>>,
    client: Client,
    config: SyncConfig,
    timezone: Tz,
}

impl Syncer {
    pub fn setup(
        connection_pool: Arc<Pool<SqliteConnectionManager>>,
        config: SyncConfig,
        timezone: Tz,
    ) -> Result<Self> {
        let connection = connection_pool.get()?;
        SqliteDatabase::create_tables(&connection)?;
        Ok(Self {
            connection_pool,
            client: Client::new(),
            config,
            timezone,
        })
    }

    pub async fn run(self) {
        info!(
            "Mirroring {} every {}s",
            self.config.base_url, self.config.interval_secs
        );
        loop {
            let synced = self.sync_once().await;
            info!("Sync pass done, {} tables updated", synced);
            sleep_until(Instant::now() + Duration::from_secs(self.config.interval_secs)).await;
        }
    }

    /// One pass over every table. A failing table is logged and keeps its
    /// previous content; the others still go through.
    pub async fn sync_once(&self) -> usize {
        let results = [
            self.sync_table::<Category>().await,
            self.sync_table::<Venue>().await,
            self.sync_table::<MenuItem>().await,
            self.sync_table::<ServiceData>().await,
            self.sync_table::<Deal>().await,
            self.sync_table::<Event>().await,
            self.sync_table::<Pharmacy>().await,
            self.sync_table::<OnDutyPharmacy>().await,
            self.sync_table::<BusRoute>().await,
            self.sync_table::<BusSchedule>().await,
        ];
        results.iter().filter(|result| result.is_ok()).count()
    }

    async fn sync_table<T: Record>(&self) -> Result<usize> {
        let outcome = async {
            let body = self.fetch(T::TABLE).await?;
            let records: Vec<T> = parse_rows(T::TABLE, &body)?;
            let synced_at = local_now(self.timezone).naive_local();
            let mut connection = self.connection_pool.get()?;
            SqliteDatabase::store_all(&mut connection, &records, synced_at)?;
            Ok::<usize, Error>(records.len())
        }
        .await;

        match &outcome {
            Ok(count) => debug!("Synced {} rows of {}", count, T::TABLE),
            Err(err) => error!("Could not sync {}: {}", T::TABLE, err),
        }
        outcome
    }

    pub fn get_request(&self, table: &str) -> RequestBuilder {
        let url = format!(
            "{}/rest/v1/{}?select=*",
            self.config.base_url.trim_end_matches('/'),
            table
        );
        self.client
            .get(url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
    }

    async fn fetch(&self, table: &str) -> Result<String> {
        let response = self.get_request(table).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Remote {
                table: table.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Parses a REST response body (a JSON array of rows) into records.
///
/// Rows that do not fit `T` are dropped with a warning instead of failing
/// the table; a body that is not an array at all is an error.
pub fn parse_rows<T: Record>(table: &str, body: &str) -> Result<Vec<T>> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.get("id").cloned();
        match serde_json::from_value::<T>(row) {
            Ok(record) => records.push(record),
            Err(err) => warn!("Dropping {} row {:?}: {}", table, id, err),
        }
    }
    Ok(records)
}
