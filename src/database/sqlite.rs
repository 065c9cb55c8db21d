use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use super::{Record, TABLES};
use crate::ISO_FORMAT;

pub struct SqliteDatabase {}

impl SqliteDatabase {
    /**
    Create a mirror table. Every table has the same shape: the record id, its
    JSON payload and when it was last pulled from the datastore.
    */
    pub fn create_table(connection: &Connection, table_name: &str) -> rusqlite::Result<()> {
        // Name should come from `Record::TABLE`, never from a request!
        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    id INTEGER PRIMARY KEY,
                    payload TEXT NOT NULL,
                    synced_at TEXT NOT NULL
                )",
                table_name
            ),
            (),
        )?;
        Ok(())
    }

    pub fn create_tables(connection: &Connection) -> rusqlite::Result<()> {
        for table in TABLES {
            Self::create_table(connection, table)?;
        }
        Ok(())
    }

    /**
    Swap the whole content of a table for `rows` of (id, payload).

    Runs in one transaction so readers never see a half synced table.
    */
    pub fn replace_all(
        connection: &mut Connection,
        table_name: &str,
        rows: &[(i64, String)],
        synced_at: NaiveDateTime,
    ) -> rusqlite::Result<()> {
        let synced_at = synced_at.format(ISO_FORMAT).to_string();
        let transaction = connection.transaction()?;
        transaction.execute(&format!("DELETE FROM {}", table_name), ())?;
        {
            let mut statement = transaction.prepare(&format!(
                "INSERT INTO {} (id, payload, synced_at) VALUES (?1, ?2, ?3)",
                table_name
            ))?;
            for (id, payload) in rows {
                statement.execute(params![id, payload, synced_at])?;
            }
        }
        transaction.commit()
    }

    /**
    Get every (id, payload) of a table, ordered by id.
    */
    pub fn query_all(
        connection: &Connection,
        table_name: &str,
    ) -> rusqlite::Result<Vec<(i64, String)>> {
        let mut statement =
            connection.prepare(&format!("SELECT id, payload FROM {} ORDER BY id", table_name))?;
        let rows = statement.query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut data: Vec<(i64, String)> = Vec::new();
        for row in rows {
            data.push(row?);
        }
        Ok(data)
    }

    /**
    Get the payload of a single record.

    Returns an `Ok(None)` if there is no such id.
    */
    pub fn query_one(
        connection: &Connection,
        table_name: &str,
        id: i64,
    ) -> rusqlite::Result<Option<String>> {
        connection
            .query_row(
                &format!("SELECT payload FROM {} WHERE id = ?1", table_name),
                params![id],
                |row| row.get(0),
            )
            .optional()
    }

    /**
    When the table was last synced.

    Returns an `Ok(None)` if the table is empty.
    */
    pub fn last_synced(
        connection: &Connection,
        table_name: &str,
    ) -> rusqlite::Result<Option<NaiveDateTime>> {
        let synced_at: Option<String> = connection
            .query_row(
                &format!("SELECT MAX(synced_at) FROM {}", table_name),
                (),
                |row| row.get(0),
            )?;
        Ok(synced_at.and_then(|value| NaiveDateTime::parse_from_str(&value, ISO_FORMAT).ok()))
    }

    /**
    Load every record of type `T`.

    Payloads that no longer deserialize are logged and skipped, so one bad row
    never takes a whole listing down.
    */
    pub fn load_all<T: Record>(connection: &Connection) -> rusqlite::Result<Vec<T>> {
        let rows = Self::query_all(connection, T::TABLE)?;
        Ok(rows
            .into_iter()
            .filter_map(|(id, payload)| match serde_json::from_str(&payload) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("Skipping {} #{}: {}", T::TABLE, id, err);
                    None
                }
            })
            .collect())
    }

    pub fn load_one<T: Record>(connection: &Connection, id: i64) -> rusqlite::Result<Option<T>> {
        let Some(payload) = Self::query_one(connection, T::TABLE, id)? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!("Skipping {} #{}: {}", T::TABLE, id, err);
                Ok(None)
            }
        }
    }

    /**
    Replace the table of `T` with `records`.
    */
    pub fn store_all<T: Record>(
        connection: &mut Connection,
        records: &[T],
        synced_at: NaiveDateTime,
    ) -> crate::Result<()> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push((record.id(), serde_json::to_string(record)?));
        }
        Self::replace_all(connection, T::TABLE, &rows, synced_at)?;
        Ok(())
    }
}
