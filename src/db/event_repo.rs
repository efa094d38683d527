use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use super::error::{is_foreign_key_violation, DbError};
use crate::models::{Event, EventUpdate, NewEvent, DATE_FORMAT, TIME_FORMAT};

pub struct EventRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    username: String,
    name: String,
    date: String,
    time: String,
    location: String,
    description: String,
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|e| {
            DbError::InvalidData(format!("event {} date '{}': {}", row.id, row.date, e))
        })?;
        let time = NaiveTime::parse_from_str(&row.time, TIME_FORMAT).map_err(|e| {
            DbError::InvalidData(format!("event {} time '{}': {}", row.id, row.time, e))
        })?;

        Ok(Event {
            id: row.id,
            username: row.username,
            name: row.name,
            date,
            time,
            location: row.location,
            description: row.description,
        })
    }
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a new event owned by `username` and returns it with its assigned id.
    pub async fn create(&self, username: &str, event: &NewEvent) -> Result<Event, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (username, name, date, time, location, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(&event.name)
        .bind(event.date.format(DATE_FORMAT).to_string())
        .bind(event.time.format(TIME_FORMAT).to_string())
        .bind(&event.location)
        .bind(&event.description)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::not_found("User", username)
            } else {
                DbError::Sqlx(e)
            }
        })?;

        let id = result.last_insert_rowid();
        tracing::debug!("Created event {} for {}", id, username);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Event", id))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Event>, DbError> {
        let row: Option<EventRow> = sqlx::query_as("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Event::try_from).transpose()
    }

    /// All events owned by `username`, ordered by date, time, then id.
    pub async fn list_for_user(&self, username: &str) -> Result<Vec<Event>, DbError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT * FROM events WHERE username = ? ORDER BY date, time, id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Event::try_from).collect()
    }

    /// Applies the fields set in `update` and returns the stored result.
    pub async fn update(&self, id: i64, update: &EventUpdate) -> Result<Event, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = COALESCE(?, name),
                date = COALESCE(?, date),
                time = COALESCE(?, time),
                location = COALESCE(?, location),
                description = COALESCE(?, description)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(update.time.map(|t| t.format(TIME_FORMAT).to_string()))
        .bind(&update.location)
        .bind(&update.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Event", id));
        }
        tracing::debug!("Updated event {}", id);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Event", id))
    }

    /// Removes an event; its tasks and guests go with it.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        // CASCADE will handle tasks and guests
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Event", id));
        }
        tracing::debug!("Deleted event {}", id);
        Ok(())
    }
}
