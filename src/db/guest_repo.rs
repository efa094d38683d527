use sqlx::SqlitePool;

use super::error::{is_foreign_key_violation, DbError};
use crate::models::{Guest, GuestStatus, GuestTally, GuestUpdate, NewGuest};

pub struct GuestRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct GuestRow {
    id: i64,
    event_id: i64,
    name: String,
    contact: String,
    status: String,
}

#[derive(sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
}

impl TryFrom<GuestRow> for Guest {
    type Error = DbError;

    fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
        let status: GuestStatus = row
            .status
            .parse()
            .map_err(|e| DbError::InvalidData(format!("guest {}: {}", row.id, e)))?;

        Ok(Guest {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            contact: row.contact,
            status,
        })
    }
}

impl GuestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event_id: i64, guest: &NewGuest) -> Result<Guest, DbError> {
        let result = sqlx::query(
            "INSERT INTO guests (event_id, name, contact, status) VALUES (?, ?, ?, ?)",
        )
        .bind(event_id)
        .bind(&guest.name)
        .bind(&guest.contact)
        .bind(guest.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DbError::not_found("Event", event_id)
            } else {
                DbError::Sqlx(e)
            }
        })?;

        let id = result.last_insert_rowid();
        tracing::debug!("Created guest {} on event {}", id, event_id);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Guest", id))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Guest>, DbError> {
        let row: Option<GuestRow> = sqlx::query_as("SELECT * FROM guests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Guest::try_from).transpose()
    }

    /// Guests of one event in the order they were added.
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Guest>, DbError> {
        let rows: Vec<GuestRow> =
            sqlx::query_as("SELECT * FROM guests WHERE event_id = ? ORDER BY id")
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Guest::try_from).collect()
    }

    /// Number of guests per status for one event.
    pub async fn count_by_status(&self, event_id: i64) -> Result<GuestTally, DbError> {
        let rows: Vec<StatusCountRow> = sqlx::query_as(
            "SELECT status, COUNT(*) AS count FROM guests WHERE event_id = ? GROUP BY status",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        let mut tally = GuestTally::default();
        for row in rows {
            let status: GuestStatus = row.status.parse().map_err(DbError::InvalidData)?;
            match status {
                GuestStatus::Invited => tally.invited = row.count,
                GuestStatus::Confirmed => tally.confirmed = row.count,
                GuestStatus::Declined => tally.declined = row.count,
            }
        }
        Ok(tally)
    }

    pub async fn update(&self, id: i64, update: &GuestUpdate) -> Result<Guest, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE guests
            SET name = COALESCE(?, name),
                contact = COALESCE(?, contact),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.contact)
        .bind(update.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Guest", id));
        }
        tracing::debug!("Updated guest {}", id);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Guest", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Guest", id));
        }
        tracing::debug!("Deleted guest {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_db, EventRepository, UserRepository};
    use crate::models::{Event, NewEvent};
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    struct TestContext {
        repo: GuestRepository,
        events: EventRepository,
        event: Event,
        _temp_dir: TempDir,
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();

        UserRepository::new(pool.clone())
            .register("alice", "pw1")
            .await
            .unwrap();
        let events = EventRepository::new(pool.clone());
        let event = events
            .create(
                "alice",
                &NewEvent::new(
                    "Birthday",
                    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                    NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                ),
            )
            .await
            .unwrap();

        TestContext {
            repo: GuestRepository::new(pool),
            events,
            event,
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_guests() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let bob = repo
            .create(ctx.event.id, &NewGuest::new("Bob").with_contact("bob@example.com"))
            .await
            .unwrap();
        let carol = repo
            .create(
                ctx.event.id,
                &NewGuest::new("Carol").with_status(GuestStatus::Confirmed),
            )
            .await
            .unwrap();

        assert_eq!(bob.status, GuestStatus::Invited);
        assert_eq!(bob.contact, "bob@example.com");

        let guests = repo.list_for_event(ctx.event.id).await.unwrap();
        assert_eq!(guests, vec![bob, carol]);
    }

    #[tokio::test]
    async fn test_create_on_missing_event() {
        let ctx = setup_repo().await;

        let err = ctx
            .repo
            .create(999, &NewGuest::new("Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Event", .. }));
    }

    #[tokio::test]
    async fn test_update_changes_only_targeted_fields() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let guest = repo
            .create(ctx.event.id, &NewGuest::new("Bob").with_contact("555-0100"))
            .await
            .unwrap();
        let sibling = repo
            .create(ctx.event.id, &NewGuest::new("Carol"))
            .await
            .unwrap();

        let updated = repo
            .update(
                guest.id,
                &GuestUpdate::default().with_status(GuestStatus::Declined),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, GuestStatus::Declined);
        assert_eq!(updated.name, "Bob");
        assert_eq!(updated.contact, "555-0100");

        assert_eq!(repo.get_by_id(sibling.id).await.unwrap().unwrap(), sibling);
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;
        let id = ctx.event.id;

        repo.create(id, &NewGuest::new("A")).await.unwrap();
        repo.create(id, &NewGuest::new("B").with_status(GuestStatus::Confirmed))
            .await
            .unwrap();
        repo.create(id, &NewGuest::new("C").with_status(GuestStatus::Confirmed))
            .await
            .unwrap();
        repo.create(id, &NewGuest::new("D").with_status(GuestStatus::Declined))
            .await
            .unwrap();

        let tally = repo.count_by_status(id).await.unwrap();
        assert_eq!(
            tally,
            GuestTally {
                invited: 1,
                confirmed: 2,
                declined: 1,
            }
        );
        assert_eq!(tally.total(), 4);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let guest = repo
            .create(ctx.event.id, &NewGuest::new("Bob"))
            .await
            .unwrap();
        repo.update(guest.id, &GuestUpdate::default().with_name("Robert"))
            .await
            .unwrap();
        assert_eq!(
            repo.get_by_id(guest.id).await.unwrap().unwrap().name,
            "Robert"
        );

        repo.delete(guest.id).await.unwrap();
        assert!(repo.get_by_id(guest.id).await.unwrap().is_none());

        let err = repo.delete(guest.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Guest", .. }));
    }

    #[tokio::test]
    async fn test_deleting_event_removes_guests() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(ctx.event.id, &NewGuest::new("Bob"))
            .await
            .unwrap();
        ctx.events.delete(ctx.event.id).await.unwrap();

        assert!(repo.list_for_event(ctx.event.id).await.unwrap().is_empty());
        assert_eq!(
            repo.count_by_status(ctx.event.id).await.unwrap(),
            GuestTally::default()
        );
    }
}
