use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::error::{is_foreign_key_violation, DbError};
use crate::models::{NewTask, Task, TaskStatus, TaskUpdate, DATE_FORMAT};

pub struct TaskRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    event_id: i64,
    name: String,
    due_date: String,
    status: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DbError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let due_date = NaiveDate::parse_from_str(&row.due_date, DATE_FORMAT).map_err(|e| {
            DbError::InvalidData(format!("task {} due date '{}': {}", row.id, row.due_date, e))
        })?;
        let status: TaskStatus = row
            .status
            .parse()
            .map_err(|e| DbError::InvalidData(format!("task {}: {}", row.id, e)))?;

        Ok(Task {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            due_date,
            status,
        })
    }
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, event_id: i64, task: &NewTask) -> Result<Task, DbError> {
        let result = sqlx::query(
            "INSERT INTO tasks (event_id, name, due_date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(event_id)
        .bind(&task.name)
        .bind(task.due_date.format(DATE_FORMAT).to_string())
        .bind(task.status.as_str())
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
        tracing::debug!("Created task {} on event {}", id, event_id);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Task", id))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Task>, DbError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Task::try_from).transpose()
    }

    /// Tasks of one event, soonest due first.
    pub async fn list_for_event(&self, event_id: i64) -> Result<Vec<Task>, DbError> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks WHERE event_id = ? ORDER BY due_date, id")
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    pub async fn update(&self, id: i64, update: &TaskUpdate) -> Result<Task, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET name = COALESCE(?, name),
                due_date = COALESCE(?, due_date),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.due_date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(update.status.map(|s| s.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }
        tracing::debug!("Updated task {}", id);

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Task", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }
        tracing::debug!("Deleted task {}", id);
        Ok(())
    }
}
