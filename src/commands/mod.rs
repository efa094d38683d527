mod config_cmd;
mod event;
mod guest;
mod session;
mod task;
mod user;

use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use event::EventCommand;
pub use guest::GuestCommand;
pub use task::TaskCommand;
pub use user::UserCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
    use std::path::PathBuf;
    use tempfile::TempDir;

    use crate::config::{Config, ConfigSource, ConfigValue};
    use crate::db::EventDatabase;
    use crate::models::{Event, NewEvent};

    /// Database with users alice (pw1) and bob (pw2); alice owns `event`.
    pub struct TestContext {
        pub db: EventDatabase,
        pub alice: Config,
        pub bob: Config,
        pub event: Event,
        _temp_dir: TempDir,
    }

    pub fn config_for(db_path: PathBuf, user: Option<&str>) -> Config {
        Config {
            database_path: ConfigValue::new(db_path, ConfigSource::Default),
            username: ConfigValue::new(user.map(String::from), ConfigSource::Flag),
            config_file: None,
        }
    }

    pub async fn setup() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = EventDatabase::open(&db_path).await.unwrap();
        db.users().register("alice", "pw1").await.unwrap();
        db.users().register("bob", "pw2").await.unwrap();

        let event = db
            .events()
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
            alice: config_for(db_path.clone(), Some("alice")),
            bob: config_for(db_path, Some("bob")),
            db,
            event,
            _temp_dir: temp_dir,
        }
    }

    /// Overwrite an event's time with text that cannot be decoded, through a
    /// second connection.
    pub async fn corrupt_event_time(ctx: &TestContext, event_id: i64) {
        let options = SqliteConnectOptions::new().filename(ctx.db.path());
        let pool = SqlitePool::connect_with(options).await.unwrap();
        sqlx::query("UPDATE events SET time = 'not a time' WHERE id = ?")
            .bind(event_id)
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;
    }
}
