use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::error::Error;

use super::session::{
    confirm, find_owned_event, login, non_empty, owned_event, parse_date, truncate,
};
use super::OutputFormat;
use crate::config::Config;
use crate::db::EventDatabase;
use crate::models::{NewTask, Task, TaskStatus, TaskUpdate};

#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task to an event
    Add {
        /// Event ID
        event_id: i64,

        /// What needs doing
        name: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,

        /// Status (pending, in_progress, done)
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
    },

    /// List the tasks of an event
    List {
        /// Event ID
        event_id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update a task
    Update {
        /// Task ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,

        /// New status (pending, in_progress, done)
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Fetch a task whose parent event belongs to `username`.
async fn owned_task(
    db: &EventDatabase,
    username: &str,
    id: i64,
) -> Result<Task, Box<dyn Error>> {
    let task = db
        .tasks()
        .get_by_id(id)
        .await?
        .ok_or_else(|| format!("Task not found: {}", id))?;
    find_owned_event(db, username, task.event_id)
        .await?
        .ok_or_else(|| format!("Task not found: {}", id))?;
    Ok(task)
}

impl TaskCommand {
    pub async fn run(
        &self,
        db: &EventDatabase,
        config: &Config,
        password: Option<&str>,
    ) -> Result<(), Box<dyn Error>> {
        let username = login(db, config, password).await?;

        match &self.command {
            TaskSubcommand::Add {
                event_id,
                name,
                due,
                status,
            } => {
                let event = owned_event(db, &username, *event_id).await?;
                let task = NewTask::new(non_empty(name, "Task name")?, *due).with_status(*status);

                let created = db.tasks().create(event.id, &task).await?;
                println!("Added task {} to '{}':", created.id, event.name);
                println!("  {}", created);
                Ok(())
            }

            TaskSubcommand::List { event_id, format } => {
                let event = owned_event(db, &username, *event_id).await?;
                let tasks = db.tasks().list_for_event(event.id).await?;

                if tasks.is_empty() {
                    println!("No tasks for '{}'", event.name);
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&tasks)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<6}  {:<10}  {:<11}  NAME", "ID", "DUE", "STATUS");
                        println!("{}", "-".repeat(80));
                        for task in &tasks {
                            println!(
                                "{:<6}  {:<10}  {:<11}  {}",
                                task.id,
                                task.due_date,
                                task.status,
                                truncate(&task.name, 40)
                            );
                        }
                        let done = tasks
                            .iter()
                            .filter(|t| t.status == TaskStatus::Done)
                            .count();
                        println!("\nDone: {}/{}", done, tasks.len());
                    }
                }
                Ok(())
            }

            TaskSubcommand::Update {
                id,
                name,
                due,
                status,
            } => {
                let mut update = TaskUpdate::default();
                if let Some(name) = name {
                    update = update.with_name(non_empty(name, "Task name")?);
                }
                if let Some(due) = due {
                    update = update.with_due_date(*due);
                }
                if let Some(status) = status {
                    update = update.with_status(*status);
                }

                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let task = owned_task(db, &username, *id).await?;
                let updated = db.tasks().update(task.id, &update).await?;
                println!("Updated task:");
                println!("  {}", updated);
                Ok(())
            }

            TaskSubcommand::Done { id } => {
                let task = owned_task(db, &username, *id).await?;
                let updated = db
                    .tasks()
                    .update(task.id, &TaskUpdate::default().with_status(TaskStatus::Done))
                    .await?;
                println!("  {}", updated);
                Ok(())
            }

            TaskSubcommand::Delete { id, force } => {
                let task = owned_task(db, &username, *id).await?;

                if !force && !confirm(&format!("Delete task '{}'?", task.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                db.tasks().delete(task.id).await?;
                println!("Deleted task: {}", task.name);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{corrupt_event_time, setup, TestContext};

    async fn add_cake_task(ctx: &TestContext) -> Task {
        ctx.db
            .tasks()
            .create(
                ctx.event.id,
                &NewTask::new("Buy cake", NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()),
            )
            .await
            .unwrap()
    }

    fn rename(id: i64, name: &str) -> TaskCommand {
        TaskCommand {
            command: TaskSubcommand::Update {
                id,
                name: Some(name.to_string()),
                due: None,
                status: None,
            },
        }
    }

    #[tokio::test]
    async fn test_add_and_update_own_task() {
        let ctx = setup().await;

        let add = TaskCommand {
            command: TaskSubcommand::Add {
                event_id: ctx.event.id,
                name: "  Buy cake ".to_string(),
                due: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
                status: TaskStatus::Pending,
            },
        };
        add.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();

        let tasks = ctx.db.tasks().list_for_event(ctx.event.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "Buy cake");

        rename(tasks[0].id, "Order cake")
            .run(&ctx.db, &ctx.alice, Some("pw1"))
            .await
            .unwrap();
        let task = ctx.db.tasks().get_by_id(tasks[0].id).await.unwrap().unwrap();
        assert_eq!(task.name, "Order cake");
        assert_eq!(task.due_date, tasks[0].due_date);
    }

    #[tokio::test]
    async fn test_task_of_another_user_is_not_found() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;

        let err = rename(task.id, "Eat cake")
            .run(&ctx.db, &ctx.bob, Some("pw2"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Task not found: {}", task.id));

        let delete = TaskCommand {
            command: TaskSubcommand::Delete {
                id: task.id,
                force: true,
            },
        };
        let err = delete.run(&ctx.db, &ctx.bob, Some("pw2")).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Task not found: {}", task.id));

        let done = TaskCommand {
            command: TaskSubcommand::Done { id: task.id },
        };
        assert!(done.run(&ctx.db, &ctx.bob, Some("pw2")).await.is_err());

        assert_eq!(ctx.db.tasks().get_by_id(task.id).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn test_add_to_another_users_event_is_rejected() {
        let ctx = setup().await;

        let add = TaskCommand {
            command: TaskSubcommand::Add {
                event_id: ctx.event.id,
                name: "Sneaky".to_string(),
                due: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
                status: TaskStatus::Pending,
            },
        };
        let err = add.run(&ctx.db, &ctx.bob, Some("pw2")).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Event not found: {}", ctx.event.id));
        assert!(ctx
            .db
            .tasks()
            .list_for_event(ctx.event.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_without_options_is_rejected() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;

        let cmd = TaskCommand {
            command: TaskSubcommand::Update {
                id: task.id,
                name: None,
                due: None,
                status: None,
            },
        };
        let err = cmd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Nothing to update. Provide at least one option."
        );
    }

    #[tokio::test]
    async fn test_done_marks_task_done() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;

        let cmd = TaskCommand {
            command: TaskSubcommand::Done { id: task.id },
        };
        cmd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();

        let task = ctx.db.tasks().get_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_forced_delete() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;

        let cmd = TaskCommand {
            command: TaskSubcommand::Delete {
                id: task.id,
                force: true,
            },
        };
        cmd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();
        assert!(ctx.db.tasks().get_by_id(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;

        let err = rename(task.id, "Eat cake")
            .run(&ctx.db, &ctx.alice, Some("pw2"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
    }

    #[tokio::test]
    async fn test_storage_error_is_not_reported_as_missing_task() {
        let ctx = setup().await;
        let task = add_cake_task(&ctx).await;
        corrupt_event_time(&ctx, ctx.event.id).await;

        let err = owned_task(&ctx.db, "alice", task.id).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid stored data"));
    }
}
