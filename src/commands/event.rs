use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::error::Error;

use super::session::{confirm, login, non_empty, owned_event, parse_date, parse_time, truncate};
use super::OutputFormat;
use crate::config::Config;
use crate::db::EventDatabase;
use crate::models::{Event, EventUpdate, Guest, GuestTally, NewEvent, Task, TIME_FORMAT};

#[derive(Args)]
pub struct EventCommand {
    #[command(subcommand)]
    pub command: EventSubcommand,
}

#[derive(Subcommand)]
pub enum EventSubcommand {
    /// Create a new event
    Create {
        /// Name of the event
        name: String,

        /// Date (YYYY-MM-DD)
        #[arg(long, short, value_parser = parse_date)]
        date: NaiveDate,

        /// Start time (HH:MM)
        #[arg(long, short, value_parser = parse_time)]
        time: NaiveTime,

        /// Where the event takes place
        #[arg(long, short)]
        location: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// List your events
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show an event with its tasks and guests
    Show {
        /// Event ID
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update an existing event
    Update {
        /// Event ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// New start time (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        /// New location
        #[arg(long)]
        location: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an event with its tasks and guests
    Delete {
        /// Event ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Serialize)]
struct EventDetail {
    #[serde(flatten)]
    event: Event,
    tasks: Vec<Task>,
    guests: Vec<Guest>,
    guest_counts: GuestTally,
}

impl EventCommand {
    pub async fn run(
        &self,
        db: &EventDatabase,
        config: &Config,
        password: Option<&str>,
    ) -> Result<(), Box<dyn Error>> {
        let username = login(db, config, password).await?;

        match &self.command {
            EventSubcommand::Create {
                name,
                date,
                time,
                location,
                description,
            } => {
                let mut event = NewEvent::new(non_empty(name, "Event name")?, *date, *time);
                if let Some(location) = location {
                    event = event.with_location(location);
                }
                if let Some(description) = description {
                    event = event.with_description(description);
                }

                let created = db.events().create(&username, &event).await?;
                println!("Created event:");
                println!("{}", created);
                Ok(())
            }

            EventSubcommand::List { format } => {
                let events = db.events().list_for_user(&username).await?;

                if events.is_empty() {
                    println!("No events found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&events)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<6}  {:<10}  {:<5}  {:<30}  LOCATION",
                            "ID", "DATE", "TIME", "NAME"
                        );
                        println!("{}", "-".repeat(80));
                        for event in &events {
                            println!(
                                "{:<6}  {:<10}  {:<5}  {:<30}  {}",
                                event.id,
                                event.date,
                                event.time.format(TIME_FORMAT).to_string(),
                                truncate(&event.name, 30),
                                event.location
                            );
                        }
                        println!("\nTotal: {} event(s)", events.len());
                    }
                }
                Ok(())
            }

            EventSubcommand::Show { id, format } => {
                let event = owned_event(db, &username, *id).await?;
                let tasks = db.tasks().list_for_event(event.id).await?;
                let guests = db.guests().list_for_event(event.id).await?;
                let guest_counts = db.guests().count_by_status(event.id).await?;

                match format {
                    OutputFormat::Json => {
                        let detail = EventDetail {
                            event,
                            tasks,
                            guests,
                            guest_counts,
                        };
                        println!("{}", serde_json::to_string_pretty(&detail)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", event);

                        if !tasks.is_empty() {
                            println!("Tasks:");
                            for task in &tasks {
                                println!("  {:>4}  {}", task.id, task);
                            }
                            println!();
                        }

                        if !guests.is_empty() {
                            println!("Guests ({}):", guest_counts);
                            for guest in &guests {
                                println!("  {:>4}  {}", guest.id, guest);
                            }
                        }
                    }
                }
                Ok(())
            }

            EventSubcommand::Update {
                id,
                name,
                date,
                time,
                location,
                description,
            } => {
                let mut update = EventUpdate::default();
                if let Some(name) = name {
                    update = update.with_name(non_empty(name, "Event name")?);
                }
                if let Some(date) = date {
                    update = update.with_date(*date);
                }
                if let Some(time) = time {
                    update = update.with_time(*time);
                }
                if let Some(location) = location {
                    update = update.with_location(location);
                }
                if let Some(description) = description {
                    update = update.with_description(description);
                }

                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let event = owned_event(db, &username, *id).await?;
                let updated = db.events().update(event.id, &update).await?;
                println!("Updated event:");
                println!("{}", updated);
                Ok(())
            }

            EventSubcommand::Delete { id, force } => {
                let event = owned_event(db, &username, *id).await?;

                // Confirm deletion unless --force is used
                if !force
                    && !confirm(&format!(
                        "Delete event '{}' with all its tasks and guests?",
                        event.name
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                db.events().delete(event.id).await?;
                println!("Deleted event: {}", event.name);
                Ok(())
            }
        }
    }
}
