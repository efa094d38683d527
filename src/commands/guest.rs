use clap::{Args, Subcommand};
use std::error::Error;

use super::session::{confirm, find_owned_event, login, non_empty, owned_event, truncate};
use super::OutputFormat;
use crate::config::Config;
use crate::db::EventDatabase;
use crate::models::{Guest, GuestStatus, GuestUpdate, NewGuest};

#[derive(Args)]
pub struct GuestCommand {
    #[command(subcommand)]
    pub command: GuestSubcommand,
}

#[derive(Subcommand)]
pub enum GuestSubcommand {
    /// Add a guest to an event
    Add {
        /// Event ID
        event_id: i64,

        /// Guest name
        name: String,

        /// Email address or phone number
        #[arg(long)]
        contact: Option<String>,

        /// Status (invited, confirmed, declined)
        #[arg(long, default_value = "invited")]
        status: GuestStatus,
    },

    /// List the guests of an event
    List {
        /// Event ID
        event_id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Update a guest
    Update {
        /// Guest ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New contact
        #[arg(long)]
        contact: Option<String>,

        /// New status (invited, confirmed, declined)
        #[arg(long)]
        status: Option<GuestStatus>,
    },

    /// Remove a guest
    Delete {
        /// Guest ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

async fn owned_guest(
    db: &EventDatabase,
    username: &str,
    id: i64,
) -> Result<Guest, Box<dyn Error>> {
    let guest = db
        .guests()
        .get_by_id(id)
        .await?
        .ok_or_else(|| format!("Guest not found: {}", id))?;
    find_owned_event(db, username, guest.event_id)
        .await?
        .ok_or_else(|| format!("Guest not found: {}", id))?;
    Ok(guest)
}

impl GuestCommand {
    pub async fn run(
        &self,
        db: &EventDatabase,
        config: &Config,
        password: Option<&str>,
    ) -> Result<(), Box<dyn Error>> {
        let username = login(db, config, password).await?;

        match &self.command {
            GuestSubcommand::Add {
                event_id,
                name,
                contact,
                status,
            } => {
                let event = owned_event(db, &username, *event_id).await?;
                let mut guest = NewGuest::new(non_empty(name, "Guest name")?).with_status(*status);
                if let Some(contact) = contact {
                    guest = guest.with_contact(contact.trim());
                }

                let created = db.guests().create(event.id, &guest).await?;
                println!("Added guest {} to '{}':", created.id, event.name);
                println!("  {}", created);
                Ok(())
            }

            GuestSubcommand::List { event_id, format } => {
                let event = owned_event(db, &username, *event_id).await?;
                let guests = db.guests().list_for_event(event.id).await?;

                if guests.is_empty() {
                    println!("No guests for '{}'", event.name);
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&guests)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<6}  {:<25}  {:<10}  CONTACT", "ID", "NAME", "STATUS");
                        println!("{}", "-".repeat(80));
                        for guest in &guests {
                            println!(
                                "{:<6}  {:<25}  {:<10}  {}",
                                guest.id,
                                truncate(&guest.name, 25),
                                guest.status,
                                guest.contact
                            );
                        }
                        let tally = db.guests().count_by_status(event.id).await?;
                        println!("\nTotal: {} guest(s), {}", tally.total(), tally);
                    }
                }
                Ok(())
            }

            GuestSubcommand::Update {
                id,
                name,
                contact,
                status,
            } => {
                let mut update = GuestUpdate::default();
                if let Some(name) = name {
                    update = update.with_name(non_empty(name, "Guest name")?);
                }
                if let Some(contact) = contact {
                    update = update.with_contact(contact.trim());
                }
                if let Some(status) = status {
                    update = update.with_status(*status);
                }

                if update.is_empty() {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let guest = owned_guest(db, &username, *id).await?;
                let updated = db.guests().update(guest.id, &update).await?;
                println!("Updated guest:");
                println!("  {}", updated);
                Ok(())
            }

            GuestSubcommand::Delete { id, force } => {
                let guest = owned_guest(db, &username, *id).await?;

                if !force && !confirm(&format!("Remove guest '{}'?", guest.name))? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                db.guests().delete(guest.id).await?;
                println!("Removed guest: {}", guest.name);
                Ok(())
            }
        }
    }
}
