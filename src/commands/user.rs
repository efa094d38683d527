use clap::{Args, Subcommand};
use std::error::Error;

use super::session::{confirm, configured_user, login, resolve_password};
use crate::config::Config;
use crate::db::EventDatabase;

#[derive(Args)]
pub struct UserCommand {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Create a new account
    Register {
        /// Username for the new account
        username: String,
    },

    /// Check the configured user's credentials
    Login,

    /// Change the configured user's password
    Passwd {
        /// New password (prompted for when omitted)
        #[arg(long)]
        new_password: Option<String>,
    },

    /// Delete the configured user and all of their events
    Delete {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl UserCommand {
    pub async fn run(
        &self,
        db: &EventDatabase,
        config: &Config,
        password: Option<&str>,
    ) -> Result<(), Box<dyn Error>> {
        match &self.command {
            UserSubcommand::Register { username } => {
                let username = username.trim();
                let password = resolve_password(password, "Choose a password: ")?;

                // A taken name surfaces as DbError::DuplicateUsername
                let user = db.users().register(username, &password).await?;
                println!("Registered user: {}", user.username);
                Ok(())
            }

            UserSubcommand::Login => {
                let username = login(db, config, password).await?;
                println!("Logged in as {}", username);
                Ok(())
            }

            UserSubcommand::Passwd { new_password } => {
                let username = configured_user(config)?;
                let old_password = resolve_password(password, "Current password: ")?;
                let new_password = match new_password {
                    Some(p) => p.clone(),
                    None => rpassword::prompt_password("New password: ")?,
                };

                if db
                    .users()
                    .change_password(&username, &old_password, &new_password)
                    .await?
                {
                    println!("Password changed for {}", username);
                    Ok(())
                } else {
                    Err("Invalid username or password".into())
                }
            }

            UserSubcommand::Delete { force } => {
                let username = login(db, config, password).await?;

                if !force
                    && !confirm(&format!(
                        "Delete user '{}' and all of their events?",
                        username
                    ))?
                {
                    println!("Deletion cancelled.");
                    return Ok(());
                }

                db.users().delete(&username).await?;
                println!("Deleted user: {}", username);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config_for, setup};

    #[tokio::test]
    async fn test_register_duplicate_is_rejected() {
        let ctx = setup().await;

        let cmd = UserCommand {
            command: UserSubcommand::Register {
                username: " carol ".to_string(),
            },
        };
        cmd.run(&ctx.db, &ctx.alice, Some("pw3")).await.unwrap();
        assert!(ctx.db.users().authenticate("carol", "pw3").await.unwrap());

        let cmd = UserCommand {
            command: UserSubcommand::Register {
                username: "alice".to_string(),
            },
        };
        let err = cmd.run(&ctx.db, &ctx.alice, Some("other")).await.unwrap_err();
        assert_eq!(err.to_string(), "Username 'alice' is already taken");
        assert!(ctx.db.users().authenticate("alice", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn test_passwd() {
        let ctx = setup().await;
        let passwd = UserCommand {
            command: UserSubcommand::Passwd {
                new_password: Some("pw9".to_string()),
            },
        };

        let err = passwd
            .run(&ctx.db, &ctx.alice, Some("wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password");
        assert!(ctx.db.users().authenticate("alice", "pw1").await.unwrap());

        passwd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();
        assert!(ctx.db.users().authenticate("alice", "pw9").await.unwrap());
        assert!(!ctx.db.users().authenticate("alice", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn test_forced_delete_removes_events() {
        let ctx = setup().await;

        let cmd = UserCommand {
            command: UserSubcommand::Delete { force: true },
        };
        cmd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();

        assert!(!ctx.db.users().exists("alice").await.unwrap());
        assert!(ctx.db.events().get_by_id(ctx.event.id).await.unwrap().is_none());
        assert!(ctx.db.users().exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_requires_configured_user() {
        let ctx = setup().await;
        let nobody = config_for(ctx.db.path().to_path_buf(), None);

        let cmd = UserCommand {
            command: UserSubcommand::Login,
        };
        cmd.run(&ctx.db, &ctx.alice, Some("pw1")).await.unwrap();
        assert!(cmd.run(&ctx.db, &nobody, Some("pw1")).await.is_err());
    }
}
