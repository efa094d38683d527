//! Helpers shared by the subcommands: credentials, ownership checks, prompts
//! and argument parsing.

use chrono::{NaiveDate, NaiveTime};
use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::db::{DbError, EventDatabase};
use crate::models::{Event, DATE_FORMAT, TIME_FORMAT};

const PASSWORD_ENV: &str = "EVENT_TRACKER_PASSWORD";

/// The configured user, or an error telling the caller how to set one.
pub fn configured_user(config: &Config) -> Result<String, Box<dyn Error>> {
    config.username.value.clone().ok_or_else(|| {
        "No user configured. Pass --user or set `username` in the config file.".into()
    })
}

/// Password from the `--password` flag, then the environment, then a hidden
/// prompt.
pub fn resolve_password(flag: Option<&str>, prompt: &str) -> io::Result<String> {
    if let Some(password) = flag {
        return Ok(password.to_string());
    }
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    rpassword::prompt_password(prompt)
}

/// Authenticate the configured user and return their username.
pub async fn login(
    db: &EventDatabase,
    config: &Config,
    password: Option<&str>,
) -> Result<String, Box<dyn Error>> {
    let username = configured_user(config)?;
    let password = resolve_password(password, "Password: ")?;

    if !db.users().authenticate(&username, &password).await? {
        return Err("Invalid username or password".into());
    }
    Ok(username)
}

/// Look up an event, treating events of other users as missing.
///
/// Storage failures are returned as errors, never as `None`.
pub async fn find_owned_event(
    db: &EventDatabase,
    username: &str,
    event_id: i64,
) -> Result<Option<Event>, DbError> {
    let event = db.events().get_by_id(event_id).await?;
    Ok(event.filter(|e| e.username == username))
}

/// Fetch an event owned by `username` or fail with "Event not found".
pub async fn owned_event(
    db: &EventDatabase,
    username: &str,
    event_id: i64,
) -> Result<Event, Box<dyn Error>> {
    find_owned_event(db, username, event_id)
        .await?
        .ok_or_else(|| format!("Event not found: {}", event_id).into())
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask a yes/no question; anything but `y` counts as no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    let answer = prompt_line(&format!("{} [y/N] ", prompt))?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| format!("Invalid time '{}'. Expected HH:MM", s))
}

/// Reject blank names before they reach the database.
pub fn non_empty(value: &str, what: &str) -> Result<String, Box<dyn Error>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", what).into());
    }
    Ok(trimmed.to_string())
}

/// Shorten `s` to at most `max` characters for table output.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
