use serde::{Deserialize, Serialize};
use std::fmt;

use super::GuestStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub contact: String,
    pub status: GuestStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGuest {
    pub name: String,
    pub contact: String,
    pub status: GuestStatus,
}

impl NewGuest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: String::new(),
            status: GuestStatus::default(),
        }
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_status(mut self, status: GuestStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of a guest. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub status: Option<GuestStatus>,
}

impl GuestUpdate {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_status(mut self, status: GuestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && self.status.is_none()
    }
}

impl fmt::Display for Guest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.status)?;
        if !self.contact.is_empty() {
            write!(f, " <{}>", self.contact)?;
        }
        Ok(())
    }
}

/// Per-status guest counts for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuestTally {
    pub invited: i64,
    pub confirmed: i64,
    pub declined: i64,
}

impl GuestTally {
    pub fn total(&self) -> i64 {
        self.invited + self.confirmed + self.declined
    }
}

impl fmt::Display for GuestTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} confirmed, {} invited, {} declined",
            self.confirmed, self.invited, self.declined
        )
    }
}
