use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TaskStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub name: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            due_date,
            status: TaskStatus::default(),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update of a task. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.due_date.is_none() && self.status.is_none()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.status {
            TaskStatus::Done => "x",
            TaskStatus::InProgress => "~",
            TaskStatus::Pending => " ",
        };
        write!(
            f,
            "[{}] {} (due {}, {})",
            mark, self.name, self.due_date, self.status
        )
    }
}
