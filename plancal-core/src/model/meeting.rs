//! Meetings with agendas, notes and attendees.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bucket::Dated;
use crate::local_date::{date_key, format_local_date};
use crate::store::Record;

string_enum!(
    MeetingStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

impl Default for MeetingStatus {
    fn default() -> Self {
        MeetingStatus::Scheduled
    }
}

string_enum!(
    ResponseStatus {
        Pending => "pending",
        Accepted => "accepted",
        Declined => "declined",
        Tentative => "tentative",
    }
);

impl Default for ResponseStatus {
    fn default() -> Self {
        ResponseStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub project_id: Option<String>,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub agenda: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: MeetingStatus,
    /// Starred in the meeting calendar
    #[serde(default)]
    pub important: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Meeting {
    pub fn new(title: &str, date: NaiveDate) -> Self {
        Meeting {
            id: String::new(),
            project_id: None,
            title: title.trim().to_string(),
            date: format_local_date(date),
            time: None,
            duration_minutes: None,
            location: None,
            agenda: Vec::new(),
            notes: None,
            status: MeetingStatus::default(),
            important: false,
            created_by: None,
        }
    }
}

impl Record for Meeting {
    const TABLE: &'static str = "meetings";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Dated for Meeting {
    fn date_key(&self) -> Option<NaiveDate> {
        date_key(&self.date)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn is_important(&self) -> bool {
        self.important
    }
}

/// One person invited to a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: String,
    pub meeting_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub response: ResponseStatus,
}

impl Attendee {
    pub fn invite(meeting_id: &str, email: &str) -> Self {
        Attendee {
            id: String::new(),
            meeting_id: meeting_id.to_string(),
            name: None,
            email: email.trim().to_string(),
            response: ResponseStatus::default(),
        }
    }
}

impl Record for Attendee {
    const TABLE: &'static str = "meeting_attendees";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.meeting_id)
    }

    fn label(&self) -> &str {
        &self.email
    }
}
