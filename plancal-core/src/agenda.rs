//! Meetings and tasks for one month.

use chrono::NaiveDate;

use crate::bucket::{DayBuckets, DayOrder, bucket_by_day};
use crate::date_range::DateRange;
use crate::error::{PlanCalError, PlanCalResult};
use crate::grid::MonthGrid;
use crate::model::{Attendee, Meeting, Task};
use crate::month::{WeekStart, YearMonth};
use crate::store::{Table, write_children};

/// Meetings and tasks bucketed by day, starred/important first.
pub struct Agenda {
    pub month: YearMonth,
    pub meetings: DayBuckets<Meeting>,
    pub tasks: DayBuckets<Task>,
}

impl Agenda {
    /// Load everything dated inside `month`'s grid.
    pub async fn load<M, T>(
        meetings: &M,
        tasks: &T,
        month: YearMonth,
        week_start: WeekStart,
    ) -> PlanCalResult<Self>
    where
        M: Table<Meeting> + ?Sized,
        T: Table<Task> + ?Sized,
    {
        let grid = MonthGrid::build(month, month.first_day(), week_start);
        let range = match (grid.first_date(), grid.last_date()) {
            (Some(from), Some(to)) => DateRange::new(from, to),
            _ => DateRange::month(month),
        };

        let meeting_rows = meetings.list_in_range(&range).await?;
        let task_rows = tasks.list_in_range(&range).await?;
        log::debug!(
            "Agenda for {}: {} meetings, {} tasks",
            month,
            meeting_rows.len(),
            task_rows.len()
        );

        Ok(Agenda {
            month,
            meetings: bucket_by_day(meeting_rows, DayOrder::ImportantFirst),
            tasks: bucket_by_day(task_rows, DayOrder::ImportantFirst),
        })
    }

    /// Days holding at least one meeting or task, in order.
    pub fn busy_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self
            .meetings
            .days()
            .map(|(d, _)| *d)
            .chain(self.tasks.days().map(|(d, _)| *d))
            .collect();
        days.sort();
        days.dedup();
        days
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty() && self.tasks.is_empty()
    }
}

/// Insert a meeting, then one attendee row per email, in sequence.
///
/// The meeting stays written if an attendee write fails; the error reports
/// how many attendees made it.
pub async fn schedule_meeting<M, A>(
    meetings: &M,
    attendees: &A,
    meeting: Meeting,
    emails: &[String],
) -> PlanCalResult<(Meeting, Vec<Attendee>)>
where
    M: Table<Meeting> + ?Sized,
    A: Table<Attendee> + ?Sized,
{
    if meeting.title.trim().is_empty() {
        return Err(PlanCalError::Validation("A meeting needs a title".into()));
    }

    let meeting = meetings.upsert(meeting).await?;
    let rows: Vec<Attendee> = emails
        .iter()
        .filter(|e| !e.trim().is_empty())
        .map(|e| Attendee::invite(&meeting.id, e))
        .collect();
    let invited = write_children(attendees, rows).await?;

    log::debug!("Scheduled meeting {} with {} attendees", meeting.id, invited.len());
    Ok((meeting, invited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use crate::store::MemoryTable;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[tokio::test]
    async fn agenda_orders_important_first() {
        let meetings: MemoryTable<Meeting> = MemoryTable::new();
        let tasks: MemoryTable<Task> = MemoryTable::new();

        let mut standup = Meeting::new("standup", date(2, 14));
        standup.important = false;
        let mut review = Meeting::new("Quarterly review", date(2, 14));
        review.important = true;
        meetings.upsert(standup).await.unwrap();
        meetings.upsert(review).await.unwrap();

        let mut urgent = Task::new("zebra copy", Some(date(2, 14)));
        urgent.priority = Priority::Urgent;
        let mut timed = Task::new("Alpha", None);
        timed.due_date = Some("2024-02-14T17:00:00".into());
        tasks.upsert(timed).await.unwrap();
        tasks.upsert(urgent).await.unwrap();

        let month = YearMonth::new(2024, 2).unwrap();
        let agenda = Agenda::load(&meetings, &tasks, month, WeekStart::Sunday).await.unwrap();

        let day_meetings: Vec<&str> = agenda.meetings.on(date(2, 14)).iter().map(|m| m.title.as_str()).collect();
        assert_eq!(day_meetings, vec!["Quarterly review", "standup"]);

        let day_tasks: Vec<&str> = agenda.tasks.on(date(2, 14)).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(day_tasks, vec!["zebra copy", "Alpha"]);

        assert_eq!(agenda.busy_days(), vec![date(2, 14)]);
    }

    #[tokio::test]
    async fn agenda_includes_grid_overflow_days() {
        let meetings: MemoryTable<Meeting> = MemoryTable::new();
        let tasks: MemoryTable<Task> = MemoryTable::new();
        // Feb 2024 starts on a Thursday, so the grid opens on Jan 28.
        meetings.upsert(Meeting::new("early", date(1, 28))).await.unwrap();
        meetings.upsert(Meeting::new("too early", date(1, 27))).await.unwrap();

        let month = YearMonth::new(2024, 2).unwrap();
        let agenda = Agenda::load(&meetings, &tasks, month, WeekStart::Sunday).await.unwrap();
        assert_eq!(agenda.busy_days(), vec![date(1, 28)]);
    }

    #[tokio::test]
    async fn schedule_writes_one_row_per_attendee() {
        let meetings: MemoryTable<Meeting> = MemoryTable::new();
        let attendees: MemoryTable<Attendee> = MemoryTable::new();
        let emails = vec!["a@example.com".to_string(), " ".to_string(), "b@example.com".to_string()];

        let (meeting, invited) = schedule_meeting(&meetings, &attendees, Meeting::new("Kickoff", date(3, 1)), &emails)
            .await
            .unwrap();

        assert!(!meeting.id.is_empty());
        assert_eq!(invited.len(), 2);
        assert!(invited.iter().all(|a| a.meeting_id == meeting.id));
        assert_eq!(attendees.list_children(&meeting.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn attendee_failure_keeps_meeting() {
        let meetings: MemoryTable<Meeting> = MemoryTable::new();
        let attendees: MemoryTable<Attendee> = MemoryTable::new();
        attendees.fail_next(1).await;

        let err = schedule_meeting(
            &meetings,
            &attendees,
            Meeting::new("Kickoff", date(3, 1)),
            &["a@example.com".to_string()],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PlanCalError::PartialWrite { written: 0, total: 1, .. }));
        assert_eq!(meetings.len().await, 1);
    }
}
