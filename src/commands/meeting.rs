use anyhow::Result;
use owo_colors::OwoColorize;
use plancal_core::agenda::schedule_meeting;
use plancal_core::model::Meeting;

use super::parse_date;
use crate::context::Context;

pub struct MeetingArgs {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub duration: Option<u32>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub agenda: Vec<String>,
    pub important: bool,
}

pub async fn run(args: MeetingArgs) -> Result<()> {
    let ctx = Context::load()?;
    let date = parse_date(&args.date)?;

    if let Some(time) = &args.time {
        chrono::NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| anyhow::anyhow!("Invalid time '{}'. Expected HH:MM", time))?;
    }

    let mut meeting = Meeting::new(&args.title, date);
    meeting.time = args.time;
    meeting.duration_minutes = args.duration;
    meeting.location = args.location.filter(|l| !l.trim().is_empty());
    meeting.agenda = args.agenda;
    meeting.important = args.important;
    meeting.created_by = ctx.config.user.clone();

    let (meeting, invited) =
        schedule_meeting(&ctx.meetings()?, &ctx.attendees()?, meeting, &args.attendees).await?;

    println!(
        "{} {} on {} with {} attendees ({})",
        "+".green(),
        meeting.title,
        meeting.date,
        invited.len(),
        meeting.id.dimmed()
    );
    Ok(())
}
