use anyhow::Result;
use owo_colors::OwoColorize;
use plancal_core::agenda::Agenda;

use crate::context::Context;
use crate::render::Render;

pub async fn run(month: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;
    let month = ctx.month(month)?;

    let agenda = Agenda::load(&ctx.meetings()?, &ctx.tasks()?, month, ctx.config.week_start).await?;

    println!("{}", month.label().bold());

    if agenda.is_empty() {
        println!("   {}", "Nothing planned".dimmed());
        return Ok(());
    }

    let today = ctx.today();
    for day in agenda.busy_days() {
        let heading = day.format("%a %d %b").to_string();
        if day == today {
            println!("{}", heading.reversed());
        } else {
            println!("{}", heading.bold());
        }

        for meeting in agenda.meetings.on(day) {
            println!("   {}", meeting.render());
        }
        for task in agenda.tasks.on(day) {
            println!("   {}", task.render());
        }
    }

    let undated = agenda.meetings.undated.len() + agenda.tasks.undated.len();
    if undated > 0 {
        println!();
        println!("{} rows without a usable date", undated);
    }

    Ok(())
}
