use anyhow::Result;
use owo_colors::OwoColorize;
use plancal_core::model::Task;
use plancal_core::store::Table;

use super::parse_date;
use crate::context::Context;

pub async fn run(name: &str, due: Option<&str>, priority: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;

    if name.trim().is_empty() {
        anyhow::bail!("A task needs a name");
    }

    let due = due.map(parse_date).transpose()?;
    let mut task = Task::new(name, due);
    if let Some(priority) = priority {
        task.priority = priority.parse()?;
    }

    let task = ctx.tasks()?.upsert(task).await?;

    let due = task.due_date.as_deref().unwrap_or("no due date");
    println!("{} {} {} ({})", "+".green(), task.name, due.dimmed(), task.id.dimmed());
    Ok(())
}
