//! Terminal rendering for plancal types.
//!
//! Extension traits that add colored output to plancal-core types using
//! owo_colors.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use plancal_core::CommitOutcome;
use plancal_core::grid::{DayCell, MonthGrid};
use plancal_core::model::{Meeting, Platform, Post, PostStatus, Priority, Task, TaskStatus};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for PostStatus {
    fn render(&self) -> String {
        let text = self.as_str();
        match self {
            PostStatus::Idea | PostStatus::Draft => text.dimmed().to_string(),
            PostStatus::Design | PostStatus::Review => text.yellow().to_string(),
            PostStatus::Approved | PostStatus::Scheduled => text.cyan().to_string(),
            PostStatus::Published | PostStatus::Reported => text.green().to_string(),
        }
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::Urgent => "!!".red().bold().to_string(),
            Priority::High => "! ".yellow().to_string(),
            _ => "  ".to_string(),
        }
    }
}

impl Render for Post {
    fn render(&self) -> String {
        let time = self.planned_time.as_deref().unwrap_or("");
        format!(
            "{} {} {} {}",
            self.priority.render(),
            self.title.bold(),
            self.status.render(),
            time.dimmed()
        )
    }
}

impl Render for Meeting {
    fn render(&self) -> String {
        let star = if self.important { "*".yellow().to_string() } else { " ".to_string() };
        let time = self.time.as_deref().unwrap_or("all day");
        let mut line = format!("{} {} {}", star, self.title, time.dimmed());
        if let Some(location) = &self.location {
            line.push_str(&format!(" @ {}", location).dimmed().to_string());
        }
        line
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let name = match self.status {
            TaskStatus::Done => self.name.strikethrough().dimmed().to_string(),
            _ => self.name.clone(),
        };
        format!("{} {} {}", self.priority.render(), name, self.status.as_str().dimmed())
    }
}

pub fn render_platforms(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        return "-".dimmed().to_string();
    }
    platforms
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(",")
        .blue()
        .to_string()
}

impl Render for CommitOutcome {
    fn render(&self) -> String {
        match self {
            CommitOutcome::Unchanged => "No changes".dimmed().to_string(),
            CommitOutcome::Updated(post) => {
                format!("{} {} ({})", "~".yellow(), post.title, post.id.dimmed())
            }
            CommitOutcome::Created { post, targets } => {
                let platforms: Vec<Platform> = targets.iter().map(|t| t.platform).collect();
                format!(
                    "{} {} on {} [{}] ({})",
                    "+".green(),
                    post.title,
                    post.planned_date,
                    render_platforms(&platforms),
                    post.id.dimmed()
                )
            }
            CommitOutcome::Retargeted { post_id, targets } => {
                let mut platforms: Vec<Platform> = targets.iter().map(|t| t.platform).collect();
                platforms.sort();
                format!("{} [{}] ({})", "~".yellow(), render_platforms(&platforms), post_id.dimmed())
            }
        }
    }
}

/// Width of one month grid column.
const CELL_WIDTH: usize = 8;

fn render_cell(cell: &DayCell, count: usize) -> String {
    let day = format!("{:>2}", chrono::Datelike::day(&cell.date));
    let count = if count > 0 { format!("({})", count) } else { String::new() };
    let text = format!("{} {:<4}", day, count);
    let text = format!("{:<width$}", text, width = CELL_WIDTH);

    if cell.is_today {
        text.reversed().to_string()
    } else if !cell.is_current_month {
        text.dimmed().to_string()
    } else if !count.is_empty() {
        text.cyan().to_string()
    } else {
        text
    }
}

/// The month grid as rows of day numbers with post counts.
pub fn render_month(grid: &MonthGrid, count_on: impl Fn(NaiveDate) -> usize) -> String {
    let mut lines = Vec::new();
    lines.push(grid.month.label().bold().to_string());

    let header: Vec<String> = grid
        .week_start
        .day_names()
        .iter()
        .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
        .collect();
    lines.push(header.concat().dimmed().to_string());

    for row in grid.rows() {
        let cells: Vec<String> = row.iter().map(|c| render_cell(c, count_on(c.date))).collect();
        lines.push(cells.concat());
    }

    lines.join("\n")
}
