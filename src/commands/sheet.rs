use anyhow::Result;
use owo_colors::OwoColorize;
use plancal_core::model::PostField;

use crate::context::Context;
use crate::render::{Render, render_platforms};

pub async fn run(month: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;
    let month = ctx.month(month)?;
    let board = ctx.board(month).await?;

    println!("{}", month.label().bold());

    let mut current_week = 0;
    for row in board.sheet() {
        if row.week != current_week {
            current_week = row.week;
            println!();
            println!("{}", format!("Week {}", row.week).dimmed());
        }

        let day = row.date.format("%a %d").to_string();
        let day = if row.in_month {
            day
        } else {
            day.dimmed().to_string()
        };

        match row.post {
            Some(post) => println!(
                "  {}  {}  [{}]  {}  {}",
                day,
                post.render(),
                render_platforms(&row.platforms),
                row.value(PostField::Owner),
                post.id.dimmed()
            ),
            None => println!("  {}  {}", day, "-".dimmed()),
        }
    }

    Ok(())
}
