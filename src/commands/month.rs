use anyhow::Result;

use crate::context::Context;
use crate::render::render_month;

pub async fn run(month: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;
    let month = ctx.month(month)?;
    let board = ctx.board(month).await?;

    let grid = board.month_grid(ctx.today());
    let buckets = board.by_day();

    println!("{}", render_month(&grid, |date| buckets.on(date).len()));

    if !buckets.undated.is_empty() {
        println!();
        println!("{} posts without a usable date", buckets.undated.len());
    }

    Ok(())
}
