use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use plancal_core::YearMonth;
use plancal_core::local_date::date_key;
use plancal_core::model::Post;
use plancal_core::store::{DirTable, Table};

use crate::context::Context;

pub async fn run(id: &str) -> Result<()> {
    let ctx = Context::load()?;

    let posts: DirTable<Post> = DirTable::open(&ctx.data_path())?;
    let post = posts
        .get(id)
        .await?
        .with_context(|| format!("Post '{}' not found", id))?;

    let month = date_key(&post.planned_date)
        .map(YearMonth::of)
        .unwrap_or_else(|| YearMonth::of(ctx.today()));
    let mut board = ctx.board(month).await?;
    board.delete_post(id).await?;

    println!("{} {} ({})", "-".red(), post.title, id.dimmed());
    Ok(())
}
