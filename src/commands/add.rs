use anyhow::Result;
use plancal_core::YearMonth;
use plancal_core::model::{Post, PostField};

use super::{parse_date, parse_platforms};
use crate::context::Context;
use crate::render::Render;

pub async fn run(title: &str, date: &str, time: Option<&str>, platforms: &[String]) -> Result<()> {
    let ctx = Context::load()?;
    let date = parse_date(date)?;
    let platforms = parse_platforms(platforms)?;

    let mut post = Post::new(&ctx.config.company, title, date);
    post.status = ctx.config.default_status;
    post.content_type = ctx.config.default_content_type;
    post.created_by = ctx.config.user.clone();
    if let Some(time) = time {
        post.set_field(PostField::Time, time)?;
    }

    let mut board = ctx.board(YearMonth::of(date)).await?;
    let outcome = board.add_post(post, &platforms).await?;

    println!("{}", outcome.render());
    Ok(())
}
