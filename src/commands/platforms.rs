use anyhow::Result;
use plancal_core::YearMonth;
use plancal_core::edit::{PlatformEvent, RowId};

use super::{parse_date, parse_platforms, resolve_post};
use crate::context::Context;
use crate::render::Render;

/// Open the picker, toggle until the selection matches, save.
pub async fn run(date: &str, platforms: &[String], post: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;
    let date = parse_date(date)?;
    let wanted = parse_platforms(platforms)?;

    let mut board = ctx.board(YearMonth::of(date)).await?;
    let post_id = resolve_post(&board, date, post)?;
    let current = post_id
        .as_deref()
        .map(|id| board.platforms_of(id))
        .unwrap_or_default();

    let toggles: Vec<_> = current
        .iter()
        .filter(|p| !wanted.contains(p))
        .chain(wanted.iter().filter(|p| !current.contains(p)))
        .copied()
        .collect();

    board
        .pick(PlatformEvent::Open {
            row: RowId::new(date, post_id.as_deref()),
            current,
        })
        .await?;
    for platform in toggles {
        board.pick(PlatformEvent::Toggle(platform)).await?;
    }

    match board.pick(PlatformEvent::Save).await? {
        Some(outcome) => println!("{}", outcome.render()),
        None => println!("Nothing to save"),
    }
    Ok(())
}
