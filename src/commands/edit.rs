use anyhow::Result;
use plancal_core::YearMonth;
use plancal_core::edit::{CellId, EditEvent, Key};
use plancal_core::model::PostField;

use super::{parse_date, resolve_post};
use crate::context::Context;
use crate::render::Render;

/// Click the cell, type `value`, press Enter.
pub async fn run(date: &str, field: &str, value: &str, post: Option<&str>) -> Result<()> {
    let ctx = Context::load()?;
    let date = parse_date(date)?;
    let field: PostField = field.parse()?;

    let mut board = ctx.board(YearMonth::of(date)).await?;
    let post_id = resolve_post(&board, date, post)?;

    let current = post_id
        .as_deref()
        .and_then(|id| board.post(id))
        .map(|p| p.field_value(field))
        .unwrap_or_default();
    let cell = CellId::new(date, post_id.as_deref(), field);

    board.edit(EditEvent::Click { cell, current }).await?;
    board.edit(EditEvent::Input(value.to_string())).await?;
    let outcome = board.edit(EditEvent::Key(Key::Enter { shift: false })).await?;

    match outcome {
        Some(outcome) => println!("{}", outcome.render()),
        None => println!("Nothing to save"),
    }
    Ok(())
}
