pub mod add;
pub mod agenda;
pub mod config;
pub mod delete;
pub mod edit;
pub mod meeting;
pub mod month;
pub mod platforms;
pub mod sheet;
pub mod task;

use anyhow::Result;
use chrono::NaiveDate;
use plancal_core::local_date::parse_local_date;
use plancal_core::model::Platform;

use crate::context::DirBoard;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    Ok(parse_local_date(s)?)
}

pub fn parse_platforms(names: &[String]) -> Result<Vec<Platform>> {
    names
        .iter()
        .map(|n| n.parse::<Platform>().map_err(anyhow::Error::from))
        .collect()
}

/// The post a `--post`-less command on `date` addresses: the only post of
/// the day, or none for an empty day.
pub fn resolve_post(board: &DirBoard, date: NaiveDate, post: Option<&str>) -> Result<Option<String>> {
    if let Some(id) = post {
        let Some(found) = board.post(id) else {
            anyhow::bail!("Post '{}' not found", id);
        };
        if found.planned_date != plancal_core::local_date::format_local_date(date) {
            anyhow::bail!("Post '{}' is planned for {}, not {}", id, found.planned_date, date);
        }
        return Ok(Some(id.to_string()));
    }

    let buckets = board.by_day();
    match buckets.on(date) {
        [] => Ok(None),
        [only] => Ok(Some(only.id.clone())),
        several => {
            let ids: Vec<String> = several
                .iter()
                .map(|p| format!("  {}  {}", p.id, p.title))
                .collect();
            anyhow::bail!(
                "{} has {} posts; pick one with --post:\n{}",
                date,
                several.len(),
                ids.join("\n")
            );
        }
    }
}
