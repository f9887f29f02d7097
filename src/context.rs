//! Loaded configuration plus the tables it points at.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use plancal_core::config::PlanCalConfig;
use plancal_core::local_date;
use plancal_core::model::{Attendee, Meeting, Post, PostTarget, Task};
use plancal_core::store::DirTable;
use plancal_core::{Board, YearMonth};

pub type DirBoard = Board<DirTable<Post>, DirTable<PostTarget>>;

pub struct Context {
    pub config: PlanCalConfig,
    pub tz: Tz,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = PlanCalConfig::load()?;
        let tz = match config.timezone()? {
            Some(tz) => tz,
            None => host_timezone(),
        };
        log::debug!("Using time zone {}", tz);
        Ok(Context { config, tz })
    }

    pub fn data_path(&self) -> PathBuf {
        self.config.data_path()
    }

    pub fn today(&self) -> NaiveDate {
        local_date::today(self.tz)
    }

    /// `--month` if given, else the month of today.
    pub fn month(&self, arg: Option<&str>) -> Result<YearMonth> {
        match arg {
            Some(m) => Ok(m.parse()?),
            None => Ok(YearMonth::of(self.today())),
        }
    }

    fn table<R: plancal_core::store::Record>(&self) -> Result<DirTable<R>> {
        let path = self.data_path();
        DirTable::open(&path).with_context(|| format!("Could not open {} in {}", R::TABLE, path.display()))
    }

    /// A board over the post tables, loaded for `month`.
    pub async fn board(&self, month: YearMonth) -> Result<DirBoard> {
        let mut board = Board::new(
            self.table()?,
            self.table()?,
            self.config.post_defaults(),
            self.config.week_start,
            month,
        );
        board.load(month).await?;
        Ok(board)
    }

    pub fn meetings(&self) -> Result<DirTable<Meeting>> {
        self.table()
    }

    pub fn attendees(&self) -> Result<DirTable<Attendee>> {
        self.table()
    }

    pub fn tasks(&self) -> Result<DirTable<Task>> {
        self.table()
    }
}

fn host_timezone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}
