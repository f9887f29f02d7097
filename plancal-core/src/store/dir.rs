//! Directory-backed table: one JSON file per row.
//!
//! Files are named `<date>__<slug>__<id>.json` (`undated` for rows without a
//! date) so a directory listing reads like the calendar.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Patch, Record, Table, in_range, new_id};
use crate::date_range::DateRange;
use crate::error::{PlanCalError, PlanCalResult};

const UNDATED: &str = "undated";
const MAX_SLUG_LEN: usize = 50;

pub struct DirTable<R: Record> {
    dir: PathBuf,
    _marker: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> DirTable<R> {
    /// Table stored under `data_dir/<table name>`.
    pub fn open(data_dir: &Path) -> PlanCalResult<Self> {
        let dir = data_dir.join(R::TABLE);
        std::fs::create_dir_all(&dir)?;
        Ok(DirTable {
            dir,
            _marker: std::marker::PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn filename_for(row: &R) -> String {
        let date = row
            .date()
            .and_then(crate::local_date::date_key)
            .map(crate::local_date::format_local_date)
            .unwrap_or_else(|| UNDATED.to_string());

        let mut slug = slug::slugify(row.label());
        slug.truncate(MAX_SLUG_LEN);
        if slug.is_empty() {
            slug = R::TABLE.to_string();
        }

        format!("{}__{}__{}.json", date, slug, row.id())
    }

    fn row_files(&self) -> PlanCalResult<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn file_for_id(&self, id: &str) -> PlanCalResult<Option<PathBuf>> {
        let suffix = format!("__{}.json", id);
        Ok(self.row_files()?.into_iter().find(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&suffix))
        }))
    }

    fn read(path: &Path) -> Option<R> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping unreadable row {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(row) => Some(row),
            Err(e) => {
                log::warn!("Skipping malformed row {}: {}", path.display(), e);
                None
            }
        }
    }

    fn rows(&self) -> PlanCalResult<Vec<R>> {
        Ok(self.row_files()?.iter().filter_map(|p| Self::read(p)).collect())
    }
}

#[async_trait]
impl<R: Record> Table<R> for DirTable<R> {
    async fn list_in_range(&self, range: &DateRange) -> PlanCalResult<Vec<R>> {
        Ok(self.rows()?.into_iter().filter(|r| in_range(r, range)).collect())
    }

    async fn list_children(&self, parent_id: &str) -> PlanCalResult<Vec<R>> {
        Ok(self
            .rows()?
            .into_iter()
            .filter(|r| r.parent_id() == Some(parent_id))
            .collect())
    }

    async fn get(&self, id: &str) -> PlanCalResult<Option<R>> {
        Ok(self.file_for_id(id)?.and_then(|p| Self::read(&p)))
    }

    async fn upsert(&self, mut row: R) -> PlanCalResult<R> {
        if row.id().is_empty() {
            row.set_id(new_id());
        }

        let previous = self.file_for_id(row.id())?;
        let path = self.dir.join(Self::filename_for(&row));
        let temp = path.with_extension("json.tmp");

        std::fs::write(&temp, serde_json::to_string_pretty(&row)?)?;
        std::fs::rename(&temp, &path)?;

        // A changed date or title renames the file
        if let Some(old) = previous.filter(|old| *old != path) {
            std::fs::remove_file(&old)?;
        }

        log::debug!("Wrote {} row {}", R::TABLE, path.display());
        Ok(row)
    }

    async fn patch(&self, id: &str, change: Patch<R>) -> PlanCalResult<R> {
        let mut row = self.get(id).await?.ok_or_else(|| PlanCalError::NotFound {
            table: R::TABLE,
            id: id.to_string(),
        })?;
        change(&mut row)?;
        self.upsert(row).await
    }

    async fn delete(&self, id: &str) -> PlanCalResult<()> {
        if let Some(path) = self.file_for_id(id)? {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Post, PostField};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let stored = {
            let table = DirTable::open(tmp.path()).unwrap();
            table.upsert(Post::new("acme", "Valentine's promo!", day(14))).await.unwrap()
        };

        let table: DirTable<Post> = DirTable::open(tmp.path()).unwrap();
        let fetched = table.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);

        let name = table.file_for_id(&stored.id).unwrap().unwrap();
        let name = name.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("2024-02-14__valentine-s-promo__"), "{name}");
    }

    #[tokio::test]
    async fn moving_a_row_renames_its_file() {
        let tmp = tempfile::tempdir().unwrap();
        let table = DirTable::open(tmp.path()).unwrap();
        let mut post = table.upsert(Post::new("acme", "Teaser", day(1))).await.unwrap();

        post.planned_date = "2024-02-09".into();
        post.set_field(PostField::Title, "Teaser final").unwrap();
        table.upsert(post.clone()).await.unwrap();

        assert_eq!(table.row_files().unwrap().len(), 1);
        let in_range = table
            .list_in_range(&DateRange::new(day(5), day(10)))
            .await
            .unwrap();
        assert_eq!(in_range, vec![post.clone()]);

        table.delete(&post.id).await.unwrap();
        assert!(table.row_files().unwrap().is_empty());
    }

    #[tokio::test]
    async fn patch_reads_the_file_not_the_caller() {
        let tmp = tempfile::tempdir().unwrap();
        let table = DirTable::open(tmp.path()).unwrap();
        let stale = table.upsert(Post::new("acme", "Teaser", day(1))).await.unwrap();

        let mut fresh = stale.clone();
        fresh.owner_name = Some("Ana".into());
        table.upsert(fresh).await.unwrap();

        let patched = table
            .patch(&stale.id, Box::new(|p: &mut Post| p.set_field(PostField::Date, "2024-02-11")))
            .await
            .unwrap();
        assert_eq!(patched.owner_name.as_deref(), Some("Ana"));

        let files = table.row_files().unwrap();
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("2024-02-11__teaser__"), "{name}");

        let missing = table.patch("nope", Box::new(|_: &mut Post| Ok::<(), PlanCalError>(()))).await.unwrap_err();
        assert!(matches!(missing, PlanCalError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unreadable_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let table = DirTable::open(tmp.path()).unwrap();
        let kept = table.upsert(Post::new("acme", "Teaser", day(1))).await.unwrap();

        std::fs::write(table.path().join("2024-02-02__broken__x.json"), "{ not json").unwrap();
        // A directory can't be read as a file
        std::fs::create_dir(table.path().join("2024-02-03__dir__y.json")).unwrap();

        let rows = table.list_in_range(&DateRange::new(day(1), day(5))).await.unwrap();
        assert_eq!(rows, vec![kept]);
    }
}
