//! The content calendar: posts and their platform targets for one month,
//! with the sheet editors wired to the store.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::bucket::{DayBuckets, DayOrder, bucket_by_day};
use crate::cache::RecordCache;
use crate::date_range::DateRange;
use crate::edit::{
    CellEditor, CellId, CommitPlan, CommitRequest, EditEvent, PlatformCommit, PlatformEditor,
    PlatformEvent, PlatformPlan, PostDefaults, RowId, plan_commit, plan_platforms,
};
use crate::error::{PlanCalError, PlanCalResult};
use crate::grid::{MonthGrid, WeekGrid};
use crate::model::{Platform, Post, PostField, PostTarget};
use crate::month::{WeekStart, YearMonth};
use crate::store::{Record, Table, write_children};

/// What a commit did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Unchanged,
    Updated(Post),
    Created { post: Post, targets: Vec<PostTarget> },
    Retargeted { post_id: String, targets: Vec<PostTarget> },
}

/// One line of the week sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetRow<'a> {
    /// 1-based week number in the grid
    pub week: usize,
    pub date: NaiveDate,
    pub in_month: bool,
    /// `None` for the placeholder row of a day without posts
    pub post: Option<&'a Post>,
    pub platforms: Vec<Platform>,
}

impl SheetRow<'_> {
    pub fn post_id(&self) -> Option<&str> {
        self.post.map(|p| p.id.as_str())
    }

    pub fn cell(&self, field: PostField) -> CellId {
        CellId::new(self.date, self.post_id(), field)
    }

    pub fn row_id(&self) -> RowId {
        RowId::new(self.date, self.post_id())
    }

    pub fn value(&self, field: PostField) -> String {
        self.post.map(|p| p.field_value(field)).unwrap_or_default()
    }
}

pub struct Board<P, T>
where
    P: Table<Post>,
    T: Table<PostTarget>,
{
    posts: P,
    targets: T,
    defaults: PostDefaults,
    week_start: WeekStart,
    month: YearMonth,
    cache: RecordCache<Post>,
    targets_by_post: HashMap<String, Vec<PostTarget>>,
    editor: CellEditor,
    picker: PlatformEditor,
}

impl<P, T> Board<P, T>
where
    P: Table<Post>,
    T: Table<PostTarget>,
{
    /// An empty board on `month`. Call [`Board::load`] to fill it.
    pub fn new(posts: P, targets: T, defaults: PostDefaults, week_start: WeekStart, month: YearMonth) -> Self {
        Board {
            posts,
            targets,
            defaults,
            week_start,
            month,
            cache: RecordCache::new(),
            targets_by_post: HashMap::new(),
            editor: CellEditor::new(),
            picker: PlatformEditor::new(),
        }
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn posts_table(&self) -> &P {
        &self.posts
    }

    pub fn targets_table(&self) -> &T {
        &self.targets
    }

    /// Every day either grid can show for `month`.
    pub fn span(&self, month: YearMonth) -> DateRange {
        let weeks = WeekGrid::build(month);
        let grid = MonthGrid::build(month, month.first_day(), self.week_start);

        let from = [weeks.first_date(), grid.first_date()].into_iter().flatten().min();
        let to = [weeks.last_date(), grid.last_date()].into_iter().flatten().max();

        DateRange { from, to }
    }

    /// Fetch the posts of `month` and their targets, replacing the cache.
    pub async fn load(&mut self, month: YearMonth) -> PlanCalResult<()> {
        let range = self.span(month);
        let posts = self.posts.list_in_range(&range).await?;

        let mut targets_by_post = HashMap::new();
        for post in &posts {
            let targets = self.targets.list_children(&post.id).await?;
            targets_by_post.insert(post.id.clone(), targets);
        }

        log::debug!("Loaded {} posts for {}", posts.len(), month);

        self.month = month;
        self.cache.replace_all(posts);
        self.targets_by_post = targets_by_post;
        Ok(())
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.cache.get(id)
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.cache.values()
    }

    pub fn targets_of(&self, post_id: &str) -> &[PostTarget] {
        self.targets_by_post
            .get(post_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn platforms_of(&self, post_id: &str) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.targets_of(post_id).iter().map(|t| t.platform).collect();
        platforms.sort();
        platforms
    }

    pub fn is_stale(&self, id: &str) -> bool {
        self.cache.is_stale(id)
    }

    /// Cached posts grouped by local day, important first.
    pub fn by_day(&self) -> DayBuckets<&Post> {
        let mut posts: Vec<&Post> = self.cache.values().collect();
        posts.sort_by(|a, b| a.id.cmp(&b.id));
        bucket_by_day(posts, DayOrder::ImportantFirst)
    }

    pub fn month_grid(&self, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(self.month, today, self.week_start)
    }

    pub fn week_grid(&self) -> WeekGrid {
        WeekGrid::build(self.month)
    }

    /// The sheet: one row per post per day, and one empty row for each day
    /// without posts.
    pub fn sheet(&self) -> Vec<SheetRow<'_>> {
        let buckets = self.by_day();
        let mut rows = Vec::new();

        for week in self.week_grid().weeks {
            for date in week.days {
                let in_month = self.month.contains(date);
                let posts = buckets.on(date);
                if posts.is_empty() {
                    rows.push(SheetRow {
                        week: week.number,
                        date,
                        in_month,
                        post: None,
                        platforms: Vec::new(),
                    });
                }
                for post in posts {
                    rows.push(SheetRow {
                        week: week.number,
                        date,
                        in_month,
                        post: Some(*post),
                        platforms: self.platforms_of(&post.id),
                    });
                }
            }
        }

        rows
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    pub fn picker(&self) -> &PlatformEditor {
        &self.picker
    }

    /// Feed a text-cell event. When it produces a commit, the write runs
    /// before this returns and the editor goes back to idle either way.
    pub async fn edit(&mut self, event: EditEvent) -> PlanCalResult<Option<CommitOutcome>> {
        let Some(request) = self.editor.handle(event) else {
            return Ok(None);
        };

        let result = self.commit_cell(&request).await;
        self.editor.finish();

        if let Err(e) = &result {
            log::error!("Could not save {} on {}: {}", request.cell.field, request.cell.date, e);
        }
        result.map(Some)
    }

    /// Feed a platform picker event, writing the selection on save.
    pub async fn pick(&mut self, event: PlatformEvent) -> PlanCalResult<Option<CommitOutcome>> {
        let Some(commit) = self.picker.handle(event) else {
            return Ok(None);
        };

        let result = self.commit_platforms(&commit).await;
        self.picker.finish();

        if let Err(e) = &result {
            log::error!("Could not save platforms on {}: {}", commit.row.date, e);
        }
        result.map(Some)
    }

    fn backing_post(&self, post_id: Option<&str>) -> PlanCalResult<Option<Post>> {
        match post_id {
            Some(id) => self
                .cache
                .get(id)
                .cloned()
                .map(Some)
                .ok_or_else(|| PlanCalError::NotFound {
                    table: Post::TABLE,
                    id: id.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn commit_cell(&mut self, request: &CommitRequest) -> PlanCalResult<CommitOutcome> {
        let existing = self.backing_post(request.cell.post_id.as_deref())?;

        match plan_commit(request, existing.as_ref(), &self.defaults)? {
            CommitPlan::Skip => Ok(CommitOutcome::Unchanged),
            CommitPlan::Patch { id, field, value } => {
                log::debug!("Patching {} of post {}", field, id);
                self.patch_post(&id, field, value).await.map(CommitOutcome::Updated)
            }
            CommitPlan::Create { post, platforms } => self.create(post, &platforms).await,
        }
    }

    async fn commit_platforms(&mut self, commit: &PlatformCommit) -> PlanCalResult<CommitOutcome> {
        let existing = self.backing_post(commit.row.post_id.as_deref())?;
        let current = existing
            .as_ref()
            .map(|p| self.targets_of(&p.id).to_vec())
            .unwrap_or_default();

        match plan_platforms(commit, existing.as_ref(), &current, &self.defaults)? {
            PlatformPlan::Skip => Ok(CommitOutcome::Unchanged),
            PlatformPlan::Create { post, platforms } => self.create(post, &platforms).await,
            PlatformPlan::Replace { post_id, remove, add } => {
                let total = remove.len() + add.len();
                for (done, id) in remove.iter().enumerate() {
                    if let Err(e) = self.targets.delete(id).await {
                        self.cache.invalidate(&post_id);
                        return Err(PlanCalError::PartialWrite {
                            table: PostTarget::TABLE,
                            written: done,
                            total,
                            source: Box::new(e),
                        });
                    }
                }

                let added = match write_children(&self.targets, add).await {
                    Ok(added) => added,
                    Err(PlanCalError::PartialWrite { written, source, .. }) => {
                        self.cache.invalidate(&post_id);
                        return Err(PlanCalError::PartialWrite {
                            table: PostTarget::TABLE,
                            written: remove.len() + written,
                            total,
                            source,
                        });
                    }
                    Err(e) => {
                        self.cache.invalidate(&post_id);
                        return Err(e);
                    }
                };

                let targets = self.targets_by_post.entry(post_id.clone()).or_default();
                targets.retain(|t| !remove.contains(&t.id));
                targets.extend(added);

                Ok(CommitOutcome::Retargeted {
                    post_id: post_id.clone(),
                    targets: targets.clone(),
                })
            }
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Upsert one post and update its cache entry. A failed write leaves the
    /// entry stale.
    async fn save_post(&mut self, post: Post) -> PlanCalResult<Post> {
        let id = post.id.clone();
        match self.posts.upsert(post).await {
            Ok(saved) => {
                self.cache.put(saved.clone());
                Ok(saved)
            }
            Err(e) => {
                self.cache.invalidate(&id);
                Err(e)
            }
        }
    }

    /// Set one column of the stored post and cache the row the store
    /// returns, so columns written elsewhere since the last load survive.
    async fn patch_post(&mut self, id: &str, field: PostField, value: String) -> PlanCalResult<Post> {
        let change = Box::new(move |post: &mut Post| post.set_field(field, &value));
        match self.posts.patch(id, change).await {
            Ok(saved) => {
                self.cache.put(saved.clone());
                Ok(saved)
            }
            Err(e) => {
                self.cache.invalidate(id);
                Err(e)
            }
        }
    }

    async fn create(&mut self, post: Post, platforms: &[Platform]) -> PlanCalResult<CommitOutcome> {
        let post = self.save_post(post).await?;
        log::debug!("Created post {} on {}", post.id, post.planned_date);

        let rows: Vec<PostTarget> = platforms
            .iter()
            .map(|p| PostTarget::planned(&post.id, *p))
            .collect();
        let targets = match write_children(&self.targets, rows).await {
            Ok(targets) => targets,
            Err(e) => {
                self.cache.invalidate(&post.id);
                return Err(e);
            }
        };

        self.targets_by_post.insert(post.id.clone(), targets.clone());
        Ok(CommitOutcome::Created { post, targets })
    }

    /// Create a post outside the sheet, with one planned target per
    /// platform. An empty platform list uses the default platform.
    pub async fn add_post(&mut self, mut post: Post, platforms: &[Platform]) -> PlanCalResult<CommitOutcome> {
        if post.title.trim().is_empty() {
            return Err(PlanCalError::Validation("A post needs a title".into()));
        }
        if post.company_id.is_empty() {
            post.company_id = self.defaults.company_id.clone();
        }

        let mut platforms = platforms.to_vec();
        if platforms.is_empty() {
            platforms.push(self.defaults.platform);
        }
        platforms.sort();
        platforms.dedup();

        self.create(post, &platforms).await
    }

    /// Delete a post's targets one by one, then the post.
    pub async fn delete_post(&mut self, id: &str) -> PlanCalResult<()> {
        let targets = self.targets.list_children(id).await?;
        let total = targets.len() + 1;

        for (done, target) in targets.iter().enumerate() {
            if let Err(e) = self.targets.delete(&target.id).await {
                self.cache.invalidate(id);
                log::error!("Could not delete target {} of post {}: {}", target.id, id, e);
                return Err(PlanCalError::PartialWrite {
                    table: PostTarget::TABLE,
                    written: done,
                    total,
                    source: Box::new(e),
                });
            }
        }

        if let Err(e) = self.posts.delete(id).await {
            self.cache.invalidate(id);
            return Err(e);
        }

        self.cache.remove(id);
        self.targets_by_post.remove(id);
        Ok(())
    }

    /// Re-read every stale post and its targets. Returns how many were
    /// refreshed.
    pub async fn refresh_stale(&mut self) -> PlanCalResult<usize> {
        let stale = self.cache.take_stale();
        let count = stale.len();

        for (i, id) in stale.iter().enumerate() {
            let fetched = match self.fetch(id).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    for id in &stale[i..] {
                        self.cache.invalidate(id);
                    }
                    return Err(e);
                }
            };

            match fetched {
                Some((post, targets)) => {
                    self.targets_by_post.insert(id.clone(), targets);
                    self.cache.put(post);
                }
                None => {
                    log::debug!("Post {} is gone from the store", id);
                    self.cache.remove(id);
                    self.targets_by_post.remove(id);
                }
            }
        }

        Ok(count)
    }

    async fn fetch(&self, id: &str) -> PlanCalResult<Option<(Post, Vec<PostTarget>)>> {
        let Some(post) = self.posts.get(id).await? else {
            return Ok(None);
        };
        let targets = self.targets.list_children(id).await?;
        Ok(Some((post, targets)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Key;
    use crate::store::MemoryTable;

    type TestBoard = Board<MemoryTable<Post>, MemoryTable<PostTarget>>;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn board() -> TestBoard {
        Board::new(
            MemoryTable::new(),
            MemoryTable::new(),
            PostDefaults::default(),
            WeekStart::Sunday,
            march(),
        )
    }

    async fn type_into(board: &mut TestBoard, cell: CellId, current: &str, text: &str) -> PlanCalResult<Option<CommitOutcome>> {
        board
            .edit(EditEvent::Click {
                cell,
                current: current.to_string(),
            })
            .await?;
        board.edit(EditEvent::Input(text.to_string())).await?;
        board.edit(EditEvent::Key(Key::Enter { shift: false })).await
    }

    // --- span ---

    #[test]
    fn span_covers_both_grids() {
        let board = board();
        let span = board.span(march());
        // Sunday-start month grid opens on Feb 25, the Monday sheet on Feb 26.
        assert_eq!(span.from, Some(date(2024, 2, 25)));
        assert_eq!(span.to, Some(date(2024, 4, 6)));
    }

    // --- sheet ---

    #[tokio::test]
    async fn sheet_has_a_row_per_post() {
        let mut board = board();
        board
            .add_post(Post::new("", "A", date(2024, 3, 5)), &[])
            .await
            .unwrap();
        board
            .add_post(Post::new("", "B", date(2024, 3, 5)), &[Platform::Instagram])
            .await
            .unwrap();

        let rows = board.sheet();
        let on_fifth: Vec<_> = rows.iter().filter(|r| r.date == date(2024, 3, 5)).collect();
        assert_eq!(on_fifth.len(), 2);
        assert_eq!(on_fifth[0].value(PostField::Title), "A");
        assert_eq!(on_fifth[0].platforms, vec![Platform::Facebook]);
        assert_eq!(on_fifth[1].platforms, vec![Platform::Instagram]);

        let on_sixth: Vec<_> = rows.iter().filter(|r| r.date == date(2024, 3, 6)).collect();
        assert_eq!(on_sixth.len(), 1);
        assert!(on_sixth[0].post.is_none());

        // 5 weeks of 7 days, one day holding two posts.
        assert_eq!(rows.len(), 36);
    }

    // --- editing ---

    #[tokio::test]
    async fn typing_into_empty_row_creates_post_with_default_target() {
        let mut board = board();
        let cell = CellId::new(date(2024, 3, 8), None, PostField::Title);

        let outcome = type_into(&mut board, cell, "", "Women's day").await.unwrap();
        let (post, targets) = match outcome {
            Some(CommitOutcome::Created { post, targets }) => (post, targets),
            other => panic!("expected a create, got {:?}", other),
        };

        assert_eq!(post.title, "Women's day");
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].platform, Platform::Facebook);
        assert_eq!(board.post(&post.id), Some(&post));
        assert_eq!(board.targets_table().len().await, 1);
        assert!(board.editor().editing().is_none());
    }

    #[tokio::test]
    async fn editing_a_post_patches_the_cache() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Draft", date(2024, 3, 2)), &[])
            .await
        else {
            panic!("create failed");
        };

        let cell = CellId::new(date(2024, 3, 2), Some(&post.id), PostField::Hashtags);
        type_into(&mut board, cell, "", "#march").await.unwrap();

        let cached = board.post(&post.id).unwrap();
        assert_eq!(cached.hashtags.as_deref(), Some("#march"));
        assert_eq!(cached.title, "Draft");
    }

    #[tokio::test]
    async fn failed_write_marks_stale_and_returns_to_idle() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Draft", date(2024, 3, 2)), &[])
            .await
        else {
            panic!("create failed");
        };

        board.posts_table().fail_next(1).await;
        let cell = CellId::new(date(2024, 3, 2), Some(&post.id), PostField::Title);
        let result = type_into(&mut board, cell, "Draft", "Final").await;

        assert!(matches!(result, Err(PlanCalError::Store(_))));
        assert!(board.is_stale(&post.id));
        assert!(board.editor().editing().is_none());
        assert!(!board.editor().is_committing());

        assert_eq!(board.refresh_stale().await.unwrap(), 1);
        assert!(!board.is_stale(&post.id));
        assert_eq!(board.post(&post.id).unwrap().title, "Draft");
    }

    #[tokio::test]
    async fn editing_the_date_moves_the_row() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Teaser", date(2024, 3, 2)), &[])
            .await
        else {
            panic!("create failed");
        };

        let cell = CellId::new(date(2024, 3, 2), Some(&post.id), PostField::Date);
        type_into(&mut board, cell, "2024-03-02", "2024-03-20").await.unwrap();

        let rows = board.sheet();
        let dates: Vec<NaiveDate> = rows
            .iter()
            .filter(|r| r.post_id() == Some(post.id.as_str()))
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec![date(2024, 3, 20)]);
        assert_eq!(board.platforms_of(&post.id), vec![Platform::Facebook]);
    }

    #[tokio::test]
    async fn clearing_the_title_writes_nothing() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Keep me", date(2024, 3, 2)), &[])
            .await
        else {
            panic!("create failed");
        };

        let cell = CellId::new(date(2024, 3, 2), Some(&post.id), PostField::Title);
        let result = type_into(&mut board, cell, "Keep me", " ").await;

        assert!(matches!(result, Err(PlanCalError::Validation(_))));
        assert!(board.editor().editing().is_none());
        assert_eq!(board.post(&post.id).unwrap().title, "Keep me");
        let stored = board.posts_table().get(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Keep me");
    }

    #[tokio::test]
    async fn unknown_post_cell_is_not_found() {
        let mut board = board();
        let cell = CellId::new(date(2024, 3, 2), Some("ghost"), PostField::Title);
        let result = type_into(&mut board, cell, "", "x").await;
        assert!(matches!(result, Err(PlanCalError::NotFound { .. })));
    }

    #[tokio::test]
    async fn target_failure_after_post_insert_is_partial() {
        let mut board = board();
        board.targets_table().fail_next(1).await;

        let result = board
            .add_post(Post::new("", "Promo", date(2024, 3, 9)), &[Platform::Facebook, Platform::Tiktok])
            .await;

        assert!(matches!(
            result,
            Err(PlanCalError::PartialWrite { written: 0, total: 2, .. })
        ));
        // The post itself was written and stays visible.
        assert_eq!(board.posts().count(), 1);
    }

    // --- platforms ---

    #[tokio::test]
    async fn picking_platforms_replaces_targets() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Promo", date(2024, 3, 9)), &[Platform::Facebook, Platform::Twitter])
            .await
        else {
            panic!("create failed");
        };

        let current = board.platforms_of(&post.id);
        board
            .pick(PlatformEvent::Open {
                row: RowId::new(date(2024, 3, 9), Some(&post.id)),
                current,
            })
            .await
            .unwrap();
        board.pick(PlatformEvent::Toggle(Platform::Twitter)).await.unwrap();
        board.pick(PlatformEvent::Toggle(Platform::Youtube)).await.unwrap();
        let outcome = board.pick(PlatformEvent::Save).await.unwrap();

        assert!(matches!(outcome, Some(CommitOutcome::Retargeted { .. })));
        assert_eq!(board.platforms_of(&post.id), vec![Platform::Facebook, Platform::Youtube]);
        assert_eq!(board.targets_table().len().await, 2);
    }

    // --- delete / load ---

    #[tokio::test]
    async fn delete_removes_post_and_targets() {
        let mut board = board();
        let Ok(CommitOutcome::Created { post, .. }) = board
            .add_post(Post::new("", "Gone", date(2024, 3, 9)), &[Platform::Facebook, Platform::Linkedin])
            .await
        else {
            panic!("create failed");
        };

        board.delete_post(&post.id).await.unwrap();
        assert!(board.post(&post.id).is_none());
        assert!(board.posts_table().is_empty().await);
        assert!(board.targets_table().is_empty().await);
    }

    #[tokio::test]
    async fn load_reads_only_the_visible_span() {
        let mut board = board();
        board.posts_table().upsert(Post::new("c", "in", date(2024, 3, 30))).await.unwrap();
        board.posts_table().upsert(Post::new("c", "overflow", date(2024, 4, 3))).await.unwrap();
        board.posts_table().upsert(Post::new("c", "far", date(2024, 5, 1))).await.unwrap();

        board.load(march()).await.unwrap();

        let mut titles: Vec<&str> = board.posts().map(|p| p.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["in", "overflow"]);
    }
}
