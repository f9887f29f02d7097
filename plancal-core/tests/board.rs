use chrono::NaiveDate;

use plancal_core::edit::{CellId, EditEvent, Key, PlatformEvent, PostDefaults, RowId};
use plancal_core::model::{Platform, Post, PostField, PostTarget};
use plancal_core::store::{DirTable, MemoryTable, Table};
use plancal_core::{Board, CommitOutcome, PlanCalError, WeekStart, YearMonth};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn february() -> YearMonth {
    YearMonth::new(2024, 2).unwrap()
}

#[tokio::test]
async fn load_edit_commit_updates_cache_without_reload() {
    init_logs();
    let posts: MemoryTable<Post> = MemoryTable::new();
    let targets: MemoryTable<PostTarget> = MemoryTable::new();

    let seeded = posts.upsert(Post::new("acme", "Valentine teaser", date(2, 14))).await.unwrap();
    targets
        .upsert(PostTarget::planned(&seeded.id, Platform::Instagram))
        .await
        .unwrap();

    let mut board = Board::new(posts, targets, PostDefaults::default(), WeekStart::Sunday, february());
    board.load(february()).await.unwrap();

    let row = board
        .sheet()
        .into_iter()
        .find(|r| r.post_id() == Some(seeded.id.as_str()))
        .map(|r| (r.cell(PostField::Title), r.value(PostField::Title)))
        .unwrap();

    board
        .edit(EditEvent::Click {
            cell: row.0.clone(),
            current: row.1,
        })
        .await
        .unwrap();
    board
        .edit(EditEvent::Input("Valentine reveal".into()))
        .await
        .unwrap();
    let outcome = board
        .edit(EditEvent::Key(Key::Enter { shift: false }))
        .await
        .unwrap();

    assert!(matches!(outcome, Some(CommitOutcome::Updated(_))));
    assert_eq!(board.post(&seeded.id).unwrap().title, "Valentine reveal");
    assert_eq!(board.platforms_of(&seeded.id), vec![Platform::Instagram]);

    // The store saw the same write.
    let stored = board.posts_table().get(&seeded.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Valentine reveal");
}

#[tokio::test]
async fn month_grid_and_buckets_agree() {
    init_logs();
    let posts: MemoryTable<Post> = MemoryTable::new();
    let mut urgent = Post::new("acme", "zz launch", date(2, 29));
    urgent.priority = "urgent".parse().unwrap();
    posts.upsert(Post::new("acme", "Leap day", date(2, 29))).await.unwrap();
    posts.upsert(urgent).await.unwrap();

    let mut board = Board::new(
        posts,
        MemoryTable::new(),
        PostDefaults::default(),
        WeekStart::Sunday,
        february(),
    );
    board.load(february()).await.unwrap();

    let grid = board.month_grid(date(2, 29));
    assert_eq!(grid.cells.len(), 42);
    assert_eq!(grid.start_offset, 4);
    assert_eq!(grid.cells.iter().filter(|c| c.is_current_month).count(), 29);
    assert!(grid.cells.iter().find(|c| c.is_today).is_some_and(|c| c.date == date(2, 29)));

    let buckets = board.by_day();
    let titles: Vec<&str> = buckets.on(date(2, 29)).iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["zz launch", "Leap day"]);
}

#[tokio::test]
async fn escape_never_writes() {
    init_logs();
    let mut board = Board::new(
        MemoryTable::<Post>::new(),
        MemoryTable::<PostTarget>::new(),
        PostDefaults::default(),
        WeekStart::Sunday,
        february(),
    );
    let cell = CellId::new(date(2, 5), None, PostField::Title);

    board
        .edit(EditEvent::Click {
            cell,
            current: String::new(),
        })
        .await
        .unwrap();
    board.edit(EditEvent::Input("never saved".into())).await.unwrap();
    let outcome = board.edit(EditEvent::Key(Key::Escape)).await.unwrap();

    assert!(outcome.is_none());
    assert!(board.posts_table().is_empty().await);
}

#[tokio::test]
async fn store_failure_surfaces_and_leaves_editor_idle() {
    init_logs();
    let mut board = Board::new(
        MemoryTable::<Post>::new(),
        MemoryTable::<PostTarget>::new(),
        PostDefaults::default(),
        WeekStart::Sunday,
        february(),
    );
    board.posts_table().fail_next(1).await;

    let cell = CellId::new(date(2, 6), None, PostField::Title);
    board
        .edit(EditEvent::Click {
            cell,
            current: String::new(),
        })
        .await
        .unwrap();
    board.edit(EditEvent::Input("Retry me".into())).await.unwrap();
    let result = board.edit(EditEvent::Blur).await;

    assert!(matches!(result, Err(PlanCalError::Store(_))));
    assert!(board.editor().editing().is_none());
    assert!(!board.editor().is_committing());
    assert!(board.posts_table().is_empty().await);
}

#[tokio::test]
async fn dir_tables_persist_across_boards() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();

    let mut board = Board::new(
        DirTable::<Post>::open(dir.path()).unwrap(),
        DirTable::<PostTarget>::open(dir.path()).unwrap(),
        PostDefaults::default(),
        WeekStart::Monday,
        february(),
    );

    board
        .pick(PlatformEvent::Open {
            row: RowId::new(date(2, 20), None),
            current: Vec::new(),
        })
        .await
        .unwrap();
    board.pick(PlatformEvent::Toggle(Platform::Linkedin)).await.unwrap();
    let outcome = board.pick(PlatformEvent::Save).await.unwrap();
    let post = match outcome {
        Some(CommitOutcome::Created { post, .. }) => post,
        other => panic!("expected a create, got {:?}", other),
    };

    let mut reopened = Board::new(
        DirTable::<Post>::open(dir.path()).unwrap(),
        DirTable::<PostTarget>::open(dir.path()).unwrap(),
        PostDefaults::default(),
        WeekStart::Monday,
        february(),
    );
    reopened.load(february()).await.unwrap();

    assert_eq!(reopened.post(&post.id).map(|p| p.planned_date.as_str()), Some("2024-02-20"));
    assert_eq!(reopened.platforms_of(&post.id), vec![Platform::Linkedin]);
}

fn dir_board(dir: &std::path::Path) -> Board<DirTable<Post>, DirTable<PostTarget>> {
    Board::new(
        DirTable::open(dir).unwrap(),
        DirTable::open(dir).unwrap(),
        PostDefaults::default(),
        WeekStart::Sunday,
        february(),
    )
}

async fn set_cell(board: &mut Board<DirTable<Post>, DirTable<PostTarget>>, post_id: &str, field: PostField, text: &str) {
    let post = board.post(post_id).unwrap();
    let cell = CellId::new(date(2, 14), Some(post_id), field);
    let current = post.field_value(field);

    board.edit(EditEvent::Click { cell, current }).await.unwrap();
    board.edit(EditEvent::Input(text.into())).await.unwrap();
    let outcome = board.edit(EditEvent::Blur).await.unwrap();
    assert!(matches!(outcome, Some(CommitOutcome::Updated(_))));
}

#[tokio::test]
async fn edits_from_two_boards_keep_each_others_fields() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();

    let seeded = DirTable::<Post>::open(dir.path())
        .unwrap()
        .upsert(Post::new("acme", "Valentine teaser", date(2, 14)))
        .await
        .unwrap();

    let mut first = dir_board(dir.path());
    let mut second = dir_board(dir.path());
    first.load(february()).await.unwrap();
    second.load(february()).await.unwrap();

    set_cell(&mut second, &seeded.id, PostField::Hashtags, "#love").await;
    // The first board still caches the post without hashtags
    set_cell(&mut first, &seeded.id, PostField::Title, "Reveal").await;

    let stored = first.posts_table().get(&seeded.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Reveal");
    assert_eq!(stored.hashtags.as_deref(), Some("#love"));
    assert_eq!(first.post(&seeded.id).unwrap().hashtags.as_deref(), Some("#love"));
}
