use chrono::{Duration, Utc};
use freerecall_core::{
    apply_score, upload_material, CardDraft, CoreError, Flashcard, Material, RecallEntry, Store,
    Topic, TopicSchedule,
};
use freerecall_sqlite::SqliteStore;
use pretty_assertions::assert_eq;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[tokio::test]
async fn material_upsert_keeps_created_at() {
    let store = SqliteStore::open_memory().await.unwrap();
    let topic = Topic::new("C++ basics");
    let t0 = Utc::now();
    store.upsert_material(&topic, "v1", t0).await.unwrap();
    let t1 = t0 + Duration::seconds(30);
    let m = store.upsert_material(&topic, "v2", t1).await.unwrap();

    assert_eq!(m.topic, topic);
    assert_eq!(m.content, "v2");
    assert_eq!(m.created_at, t0);
    assert_eq!(m.updated_at, t1);
}

#[tokio::test]
async fn missing_material_is_not_found() {
    let store = SqliteStore::open_memory().await.unwrap();
    let err = store.get_material(&Topic::new("nope")).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn due_topics_compare_by_time() {
    let store = SqliteStore::open_memory().await.unwrap();
    let now = Utc::now();

    let mut past = TopicSchedule::fresh(Topic::new("biology"), now);
    past.next_review = now - Duration::hours(2);
    let mut older = TopicSchedule::fresh(Topic::new("algebra"), now);
    older.next_review = now - Duration::days(3);
    let future = TopicSchedule::fresh(Topic::new("chemistry"), now);

    for s in [&past, &older, &future] {
        store.put_schedule(s).await.unwrap();
    }

    let due = store.due_topics(now).await.unwrap();
    assert_eq!(due, vec![Topic::new("algebra"), Topic::new("biology")]);

    let got = store.get_schedule(&Topic::new("chemistry")).await.unwrap();
    assert_eq!(got, future);
}

#[tokio::test]
async fn recall_requires_material_and_lists_newest_first() {
    let store = SqliteStore::open_memory().await.unwrap();
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    let schedule = TopicSchedule::fresh(topic.clone(), now);

    let orphan = RecallEntry::new(topic.clone(), "x", "y", 10, now);
    assert!(matches!(
        store.record_recall(&orphan, &[], &schedule).await.unwrap_err(),
        CoreError::NotFound(_)
    ));

    upload_material(
        &store,
        &Material {
            topic: topic.clone(),
            content: "content".into(),
        },
        now,
    )
    .await
    .unwrap();

    let first = RecallEntry::new(topic.clone(), "first", "ok", 40, now);
    let second = RecallEntry::new(topic.clone(), "second", "good", 85, now + Duration::minutes(1));
    store.record_recall(&first, &[], &schedule).await.unwrap();
    store.record_recall(&second, &[], &schedule).await.unwrap();

    let history = store.list_history(&topic).await.unwrap();
    assert_eq!(history, vec![second, first]);
}

#[tokio::test]
async fn flashcards_dedupe_on_front_and_back() {
    let store = SqliteStore::open_memory().await.unwrap();
    let now = Utc::now();
    let draft = |f: &str, b: &str| CardDraft {
        front: f.into(),
        back: b.into(),
    };

    let a = Topic::new("a");
    let b = Topic::new("b");
    store.upsert_material(&a, "content a", now).await.unwrap();
    store.upsert_material(&b, "content b", now).await.unwrap();

    let batch = vec![
        Flashcard::from_draft(a.clone(), draft("Q1", "A1"), now),
        Flashcard::from_draft(a.clone(), draft("Q2", "A2"), now),
    ];
    let entry = RecallEntry::new(a.clone(), "r", "f", 90, now);
    let added = store
        .record_recall(&entry, &batch, &TopicSchedule::fresh(a.clone(), now))
        .await
        .unwrap();
    assert_eq!(added, 2);

    let again = vec![
        Flashcard::from_draft(b.clone(), draft("Q1", "A1"), now),
        Flashcard::from_draft(b.clone(), draft("Q3", "A3"), now),
    ];
    let entry = RecallEntry::new(b.clone(), "r", "f", 90, now);
    let added = store
        .record_recall(&entry, &again, &TopicSchedule::fresh(b.clone(), now))
        .await
        .unwrap();
    assert_eq!(added, 1);

    assert_eq!(store.list_flashcards(&a).await.unwrap().len(), 2);
    assert_eq!(store.list_flashcards(&b).await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_flashcard_write_rolls_back_the_recall() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("freerecall.sqlite3");
    let store = SqliteStore::open_file(&path).await.unwrap();
    let now = Utc::now();
    let topic = Topic::new("Alpha");
    upload_material(
        &store,
        &Material {
            topic: topic.clone(),
            content: "content".into(),
        },
        now,
    )
    .await
    .unwrap();
    let before = store.get_schedule(&topic).await.unwrap();

    // Make every flashcard insert fail from a second connection.
    let side = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(&path))
        .await
        .unwrap();
    sqlx::query(
        "CREATE TRIGGER no_cards BEFORE INSERT ON flashcard \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END",
    )
    .execute(&side)
    .await
    .unwrap();
    side.close().await;

    let entry = RecallEntry::new(topic.clone(), "recall", "good", 90, now);
    let card = Flashcard::from_draft(
        topic.clone(),
        CardDraft {
            front: "Q".into(),
            back: "A".into(),
        },
        now,
    );
    let advanced = apply_score(before.clone(), 90, now);
    let err = store
        .record_recall(&entry, &[card], &advanced)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));

    assert!(store.list_history(&topic).await.unwrap().is_empty());
    assert!(store.list_flashcards(&topic).await.unwrap().is_empty());
    assert_eq!(store.get_schedule(&topic).await.unwrap(), before);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("freerecall.sqlite3");
    let topic = Topic::new("Alpha");
    {
        let store = SqliteStore::open_file(&path).await.unwrap();
        store.upsert_material(&topic, "kept", Utc::now()).await.unwrap();
    }
    let store = SqliteStore::open_file(&path).await.unwrap();
    assert_eq!(store.get_material(&topic).await.unwrap().content, "kept");
}
