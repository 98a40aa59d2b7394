use chrono::{DateTime, SecondsFormat, Utc};
use freerecall_core::{
    repo::Store, CoreError, Flashcard, RecallEntry, StudyMaterial, Topic, TopicSchedule,
};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, Sqlite, SqlitePool};
use std::path::Path;
use tracing::debug;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        debug!("opened sqlite store at {}", path.as_ref().display());
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn open_memory() -> Result<Self, CoreError> {
        // every connection to :memory: is its own database, so keep exactly one
        let opts = "sqlite::memory:"
            .parse::<SqliteConnectOptions>()
            .map_err(|_| CoreError::Storage("sqlite options"))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS study_material (
          topic       TEXT PRIMARY KEY,
          content     TEXT NOT NULL,
          created_at  TEXT NOT NULL,
          updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recall_history (
          id           TEXT PRIMARY KEY,
          topic        TEXT NOT NULL,
          recall_text  TEXT NOT NULL,
          feedback     TEXT NOT NULL,
          score        INTEGER NOT NULL CHECK (score BETWEEN 0 AND 100),
          created_at   TEXT NOT NULL,
          FOREIGN KEY(topic) REFERENCES study_material(topic)
        );

        CREATE TABLE IF NOT EXISTS flashcard (
          id             TEXT PRIMARY KEY,
          topic          TEXT NOT NULL,
          front          TEXT NOT NULL,
          back           TEXT NOT NULL,
          added_to_anki  INTEGER NOT NULL DEFAULT 0,
          created_at     TEXT NOT NULL,
          UNIQUE (front, back)
        );

        CREATE TABLE IF NOT EXISTS topic_schedule (
          topic          TEXT PRIMARY KEY,
          interval_days  INTEGER NOT NULL,
          next_review    TEXT NOT NULL,
          last_review    TEXT,
          easiness       REAL NOT NULL DEFAULT 2.3
        );

        CREATE INDEX IF NOT EXISTS idx_history_topic_created ON recall_history (topic, created_at);
        CREATE INDEX IF NOT EXISTS idx_flash_topic ON flashcard (topic);
        CREATE INDEX IF NOT EXISTS idx_schedule_next ON topic_schedule (next_review);
        "#;

        for chunk in STMT.split(';') {
            let sql = chunk.trim();
            if sql.is_empty() {
                continue;
            }
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|_| CoreError::Storage("sqlite schema"))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ===== Materials =====
    async fn upsert_material(
        &self,
        topic: &Topic,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<StudyMaterial, CoreError> {
        sqlx::query(
            r#"INSERT INTO study_material (topic,content,created_at,updated_at)
               VALUES (?,?,?,?)
               ON CONFLICT(topic) DO UPDATE SET
                 content=excluded.content, updated_at=excluded.updated_at"#,
        )
        .bind(topic.as_str())
        .bind(content)
        .bind(dt_to_str(now))
        .bind(dt_to_str(now))
        .execute(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("upsert material"))?;
        self.get_material(topic).await
    }

    async fn get_material(&self, topic: &Topic) -> Result<StudyMaterial, CoreError> {
        let row = sqlx::query(
            "SELECT topic,content,created_at,updated_at FROM study_material WHERE topic=?",
        )
        .bind(topic.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read material"))?;
        let row = row.ok_or(CoreError::NotFound("material"))?;
        Ok(StudyMaterial {
            topic: Topic::new(row.get::<String, _>("topic")),
            content: row.get::<String, _>("content"),
            created_at: dt_from_str(row.get::<String, _>("created_at"))?,
            updated_at: dt_from_str(row.get::<String, _>("updated_at"))?,
        })
    }

    // ===== Schedules =====
    async fn put_schedule(&self, schedule: &TopicSchedule) -> Result<(), CoreError> {
        upsert_schedule(schedule)
            .execute(&self.pool)
            .await
            .map_err(|_| CoreError::Storage("put schedule"))?;
        Ok(())
    }

    async fn get_schedule(&self, topic: &Topic) -> Result<TopicSchedule, CoreError> {
        let row = sqlx::query(
            r#"SELECT topic,interval_days,next_review,last_review,easiness
               FROM topic_schedule WHERE topic=?"#,
        )
        .bind(topic.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("read schedule"))?;
        let row = row.ok_or(CoreError::NotFound("schedule"))?;
        Ok(TopicSchedule {
            topic: Topic::new(row.get::<String, _>("topic")),
            interval_days: row.get::<i64, _>("interval_days") as u32,
            next_review: dt_from_str(row.get::<String, _>("next_review"))?,
            last_review: row
                .get::<Option<String>, _>("last_review")
                .map(dt_from_str)
                .transpose()?,
            easiness: row.get::<f64, _>("easiness") as f32,
        })
    }

    async fn due_topics(&self, now: DateTime<Utc>) -> Result<Vec<Topic>, CoreError> {
        let rows = sqlx::query(
            "SELECT topic FROM topic_schedule WHERE next_review <= ? ORDER BY next_review ASC, topic ASC",
        )
        .bind(dt_to_str(now))
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list due"))?;
        Ok(rows
            .into_iter()
            .map(|row| Topic::new(row.get::<String, _>("topic")))
            .collect())
    }

    // ===== Recall history =====
    async fn record_recall(
        &self,
        entry: &RecallEntry,
        cards: &[Flashcard],
        schedule: &TopicSchedule,
    ) -> Result<u32, CoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|_| CoreError::Storage("tx"))?;

        let exists = sqlx::query("SELECT 1 FROM study_material WHERE topic=? LIMIT 1")
            .bind(entry.topic.as_str())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("read material"))?
            .is_some();
        if !exists {
            return Err(CoreError::NotFound("material"));
        }

        sqlx::query(
            r#"INSERT INTO recall_history (id,topic,recall_text,feedback,score,created_at)
               VALUES (?,?,?,?,?,?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.topic.as_str())
        .bind(&entry.recall_text)
        .bind(&entry.feedback)
        .bind(i64::from(entry.score))
        .bind(dt_to_str(entry.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|_| CoreError::Storage("insert recall"))?;

        let mut added = 0u64;
        for card in cards {
            let res = sqlx::query(
                r#"INSERT OR IGNORE INTO flashcard (id,topic,front,back,added_to_anki,created_at)
                   VALUES (?,?,?,?,?,?)"#,
            )
            .bind(card.id.to_string())
            .bind(card.topic.as_str())
            .bind(&card.front)
            .bind(&card.back)
            .bind(bool_to_i(card.added_to_anki))
            .bind(dt_to_str(card.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("insert flashcard"))?;
            added += res.rows_affected();
        }

        upsert_schedule(schedule)
            .execute(&mut *tx)
            .await
            .map_err(|_| CoreError::Storage("put schedule"))?;

        // dropping `tx` on any early return above rolls everything back
        tx.commit()
            .await
            .map_err(|_| CoreError::Storage("tx commit"))?;
        Ok(added as u32)
    }

    async fn list_history(&self, topic: &Topic) -> Result<Vec<RecallEntry>, CoreError> {
        let rows = sqlx::query(
            r#"SELECT id,topic,recall_text,feedback,score,created_at
               FROM recall_history WHERE topic=?
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list history"))?;
        let mut v = Vec::with_capacity(rows.len());
        for row in rows {
            v.push(RecallEntry {
                id: uuid_from_str(row.get::<String, _>("id"))?,
                topic: Topic::new(row.get::<String, _>("topic")),
                recall_text: row.get::<String, _>("recall_text"),
                feedback: row.get::<String, _>("feedback"),
                score: row.get::<i64, _>("score") as u32,
                created_at: dt_from_str(row.get::<String, _>("created_at"))?,
            });
        }
        Ok(v)
    }

    // ===== Flashcards =====
    async fn list_flashcards(&self, topic: &Topic) -> Result<Vec<Flashcard>, CoreError> {
        let rows = sqlx::query(
            r#"SELECT id,topic,front,back,added_to_anki,created_at
               FROM flashcard WHERE topic=? ORDER BY created_at ASC, rowid ASC"#,
        )
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|_| CoreError::Storage("list flashcards"))?;
        let mut v = Vec::with_capacity(rows.len());
        for row in rows {
            v.push(Flashcard {
                id: uuid_from_str(row.get::<String, _>("id"))?,
                topic: Topic::new(row.get::<String, _>("topic")),
                front: row.get::<String, _>("front"),
                back: row.get::<String, _>("back"),
                added_to_anki: row.get::<i64, _>("added_to_anki") != 0,
                created_at: dt_from_str(row.get::<String, _>("created_at"))?,
            });
        }
        Ok(v)
    }
}

// ===== Helpers =====
fn upsert_schedule(schedule: &TopicSchedule) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(
        r#"INSERT INTO topic_schedule (topic,interval_days,next_review,last_review,easiness)
           VALUES (?,?,?,?,?)
           ON CONFLICT(topic) DO UPDATE SET
             interval_days=excluded.interval_days,
             next_review=excluded.next_review,
             last_review=excluded.last_review,
             easiness=excluded.easiness"#,
    )
    .bind(schedule.topic.as_str())
    .bind(i64::from(schedule.interval_days))
    .bind(dt_to_str(schedule.next_review))
    .bind(schedule.last_review.map(dt_to_str))
    .bind(f64::from(schedule.easiness))
}

fn uuid_from_str(s: String) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(&s).map_err(|_| CoreError::Invalid("uuid"))
}

// Fixed-width so that text comparison in SQL orders like time.
fn dt_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn dt_from_str(s: String) -> Result<DateTime<Utc>, CoreError> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CoreError::Invalid("datetime"))
        .map(|dt| dt.with_timezone(&Utc))
}

fn bool_to_i(b: bool) -> i64 {
    if b {
        1
    } else {
        0
    }
}
