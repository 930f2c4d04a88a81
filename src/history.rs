use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::StoreResult;
use crate::events::{FinishPayload, SessionObserver};
use crate::session::Mode;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS runs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        finished_at TEXT NOT NULL,
        mode TEXT NOT NULL,
        time_limit INTEGER NOT NULL,
        elapsed INTEGER NOT NULL,
        wpm INTEGER NOT NULL,
        raw_speed INTEGER NOT NULL,
        accuracy INTEGER NOT NULL,
        consistency INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS samples (
        run_id INTEGER NOT NULL REFERENCES runs(id) ON DELETE CASCADE,
        idx INTEGER NOT NULL,
        wpm INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_runs_wpm ON runs(wpm);
    CREATE INDEX IF NOT EXISTS idx_runs_finished_at ON runs(finished_at);
"#;

/// One finished run as stored in the history
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub finished_at: DateTime<Local>,
    pub mode: Mode,
    pub time_limit: u32,
    pub elapsed: u64,
    pub wpm: u32,
    pub raw_speed: u32,
    pub accuracy: u32,
    pub consistency: u32,
    pub samples: Vec<u32>,
}

impl RunRecord {
    pub fn from_finish(result: &FinishPayload, finished_at: DateTime<Local>) -> Self {
        Self {
            finished_at,
            mode: result.mode,
            time_limit: result.time_limit,
            elapsed: result.elapsed,
            wpm: result.wpm,
            raw_speed: result.raw_speed,
            accuracy: result.accuracy,
            consistency: result.consistency,
            samples: result.history.clone(),
        }
    }
}

/// Summary row read back from the history; samples are loaded separately.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRun {
    pub id: i64,
    pub finished_at: DateTime<Local>,
    pub mode: Mode,
    pub time_limit: u32,
    pub elapsed: u64,
    pub wpm: u32,
    pub raw_speed: u32,
    pub accuracy: u32,
    pub consistency: u32,
}

/// Local run history and leaderboard
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Database at [`AppDirs::history_db_path`], or the working directory.
    pub fn open_default() -> StoreResult<Self> {
        let path = AppDirs::history_db_path().unwrap_or_else(|| PathBuf::from("keyrace_history.db"));
        Self::open(path)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a run and its samples in one transaction; returns the run id.
    pub fn record_run(&mut self, run: &RunRecord) -> StoreResult<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO runs
            (finished_at, mode, time_limit, elapsed, wpm, raw_speed, accuracy, consistency)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                run.finished_at.to_rfc3339(),
                run.mode.to_string(),
                run.time_limit,
                run.elapsed as i64,
                run.wpm,
                run.raw_speed,
                run.accuracy,
                run.consistency,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare("INSERT INTO samples (run_id, idx, wpm) VALUES (?1, ?2, ?3)")?;
            for (idx, wpm) in run.samples.iter().enumerate() {
                stmt.execute(params![run_id, idx as i64, wpm])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }

    /// Fastest runs first; ties go to the earlier run.
    pub fn top_runs(&self, limit: usize) -> StoreResult<Vec<StoredRun>> {
        self.query_runs("ORDER BY wpm DESC, finished_at ASC", limit)
    }

    pub fn recent_runs(&self, limit: usize) -> StoreResult<Vec<StoredRun>> {
        self.query_runs("ORDER BY finished_at DESC, id DESC", limit)
    }

    fn query_runs(&self, order: &str, limit: usize) -> StoreResult<Vec<StoredRun>> {
        let sql = format!(
            r#"
            SELECT id, finished_at, mode, time_limit, elapsed, wpm, raw_speed, accuracy, consistency
            FROM runs
            {order}
            LIMIT ?1
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([limit as i64], stored_run_from_row)?;

        let mut runs = Vec::new();
        for run in rows {
            runs.push(run?);
        }
        Ok(runs)
    }

    pub fn samples_for(&self, run_id: i64) -> StoreResult<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT wpm FROM samples WHERE run_id = ?1 ORDER BY idx")?;
        let rows = stmt.query_map([run_id], |row| row.get::<_, u32>(0))?;

        let mut samples = Vec::new();
        for wpm in rows {
            samples.push(wpm?);
        }
        Ok(samples)
    }

    pub fn run_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?)
    }

    /// Clear all history (for testing or reset purposes)
    pub fn clear(&self) -> StoreResult<()> {
        self.conn.execute_batch("DELETE FROM samples; DELETE FROM runs;")?;
        Ok(())
    }
}

fn stored_run_from_row(row: &Row<'_>) -> rusqlite::Result<StoredRun> {
    let finished_at_str: String = row.get(1)?;
    let finished_at = DateTime::parse_from_rfc3339(&finished_at_str)
        .map_err(|_| {
            rusqlite::Error::InvalidColumnType(
                1,
                "finished_at".to_string(),
                rusqlite::types::Type::Text,
            )
        })?
        .with_timezone(&Local);

    Ok(StoredRun {
        id: row.get(0)?,
        finished_at,
        mode: Mode::from_name(&row.get::<_, String>(2)?),
        time_limit: row.get(3)?,
        elapsed: row.get::<_, i64>(4)?.max(0) as u64,
        wpm: row.get(5)?,
        raw_speed: row.get(6)?,
        accuracy: row.get(7)?,
        consistency: row.get(8)?,
    })
}

/// Observer that appends every finished run to a [`HistoryDb`]
#[derive(Debug)]
pub struct HistorySink {
    db: HistoryDb,
}

impl HistorySink {
    pub fn new(db: HistoryDb) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &HistoryDb {
        &self.db
    }
}

impl SessionObserver for HistorySink {
    fn on_finish(&mut self, result: &FinishPayload) {
        let run = RunRecord::from_finish(result, Local::now());
        match self.db.record_run(&run) {
            Ok(id) => tracing::debug!(run_id = id, wpm = run.wpm, "run recorded"),
            Err(err) => tracing::warn!(%err, "failed to record run"),
        }
    }
}
