//! SqliteStore - users as rows of a single relational table.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::debug;

use super::{StoreError, UserStore};
use crate::user::User;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        firstname TEXT NOT NULL,
        lastname TEXT NOT NULL,
        email TEXT NOT NULL,
        age INTEGER NOT NULL,
        height INTEGER NOT NULL,
        active INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        deleted_at TEXT
    );
";

const SELECT_ALL: &str = "SELECT id, firstname, lastname, email, age, height, active, created_at, deleted_at FROM users ORDER BY id";
const DELETE_ALL: &str = "DELETE FROM users";
const INSERT: &str = "INSERT INTO users (id, firstname, lastname, email, age, height, active, created_at, deleted_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

/// SQLite-backed user store.
///
/// `write` replaces every row inside one transaction, so a failed write leaves
/// the previous collection intact.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

fn to_sql_id(id: u64) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::Database(format!("id {} out of range", id)))
}

fn from_sql_id(id: i64) -> Result<u64, StoreError> {
    u64::try_from(id).map_err(|_| StoreError::Corrupt(format!("negative user id {}", id)))
}

impl UserStore for SqliteStore {
    fn read(&self) -> Result<Vec<User>, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let user = User {
                id: 0,
                firstname: row.get(1)?,
                lastname: row.get(2)?,
                email: row.get(3)?,
                age: row.get(4)?,
                height: row.get(5)?,
                active: row.get(6)?,
                created_date: row.get(7)?,
                deleted_date: row.get(8)?,
            };
            Ok((id, user))
        })?;

        let mut users = Vec::new();
        for row in rows {
            let (id, mut user) = row?;
            user.id = from_sql_id(id)?;
            users.push(user);
        }
        debug!(count = users.len(), "read users from sqlite");
        Ok(users)
    }

    fn write(&self, users: &[User]) -> Result<(), StoreError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        let tx = conn.transaction()?;
        tx.execute(DELETE_ALL, [])?;
        {
            let mut insert = tx.prepare(INSERT)?;
            for user in users {
                insert.execute(params![
                    to_sql_id(user.id)?,
                    user.firstname,
                    user.lastname,
                    user.email,
                    user.age,
                    user.height,
                    user.active,
                    user.created_date,
                    user.deleted_date,
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = users.len(), "wrote users to sqlite");
        Ok(())
    }
}
