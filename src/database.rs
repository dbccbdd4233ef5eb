use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

use crate::constants::DATABASE_FILE_NAME;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             TEXT    PRIMARY KEY,
    name           TEXT    UNIQUE NOT NULL,
    password_hash  TEXT    NOT NULL
);
"#;

// amount is exact decimal text with two fractional digits; due_date is YYYY-MM-DD
const CREATE_DEBTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS debts (
    id           TEXT    PRIMARY KEY,
    owner_id     TEXT    NOT NULL,
    lender_name  TEXT    NOT NULL,
    amount       TEXT    NOT NULL,
    due_date     TEXT    NOT NULL,
    status       TEXT    NOT NULL DEFAULT 'unpaid' CHECK (status IN ('unpaid', 'paid')),
    description  TEXT,
    created_at   TEXT    NOT NULL,
    updated_at   TEXT    NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE
);
"#;

const CREATE_DEBTS_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_debts_owner_status ON debts(owner_id, status);",
    "CREATE INDEX IF NOT EXISTS idx_debts_owner_due_date ON debts(owner_id, due_date);",
    "CREATE INDEX IF NOT EXISTS idx_debts_owner_created_at ON debts(owner_id, created_at);",
];

pub type Db = Arc<RwLock<Connection>>;

/// Open (creating if needed) the shared database and ensure the schema exists
pub async fn init_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE_NAME);
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    conn.execute("PRAGMA foreign_keys = ON", ()).await?;
    conn.execute(CREATE_USERS_TABLE, ()).await?;
    conn.execute(CREATE_DEBTS_TABLE, ()).await?;
    for statement in CREATE_DEBTS_INDEXES {
        conn.execute(statement, ()).await?;
    }

    Ok(Arc::new(RwLock::new(conn)))
}
