//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use contact_core::{parse_contact_id, Contact, ContactError, ContactFields, ContactStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use uuid::Uuid;

/// A versioned schema step, applied once and recorded in `schema_migrations`
struct Migration {
    version: i64,
    description: &'static str,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "create contacts",
    // AUTOINCREMENT keeps contact_id from ever being reused after a delete
    statements: &[
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone_number INTEGER NOT NULL,
            address TEXT NOT NULL,
            version INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ],
}];

const CONTACT_COLUMNS: &str =
    "contact_id, id, name, email, phone_number, address, version, created_at, updated_at";

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and bring the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let pool = if is_in_memory(database_url) {
            // Each connection to an in-memory database sees its own data,
            // so keep exactly one alive for the life of the pool.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            let filename = options.clone().get_filename();
            if let Some(parent) = filename.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("Failed to create database directory: {}", parent.display())
                    })?;
                }
            }

            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(
                    options
                        .journal_mode(SqliteJournalMode::Wal)
                        .synchronous(SqliteSynchronous::Normal),
                )
                .await
        }
        .with_context(|| format!("Failed to connect to SQLite database at: {}", database_url))?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self { pool })
    }

    /// Fresh private in-memory database
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
            .fetch_all(pool)
            .await?;

        for migration in MIGRATIONS {
            if applied.contains(&migration.version) {
                continue;
            }

            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.description
            );

            let mut tx = pool.begin().await?;
            for statement in migration.statements {
                sqlx::query(statement).execute(&mut *tx).await?;
            }
            sqlx::query(
                r#"
                INSERT INTO schema_migrations (version, description, applied_at)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(migration.version)
            .bind(migration.description)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
        }

        Ok(())
    }

    /// Latest applied schema version
    pub async fn schema_version(&self) -> Result<i64> {
        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await?;

        Ok(version.unwrap_or(0))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ContactStore for Database {
    async fn find_max_sequential_id(&self) -> contact_core::Result<Option<i64>> {
        sqlx::query_scalar("SELECT MAX(contact_id) FROM contacts")
            .fetch_one(&self.pool)
            .await
            .map_err(ContactError::storage)
    }

    async fn insert(&self, fields: &ContactFields) -> contact_core::Result<Contact> {
        let now = Utc::now();

        let row: ContactRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO contacts (id, name, email, phone_number, address, version, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(Uuid::now_v7().to_string())
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.phone_number)
        .bind(&fields.address)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        row.try_into()
    }

    async fn find_all(&self) -> contact_core::Result<Vec<Contact>> {
        let rows: Vec<ContactRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contacts ORDER BY contact_id ASC",
            CONTACT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        rows.into_iter().map(Contact::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> contact_core::Result<Option<Contact>> {
        let id = parse_contact_id(id)?;

        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contacts WHERE id = ?1",
            CONTACT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        row.map(Contact::try_from).transpose()
    }

    async fn update(&self, id: &str, fields: &ContactFields) -> contact_core::Result<Option<Contact>> {
        let id = parse_contact_id(id)?.to_string();

        let mut tx = self.pool.begin().await.map_err(ContactError::storage)?;

        // Write first: a deferred transaction that reads before writing
        // cannot be upgraded once another connection commits (SQLITE_BUSY_SNAPSHOT).
        // updated_at is untouched here, so RETURNING yields the previous value.
        let previous: Option<DateTime<Utc>> = sqlx::query_scalar(
            "UPDATE contacts SET version = version + 1 WHERE id = ?1 RETURNING updated_at",
        )
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(ContactError::storage)?;

        let Some(previous) = previous else {
            return Ok(None);
        };

        let row: ContactRow = sqlx::query_as(&format!(
            r#"
            UPDATE contacts
            SET name = ?1, email = ?2, phone_number = ?3, address = ?4, updated_at = ?5
            WHERE id = ?6
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.phone_number)
        .bind(&fields.address)
        .bind(next_timestamp(previous))
        .bind(&id)
        .fetch_one(&mut *tx)
        .await
        .map_err(ContactError::storage)?;

        tx.commit().await.map_err(ContactError::storage)?;

        row.try_into().map(Some)
    }

    async fn delete_by_id(&self, id: &str) -> contact_core::Result<Option<Contact>> {
        let id = parse_contact_id(id)?;

        let row: Option<ContactRow> = sqlx::query_as(&format!(
            "DELETE FROM contacts WHERE id = ?1 RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(ContactError::storage)?;

        row.map(Contact::try_from).transpose()
    }

    async fn ping(&self) -> contact_core::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(ContactError::storage)
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// `updated_at` must move strictly forward even if the clock has not
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct ContactRow {
    contact_id: i64,
    id: String,
    name: String,
    email: String,
    phone_number: i64,
    address: String,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = ContactError;

    fn try_from(r: ContactRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&r.id)
            .map_err(|e| ContactError::Storage(format!("Corrupt contact id {}: {}", r.id, e)))?;

        Ok(Contact {
            id,
            contact_id: r.contact_id,
            name: r.name,
            email: r.email,
            phone_number: r.phone_number,
            address: r.address,
            created_at: r.created_at,
            updated_at: r.updated_at,
            version: r.version,
        })
    }
}
