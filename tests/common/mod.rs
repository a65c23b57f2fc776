#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use conversation_service::common::state::AppState;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};
use std::str::FromStr;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../../schema/conversations.sql");

pub const P1: i64 = 1;
pub const P2: i64 = 2;
pub const P3: i64 = 3;

/// A throwaway database on the server named by `TEST_DATABASE_URL`.
pub struct TestDatabase {
    pub state: AppState,
    admin: Pool<MySql>,
    name: String,
}

/// Conversation between P1 and P2 with m1 at t=10 and m2 at t=20.
pub struct Scenario {
    pub conversation_id: u64,
    pub m1: u64,
    pub m2: u64,
}

/// Splits the schema file on `;`, dropping `--` comment lines and blank fragments.
fn schema_statements(schema: &str) -> Vec<String> {
    schema
        .split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_owned()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

/// Returns `None` (and the calling test should return early) when no test
/// server is configured.
pub async fn test_database() -> Option<TestDatabase> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL is not set, skipping database test");
        return None;
    };

    let admin = MySqlPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to test database server");

    let name = format!("conversations_test_{}", Uuid::new_v4().simple());
    sqlx::raw_sql(&format!("CREATE DATABASE {name}"))
        .execute(&admin)
        .await
        .expect("Failed to create test database");

    let options = MySqlConnectOptions::from_str(&url)
        .expect("Invalid TEST_DATABASE_URL")
        .database(&name);
    let db = MySqlPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .expect("Failed to connect to test database");

    for statement in schema_statements(SCHEMA) {
        sqlx::raw_sql(&statement)
            .execute(&db)
            .await
            .expect("Failed to apply schema");
    }
    let state = AppState { db };

    let test_db = TestDatabase {
        state,
        admin,
        name,
    };
    for (user_id, username) in [(P1, "alice"), (P2, "bob"), (P3, "carol")] {
        test_db.user(user_id, username).await;
    }
    Some(test_db)
}

impl TestDatabase {
    pub async fn teardown(self) {
        self.state.db.close().await;
        sqlx::raw_sql(&format!("DROP DATABASE {}", self.name))
            .execute(&self.admin)
            .await
            .expect("Failed to drop test database");
    }

    pub async fn user(&self, user_id: i64, username: &str) {
        sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(user_id)
            .bind(username)
            .execute(&self.state.db)
            .await
            .unwrap();
    }

    pub async fn conversation(&self, created_at: DateTime<Utc>) -> u64 {
        sqlx::query("INSERT INTO conversations (created_at, updated_at) VALUES (?, ?)")
            .bind(created_at)
            .bind(created_at)
            .execute(&self.state.db)
            .await
            .unwrap()
            .last_insert_id()
    }

    pub async fn participant(&self, conversation_id: u64, participant_id: i64) {
        sqlx::query("INSERT INTO participants (conversation_id, participant_id) VALUES (?, ?)")
            .bind(conversation_id)
            .bind(participant_id)
            .execute(&self.state.db)
            .await
            .unwrap();
    }

    pub async fn message(
        &self,
        conversation_id: u64,
        participant_id: i64,
        body: &str,
        created_at: DateTime<Utc>,
    ) -> u64 {
        sqlx::query(
            "INSERT INTO messages (conversation_id, participant_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(participant_id)
        .bind(body)
        .bind(created_at)
        .execute(&self.state.db)
        .await
        .unwrap()
        .last_insert_id()
    }

    pub async fn scenario(&self) -> Scenario {
        let conversation_id = self.conversation(at(0)).await;
        self.participant(conversation_id, P1).await;
        self.participant(conversation_id, P2).await;
        let m1 = self.message(conversation_id, P1, "hello", at(10)).await;
        let m2 = self.message(conversation_id, P2, "hi there", at(20)).await;
        Scenario {
            conversation_id,
            m1,
            m2,
        }
    }

    pub async fn marker_count(&self, conversation_id: u64, participant_id: i64) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM deleted_conversations WHERE conversation_id = ? AND participant_id = ?",
        )
        .bind(conversation_id)
        .bind(participant_id)
        .fetch_one(&self.state.db)
        .await
        .unwrap()
    }
}
