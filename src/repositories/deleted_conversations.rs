use crate::common::context::Context;
use crate::entities::deleted_conversations::DeletedConversation;

const TABLE_NAME: &str = "deleted_conversations";
const READ_FIELDS: &str = "id, conversation_id, participant_id, archived, created_at, updated_at";

pub async fn fetch_one<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> sqlx::Result<DeletedConversation> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE conversation_id = ? AND participant_id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .bind(participant_id)
        .fetch_one(ctx.db())
        .await
}

/// Writes the marker for the pair in one statement, relying on the unique
/// (conversation_id, participant_id) key.
pub async fn upsert<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    archived: bool,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (conversation_id, participant_id, archived) VALUES (?, ?, ?) ",
        "ON DUPLICATE KEY UPDATE archived = VALUES(archived), updated_at = CURRENT_TIMESTAMP"
    );
    sqlx::query(QUERY)
        .bind(conversation_id)
        .bind(participant_id)
        .bind(archived)
        .execute(ctx.db())
        .await?;
    Ok(())
}

/// Returns whether a marker existed.
pub async fn delete<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> sqlx::Result<bool> {
    const QUERY: &str = const_str::concat!(
        "DELETE FROM ",
        TABLE_NAME,
        " WHERE conversation_id = ? AND participant_id = ?"
    );
    let result = sqlx::query(QUERY)
        .bind(conversation_id)
        .bind(participant_id)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() > 0)
}
