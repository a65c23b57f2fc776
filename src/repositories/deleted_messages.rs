use crate::common::context::Context;

/// Returns `true` when a new marker was written. `false` means the marker
/// already existed or the message does not exist.
pub async fn hide<C: Context>(ctx: &C, message_id: u64, participant_id: i64) -> sqlx::Result<bool> {
    const QUERY: &str =
        "INSERT IGNORE INTO deleted_messages (message_id, participant_id) VALUES (?, ?)";
    let result = sqlx::query(QUERY)
        .bind(message_id)
        .bind(participant_id)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn unhide<C: Context>(
    ctx: &C,
    message_id: u64,
    participant_id: i64,
) -> sqlx::Result<bool> {
    const QUERY: &str = "DELETE FROM deleted_messages WHERE message_id = ? AND participant_id = ?";
    let result = sqlx::query(QUERY)
        .bind(message_id)
        .bind(participant_id)
        .execute(ctx.db())
        .await?;
    Ok(result.rows_affected() > 0)
}
