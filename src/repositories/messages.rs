use crate::common::context::Context;
use crate::entities::messages::Message;
use crate::models::filters::FilterPlan;
use crate::repositories::filters::push_filter_plan;
use crate::repositories::visibility::push_message_not_hidden;
use sqlx::{MySql, QueryBuilder};

const READ_FIELDS: &str = "m.id, m.conversation_id, m.participant_id, u.username AS sender_name, m.body, m.created_at";
const FROM_MESSAGES: &str = " FROM messages m INNER JOIN users u ON m.participant_id = u.id ";

/// Every message of the conversation, hidden or not.
pub async fn fetch_all<C: Context>(ctx: &C, conversation_id: u64) -> sqlx::Result<Vec<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        FROM_MESSAGES,
        "WHERE m.conversation_id = ? ORDER BY m.created_at, m.id"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .fetch_all(ctx.db())
        .await
}

pub(crate) fn visible_query<'a>(
    conversation_id: u64,
    participant_id: i64,
    plan: &FilterPlan,
) -> QueryBuilder<'a, MySql> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        FROM_MESSAGES,
        "WHERE m.conversation_id = "
    ));
    query.push_bind(conversation_id);
    query.push(" AND ");
    push_message_not_hidden(&mut query, "m", participant_id);
    push_filter_plan(&mut query, plan, "m.created_at", "m.id");
    query
}

/// Messages of the conversation the participant has not hidden.
pub async fn fetch_visible<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    plan: &FilterPlan,
) -> sqlx::Result<Vec<Message>> {
    let mut query = visible_query(conversation_id, participant_id, plan);
    query.build_query_as().fetch_all(ctx.db()).await
}

pub async fn count_visible<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> sqlx::Result<u64> {
    let mut query =
        QueryBuilder::new("SELECT COUNT(*) FROM messages m WHERE m.conversation_id = ");
    query.push_bind(conversation_id);
    query.push(" AND ");
    push_message_not_hidden(&mut query, "m", participant_id);
    let count: i64 = query.build_query_scalar().fetch_one(ctx.db()).await?;
    Ok(count as u64)
}

pub(crate) fn latest_visible_query<'a>(
    conversation_ids: &[u64],
    participant_id: i64,
) -> QueryBuilder<'a, MySql> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        FROM_MESSAGES,
        "WHERE m.conversation_id IN ("
    ));
    {
        let mut separated = query.separated(", ");
        for conversation_id in conversation_ids {
            separated.push_bind(*conversation_id);
        }
    }
    // newest over all messages, hidden or not; id breaks timestamp ties
    query.push(const_str::concat!(
        ") AND m.id = (SELECT lm.id FROM messages lm ",
        "WHERE lm.conversation_id = m.conversation_id ",
        "ORDER BY lm.created_at DESC, lm.id DESC LIMIT 1) AND "
    ));
    push_message_not_hidden(&mut query, "m", participant_id);
    query
}

/// The newest message of each conversation, unless the participant hid it.
/// A conversation whose newest message is hidden yields no row.
pub async fn fetch_latest_visible<C: Context>(
    ctx: &C,
    conversation_ids: &[u64],
    participant_id: i64,
) -> sqlx::Result<Vec<Message>> {
    if conversation_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut query = latest_visible_query(conversation_ids, participant_id);
    query.build_query_as().fetch_all(ctx.db()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{Filters, SortDirection};

    #[test]
    fn visible_messages_exclude_hidden_then_filter() {
        let plan = Filters::new().order_by(SortDirection::Asc).limit(2).plan();
        let query = visible_query(4, 1, &plan);
        let sql = query.sql();
        assert!(sql.contains(
            "WHERE m.conversation_id = ? AND NOT EXISTS (SELECT 1 FROM deleted_messages dm \
             WHERE dm.message_id = m.id AND dm.participant_id = ?)"
        ));
        assert!(sql.ends_with("ORDER BY m.created_at ASC, m.id ASC LIMIT ?"));
    }

    #[test]
    fn latest_message_is_taken_over_all_messages_then_checked_for_hidden() {
        let query = latest_visible_query(&[1, 2], 5);
        let sql = query.sql();
        assert!(sql.contains("m.conversation_id IN (?, ?)"));
        assert!(sql.contains(
            "WHERE lm.conversation_id = m.conversation_id \
             ORDER BY lm.created_at DESC, lm.id DESC LIMIT 1) AND NOT EXISTS"
        ));
        assert!(!sql.contains("dm.message_id = lm.id"));
        assert!(sql.ends_with("dm.message_id = m.id AND dm.participant_id = ?)"));
    }
}
