use crate::common::context::Context;
use crate::entities::conversations::Conversation;
use crate::models::filters::FilterPlan;
use crate::models::visibility::View;
use crate::repositories::filters::push_filter_plan;
use crate::repositories::visibility::push_conversation_visible;
use sqlx::{MySql, QueryBuilder};

const TABLE_NAME: &str = "conversations";
const READ_FIELDS: &str = "c.id, c.subject, c.created_at, c.updated_at";

pub async fn create<C: Context>(ctx: &C, subject: Option<&str>) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!("INSERT INTO ", TABLE_NAME, " (subject) VALUES (?)");
    let result = sqlx::query(QUERY).bind(subject).execute(ctx.db()).await?;
    Ok(result.last_insert_id())
}

pub async fn fetch_one<C: Context>(ctx: &C, conversation_id: u64) -> sqlx::Result<Conversation> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " c WHERE c.id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(conversation_id)
        .fetch_one(ctx.db())
        .await
}

pub async fn touch<C: Context>(ctx: &C, conversation_id: u64) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET updated_at = CURRENT_TIMESTAMP WHERE id = ?"
    );
    sqlx::query(QUERY)
        .bind(conversation_id)
        .execute(ctx.db())
        .await?;
    Ok(())
}

pub(crate) fn visible_query<'a>(
    conversation_id: u64,
    participant_id: i64,
    view: View,
) -> QueryBuilder<'a, MySql> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " c WHERE c.id = "
    ));
    query.push_bind(conversation_id);
    query.push(" AND ");
    push_conversation_visible(&mut query, view, participant_id);
    query
}

/// Fetches the conversation only if `view` admits it for the participant.
pub async fn fetch_visible<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    view: View,
) -> sqlx::Result<Conversation> {
    let mut query = visible_query(conversation_id, participant_id, view);
    query.build_query_as().fetch_one(ctx.db()).await
}

pub(crate) fn list_query<'a>(
    participant_id: i64,
    view: View,
    plan: &FilterPlan,
) -> QueryBuilder<'a, MySql> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " c WHERE "
    ));
    push_conversation_visible(&mut query, view, participant_id);
    push_filter_plan(&mut query, plan, "c.created_at", "c.id");
    query
}

pub async fn fetch_visible_list<C: Context>(
    ctx: &C,
    participant_id: i64,
    view: View,
    plan: &FilterPlan,
) -> sqlx::Result<Vec<Conversation>> {
    let mut query = list_query(participant_id, view, plan);
    query.build_query_as().fetch_all(ctx.db()).await
}

pub async fn count_visible<C: Context>(
    ctx: &C,
    participant_id: i64,
    view: View,
) -> sqlx::Result<u64> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " c WHERE "
    ));
    push_conversation_visible(&mut query, view, participant_id);
    let count: i64 = query.build_query_scalar().fetch_one(ctx.db()).await?;
    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filters::{Filters, SortDirection};

    #[test]
    fn single_lookup_combines_id_and_view() {
        let query = visible_query(1, 2, View::Readable);
        assert_eq!(
            query.sql(),
            "SELECT c.id, c.subject, c.created_at, c.updated_at FROM conversations c \
             WHERE c.id = ? AND NOT EXISTS (SELECT 1 FROM deleted_conversations dc \
             WHERE dc.conversation_id = c.id AND dc.participant_id = ? AND dc.archived = 1)"
        );
    }

    #[test]
    fn list_applies_filters_after_view() {
        let plan = Filters::new().order_by(SortDirection::Desc).limit(5).plan();
        let query = list_query(2, View::Archived, &plan);
        let sql = query.sql();
        assert!(sql.contains("WHERE EXISTS (SELECT 1 FROM deleted_conversations dc"));
        assert!(
            sql.ends_with("AND dc.archived = 0) ORDER BY c.created_at DESC, c.id DESC LIMIT ?")
        );
    }
}
