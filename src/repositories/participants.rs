use crate::common::context::Context;
use crate::entities::participants::Participant;
use sqlx::{MySql, QueryBuilder};

const READ_FIELDS: &str = "p.id, p.conversation_id, p.participant_id, u.username, p.created_at";

pub(crate) fn conversations_query<'a>(
    conversation_ids: &[u64],
    excluded_participant_id: Option<i64>,
) -> QueryBuilder<'a, MySql> {
    let mut query = QueryBuilder::new(const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM participants p INNER JOIN users u ON p.participant_id = u.id ",
        "WHERE p.conversation_id IN ("
    ));
    {
        let mut separated = query.separated(", ");
        for conversation_id in conversation_ids {
            separated.push_bind(*conversation_id);
        }
    }
    query.push(")");
    if let Some(participant_id) = excluded_participant_id {
        query.push(" AND p.participant_id != ");
        query.push_bind(participant_id);
    }
    query.push(" ORDER BY p.conversation_id, p.id");
    query
}

/// Participants of every given conversation, optionally leaving one participant out.
pub async fn fetch_for_conversations<C: Context>(
    ctx: &C,
    conversation_ids: &[u64],
    excluded_participant_id: Option<i64>,
) -> sqlx::Result<Vec<Participant>> {
    if conversation_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut query = conversations_query(conversation_ids, excluded_participant_id);
    query.build_query_as().fetch_all(ctx.db()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_every_conversation_id() {
        let query = conversations_query(&[1, 2, 3], None);
        assert!(query.sql().contains("IN (?, ?, ?)"));
        assert!(!query.sql().contains("!="));
    }

    #[test]
    fn excludes_requesting_participant() {
        let query = conversations_query(&[1], Some(9));
        assert!(
            query
                .sql()
                .ends_with("IN (?) AND p.participant_id != ? ORDER BY p.conversation_id, p.id")
        );
    }
}
