use crate::models::visibility::{Presence, View};
use sqlx::{MySql, QueryBuilder};

/// Appends the marker predicate for `view` against conversation alias `c`.
pub fn push_conversation_visible(
    query: &mut QueryBuilder<'_, MySql>,
    view: View,
    participant_id: i64,
) {
    let condition = view.marker_condition();
    query.push(match condition.presence {
        Presence::Present => "EXISTS (",
        Presence::Absent => "NOT EXISTS (",
    });
    query.push(const_str::concat!(
        "SELECT 1 FROM deleted_conversations dc ",
        "WHERE dc.conversation_id = c.id AND dc.participant_id = "
    ));
    query.push_bind(participant_id);
    match condition.archived {
        Some(true) => {
            query.push(" AND dc.archived = 1");
        }
        Some(false) => {
            query.push(" AND dc.archived = 0");
        }
        None => {}
    }
    query.push(")");
}

/// Appends the check that `message_alias` is not hidden for the participant.
pub fn push_message_not_hidden(
    query: &mut QueryBuilder<'_, MySql>,
    message_alias: &str,
    participant_id: i64,
) {
    query.push(format!(
        "NOT EXISTS (SELECT 1 FROM deleted_messages dm WHERE dm.message_id = {message_alias}.id AND dm.participant_id = "
    ));
    query.push_bind(participant_id);
    query.push(")");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(view: View) -> String {
        let mut query = QueryBuilder::<MySql>::new("");
        push_conversation_visible(&mut query, view, 7);
        query.sql().to_owned()
    }

    #[test]
    fn active_requires_no_marker_at_all() {
        assert_eq!(
            render(View::Active),
            "NOT EXISTS (SELECT 1 FROM deleted_conversations dc WHERE dc.conversation_id = c.id AND dc.participant_id = ?)"
        );
    }

    #[test]
    fn archived_requires_marker_with_flag_unset() {
        let sql = render(View::Archived);
        assert!(sql.starts_with("EXISTS ("));
        assert!(sql.ends_with("AND dc.archived = 0)"));
    }

    #[test]
    fn readable_excludes_removed_marker() {
        let sql = render(View::Readable);
        assert!(sql.starts_with("NOT EXISTS ("));
        assert!(sql.ends_with("AND dc.archived = 1)"));
    }

    #[test]
    fn hidden_message_check_uses_alias() {
        let mut query = QueryBuilder::<MySql>::new("");
        push_message_not_hidden(&mut query, "lm", 3);
        assert!(query.sql().contains("dm.message_id = lm.id"));
        assert!(query.sql().ends_with("dm.participant_id = ?)"));
    }
}
