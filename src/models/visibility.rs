use crate::entities::deleted_conversations::DeletedConversation;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// State of one conversation for one participant, as recorded in
/// `deleted_conversations`. The stored flag is inverted from what its name
/// suggests: `archived = 0` is the archive, `archived = 1` the hard removal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConversationVisibility {
    /// No marker row.
    #[default]
    Active,
    /// Marker row with `archived = 0`.
    Archived,
    /// Marker row with `archived = 1`.
    Removed,
}

impl ConversationVisibility {
    pub const fn from_archived_flag(archived: Option<bool>) -> Self {
        match archived {
            None => ConversationVisibility::Active,
            Some(false) => ConversationVisibility::Archived,
            Some(true) => ConversationVisibility::Removed,
        }
    }

    /// The `archived` column value this state is stored as, `None` meaning no row.
    pub const fn archived_flag(self) -> Option<bool> {
        match self {
            ConversationVisibility::Active => None,
            ConversationVisibility::Archived => Some(false),
            ConversationVisibility::Removed => Some(true),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ConversationVisibility::Active => "active",
            ConversationVisibility::Archived => "archived",
            ConversationVisibility::Removed => "removed",
        }
    }
}

impl From<Option<&DeletedConversation>> for ConversationVisibility {
    fn from(value: Option<&DeletedConversation>) -> Self {
        Self::from_archived_flag(value.map(|marker| marker.archived))
    }
}

/// A stored marker row, as returned by archive and force-remove.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityMarker {
    pub conversation_id: u64,
    pub participant_id: i64,
    pub visibility: ConversationVisibility,
    pub updated_at: DateTime<Utc>,
}

impl From<DeletedConversation> for VisibilityMarker {
    fn from(value: DeletedConversation) -> Self {
        Self {
            conversation_id: value.conversation_id,
            participant_id: value.participant_id,
            visibility: ConversationVisibility::from_archived_flag(Some(value.archived)),
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

/// Condition on the marker row for a (conversation, participant) pair:
/// whether a row matching `archived` (any flag when `None`) must exist or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerCondition {
    pub presence: Presence,
    pub archived: Option<bool>,
}

impl MarkerCondition {
    pub fn is_met_by(&self, visibility: ConversationVisibility) -> bool {
        let row_matches = match (visibility.archived_flag(), self.archived) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(stored), Some(wanted)) => stored == wanted,
        };
        match self.presence {
            Presence::Present => row_matches,
            Presence::Absent => !row_matches,
        }
    }
}

/// The three ways a participant can look at conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Untouched conversations only.
    Active,
    /// Conversations the participant archived.
    Archived,
    /// Everything except force-removed conversations.
    Readable,
}

impl View {
    pub const fn marker_condition(self) -> MarkerCondition {
        match self {
            View::Active => MarkerCondition {
                presence: Presence::Absent,
                archived: None,
            },
            View::Archived => MarkerCondition {
                presence: Presence::Present,
                archived: Some(false),
            },
            View::Readable => MarkerCondition {
                presence: Presence::Absent,
                archived: Some(true),
            },
        }
    }

    pub fn admits(self, visibility: ConversationVisibility) -> bool {
        self.marker_condition().is_met_by(visibility)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            View::Active => "active",
            View::Archived => "archived",
            View::Readable => "readable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_view_only_admits_untouched_conversations() {
        assert!(View::Active.admits(ConversationVisibility::Active));
        assert!(!View::Active.admits(ConversationVisibility::Archived));
        assert!(!View::Active.admits(ConversationVisibility::Removed));
    }

    #[test]
    fn archived_view_only_admits_archived_marker() {
        assert!(!View::Archived.admits(ConversationVisibility::Active));
        assert!(View::Archived.admits(ConversationVisibility::Archived));
        assert!(!View::Archived.admits(ConversationVisibility::Removed));
    }

    #[test]
    fn readable_view_excludes_only_removed() {
        assert!(View::Readable.admits(ConversationVisibility::Active));
        assert!(View::Readable.admits(ConversationVisibility::Archived));
        assert!(!View::Readable.admits(ConversationVisibility::Removed));
    }

    #[test]
    fn stored_flag_is_inverted() {
        assert_eq!(ConversationVisibility::Archived.archived_flag(), Some(false));
        assert_eq!(ConversationVisibility::Removed.archived_flag(), Some(true));
        assert_eq!(
            ConversationVisibility::from_archived_flag(None),
            ConversationVisibility::Active
        );
    }
}
