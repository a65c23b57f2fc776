use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, storage};
use crate::models::conversations::{
    Conversation, ConversationPreview, ConversationThread, NewConversation,
};
use crate::models::filters::Filters;
use crate::models::messages::Message;
use crate::models::pagination::Listing;
use crate::models::participants::Participant;
use crate::models::visibility::{ConversationVisibility, View, VisibilityMarker};
use crate::repositories::{conversations, deleted_conversations, messages, participants};
use hashbrown::HashMap;
use tracing::{info, warn};

pub async fn create<C: Context>(
    ctx: &C,
    attributes: NewConversation,
) -> ServiceResult<Conversation> {
    let conversation_id = match conversations::create(ctx, attributes.subject.as_deref()).await {
        Ok(conversation_id) => conversation_id,
        Err(e) => return storage(e),
    };
    info!(conversation_id, "Created conversation");
    fetch_one(ctx, conversation_id).await
}

pub async fn fetch_one<C: Context>(ctx: &C, conversation_id: u64) -> ServiceResult<Conversation> {
    match conversations::fetch_one(ctx, conversation_id).await {
        Ok(conversation) => Ok(Conversation::from(conversation)),
        Err(sqlx::Error::RowNotFound) => Err(AppError::ConversationsNotFound),
        Err(e) => storage(e),
    }
}

/// Bumps `updated_at` and returns the refreshed conversation.
pub async fn update_time<C: Context>(
    ctx: &C,
    conversation_id: u64,
) -> ServiceResult<Conversation> {
    if let Err(e) = conversations::touch(ctx, conversation_id).await {
        return storage(e);
    }
    fetch_one(ctx, conversation_id).await
}

pub async fn find<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    view: View,
) -> ServiceResult<Conversation> {
    match conversations::fetch_visible(ctx, conversation_id, participant_id, view).await {
        Ok(conversation) => Ok(Conversation::from(conversation)),
        Err(sqlx::Error::RowNotFound) => Err(AppError::ConversationsNotFound),
        Err(e) => storage(e),
    }
}

pub async fn find_active<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<Conversation> {
    find(ctx, conversation_id, participant_id, View::Active).await
}

pub async fn find_archived<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<Conversation> {
    find(ctx, conversation_id, participant_id, View::Archived).await
}

pub async fn find_readable<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<Conversation> {
    find(ctx, conversation_id, participant_id, View::Readable).await
}

/// Opens a conversation for reading. Without a participant every message is
/// returned and filters are not applied.
pub async fn get_messages<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: Option<i64>,
    filters: &Filters,
) -> ServiceResult<ConversationThread> {
    match participant_id {
        Some(participant_id) => {
            let conversation = find_readable(ctx, conversation_id, participant_id).await?;
            load_thread(ctx, conversation, participant_id, filters).await
        }
        None => {
            let conversation = fetch_one(ctx, conversation_id).await?;
            let participants = fetch_participants(ctx, &[conversation_id], None).await?;
            let messages = match messages::fetch_all(ctx, conversation_id).await {
                Ok(messages) => messages.into_iter().map(Message::from).collect(),
                Err(e) => return storage(e),
            };
            Ok(ConversationThread {
                conversation,
                participants,
                messages,
                page: None,
            })
        }
    }
}

pub async fn get_messages_on_archived_conversation<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    filters: &Filters,
) -> ServiceResult<ConversationThread> {
    let conversation = find_archived(ctx, conversation_id, participant_id).await?;
    load_thread(ctx, conversation, participant_id, filters).await
}

async fn load_thread<C: Context>(
    ctx: &C,
    conversation: Conversation,
    participant_id: i64,
    filters: &Filters,
) -> ServiceResult<ConversationThread> {
    let conversation_id = conversation.conversation_id;
    let plan = filters.plan();

    let participants = fetch_participants(ctx, &[conversation_id], None).await?;
    let messages = match messages::fetch_visible(ctx, conversation_id, participant_id, &plan).await
    {
        Ok(messages) => messages.into_iter().map(Message::from).collect(),
        Err(e) => return storage(e),
    };

    let page = match plan.pagination {
        Some(pagination) => {
            match messages::count_visible(ctx, conversation_id, participant_id).await {
                Ok(total) => Some(pagination.page_info(total)),
                Err(e) => return storage(e),
            }
        }
        None => None,
    };

    Ok(ConversationThread {
        conversation,
        participants,
        messages,
        page,
    })
}

/// Conversations the participant has not archived or removed, each with its
/// newest message unless the participant hid it.
pub async fn get_lists<C: Context>(
    ctx: &C,
    participant_id: i64,
    filters: &Filters,
) -> ServiceResult<Listing<ConversationPreview>> {
    list(ctx, participant_id, View::Active, filters).await
}

pub async fn get_archived_lists<C: Context>(
    ctx: &C,
    participant_id: i64,
    filters: &Filters,
) -> ServiceResult<Listing<ConversationPreview>> {
    list(ctx, participant_id, View::Archived, filters).await
}

async fn list<C: Context>(
    ctx: &C,
    participant_id: i64,
    view: View,
    filters: &Filters,
) -> ServiceResult<Listing<ConversationPreview>> {
    let plan = filters.plan();
    let conversations =
        match conversations::fetch_visible_list(ctx, participant_id, view, &plan).await {
            Ok(conversations) => conversations,
            Err(e) => return storage(e),
        };
    let conversation_ids: Vec<u64> = conversations.iter().map(|c| c.id).collect();

    let excluded_participant_id = (!filters.includes_founder()).then_some(participant_id);
    let mut participants_by_conversation: HashMap<u64, Vec<Participant>> = HashMap::new();
    for participant in fetch_participants(ctx, &conversation_ids, excluded_participant_id).await? {
        participants_by_conversation
            .entry(participant.conversation_id)
            .or_default()
            .push(participant);
    }

    let mut last_messages: HashMap<u64, Message> =
        match messages::fetch_latest_visible(ctx, &conversation_ids, participant_id).await {
            Ok(messages) => messages
                .into_iter()
                .map(|message| (message.conversation_id, Message::from(message)))
                .collect(),
            Err(e) => return storage(e),
        };

    let page = match plan.pagination {
        Some(pagination) => match conversations::count_visible(ctx, participant_id, view).await {
            Ok(total) => Some(pagination.page_info(total)),
            Err(e) => return storage(e),
        },
        None => None,
    };

    let items = conversations
        .into_iter()
        .map(|conversation| {
            let conversation_id = conversation.id;
            ConversationPreview {
                conversation: Conversation::from(conversation),
                participants: participants_by_conversation
                    .remove(&conversation_id)
                    .unwrap_or_default(),
                last_message: last_messages.remove(&conversation_id),
            }
        })
        .collect();

    Ok(Listing { items, page })
}

async fn fetch_participants<C: Context>(
    ctx: &C,
    conversation_ids: &[u64],
    excluded_participant_id: Option<i64>,
) -> ServiceResult<Vec<Participant>> {
    match participants::fetch_for_conversations(ctx, conversation_ids, excluded_participant_id)
        .await
    {
        Ok(participants) => Ok(participants.into_iter().map(Participant::from).collect()),
        Err(e) => storage(e),
    }
}

pub async fn visibility<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<ConversationVisibility> {
    match deleted_conversations::fetch_one(ctx, conversation_id, participant_id).await {
        Ok(marker) => Ok(ConversationVisibility::from(Some(&marker))),
        Err(sqlx::Error::RowNotFound) => Ok(ConversationVisibility::Active),
        Err(e) => storage(e),
    }
}

/// Whether `view` shows the conversation to the participant, judged from the
/// stored marker rather than the view query.
pub async fn is_visible<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    view: View,
) -> ServiceResult<bool> {
    let visibility = visibility(ctx, conversation_id, participant_id).await?;
    Ok(view.admits(visibility))
}

/// Archives the conversation for the participant. `None` means the marker
/// could not be read back after the write.
pub async fn archive<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<Option<VisibilityMarker>> {
    mark(ctx, conversation_id, participant_id, false).await
}

/// Hides the conversation from the participant in every view until restored.
pub async fn force_remove<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<Option<VisibilityMarker>> {
    mark(ctx, conversation_id, participant_id, true).await
}

async fn mark<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
    archived: bool,
) -> ServiceResult<Option<VisibilityMarker>> {
    let upserted =
        deleted_conversations::upsert(ctx, conversation_id, participant_id, archived).await;
    if let Err(e) = upserted {
        return storage(e);
    }

    match deleted_conversations::fetch_one(ctx, conversation_id, participant_id).await {
        Ok(marker) => {
            let marker = VisibilityMarker::from(marker);
            info!(
                conversation_id,
                participant_id,
                visibility = marker.visibility.as_str(),
                "Updated conversation visibility"
            );
            Ok(Some(marker))
        }
        Err(sqlx::Error::RowNotFound) => {
            warn!(
                conversation_id,
                participant_id, "Conversation marker missing right after being written"
            );
            Ok(None)
        }
        Err(e) => storage(e),
    }
}

/// Drops the participant's marker. `false` when there was nothing to restore.
pub async fn restore<C: Context>(
    ctx: &C,
    conversation_id: u64,
    participant_id: i64,
) -> ServiceResult<bool> {
    match deleted_conversations::delete(ctx, conversation_id, participant_id).await {
        Ok(true) => {
            info!(conversation_id, participant_id, "Restored conversation");
            Ok(true)
        }
        Ok(false) => Ok(false),
        Err(e) => storage(e),
    }
}
