use crate::common::context::Context;
use crate::common::error::{ServiceResult, storage};
use crate::repositories::deleted_messages;
use tracing::info;

/// Hides a message from one participant. Other participants still see it.
pub async fn hide<C: Context>(
    ctx: &C,
    message_id: u64,
    participant_id: i64,
) -> ServiceResult<bool> {
    match deleted_messages::hide(ctx, message_id, participant_id).await {
        Ok(hidden) => {
            if hidden {
                info!(message_id, participant_id, "Hid message");
            }
            Ok(hidden)
        }
        Err(e) => storage(e),
    }
}

pub async fn unhide<C: Context>(
    ctx: &C,
    message_id: u64,
    participant_id: i64,
) -> ServiceResult<bool> {
    match deleted_messages::unhide(ctx, message_id, participant_id).await {
        Ok(restored) => Ok(restored),
        Err(e) => storage(e),
    }
}
