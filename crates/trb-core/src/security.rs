use crate::domain::UserId;

// ============== Authorization ==============

/// Only the configured owner may talk to the bot. Updates without a sender
/// (channel posts, anonymous admins) are never authorized.
pub fn is_authorized(user_id: Option<UserId>, owner: UserId) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    user_id == owner
}
