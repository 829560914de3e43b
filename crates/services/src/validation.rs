use huddle_db::models::{CUSTOM_STATUS_MAX_LEN, MAX_MESSAGE_LEN};
use validator::Validate;

use crate::dao::base::{DaoError, DaoResult};

// validator compares string lengths as u64
const MESSAGE_MAX: u64 = MAX_MESSAGE_LEN as u64;
const CUSTOM_STATUS_MAX: u64 = CUSTOM_STATUS_MAX_LEN as u64;

#[derive(Debug, Validate)]
struct MessageBody {
    #[validate(length(min = 1, max = MESSAGE_MAX))]
    message: String,
}

#[derive(Debug, Validate)]
struct CustomStatusBody {
    #[validate(length(max = CUSTOM_STATUS_MAX))]
    custom_status: String,
}

/// Trims a chat message or announcement body and checks it is non-empty and
/// at most [`MAX_MESSAGE_LEN`] characters.
pub fn message_body(raw: &str) -> DaoResult<String> {
    let body = MessageBody {
        message: raw.trim().to_string(),
    };
    body.validate().map_err(|_| {
        if body.message.is_empty() {
            DaoError::Validation("Message cannot be empty".to_string())
        } else {
            DaoError::Validation(format!(
                "Message cannot exceed {MAX_MESSAGE_LEN} characters"
            ))
        }
    })?;
    Ok(body.message)
}

/// Trims a custom status. Empty is allowed and means "clear".
pub fn custom_status(raw: &str) -> DaoResult<String> {
    let body = CustomStatusBody {
        custom_status: raw.trim().to_string(),
    };
    body.validate().map_err(|_| {
        DaoError::Validation(format!(
            "Custom status cannot exceed {CUSTOM_STATUS_MAX_LEN} characters"
        ))
    })?;
    Ok(body.custom_status)
}
