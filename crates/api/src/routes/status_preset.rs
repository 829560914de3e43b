use axum::Json;
use huddle_db::models::{STATUS_PRESETS, StatusPreset};

pub async fn list() -> Json<&'static [StatusPreset]> {
    Json(&STATUS_PRESETS)
}
