use serde::Serialize;

/// A quick-select custom status.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StatusPreset {
    pub label: &'static str,
    pub emoji: &'static str,
}

pub const STATUS_PRESETS: [StatusPreset; 5] = [
    StatusPreset { label: "In a meeting", emoji: "💼" },
    StatusPreset { label: "Focus time", emoji: "🎯" },
    StatusPreset { label: "On a break", emoji: "☕" },
    StatusPreset { label: "Lunch", emoji: "🍽️" },
    StatusPreset { label: "Out of office", emoji: "🏖️" },
];
