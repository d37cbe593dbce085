// =============================================================================
// Shared types used across the indicator engine and its API
// =============================================================================

use serde::{Deserialize, Serialize};

/// Direction of a trend-following indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Body direction of a single candle, used for chart colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stick {
    Up,
    Down,
}

impl Stick {
    /// Colour the renderer paints this candle with.
    pub fn color(self) -> &'static str {
        match self {
            Self::Up => "green",
            Self::Down => "red",
        }
    }
}
