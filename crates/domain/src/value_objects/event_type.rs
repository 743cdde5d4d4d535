//! Event type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Size ceiling for a single event body: 32 KiB
pub const SINGLE_LIMIT: usize = 32 << 10;

/// Size ceiling for a batch/import body: 500 KiB
pub const BATCH_LIMIT: usize = 500 << 10;

/// Kind of analytics event a route accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Identify,
    Group,
    Alias,
    Page,
    Screen,
    Track,
    /// Many events in one body (`/v1/batch`, `/v1/import`)
    Batch,
}

impl EventType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identify => "identify",
            Self::Group => "group",
            Self::Alias => "alias",
            Self::Page => "page",
            Self::Screen => "screen",
            Self::Track => "track",
            Self::Batch => "batch",
        }
    }

    /// Largest body, in bytes, accepted for this event type
    pub const fn size_limit(&self) -> usize {
        match self {
            Self::Batch => BATCH_LIMIT,
            _ => SINGLE_LIMIT,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identify" => Ok(Self::Identify),
            "group" => Ok(Self::Group),
            "alias" => Ok(Self::Alias),
            "page" => Ok(Self::Page),
            "screen" => Ok(Self::Screen),
            "track" => Ok(Self::Track),
            "batch" | "import" => Ok(Self::Batch),
            other => Err(DomainError::UnknownEventType(other.to_string())),
        }
    }
}
