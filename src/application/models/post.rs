/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Raw wall entry from `wall.get`; `date` is a unix timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct WallPost {
    pub id: i64,
    pub date: i64,
}

/// Postponed wall post kept in the session cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: i64,
    pub scheduled_at: DateTime<Utc>,
}

impl ScheduledPost {
    pub fn new(id: i64, scheduled_at: DateTime<Utc>) -> Self {
        Self { id, scheduled_at }
    }

    /// Converts a wall entry, returning `None` for timestamps chrono cannot represent.
    pub fn from_wall_post(post: &WallPost) -> Option<Self> {
        DateTime::from_timestamp(post.date, 0).map(|scheduled_at| Self::new(post.id, scheduled_at))
    }
}

impl fmt::Display for ScheduledPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"id\":{},\"scheduled_at\":\"{}\"}}",
            self.id,
            self.scheduled_at.to_rfc3339()
        )
    }
}

/// Response of `wall.post`
#[derive(Debug, Clone, Deserialize)]
pub struct PostCreated {
    pub post_id: i64,
}

/// A wall post to be published from the group at `publish_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub message: String,
    pub publish_at: DateTime<Utc>,
    pub copyright: Option<String>,
    /// Images attached in this order.
    pub image_paths: Vec<PathBuf>,
}

impl Publication {
    pub fn new(message: impl Into<String>, publish_at: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            publish_at,
            copyright: None,
            image_paths: Vec::new(),
        }
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        let copyright = copyright.into();
        self.copyright = if copyright.trim().is_empty() { None } else { Some(copyright) };
        self
    }

    pub fn with_images<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.image_paths = paths.into_iter().map(Into::into).collect();
        self
    }
}
