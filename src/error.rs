/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use std::{fmt, io};
use std::fmt::{Display, Formatter};
use reqwest::StatusCode;

/// Failures raised while talking to the VK API.
#[derive(Debug)]
pub enum AppError {
    Network(reqwest::Error),
    Io(io::Error),
    Json(serde_json::Error),
    Unexpected(StatusCode),
    Api { code: i64, message: String },
    BlankToken,
    UserNotFound(String),
    EmptyResponse(String),
    PartialUpload { uploaded: usize, requested: usize },
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e)   => write!(f, "network error: {e}"),
            AppError::Io(e)        => write!(f, "io error: {e}"),
            AppError::Json(e)      => write!(f, "json error: {e}"),
            AppError::Unexpected(s)=> write!(f, "unexpected http status: {s}"),
            AppError::Api { code, message } => write!(f, "VK Api error {code}: {message}"),
            AppError::BlankToken    => write!(f, "VK Api - access token was blank."),
            AppError::UserNotFound(name) => write!(f, "VK Api - user ({name}) not found."),
            AppError::EmptyResponse(method) => write!(f, "VK Api - {method} returned no result."),
            AppError::PartialUpload { uploaded, requested } => {
                write!(f, "uploaded {uploaded} of {requested} images")
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self { AppError::Network(e) }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self { AppError::Io(e) }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Json(e) }
}

/// Reasons a [`crate::session::manager::SessionManager`] operation was refused or failed.
///
/// The `Display` text is the human-readable reason handed back to callers and is
/// kept literal so existing consumers can match on it.
#[derive(Debug)]
pub enum SessionError {
    NotInitialized,
    GroupNotFoundLocally(String),
    AlbumNotFoundLocally { group: String, album: String },
    AlbumsNotFoundRemotely(Vec<String>),
    PartialUpload { uploaded: usize, requested: usize },
    DeleteRejected,
    Remote(AppError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotInitialized => write!(f, "Not initialized."),
            SessionError::GroupNotFoundLocally(group) => {
                write!(f, "Group '{group}' not found locally. Try refresh groups.")
            }
            SessionError::AlbumNotFoundLocally { group, album } => write!(
                f,
                "Album '{album}' not found locally in group '{group}'. Try refresh albums."
            ),
            SessionError::AlbumsNotFoundRemotely(names) => {
                write!(f, "Not found albums: {}", names.join(", "))
            }
            SessionError::PartialUpload { uploaded: 0, .. } => write!(f, "Upload 0 images."),
            SessionError::PartialUpload { .. } => write!(f, "Images not uploaded."),
            SessionError::DeleteRejected => write!(f, "VK Api returned false."),
            SessionError::Remote(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AppError> for SessionError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::PartialUpload { uploaded, requested } => {
                SessionError::PartialUpload { uploaded, requested }
            }
            other => SessionError::Remote(other),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
