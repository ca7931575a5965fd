use serde::Deserialize;

/// Response of `photos.getWallUploadServer` and `photos.getUploadServer`
#[derive(Debug, Clone, Deserialize)]
pub struct UploadServer {
    pub upload_url: String,
}

/// Body returned by a wall upload target.
///
/// A rejected file comes back either with an empty `photo` list or as
/// `{"error": "..."}` with none of the other fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WallUploadResponse {
    pub server: i64,
    pub photo: String,
    pub hash: String,
    pub error: Option<String>,
}

impl WallUploadResponse {
    pub fn is_empty(&self) -> bool {
        self.error.is_some() || matches!(self.photo.trim(), "" | "[]")
    }
}

/// Body returned by an album upload target.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AlbumUploadResponse {
    pub server: i64,
    pub photos_list: String,
    pub aid: i64,
    pub hash: String,
    pub error: Option<String>,
}

impl AlbumUploadResponse {
    pub fn is_empty(&self) -> bool {
        self.error.is_some() || matches!(self.photos_list.trim(), "" | "[]")
    }
}

/// Saved photo as returned by `photos.saveWallPhoto` / `photos.save`
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub owner_id: i64,
}

impl Photo {
    /// Attachment reference understood by `wall.post`.
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.id)
    }
}
