use serde::Deserialize;

/// Entry of a `photos.getAlbums` response
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub size: Option<u32>,
}
