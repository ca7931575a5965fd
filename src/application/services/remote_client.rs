use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    application::models::{
        album::Album,
        group::Group,
        photo::{AlbumUploadResponse, Photo, UploadServer, WallUploadResponse},
        post::{PostCreated, Publication, ScheduledPost, WallPost},
        user::User,
    },
    constants::{ALBUM_UPLOAD_FIELD, GROUPS_PAGE_SIZE, WALL_PAGE_SIZE, WALL_UPLOAD_FIELD},
    error::AppError,
    session::interface::VkSession,
    transport::{
        http_client::{Params, VkHttpClient},
        model::ItemsResponse,
    },
};

/// Outbound operations against the VK API used by the session manager.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Resolves a user's numeric id from a screen name or id string
    async fn resolve_user_id(&self, user_name: &str) -> Result<i64, AppError>;

    /// Groups where the user is moderator or above, keyed by screen name
    async fn list_administered_groups(
        &self,
        user_id: i64,
    ) -> Result<HashMap<String, i64>, AppError>;

    /// Albums of a group, keyed by title
    async fn list_albums(&self, group_id: i64) -> Result<HashMap<String, i64>, AppError>;

    /// Postponed posts of a group whose publication time is still ahead
    async fn list_scheduled_posts(&self, group_id: i64) -> Result<Vec<ScheduledPost>, AppError>;

    /// Deletes a wall post, reporting whether the API accepted the request
    async fn delete_post(&self, group_id: i64, post_id: i64) -> Result<bool, AppError>;

    /// Uploads the images and creates the scheduled post, returning its id
    async fn post_publication(
        &self,
        group_id: i64,
        publication: &Publication,
    ) -> Result<i64, AppError>;

    /// Uploads and saves each file into the album, returning how many were saved
    async fn upload_photos_to_album(
        &self,
        group_id: i64,
        album_id: i64,
        file_paths: &[PathBuf],
    ) -> Result<usize, AppError>;
}

/// [`RemoteClient`] backed by the VK HTTP API
pub struct VkRemoteClient<T: VkHttpClient> {
    http: Arc<T>,
    session: VkSession,
}

impl<T: VkHttpClient> VkRemoteClient<T> {
    pub fn new(http: Arc<T>, session: VkSession) -> Self {
        Self { http, session }
    }

    pub fn session(&self) -> &VkSession {
        &self.session
    }

    async fn save_wall_photo(
        &self,
        group_id: i64,
        upload_url: &str,
        path: &Path,
    ) -> Result<Option<Photo>, AppError> {
        let uploaded: WallUploadResponse =
            self.http.upload(upload_url, WALL_UPLOAD_FIELD, path).await?;
        if uploaded.is_empty() {
            if let Some(reason) = &uploaded.error {
                error!("Upload target rejected {}: {}", path.display(), reason);
            }
            return Ok(None);
        }

        let saved: Vec<Photo> = self
            .http
            .call(
                "photos.saveWallPhoto",
                &self.session,
                vec![
                    ("group_id", group_id.to_string()),
                    ("server", uploaded.server.to_string()),
                    ("photo", uploaded.photo),
                    ("hash", uploaded.hash),
                ],
            )
            .await?;

        Ok(saved.into_iter().next())
    }

    async fn upload_photos_to_wall(
        &self,
        group_id: i64,
        paths: &[PathBuf],
    ) -> Result<Vec<Photo>, AppError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let server: UploadServer = self
            .http
            .call(
                "photos.getWallUploadServer",
                &self.session,
                vec![("group_id", group_id.to_string())],
            )
            .await?;

        let mut photos = Vec::with_capacity(paths.len());
        for path in paths {
            match self.save_wall_photo(group_id, &server.upload_url, path).await? {
                Some(photo) => photos.push(photo),
                None => {
                    error!("Can't upload photo - {}", path.display());
                    return Err(AppError::PartialUpload {
                        uploaded: photos.len(),
                        requested: paths.len(),
                    });
                }
            }
        }

        Ok(photos)
    }
}

#[async_trait]
impl<T: VkHttpClient + 'static> RemoteClient for VkRemoteClient<T> {
    async fn resolve_user_id(&self, user_name: &str) -> Result<i64, AppError> {
        info!("Resolving user id for: {}", user_name);

        let users: Vec<User> = self
            .http
            .call("users.get", &self.session, vec![("user_ids", user_name.to_string())])
            .await?;

        let user = users
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UserNotFound(user_name.to_string()))?;

        debug!("User {} resolved to id {}", user_name, user.id);
        Ok(user.id)
    }

    async fn list_administered_groups(
        &self,
        user_id: i64,
    ) -> Result<HashMap<String, i64>, AppError> {
        info!("Fetching groups administered by user {}", user_id);

        let mut offset = 0;
        let mut groups = HashMap::new();

        loop {
            let page: ItemsResponse<Group> = self
                .http
                .call(
                    "groups.get",
                    &self.session,
                    vec![
                        ("user_id", user_id.to_string()),
                        ("extended", "1".to_string()),
                        ("filter", "moderator".to_string()),
                        ("offset", offset.to_string()),
                        ("count", GROUPS_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.items.len();
            for group in page.items {
                groups.entry(group.screen_name).or_insert(group.id);
            }

            offset += fetched;
            if fetched == 0 || offset >= page.count {
                break;
            }
        }

        debug!("Groups obtained: {} groups", groups.len());
        Ok(groups)
    }

    async fn list_albums(&self, group_id: i64) -> Result<HashMap<String, i64>, AppError> {
        info!("Fetching albums of group {}", group_id);

        let result: ItemsResponse<Album> = self
            .http
            .call(
                "photos.getAlbums",
                &self.session,
                vec![("owner_id", Group::owner_id(group_id).to_string())],
            )
            .await?;

        let mut albums = HashMap::with_capacity(result.items.len());
        for album in result.items {
            albums.entry(album.title).or_insert(album.id);
        }

        debug!("Albums obtained: {} albums", albums.len());
        Ok(albums)
    }

    async fn list_scheduled_posts(&self, group_id: i64) -> Result<Vec<ScheduledPost>, AppError> {
        info!("Fetching scheduled posts of group {}", group_id);

        let now = Utc::now();
        let mut offset = 0;
        let mut out = Vec::new();

        loop {
            let page: ItemsResponse<WallPost> = self
                .http
                .call(
                    "wall.get",
                    &self.session,
                    vec![
                        ("owner_id", Group::owner_id(group_id).to_string()),
                        ("filter", "postponed".to_string()),
                        ("offset", offset.to_string()),
                        ("count", WALL_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.items.len();
            out.extend(
                page.items
                    .iter()
                    .filter_map(ScheduledPost::from_wall_post)
                    .filter(|post| post.scheduled_at > now),
            );

            offset += fetched;
            if fetched == 0 || offset >= page.count {
                break;
            }
        }

        debug!("Scheduled posts obtained: {} posts", out.len());
        Ok(out)
    }

    async fn delete_post(&self, group_id: i64, post_id: i64) -> Result<bool, AppError> {
        info!("Deleting post {} of group {}", post_id, group_id);

        let result: i64 = self
            .http
            .call(
                "wall.delete",
                &self.session,
                vec![
                    ("owner_id", Group::owner_id(group_id).to_string()),
                    ("post_id", post_id.to_string()),
                ],
            )
            .await?;

        Ok(result == 1)
    }

    async fn post_publication(
        &self,
        group_id: i64,
        publication: &Publication,
    ) -> Result<i64, AppError> {
        info!(
            "Publishing post with {} images to group {} at {}",
            publication.image_paths.len(),
            group_id,
            publication.publish_at
        );

        let photos = self.upload_photos_to_wall(group_id, &publication.image_paths).await?;
        let attachments = photos
            .iter()
            .map(Photo::attachment)
            .collect::<Vec<_>>()
            .join(",");

        let mut params: Params = vec![
            ("owner_id", Group::owner_id(group_id).to_string()),
            ("from_group", "1".to_string()),
            ("message", publication.message.clone()),
            ("publish_date", publication.publish_at.timestamp().to_string()),
        ];
        if let Some(copyright) = &publication.copyright {
            params.push(("copyright", copyright.clone()));
        }
        if !attachments.is_empty() {
            params.push(("attachments", attachments));
        }

        let created: PostCreated = self.http.call("wall.post", &self.session, params).await?;

        debug!("Post created with id: {}", created.post_id);
        Ok(created.post_id)
    }

    async fn upload_photos_to_album(
        &self,
        group_id: i64,
        album_id: i64,
        file_paths: &[PathBuf],
    ) -> Result<usize, AppError> {
        info!(
            "Uploading {} photos to album {} of group {}",
            file_paths.len(),
            album_id,
            group_id
        );
        if file_paths.is_empty() {
            return Ok(0);
        }

        let server: UploadServer = self
            .http
            .call(
                "photos.getUploadServer",
                &self.session,
                vec![
                    ("album_id", album_id.to_string()),
                    ("group_id", group_id.to_string()),
                ],
            )
            .await?;

        let mut saved_count = 0;
        for path in file_paths {
            let uploaded: AlbumUploadResponse = self
                .http
                .upload(&server.upload_url, ALBUM_UPLOAD_FIELD, path)
                .await?;
            if uploaded.is_empty() {
                error!(
                    "Can't upload photo - {}: {}",
                    path.display(),
                    uploaded.error.as_deref().unwrap_or("empty photos list")
                );
                return Err(AppError::EmptyResponse(format!("upload of {}", path.display())));
            }

            let _saved: Vec<Photo> = self
                .http
                .call(
                    "photos.save",
                    &self.session,
                    vec![
                        ("album_id", album_id.to_string()),
                        ("group_id", group_id.to_string()),
                        ("server", uploaded.server.to_string()),
                        ("photos_list", uploaded.photos_list),
                        ("hash", uploaded.hash),
                    ],
                )
                .await?;
            saved_count += 1;
        }

        debug!("Saved {} photos to album {}", saved_count, album_id);
        Ok(saved_count)
    }
}
