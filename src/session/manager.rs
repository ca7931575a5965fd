/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use crate::application::models::post::Publication;
use crate::application::services::remote_client::RemoteClient;
use crate::error::{SessionError, SessionResult};
use crate::session::auth::{VkAuth, VkAuthenticator};
use crate::session::state::SessionState;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Session manager over the default VK authenticator.
pub type VkSessionManager = SessionManager<VkAuth>;

/// Name-based front end over a [`RemoteClient`].
///
/// Every operation validates the local cache first and only then talks to the
/// API. Failures come back as [`SessionError`], whose `Display` is the reason to
/// show the user; they are logged here and never panic.
pub struct SessionManager<A: VkAuthenticator> {
    authenticator: A,
    client: Option<A::Client>,
    state: SessionState,
}

fn log_failure(operation: &str, err: SessionError) -> SessionError {
    error!("{} failed: {}", operation, err);
    err
}

impl<A: VkAuthenticator> SessionManager<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            client: None,
            state: SessionState::default(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Logs in, resolves the user and its requested groups, and loads their scheduled posts.
    ///
    /// Replaces any previous session. On failure the manager is left uninitialized.
    pub async fn initialize(
        &mut self,
        user_name: &str,
        access_token: &str,
        group_names: &[String],
    ) -> SessionResult<()> {
        info!("Initializing session for user: {}", user_name);
        self.client = None;
        self.state = SessionState::default();

        let client = self
            .authenticator
            .login(access_token)
            .await
            .map_err(|e| log_failure("initialize", e.into()))?;

        match Self::load_state(&client, user_name, group_names).await {
            Ok(state) => {
                info!(
                    "Session initialized: user {} with {} groups",
                    state.user_id(),
                    state.groups().len()
                );
                self.state = state;
                self.client = Some(client);
                Ok(())
            }
            Err(e) => Err(log_failure("initialize", e)),
        }
    }

    async fn load_state(
        client: &A::Client,
        user_name: &str,
        group_names: &[String],
    ) -> SessionResult<SessionState> {
        let user_id = client.resolve_user_id(user_name).await?;
        let administered = client.list_administered_groups(user_id).await?;
        let mut state = SessionState::new(user_id, administered, group_names);

        for group_id in state.group_ids() {
            let posts = client.list_scheduled_posts(group_id).await?;
            state.replace_scheduled_posts(group_id, posts);
        }

        Ok(state)
    }

    fn client(&self) -> SessionResult<&A::Client> {
        self.client.as_ref().ok_or(SessionError::NotInitialized)
    }

    /// Refreshes the album cache of a group and checks that every name resolves.
    pub async fn obtain_albums(
        &mut self,
        group_name: &str,
        album_names: &[String],
    ) -> SessionResult<()> {
        let result: SessionResult<()> = async {
            let client = self.client.as_ref().ok_or(SessionError::NotInitialized)?;
            let group_id = self.state.group_id(group_name)?;

            let fetched = client.list_albums(group_id).await?;
            let missing = self.state.merge_albums(group_id, &fetched, album_names);
            if !missing.is_empty() {
                return Err(SessionError::AlbumsNotFoundRemotely(missing));
            }

            debug!("All {} albums resolved in group {}", album_names.len(), group_name);
            Ok(())
        }
        .await;

        result.map_err(|e| log_failure("obtain_albums", e))
    }

    /// Publishes a scheduled post with images on the group wall, returning the post id.
    pub async fn post_publication(
        &self,
        group_name: &str,
        publication: &Publication,
    ) -> SessionResult<i64> {
        let result: SessionResult<i64> = async {
            let client = self.client()?;
            let group_id = self.state.group_id(group_name)?;
            Ok(client.post_publication(group_id, publication).await?)
        }
        .await;

        result.map_err(|e| log_failure("post_publication", e))
    }

    /// Uploads files into an album already resolved by [`Self::obtain_albums`].
    pub async fn upload_photos_to_album(
        &self,
        group_name: &str,
        album_name: &str,
        file_paths: &[PathBuf],
    ) -> SessionResult<usize> {
        let result: SessionResult<usize> = async {
            let client = self.client()?;
            let group_id = self.state.group_id(group_name)?;
            let album_id = self.state.album_id(group_name, album_name)?;
            Ok(client.upload_photos_to_album(group_id, album_id, file_paths).await?)
        }
        .await;

        result.map_err(|e| log_failure("upload_photos_to_album", e))
    }

    /// Refreshes scheduled posts of every known group, stopping at the first failure.
    pub async fn update_scheduled_posts(&mut self) -> SessionResult<()> {
        self.client().map_err(|e| log_failure("update_scheduled_posts", e))?;
        for group_id in self.state.group_ids() {
            self.refresh_scheduled_posts(group_id).await?;
        }
        Ok(())
    }

    /// Refreshes scheduled posts of the named groups, stopping at the first failure.
    pub async fn update_scheduled_posts_for(
        &mut self,
        group_names: &[String],
    ) -> SessionResult<()> {
        self.client().map_err(|e| log_failure("update_scheduled_posts", e))?;
        for group_name in group_names {
            self.update_group_scheduled_posts(group_name).await?;
        }
        Ok(())
    }

    pub async fn update_group_scheduled_posts(&mut self, group_name: &str) -> SessionResult<()> {
        let group_id = self
            .client()
            .and_then(|_| self.state.group_id(group_name))
            .map_err(|e| log_failure("update_scheduled_posts", e))?;
        self.refresh_scheduled_posts(group_id).await
    }

    async fn refresh_scheduled_posts(&mut self, group_id: i64) -> SessionResult<()> {
        let client = self.client.as_ref().ok_or(SessionError::NotInitialized)?;
        match client.list_scheduled_posts(group_id).await {
            Ok(posts) => {
                debug!("Group {} has {} scheduled posts", group_id, posts.len());
                self.state.replace_scheduled_posts(group_id, posts);
                Ok(())
            }
            Err(e) => Err(log_failure("update_scheduled_posts", e.into())),
        }
    }

    /// Deletes the cached scheduled post with the latest publication time.
    ///
    /// Succeeds without contacting the API when nothing is cached for the group.
    pub async fn delete_last_scheduled_publication(
        &mut self,
        group_name: &str,
    ) -> SessionResult<()> {
        let result: SessionResult<()> = async {
            let client = self.client.as_ref().ok_or(SessionError::NotInitialized)?;
            let group_id = self.state.group_id(group_name)?;

            let Some(last) = self.state.last_scheduled_post(group_id) else {
                debug!("No scheduled posts cached for group {}", group_name);
                return Ok(());
            };

            if !client.delete_post(group_id, last.id).await? {
                return Err(SessionError::DeleteRejected);
            }

            info!("Deleted scheduled post {} of group {}", last.id, group_name);
            self.state.remove_scheduled_post(group_id, last.id);
            Ok(())
        }
        .await;

        result.map_err(|e| log_failure("delete_last_scheduled_publication", e))
    }
}
