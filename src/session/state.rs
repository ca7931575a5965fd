/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use crate::application::models::post::ScheduledPost;
use crate::error::{SessionError, SessionResult};
use std::collections::HashMap;

/// Local name → id cache of a session.
///
/// Groups are fixed at initialization; albums and scheduled posts are filled in
/// by explicit refreshes. Lookups never reach the network: a miss is reported as
/// a [`SessionError`] telling the caller which refresh is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    user_id: i64,
    groups_by_name: HashMap<String, i64>,
    albums_by_name_by_group: HashMap<i64, HashMap<String, i64>>,
    scheduled_posts_by_group: HashMap<i64, Vec<ScheduledPost>>,
}

impl SessionState {
    /// Keeps only the administered groups whose screen name was requested.
    pub fn new(user_id: i64, administered: HashMap<String, i64>, requested: &[String]) -> Self {
        let groups_by_name = administered
            .into_iter()
            .filter(|(name, _)| requested.contains(name))
            .collect();

        Self {
            user_id,
            groups_by_name,
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn groups(&self) -> &HashMap<String, i64> {
        &self.groups_by_name
    }

    pub fn group_ids(&self) -> Vec<i64> {
        self.groups_by_name.values().copied().collect()
    }

    pub fn group_id(&self, group_name: &str) -> SessionResult<i64> {
        self.groups_by_name
            .get(group_name)
            .copied()
            .ok_or_else(|| SessionError::GroupNotFoundLocally(group_name.to_string()))
    }

    pub fn albums(&self, group_id: i64) -> Option<&HashMap<String, i64>> {
        self.albums_by_name_by_group.get(&group_id)
    }

    pub fn album_id(&self, group_name: &str, album_name: &str) -> SessionResult<i64> {
        let group_id = self.group_id(group_name)?;
        self.albums_by_name_by_group
            .get(&group_id)
            .and_then(|albums| albums.get(album_name))
            .copied()
            .ok_or_else(|| SessionError::AlbumNotFoundLocally {
                group: group_name.to_string(),
                album: album_name.to_string(),
            })
    }

    /// Caches the requested titles found in `fetched`, keeping ids already cached.
    ///
    /// Returns the requested titles that still do not resolve, in request order.
    pub fn merge_albums(
        &mut self,
        group_id: i64,
        fetched: &HashMap<String, i64>,
        requested: &[String],
    ) -> Vec<String> {
        let cached = self.albums_by_name_by_group.entry(group_id).or_default();

        for (title, album_id) in fetched {
            if requested.contains(title) {
                cached.entry(title.clone()).or_insert(*album_id);
            }
        }

        requested
            .iter()
            .filter(|name| !cached.contains_key(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn scheduled_posts(&self, group_id: i64) -> &[ScheduledPost] {
        self.scheduled_posts_by_group
            .get(&group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn replace_scheduled_posts(&mut self, group_id: i64, posts: Vec<ScheduledPost>) {
        self.scheduled_posts_by_group.insert(group_id, posts);
    }

    /// Latest cached post of the group; the earliest cached one wins a tie.
    pub fn last_scheduled_post(&self, group_id: i64) -> Option<ScheduledPost> {
        self.scheduled_posts(group_id)
            .iter()
            .fold(None, |latest: Option<ScheduledPost>, post| match latest {
                Some(current) if current.scheduled_at >= post.scheduled_at => Some(current),
                _ => Some(*post),
            })
    }

    pub fn remove_scheduled_post(&mut self, group_id: i64, post_id: i64) {
        if let Some(posts) = self.scheduled_posts_by_group.get_mut(&group_id) {
            posts.retain(|post| post.id != post_id);
        }
    }
}
