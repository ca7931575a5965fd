/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

pub const DEFAULT_BASE_URL: &str = "https://api.vk.com/method";
pub const DEFAULT_API_VERSION: &str = "5.131";
pub const DEFAULT_REST_TIMEOUT: u64 = 30;

pub(crate) const ACCESS_TOKEN_PARAM: &str = "access_token";
pub(crate) const VERSION_PARAM: &str = "v";
pub(crate) const USER_AGENT: &str = "vk-rs/0.1";

/// Page size used when walking `wall.get`; the API caps it at 100.
pub(crate) const WALL_PAGE_SIZE: usize = 100;
/// Page size used when walking `groups.get`; the API caps it at 1000.
pub(crate) const GROUPS_PAGE_SIZE: usize = 1000;

pub(crate) const WALL_UPLOAD_FIELD: &str = "photo";
pub(crate) const ALBUM_UPLOAD_FIELD: &str = "file1";
