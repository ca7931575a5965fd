/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 17/10/26
 ******************************************************************************/
use serde::{Deserialize, Serialize};
use std::fmt;

/// Community returned by `groups.get` with `extended=1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: Option<String>,
    pub screen_name: String,
}

impl Group {
    /// Wall and album owner id of the group; VK encodes communities as negative owners.
    pub fn owner_id(group_id: i64) -> i64 {
        -group_id
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", s)
    }
}
