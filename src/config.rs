use crate::constants::{DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_REST_TIMEOUT};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

#[derive(Deserialize, Clone)]
pub struct Credentials {
    pub user_name: String,
    pub access_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub rest_api: RestApiConfig,
    /// Screen names of the groups the session should manage.
    pub groups: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    pub api_version: String,
    pub timeout: u64,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"user_name\":\"{}\",\"access_token\":\"[REDACTED]\"}}",
            self.user_name
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups = serde_json::to_string(&self.groups).map_err(|_| fmt::Error)?;
        write!(
            f,
            "{{\"credentials\":{},\"rest_api\":{},\"groups\":{}}}",
            self.credentials, self.rest_api, groups
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"api_version\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.api_version, self.timeout
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma-separated list, dropping blank entries.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for RestApiConfig {
    fn default() -> Self {
        RestApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_REST_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: Credentials {
                user_name: get_env_or_default("VK_USER_NAME", String::from("default_user")),
                access_token: get_env_or_default("VK_ACCESS_TOKEN", String::new()),
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default("VK_REST_BASE_URL", String::from(DEFAULT_BASE_URL)),
                api_version: get_env_or_default(
                    "VK_API_VERSION",
                    String::from(DEFAULT_API_VERSION),
                ),
                timeout: get_env_or_default("VK_REST_TIMEOUT", DEFAULT_REST_TIMEOUT),
            },
            groups: parse_list(&get_env_or_default("VK_GROUPS", String::new())),
        }
    }
}
