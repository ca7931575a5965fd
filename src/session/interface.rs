use std::fmt;

/// Credentials attached to every VK method call.
#[derive(Clone, PartialEq, Eq)]
pub struct VkSession {
    pub access_token: String,
    pub api_version: String,
}

impl VkSession {
    pub fn new(access_token: &str, api_version: &str) -> Self {
        Self {
            access_token: access_token.trim().to_string(),
            api_version: api_version.to_string(),
        }
    }
}

impl fmt::Debug for VkSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VkSession")
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl fmt::Display for VkSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"access_token\":\"[REDACTED]\",\"api_version\":\"{}\"}}",
            self.api_version
        )
    }
}
