//! Browser identity profiles rotated across probe attempts.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl ClientIdentity {
    pub fn new(user_agent: &str, accept: &str, accept_language: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            accept: accept.to_string(),
            accept_language: accept_language.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdentityPool {
    profiles: Vec<ClientIdentity>,
}

impl IdentityPool {
    /// Builds a pool from explicit profiles; an empty list falls back to the defaults.
    pub fn new(profiles: Vec<ClientIdentity>) -> Self {
        if profiles.is_empty() {
            Self::default()
        } else {
            Self { profiles }
        }
    }

    pub fn pick(&self, index: usize) -> &ClientIdentity {
        &self.profiles[index % self.profiles.len()]
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

const ACCEPT_ANY: &str = "application/json, text/plain, */*";

impl Default for IdentityPool {
    fn default() -> Self {
        Self {
            profiles: vec![
                ClientIdentity::new(
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
                    ACCEPT_ANY,
                    "zh-CN,zh;q=0.9,en;q=0.8",
                ),
                ClientIdentity::new(
                    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
                    ACCEPT_ANY,
                    "en-US,en;q=0.9",
                ),
                ClientIdentity::new(
                    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                    "en-US,en;q=0.5",
                ),
                ClientIdentity::new(
                    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
                    ACCEPT_ANY,
                    "zh-CN,zh-Hans;q=0.9",
                ),
                ClientIdentity::new(
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
                    ACCEPT_ANY,
                    "en-GB,en;q=0.9",
                ),
            ],
        }
    }
}
