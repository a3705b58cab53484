// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::env;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Where the client finds the task API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    /// Reads `TASKMATE_API_URL`, falling back to `http://localhost:5000/api`.
    pub fn from_env() -> Self {
        Self::with_api_url(env::var("TASKMATE_API_URL").ok())
    }

    fn with_api_url(api_url: Option<String>) -> Self {
        Self {
            api_url: api_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_api_url(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_falls_back_to_default() {
        assert_eq!(ClientConfig::with_api_url(Some("  ".to_string())).api_url, DEFAULT_API_URL);
        assert_eq!(
            ClientConfig::with_api_url(Some("http://tasks.local/api".to_string())).api_url,
            "http://tasks.local/api"
        );
    }

    #[test]
    fn from_env_reads_api_url_or_defaults() {
        let expected = env::var("TASKMATE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        assert_eq!(ClientConfig::from_env().api_url, expected);
        assert_eq!(ClientConfig::default().api_url, DEFAULT_API_URL);
    }
}
