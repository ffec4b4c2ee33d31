//! Runtime configuration resolved from environment variables with CLI
//! overrides applied in `main`. The base API URL and the token file path are
//! the only knobs the console needs; everything else lives server-side.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_file: PathBuf,
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = std::env::var("AGORA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token_file = std::env::var("AGORA_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_token_file());
        let page_size = page_size_from(std::env::var("AGORA_PAGE_SIZE").ok().as_deref());
        Self { api_url, token_file, page_size }
    }
}

fn page_size_from(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
}

fn default_token_file() -> PathBuf {
    // Keep the token next to the user's home when available, else the CWD.
    let base = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    base.join(".agora").join("session.json")
}
