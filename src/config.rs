//! Minimal runtime configuration helpers.
//! Credentials come from the environment, with a file fallback for setups
//! that keep them out of the process environment.

use std::{fs, path::Path};

use crate::client::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    /// Ecobee account username (email).
    pub username: String,
    /// Ecobee account password.
    pub password: String,
    /// Service base URL; overridable for testing against a stand-in service.
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Prefer env vars; fallback to credentials.txt in working directory
        // (username on the first line, password on the second).
        let env_username = std::env::var("ECOBEE_USERNAME").ok().filter(|v| !v.trim().is_empty());
        let env_password = std::env::var("ECOBEE_PASSWORD").ok().filter(|v| !v.trim().is_empty());

        let (username, password) = match (env_username, env_password) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                let path = Path::new("credentials.txt");
                match fs::read_to_string(path) {
                    Ok(s) => parse_credentials_file(&s)?,
                    Err(_) => {
                        return Err(
                            "Missing credentials: set ECOBEE_USERNAME and ECOBEE_PASSWORD or provide credentials.txt in working directory"
                                .to_string(),
                        );
                    }
                }
            }
        };

        let base_url = std::env::var("ECOBEE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Config {
            username,
            password,
            base_url,
        })
    }
}

fn parse_credentials_file(contents: &str) -> Result<(String, String), String> {
    let mut lines = contents.lines().map(str::trim).filter(|l| !l.is_empty());
    match (lines.next(), lines.next()) {
        (Some(user), Some(pass)) => Ok((user.to_string(), pass.to_string())),
        _ => Err("credentials.txt must contain a username line and a password line".to_string()),
    }
}
