//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `PORT` | `8080` | listening port |
//! | `API_KEY` | — | shared secret callers send in `x-api-key` |
//! | `WP_BASEURL` | — | CMS origin, e.g. `https://blog.example.com` |
//! | `WP_USER` | — | CMS username |
//! | `WP_APP_PASSWORD` | — | CMS application password |
//! | `RELAY_UPSTREAM_STATUS` | `false` | relay the CMS status code instead of forcing `200` |

use std::fmt;

use crate::error::{Error, Result};

pub const DEFAULT_PORT: u16 = 8080;

/// How relayed upstream bodies are labelled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StatusPolicy {
    /// Every relayed body goes out as `200`, whatever the CMS said.
    #[default]
    AlwaysOk,
    /// The CMS status code is relayed as-is.
    Passthrough,
}

/// Immutable gateway configuration.
#[derive(Clone, Default)]
pub struct Config {
    pub port: u16,
    pub api_key: Option<String>,
    pub wp_base_url: String,
    pub wp_user: String,
    pub wp_app_password: String,
    pub status_policy: StatusPolicy,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration from any key → value source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|e| Error::Config {
                message: format!("PORT `{raw}` is not a valid port: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let status_policy = match get("RELAY_UPSTREAM_STATUS") {
            Some(raw) => match parse_bool(&raw) {
                Some(true) => StatusPolicy::Passthrough,
                Some(false) => StatusPolicy::AlwaysOk,
                None => {
                    return Err(Error::Config {
                        message: format!("RELAY_UPSTREAM_STATUS `{raw}` is not a boolean"),
                    });
                }
            },
            None => StatusPolicy::AlwaysOk,
        };

        Ok(Self {
            port,
            api_key: get("API_KEY"),
            wp_base_url: get("WP_BASEURL")
                .map(|u| u.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
            wp_user: get("WP_USER").unwrap_or_default(),
            wp_app_password: get("WP_APP_PASSWORD").unwrap_or_default(),
            status_policy,
        })
    }

    /// `0.0.0.0:{port}`.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Settings that are unset but that the gateway cannot do its job without.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("API_KEY");
        }
        if self.wp_base_url.is_empty() {
            missing.push("WP_BASEURL");
        }
        if self.wp_user.is_empty() {
            missing.push("WP_USER");
        }
        if self.wp_app_password.is_empty() {
            missing.push("WP_APP_PASSWORD");
        }
        missing
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |set: bool| if set { "<redacted>" } else { "<unset>" };
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("api_key", &redact(self.api_key.is_some()))
            .field("wp_base_url", &self.wp_base_url)
            .field("wp_user", &self.wp_user)
            .field("wp_app_password", &redact(!self.wp_app_password.is_empty()))
            .field("status_policy", &self.status_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.status_policy, StatusPolicy::AlwaysOk);
        assert_eq!(cfg.missing(), ["API_KEY", "WP_BASEURL", "WP_USER", "WP_APP_PASSWORD"]);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("PORT", "9000"),
            ("API_KEY", "k"),
            ("WP_BASEURL", "https://blog.example.com/"),
            ("WP_USER", "editor"),
            ("WP_APP_PASSWORD", "abcd efgh"),
            ("RELAY_UPSTREAM_STATUS", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.listen_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.wp_base_url, "https://blog.example.com");
        assert_eq!(cfg.wp_app_password, "abcd efgh");
        assert_eq!(cfg.status_policy, StatusPolicy::Passthrough);
        assert!(cfg.missing().is_empty());
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        assert_eq!(config(&[("API_KEY", "")]).unwrap().api_key, None);
    }

    #[test]
    fn rejects_bad_port_and_bool() {
        assert!(matches!(config(&[("PORT", "http")]), Err(Error::Config { .. })));
        assert!(matches!(config(&[("PORT", "70000")]), Err(Error::Config { .. })));
        assert!(matches!(config(&[("RELAY_UPSTREAM_STATUS", "maybe")]), Err(Error::Config { .. })));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = config(&[("API_KEY", "topsecret"), ("WP_APP_PASSWORD", "hunter2")]).unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("topsecret"));
        assert!(!shown.contains("hunter2"));
    }
}
