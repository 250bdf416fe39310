//! Session provider: the cookie-jar contract
//!
//! Credential acquisition (the login flow) is an external collaborator; this
//! module only loads previously saved cookies into a shared jar and answers
//! the "currently authenticated" check. The jar is handed to the HTTP client
//! read-only; only this provider ever populates it.

use reqwest::cookie::Jar;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Cookie names whose presence indicates a logged-in session
const SESSION_COOKIES: [&str; 2] = ["_jdb_session", "remember_me_token"];

/// Holds the shared cookie jar for all requests
pub struct Session {
    jar: Arc<Jar>,
    cookie_names: Vec<String>,
}

impl Session {
    /// An anonymous session with an empty jar
    pub fn anonymous() -> Self {
        Self {
            jar: Arc::new(Jar::default()),
            cookie_names: Vec::new(),
        }
    }

    /// Loads a `cookies.json` name/value map, attaching every cookie to
    /// every configured host
    ///
    /// A missing or unreadable file yields an anonymous session; the login
    /// collaborator is responsible for producing a valid file.
    pub fn from_cookie_file<P: AsRef<Path>>(path: P, hosts: &[String]) -> Self {
        let path = path.as_ref();
        let cookies: BTreeMap<String, String> = match std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
        {
            Some(cookies) => cookies,
            None => {
                tracing::debug!("No usable cookie file at {}", path.display());
                return Self::anonymous();
            }
        };

        let jar = Jar::default();
        for host in hosts {
            let origin = if host.contains("://") {
                host.clone()
            } else {
                format!("https://{}", host)
            };
            let Ok(url) = Url::parse(&origin) else {
                continue;
            };
            for (name, value) in &cookies {
                jar.add_cookie_str(&format!("{}={}", name, value), &url);
            }
        }

        tracing::info!("Loaded {} cookie(s) from {}", cookies.len(), path.display());
        Self {
            jar: Arc::new(jar),
            cookie_names: cookies.into_keys().collect(),
        }
    }

    /// Shared jar for the HTTP client builder
    pub fn cookie_jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Whether a session cookie is present
    ///
    /// A local presence check only; an expired cookie still counts until the
    /// site rejects it.
    pub fn is_authenticated(&self) -> bool {
        self.cookie_names
            .iter()
            .any(|name| SESSION_COOKIES.contains(&name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn hosts() -> Vec<String> {
        vec!["javdb.com".to_string()]
    }

    fn cookie_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_anonymous_is_not_authenticated() {
        assert!(!Session::anonymous().is_authenticated());
    }

    #[test]
    fn test_missing_file_yields_anonymous() {
        let session = Session::from_cookie_file("/nonexistent/cookies.json", &hosts());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_malformed_file_yields_anonymous() {
        let file = cookie_file("not json");
        let session = Session::from_cookie_file(file.path(), &hosts());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_cookie_marks_authenticated() {
        let file = cookie_file(r#"{"_jdb_session": "abc123", "theme": "dark"}"#);
        let session = Session::from_cookie_file(file.path(), &hosts());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_non_session_cookies_do_not_authenticate() {
        let file = cookie_file(r#"{"theme": "dark", "locale": "zh"}"#);
        let session = Session::from_cookie_file(file.path(), &hosts());
        assert!(!session.is_authenticated());
    }
}
