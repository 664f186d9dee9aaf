// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Anti-forgery token handling

use std::fmt;

/// Token forwarded on state-changing requests to the hosting site.
/// Empty when the cookie was not present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Pick `name` out of a `Cookie` header such as `a=1; csrftoken=xyz`
    pub fn from_cookie_header(header: &str, name: &str) -> Self {
        header
            .split(';')
            .filter_map(|pair| {
                let (key, value) = pair.trim().split_once('=')?;
                (key == name).then(|| value.to_string())
            })
            .next()
            .map(Self)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never log the value itself
        f.debug_tuple("CsrfToken")
            .field(&if self.0.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_found_among_cookies() {
        let token = CsrfToken::from_cookie_header("sessionid=abc; csrftoken=T0k3n; theme=dark", "csrftoken");
        assert_eq!(token.as_str(), "T0k3n");
    }

    #[test]
    fn test_missing_cookie_gives_empty_token() {
        let token = CsrfToken::from_cookie_header("sessionid=abc", "csrftoken");
        assert!(token.is_empty());
        assert!(CsrfToken::from_cookie_header("", "csrftoken").is_empty());
    }

    #[test]
    fn test_name_must_match_exactly() {
        let token = CsrfToken::from_cookie_header("xcsrftoken=bad;csrftoken=good", "csrftoken");
        assert_eq!(token.as_str(), "good");
    }

    #[test]
    fn test_debug_redacts_value() {
        let shown = format!("{:?}", CsrfToken::new("secret"));
        assert!(!shown.contains("secret"));
    }
}
