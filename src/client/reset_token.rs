use super::errors::ClientError;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use url::Url;

const RESET_SEGMENT: &str = "reset-password";

/// Opaque token taken from a password-reset link.
#[derive(Clone)]
pub struct ResetToken(SecretString);

impl ResetToken {
    /// Accepts a bare token, a `/reset-password/<token>` path or a full link.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] when no token can be found.
    pub fn parse(input: &str) -> Result<Self, ClientError> {
        let input = input.trim();

        let path = if is_link(input) {
            Url::parse(input).map_or_else(|_| input.to_string(), |url| url.path().to_string())
        } else {
            input.to_string()
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let token = segments
            .iter()
            .position(|segment| *segment == RESET_SEGMENT)
            .map_or_else(|| segments.last(), |index| segments.get(index + 1))
            .copied()
            .unwrap_or_default();

        if token.is_empty() {
            return Err(ClientError::Validation(
                "Reset link is missing its token".to_string(),
            ));
        }

        Ok(Self(SecretString::from(token.to_string())))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Only web links are taken apart; anything else is a token or a path.
fn is_link(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_token() {
        assert_eq!(ResetToken::parse(" abc123 ").unwrap().expose(), "abc123");
    }

    #[test]
    fn path_token() {
        assert_eq!(
            ResetToken::parse("/reset-password/abc123").unwrap().expose(),
            "abc123"
        );
    }

    #[test]
    fn link_token() {
        let token =
            ResetToken::parse("https://app.membership.dev/reset-password/abc123?utm=mail").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn colon_in_bare_token_is_kept() {
        assert_eq!(ResetToken::parse("a:b").unwrap().expose(), "a:b");
        assert_eq!(
            ResetToken::parse("mailto:abc").unwrap().expose(),
            "mailto:abc"
        );
        assert_eq!(
            ResetToken::parse("/reset-password/a:b").unwrap().expose(),
            "a:b"
        );
    }

    #[test]
    fn link_scheme_is_case_insensitive() {
        let token = ResetToken::parse("HTTPS://app.membership.dev/reset-password/abc123").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn link_without_reset_segment_uses_last_segment() {
        let token = ResetToken::parse("https://app.membership.dev/r/xyz").unwrap();
        assert_eq!(token.expose(), "xyz");
    }

    #[test]
    fn empty_inputs_are_rejected() {
        for input in ["", "   ", "/reset-password/", "https://app.membership.dev/"] {
            assert!(
                matches!(ResetToken::parse(input), Err(ClientError::Validation(_))),
                "{input:?} must be rejected"
            );
        }
    }

    #[test]
    fn debug_is_redacted() {
        let token = ResetToken::parse("abc123").unwrap();
        assert_eq!(format!("{token:?}"), "ResetToken([REDACTED])");
    }
}
