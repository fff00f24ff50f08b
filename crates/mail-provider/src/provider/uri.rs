//! URI matching for the provider's addressing scheme
//!
//! The only recognized address shape is
//! `content://org.vegamail.provider.email/account/<accountUuid>/messages`.
//! Anything else is a contract violation and fails before any registry
//! or store access.

use url::Url;

use super::ProviderError;

/// URI scheme for provider addresses.
pub const SCHEME: &str = "content";

/// Authority serving the message collections.
pub const AUTHORITY: &str = "org.vegamail.provider.email";

/// A recognized provider address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriMatch {
    /// `content://<authority>/account/<uuid>/messages`
    Messages { account_uuid: String },
}

/// Build the canonical messages URI for an account.
pub fn messages_uri(account_uuid: &str) -> String {
    format!("{SCHEME}://{AUTHORITY}/account/{account_uuid}/messages")
}

/// Match `uri` against the recognized address shapes.
pub fn match_uri(uri: &str) -> Result<UriMatch, ProviderError> {
    let invalid = || ProviderError::InvalidUri {
        uri: uri.to_string(),
    };

    let parsed = Url::parse(uri).map_err(|_| invalid())?;
    if parsed.scheme() != SCHEME || parsed.host_str() != Some(AUTHORITY) {
        return Err(invalid());
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["account", uuid, "messages"] if !uuid.is_empty() => Ok(UriMatch::Messages {
            account_uuid: (*uuid).to_string(),
        }),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_uri_matches() {
        let uri = messages_uri("3f8e2c1a");
        assert_eq!(
            uri,
            "content://org.vegamail.provider.email/account/3f8e2c1a/messages"
        );
        assert_eq!(
            match_uri(&uri).unwrap(),
            UriMatch::Messages {
                account_uuid: "3f8e2c1a".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_wrong_scheme() {
        let uri = "https://org.vegamail.provider.email/account/3f8e/messages";
        assert!(matches!(
            match_uri(uri),
            Err(ProviderError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_authority() {
        let uri = "content://org.elsewhere.provider/account/3f8e/messages";
        assert!(matches!(
            match_uri(uri),
            Err(ProviderError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        for uri in [
            "content://org.vegamail.provider.email",
            "content://org.vegamail.provider.email/account/3f8e",
            "content://org.vegamail.provider.email/account/3f8e/folders",
            "content://org.vegamail.provider.email/account/3f8e/messages/7",
            "content://org.vegamail.provider.email/account//messages",
            "not a uri",
        ] {
            assert!(
                matches!(match_uri(uri), Err(ProviderError::InvalidUri { .. })),
                "should reject: {uri}"
            );
        }
    }
}
