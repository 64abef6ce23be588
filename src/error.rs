/// A boxed error, as returned by the pluggable SSO providers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error that occurred while logging in.
///
/// There is one variant per login method. The message is the method prefix (e.g. `AWS SSO login: `)
/// followed by the message of the underlying failure, which also remains available through
/// [`source`](std::error::Error::source) for downcasting.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Login with a named profile failed.
    #[error("AWS profile login: {0}")]
    Profile(#[source] BoxError),

    /// Login with IAM access key credentials failed.
    #[error("AWS IAM login: {0}")]
    Iam(#[source] BoxError),

    /// Login with SSO failed.
    #[error("AWS SSO login: {0}")]
    Sso(#[source] BoxError),
}

impl LoginError {
    pub(crate) fn profile(error: impl Into<BoxError>) -> Self {
        Self::Profile(error.into())
    }

    pub(crate) fn iam(error: impl Into<BoxError>) -> Self {
        Self::Iam(error.into())
    }

    pub(crate) fn sso(error: impl Into<BoxError>) -> Self {
        Self::Sso(error.into())
    }
}

/// The given string is not one of `profile`, `iam`, or `sso`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid auth method {0:?}; valid values are profile, iam, or sso")]
pub struct InvalidAuthMethod(pub(crate) String);

/// The caller identity lookup failed.
#[derive(Debug, thiserror::Error)]
#[error("caller identity lookup: {0}")]
pub struct IdentityError(pub(crate) String);

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("profile nope not found")]
    struct Missing;

    #[test]
    fn messages_are_prefix_then_cause() {
        assert_eq!(
            LoginError::profile(Missing).to_string(),
            "AWS profile login: profile nope not found"
        );
        assert_eq!(LoginError::iam("boom").to_string(), "AWS IAM login: boom");
        assert_eq!(
            LoginError::sso("invalid GetRoleCredentials response: missing role_credentials")
                .to_string(),
            "AWS SSO login: invalid GetRoleCredentials response: missing role_credentials"
        );
    }

    #[test]
    fn cause_is_preserved_as_source() {
        let error = LoginError::profile(Missing);
        let source = error.source().expect("source");
        assert!(source.is::<Missing>());
    }

    #[test]
    fn invalid_auth_method_names_the_input() {
        let error = InvalidAuthMethod("ldap".to_string());
        assert_eq!(
            error.to_string(),
            r#"invalid auth method "ldap"; valid values are profile, iam, or sso"#
        );
    }
}
