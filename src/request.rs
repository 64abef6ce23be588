use std::{fmt, str::FromStr};

use crate::InvalidAuthMethod;

/// How to log in to AWS.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AuthMethod {
    /// Use a named profile from AWS shared config.
    Profile,

    /// Use static IAM access key credentials.
    Iam,

    /// Exchange an SSO access token for role credentials.
    Sso,
}

impl AuthMethod {
    /// The method's name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Iam => "iam",
            Self::Sso => "sso",
        }
    }
}

impl FromStr for AuthMethod {
    type Err = InvalidAuthMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profile" => Ok(Self::Profile),
            "iam" => Ok(Self::Iam),
            "sso" => Ok(Self::Sso),
            other => Err(InvalidAuthMethod(other.to_string())),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to attempt a login.
///
/// Only the fields relevant to `method` are consulted; the rest are ignored without validation.
#[derive(Clone)]
pub struct AuthRequest {
    /// The login method.
    pub method: AuthMethod,

    /// Named profile, used by [`AuthMethod::Profile`].
    pub profile_name: Option<String>,

    /// IAM access key ID, used by [`AuthMethod::Iam`].
    pub access_key_id: Option<String>,

    /// IAM secret access key, used by [`AuthMethod::Iam`].
    pub secret_access_key: Option<String>,

    /// SSO user portal URL, used by [`AuthMethod::Sso`].
    pub sso_url: Option<String>,

    /// SSO role name, used by [`AuthMethod::Sso`].
    pub sso_role_name: Option<String>,

    /// SSO account ID, used by [`AuthMethod::Sso`].
    pub sso_account_id: Option<String>,
}

impl AuthRequest {
    /// Construct a request for `method` with every optional field unset.
    #[must_use]
    pub fn new(method: AuthMethod) -> Self {
        Self {
            method,
            profile_name: None,
            access_key_id: None,
            secret_access_key: None,
            sso_url: None,
            sso_role_name: None,
            sso_account_id: None,
        }
    }

    /// Keep only the fields used by the selected method.
    #[must_use]
    pub fn into_config(self) -> LoginConfig {
        match self.method {
            AuthMethod::Profile => LoginConfig::Profile(ProfileLogin {
                profile_name: self.profile_name,
            }),
            AuthMethod::Iam => LoginConfig::Iam(StaticCredentials {
                access_key_id: self.access_key_id,
                secret_access_key: self.secret_access_key,
            }),
            AuthMethod::Sso => LoginConfig::Sso(SsoLogin {
                start_url: self.sso_url,
                role_name: self.sso_role_name,
                account_id: self.sso_account_id,
            }),
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("method", &self.method)
            .field("profile_name", &self.profile_name)
            .field("access_key_id", &self.access_key_id)
            .field("sso_url", &self.sso_url)
            .field("sso_role_name", &self.sso_role_name)
            .field("sso_account_id", &self.sso_account_id)
            .finish_non_exhaustive()
    }
}

/// Login configuration for exactly one method.
#[derive(Clone, Debug)]
pub enum LoginConfig {
    /// See [`Authenticator::profile`](crate::Authenticator::profile).
    Profile(ProfileLogin),

    /// See [`Authenticator::iam`](crate::Authenticator::iam).
    Iam(StaticCredentials),

    /// See [`Authenticator::sso`](crate::Authenticator::sso).
    Sso(SsoLogin),
}

impl LoginConfig {
    /// The method this configuration is for.
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::Profile(_) => AuthMethod::Profile,
            Self::Iam(_) => AuthMethod::Iam,
            Self::Sso(_) => AuthMethod::Sso,
        }
    }
}

/// Named profile configuration.
#[derive(Clone, Debug, Default)]
pub struct ProfileLogin {
    /// The profile to load. When unset the SDK's default resolution applies.
    pub profile_name: Option<String>,
}

/// Static IAM access key credentials.
///
/// The secret is not printed in `Debug` output.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    /// The access key ID.
    pub access_key_id: Option<String>,

    /// The secret access key.
    pub secret_access_key: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

/// SSO role exchange configuration.
///
/// Unset fields are forwarded as-is and rejected by the SDK when the request is sent.
#[derive(Clone, Debug, Default)]
pub struct SsoLogin {
    /// The URL for the AWS SSO user portal.
    pub start_url: Option<String>,

    /// The name of the role to assume, as it appears in SSO configuration.
    pub role_name: Option<String>,

    /// The AWS account to sign in to.
    pub account_id: Option<String>,
}
