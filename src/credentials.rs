use std::fmt;

use aws_credential_types::Credentials;
use chrono::{DateTime, Utc};

use crate::CLIENT_NAME;

/// Temporary AWS credentials obtained from an SSO role exchange.
///
/// The fields of this struct are obviously pretty sensitive, and should be handled with care.
/// The secret and session token are not printed in `Debug` output.
#[allow(clippy::module_name_repetitions)]
#[derive(Clone)]
pub struct SessionCredentials {
    /// The access key ID.
    pub access_key_id: String,

    /// The secret access key.
    pub secret_access_key: String,

    /// The session token.
    pub session_token: String,

    /// When the credentials expire.
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl From<SessionCredentials> for Credentials {
    fn from(creds: SessionCredentials) -> Self {
        Credentials::new(
            creds.access_key_id,
            creds.secret_access_key,
            Some(creds.session_token),
            Some(creds.expires_at.into()),
            CLIENT_NAME,
        )
    }
}
