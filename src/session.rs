use aws_config::{Region, SdkConfig};
use aws_credential_types::{
    provider::{error::CredentialsError, ProvideCredentials},
    Credentials,
};
use aws_sdk_sts::{
    error::DisplayErrorContext, operation::get_caller_identity::GetCallerIdentityOutput,
};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::IdentityError;

/// An authenticated AWS session.
///
/// This wraps the [`SdkConfig`] produced by a login, which can be used to construct any AWS SDK
/// client.
#[derive(Clone, Debug)]
pub struct Session {
    config: SdkConfig,
}

impl Session {
    pub(crate) fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    /// The SDK configuration for constructing service clients.
    #[must_use]
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// The region the session was resolved for, if any.
    #[must_use]
    pub fn region(&self) -> Option<&Region> {
        self.config.region()
    }

    /// Resolve the session's credentials.
    ///
    /// # Errors
    ///
    /// Returns the credentials provider's error, or a "not loaded" error if the session has no
    /// provider.
    pub async fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let provider = self
            .config
            .credentials_provider()
            .ok_or_else(|| CredentialsError::not_loaded("no credentials provider configured"))?;
        provider.provide_credentials().await
    }
}

/// The account and principal behind a session's credentials.
///
/// Serialized with the same field names as the STS `GetCallerIdentity` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    /// The unique identifier of the calling entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// The AWS account ID that owns the calling entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// The ARN of the calling entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
}

impl From<GetCallerIdentityOutput> for CallerIdentity {
    fn from(res: GetCallerIdentityOutput) -> Self {
        Self {
            user_id: res.user_id,
            account: res.account,
            arn: res.arn,
        }
    }
}

/// Looks up the caller identity of a session.
pub trait IdentityLookup {
    /// Return the identity behind `session`'s credentials.
    fn caller_identity<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<CallerIdentity, IdentityError>>;
}

/// Identity lookup via STS `GetCallerIdentity`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sts;

impl IdentityLookup for Sts {
    fn caller_identity<'a>(
        &'a self,
        session: &'a Session,
    ) -> BoxFuture<'a, Result<CallerIdentity, IdentityError>> {
        Box::pin(async move {
            debug!("calling STS GetCallerIdentity");
            let res = aws_sdk_sts::Client::new(session.sdk_config())
                .get_caller_identity()
                .send()
                .await
                .map_err(|error| IdentityError(DisplayErrorContext(&error).to_string()))?;
            Ok(res.into())
        })
    }
}

#[cfg(test)]
mod tests {
    use aws_config::BehaviorVersion;
    use aws_credential_types::provider::SharedCredentialsProvider;

    use super::*;

    #[test]
    fn identity_serializes_with_sts_field_names() {
        let identity = CallerIdentity {
            user_id: Some("AIDAEXAMPLE".to_string()),
            account: Some("123456789012".to_string()),
            arn: None,
        };
        assert_eq!(
            serde_json::to_value(&identity).unwrap(),
            serde_json::json!({"UserId": "AIDAEXAMPLE", "Account": "123456789012"})
        );
    }

    #[test]
    fn identity_converts_from_sts_output() {
        let identity = CallerIdentity::from(
            GetCallerIdentityOutput::builder()
                .user_id("AIDAEXAMPLE")
                .account("123456789012")
                .arn("arn:aws:iam::123456789012:user/example")
                .build(),
        );
        assert_eq!(identity.account.as_deref(), Some("123456789012"));
        assert_eq!(identity.user_id.as_deref(), Some("AIDAEXAMPLE"));
        assert_eq!(
            identity.arn.as_deref(),
            Some("arn:aws:iam::123456789012:user/example")
        );
    }

    #[tokio::test]
    async fn credentials_come_from_the_configured_provider() {
        let config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                "AKIDEXAMPLE",
                "secret",
                None,
                None,
                "test",
            )))
            .build();
        let session = Session::new(config);

        assert_eq!(session.region().map(|r| r.as_ref()), Some("eu-west-1"));
        let creds = session.credentials().await.unwrap();
        assert_eq!(creds.access_key_id(), "AKIDEXAMPLE");
    }

    #[tokio::test]
    async fn credentials_fail_without_provider() {
        let session = Session::new(SdkConfig::builder().build());
        assert!(matches!(
            session.credentials().await,
            Err(CredentialsError::CredentialsNotLoaded(_))
        ));
    }
}
