//! Cleaned up AWS SSO API.

use std::fmt;

use aws_config::SdkConfig;
use aws_sdk_sso::{
    error::{DisplayErrorContext, SdkError},
    operation::get_role_credentials::{GetRoleCredentialsError, GetRoleCredentialsOutput},
};
use chrono::DateTime;
use futures::future::BoxFuture;
use tracing::debug;

use crate::{BoxError, SessionCredentials};

/// Exchanges an SSO access token for temporary role credentials.
///
/// [`Authenticator::sso`](crate::Authenticator::sso) uses the AWS SSO `GetRoleCredentials` API by
/// default. Implement this to substitute another source.
pub trait RoleCredentialsProvider: Send + Sync {
    /// Fetch credentials for the role and account named in `request`.
    fn role_credentials(
        &self,
        request: GetRoleCredentialsRequest,
    ) -> BoxFuture<'_, Result<SessionCredentials, BoxError>>;
}

/// A role credentials request.
///
/// Fields are forwarded exactly as given; unset fields are left for the API to reject.
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct GetRoleCredentialsRequest {
    /// The SSO access token.
    pub access_token: String,

    /// The AWS account to sign in to.
    pub account_id: Option<String>,

    /// The name of the role to assume.
    pub role_name: Option<String>,
}

impl fmt::Debug for GetRoleCredentialsRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GetRoleCredentialsRequest")
            .field("account_id", &self.account_id)
            .field("role_name", &self.role_name)
            .finish_non_exhaustive()
    }
}

pub(crate) struct Client {
    inner: aws_sdk_sso::Client,
}

impl Client {
    pub(crate) fn new(config: &SdkConfig) -> Self {
        Self {
            inner: aws_sdk_sso::Client::new(config),
        }
    }

    pub(crate) async fn get_role_credentials(
        &self,
        request: GetRoleCredentialsRequest,
    ) -> Result<SessionCredentials, RoleCredentialsError> {
        debug!(
            account_id = request.account_id.as_deref(),
            role_name = request.role_name.as_deref(),
            "requesting SSO role credentials"
        );
        let res = self
            .inner
            .get_role_credentials()
            .access_token(request.access_token)
            .set_account_id(request.account_id)
            .set_role_name(request.role_name)
            .send()
            .await?;
        SessionCredentials::try_from(res).map_err(RoleCredentialsError::InvalidResponse)
    }
}

impl RoleCredentialsProvider for Client {
    fn role_credentials(
        &self,
        request: GetRoleCredentialsRequest,
    ) -> BoxFuture<'_, Result<SessionCredentials, BoxError>> {
        Box::pin(async move { Ok(self.get_role_credentials(request).await?) })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

/// An error from the AWS SSO `GetRoleCredentials` API.
#[derive(Debug, thiserror::Error)]
pub enum RoleCredentialsError {
    /// The request failed.
    #[error("{}", DisplayErrorContext(.0))]
    Api(#[from] SdkError<GetRoleCredentialsError>),

    /// The response was missing required fields.
    #[error("{0}")]
    InvalidResponse(&'static str),
}

impl TryFrom<GetRoleCredentialsOutput> for SessionCredentials {
    type Error = &'static str;

    fn try_from(res: GetRoleCredentialsOutput) -> Result<Self, Self::Error> {
        macro_rules! invalid_res {
            ($msg:literal) => {
                concat!("invalid GetRoleCredentials response: ", $msg)
            };
        }

        let credentials = res
            .role_credentials
            .ok_or(invalid_res!("missing role_credentials"))?;
        Ok(Self {
            access_key_id: credentials
                .access_key_id
                .ok_or(invalid_res!("missing access_key_id"))?,
            secret_access_key: credentials
                .secret_access_key
                .ok_or(invalid_res!("missing secret_access_key"))?,
            session_token: credentials
                .session_token
                .ok_or(invalid_res!("missing session_token"))?,
            expires_at: DateTime::from_timestamp_millis(credentials.expiration)
                .ok_or(invalid_res!("expiration out of range"))?,
        })
    }
}
