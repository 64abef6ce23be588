//! Cleaned up AWS SSO OIDC API.

use std::{fmt, time::Duration};

use aws_config::SdkConfig;
use aws_sdk_ssooidc::{
    error::{DisplayErrorContext, SdkError},
    operation::{
        create_token::{CreateTokenError, CreateTokenOutput},
        register_client::{RegisterClientError, RegisterClientOutput},
        start_device_authorization::{
            StartDeviceAuthorizationError, StartDeviceAuthorizationOutput,
        },
    },
};
use futures::future::BoxFuture;
use tracing::debug;
use url::Url;

use crate::{BoxError, VerificationPrompt, CLIENT_NAME};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
const SLOW_DOWN_BACKOFF: Duration = Duration::from_secs(5);

/// Obtains an SSO access token for a user portal.
///
/// [`Authenticator::sso`](crate::Authenticator::sso) uses the AWS SSO OIDC device authorization
/// flow by default, which prompts the user via a [`VerificationPrompt`]. Implement this to
/// substitute another source.
pub trait TokenProvider: Send + Sync {
    /// Obtain an access token for the SSO user portal at `start_url`.
    fn access_token<'a>(&'a self, start_url: Option<&'a str>)
        -> BoxFuture<'a, Result<String, BoxError>>;
}

pub(crate) struct Client<V> {
    inner: aws_sdk_ssooidc::Client,
    verification_prompt: V,
}

impl<V: VerificationPrompt> Client<V> {
    pub(crate) fn new(config: &SdkConfig, verification_prompt: V) -> Self {
        Self {
            inner: aws_sdk_ssooidc::Client::new(config),
            verification_prompt,
        }
    }

    async fn register_client(
        &self,
    ) -> Result<RegisterClientResponse, SsoTokenError<V::Error>> {
        let res = self
            .inner
            .register_client()
            .client_name(CLIENT_NAME)
            .client_type("public")
            .send()
            .await
            .map_err(SsoTokenError::RegisterClient)?;
        RegisterClientResponse::try_from(res).map_err(SsoTokenError::InvalidResponse)
    }

    async fn start_device_authorization(
        &self,
        client: &RegisterClientResponse,
        start_url: Option<&str>,
    ) -> Result<StartDeviceAuthorizationResponse, SsoTokenError<V::Error>> {
        let res = self
            .inner
            .start_device_authorization()
            .client_id(&client.client_id)
            .client_secret(&client.client_secret)
            .set_start_url(start_url.map(str::to_owned))
            .send()
            .await
            .map_err(SsoTokenError::StartDeviceAuthorization)?;
        StartDeviceAuthorizationResponse::try_from(res).map_err(SsoTokenError::InvalidResponse)
    }

    pub(crate) async fn create_token(
        &self,
        start_url: Option<&str>,
    ) -> Result<String, SsoTokenError<V::Error>> {
        let client = self.register_client().await?;
        debug!("registered SSO OIDC client");

        let authorization = self.start_device_authorization(&client, start_url).await?;
        let verification_url: Url = authorization
            .verification_uri_complete
            .parse()
            .map_err(SsoTokenError::InvalidVerificationUri)?;

        self.verification_prompt
            .clone()
            .prompt(verification_url)
            .await
            .map_err(SsoTokenError::VerificationPrompt)?;

        let mut interval = authorization.interval;
        loop {
            let result = self
                .inner
                .create_token()
                .client_id(&client.client_id)
                .client_secret(&client.client_secret)
                .grant_type(DEVICE_CODE_GRANT)
                .device_code(&authorization.device_code)
                .send()
                .await;
            match result {
                Ok(res) => {
                    return CreateTokenResponse::try_from(res)
                        .map(|token| token.access_token)
                        .map_err(SsoTokenError::InvalidResponse);
                }
                Err(error) => match error.as_service_error() {
                    Some(service) if service.is_authorization_pending_exception() => {
                        debug!(?interval, "waiting for SSO verification");
                    }
                    Some(service) if service.is_slow_down_exception() => {
                        interval += SLOW_DOWN_BACKOFF;
                        debug!(?interval, "SSO OIDC asked to slow down");
                    }
                    Some(service) if service.is_expired_token_exception() => {
                        return Err(SsoTokenError::VerificationPromptTimeout);
                    }
                    _ => return Err(SsoTokenError::CreateToken(error)),
                },
            }
            tokio::time::sleep(interval).await;
        }
    }
}

impl<V> TokenProvider for Client<V>
where
    V: VerificationPrompt + 'static,
{
    fn access_token<'a>(
        &'a self,
        start_url: Option<&'a str>,
    ) -> BoxFuture<'a, Result<String, BoxError>> {
        Box::pin(async move { Ok(self.create_token(start_url).await?) })
    }
}

impl<V> fmt::Debug for Client<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("verification_prompt", &"_")
            .finish_non_exhaustive()
    }
}

/// An error from the AWS SSO OIDC device authorization flow.
#[derive(Debug, thiserror::Error)]
pub enum SsoTokenError<E: std::error::Error + 'static> {
    /// The `RegisterClient` request failed.
    #[error("{}", DisplayErrorContext(.0))]
    RegisterClient(#[source] SdkError<RegisterClientError>),

    /// The `StartDeviceAuthorization` request failed.
    #[error("{}", DisplayErrorContext(.0))]
    StartDeviceAuthorization(#[source] SdkError<StartDeviceAuthorizationError>),

    /// A `CreateToken` request failed for a reason other than pending verification.
    #[error("{}", DisplayErrorContext(.0))]
    CreateToken(#[source] SdkError<CreateTokenError>),

    /// A response was missing required fields.
    #[error("{0}")]
    InvalidResponse(&'static str),

    /// The verification URL returned by `StartDeviceAuthorization` could not be parsed.
    #[error("invalid StartDeviceAuthorization response: verification_uri_complete is not a valid URL ({0})")]
    InvalidVerificationUri(#[source] url::ParseError),

    /// The verification prompt failed.
    #[error("verification prompt failed: {0}")]
    VerificationPrompt(#[source] E),

    /// The user did not grant access before the device code expired.
    #[error("timed out waiting for verification")]
    VerificationPromptTimeout,
}

struct RegisterClientResponse {
    client_id: String,
    client_secret: String,
}

impl TryFrom<RegisterClientOutput> for RegisterClientResponse {
    type Error = &'static str;

    fn try_from(res: RegisterClientOutput) -> Result<Self, Self::Error> {
        macro_rules! invalid_res {
            ($msg:literal) => {
                concat!("invalid RegisterClient response: ", $msg)
            };
        }

        Ok(Self {
            client_id: res.client_id.ok_or(invalid_res!("missing client_id"))?,
            client_secret: res
                .client_secret
                .ok_or(invalid_res!("missing client_secret"))?,
        })
    }
}

#[derive(Debug)]
struct StartDeviceAuthorizationResponse {
    device_code: String,
    interval: Duration,
    verification_uri_complete: String,
}

impl TryFrom<StartDeviceAuthorizationOutput> for StartDeviceAuthorizationResponse {
    type Error = &'static str;

    fn try_from(res: StartDeviceAuthorizationOutput) -> Result<Self, Self::Error> {
        macro_rules! invalid_res {
            ($msg:literal) => {
                concat!("invalid StartDeviceAuthorization response: ", $msg)
            };
        }

        Ok(Self {
            device_code: res.device_code.ok_or(invalid_res!("missing device_code"))?,
            // the API reports 0 when the field is absent; poll once a second in that case
            interval: Duration::from_secs(u64::try_from(res.interval).unwrap_or(0).max(1)),
            verification_uri_complete: res
                .verification_uri_complete
                .ok_or(invalid_res!("missing verification_uri_complete"))?,
        })
    }
}

struct CreateTokenResponse {
    access_token: String,
}

impl TryFrom<CreateTokenOutput> for CreateTokenResponse {
    type Error = &'static str;

    fn try_from(res: CreateTokenOutput) -> Result<Self, Self::Error> {
        Ok(Self {
            access_token: res
                .access_token
                .ok_or("invalid CreateToken response: missing access_token")?,
        })
    }
}
