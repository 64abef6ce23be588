use std::{fmt, sync::Arc};

use aws_config::{
    profile::ProfileFileCredentialsProvider, BehaviorVersion, ConfigLoader, Region,
};
use aws_credential_types::{provider::error::CredentialsError, Credentials};
use aws_sdk_sts::error::DisplayErrorContext;
use tracing::{debug, info};

use crate::{
    sso::{self, GetRoleCredentialsRequest},
    sso_oidc, AuthMethod, AuthenticatorBuilder, BrowserPrompt, LoginConfig, LoginError,
    ProfileLogin, RoleCredentialsProvider, Session, SsoLogin, StaticCredentials, TokenProvider,
    VerificationPrompt, CLIENT_NAME,
};

/// Logs in to AWS with a named profile, IAM access key credentials, or SSO.
///
/// An authenticator holds every parameter any of the three methods might need. Each login
/// operation reads only its own parameters and ignores the rest.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use aws_authenticator::Authenticator;
///
/// let session = Authenticator::builder()
///     .profile_name("dev")
///     .build()
///     .profile()
///     .await?;
///
/// let sts = aws_sdk_sts::Client::new(session.sdk_config());
/// # Ok(()) }
/// ```
pub struct Authenticator<V = BrowserPrompt> {
    pub(crate) profile_name: Option<String>,
    pub(crate) access_key_id: Option<String>,
    pub(crate) secret_access_key: Option<String>,
    pub(crate) sso_url: Option<String>,
    pub(crate) sso_role_name: Option<String>,
    pub(crate) sso_account_id: Option<String>,
    pub(crate) region: Option<Region>,
    pub(crate) token_provider: Option<Arc<dyn TokenProvider>>,
    pub(crate) role_credentials_provider: Option<Arc<dyn RoleCredentialsProvider>>,
    pub(crate) verification_prompt: V,
}

impl Authenticator<BrowserPrompt> {
    /// Construct a builder for an authenticator.
    #[must_use]
    pub fn builder() -> AuthenticatorBuilder {
        AuthenticatorBuilder::default()
    }
}

impl<V> Authenticator<V>
where
    V: VerificationPrompt + 'static,
{
    /// Log in with a named profile.
    ///
    /// When a profile name is set, credentials are resolved from that profile in AWS shared
    /// config and credentials files only. Otherwise the SDK's default credential chain applies.
    /// Credentials are resolved once, so a missing or incomplete profile fails here rather than on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Profile`] if credentials cannot be resolved.
    pub async fn profile(&self) -> Result<Session, LoginError> {
        self.login_profile(ProfileLogin {
            profile_name: self.profile_name.clone(),
        })
        .await
    }

    /// Log in with IAM access key credentials.
    ///
    /// No request is made to AWS. If neither key is set, the SDK's default credential chain
    /// applies; values that are set are passed through unchecked, even when empty.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Iam`] if only one of the access key ID and secret access key is set.
    pub async fn iam(&self) -> Result<Session, LoginError> {
        self.login_iam(StaticCredentials {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
        })
        .await
    }

    /// Log in with SSO.
    ///
    /// An SSO access token is obtained for the SSO URL (by default this prompts the user to grant
    /// access, see [`VerificationPrompt`]) and then exchanged for temporary credentials for the
    /// configured role and account.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Sso`] if either step fails, including when a parameter is missing.
    pub async fn sso(&self) -> Result<Session, LoginError> {
        self.login_sso(SsoLogin {
            start_url: self.sso_url.clone(),
            role_name: self.sso_role_name.clone(),
            account_id: self.sso_account_id.clone(),
        })
        .await
    }

    /// Log in with the stored parameters for `method`.
    ///
    /// # Errors
    ///
    /// Returns the error of the selected login operation.
    pub async fn authenticate(&self, method: AuthMethod) -> Result<Session, LoginError> {
        match method {
            AuthMethod::Profile => self.profile().await,
            AuthMethod::Iam => self.iam().await,
            AuthMethod::Sso => self.sso().await,
        }
    }

    /// Log in with an explicit configuration, ignoring the stored parameters.
    ///
    /// The region, SSO providers and verification prompt still apply.
    ///
    /// # Errors
    ///
    /// Returns the error of the selected login operation.
    pub async fn login(&self, config: LoginConfig) -> Result<Session, LoginError> {
        match config {
            LoginConfig::Profile(config) => self.login_profile(config).await,
            LoginConfig::Iam(config) => self.login_iam(config).await,
            LoginConfig::Sso(config) => self.login_sso(config).await,
        }
    }

    async fn login_profile(&self, config: ProfileLogin) -> Result<Session, LoginError> {
        info!(profile = config.profile_name.as_deref(), "logging in with named profile");

        let mut loader = self.config_loader();
        if let Some(name) = config.profile_name {
            let provider = ProfileFileCredentialsProvider::builder()
                .profile_name(&name)
                .build();
            loader = loader.profile_name(name).credentials_provider(provider);
        }
        let session = Session::new(loader.load().await);

        let credentials = session
            .credentials()
            .await
            .map_err(|error| LoginError::profile(ResolveCredentials(error)))?;
        debug!(access_key_id = credentials.access_key_id(), "resolved profile credentials");

        Ok(session)
    }

    async fn login_iam(&self, config: StaticCredentials) -> Result<Session, LoginError> {
        info!("logging in with IAM access key credentials");

        let loader = match (config.access_key_id, config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                self.config_loader().credentials_provider(Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    CLIENT_NAME,
                ))
            }
            (None, None) => {
                debug!("no access key given; using default credential chain");
                self.config_loader()
            }
            (Some(_), None) => {
                return Err(LoginError::iam(PartialCredentials("secret_access_key")));
            }
            (None, Some(_)) => {
                return Err(LoginError::iam(PartialCredentials("access_key_id")));
            }
        };

        Ok(Session::new(loader.load().await))
    }

    async fn login_sso(&self, config: SsoLogin) -> Result<Session, LoginError> {
        info!(
            start_url = config.start_url.as_deref(),
            account_id = config.account_id.as_deref(),
            role_name = config.role_name.as_deref(),
            "logging in with SSO"
        );

        let (token_provider, role_credentials_provider) = self.sso_providers().await;

        let access_token = token_provider
            .access_token(config.start_url.as_deref())
            .await
            .map_err(LoginError::Sso)?;
        debug!("obtained SSO access token");

        let credentials = role_credentials_provider
            .role_credentials(GetRoleCredentialsRequest {
                access_token,
                account_id: config.account_id,
                role_name: config.role_name,
            })
            .await
            .map_err(LoginError::Sso)?;
        debug!(
            access_key_id = credentials.access_key_id.as_str(),
            expires_at = %credentials.expires_at,
            "obtained SSO role credentials"
        );

        let loader = self
            .config_loader()
            .credentials_provider(Credentials::from(credentials));
        Ok(Session::new(loader.load().await))
    }

    /// The configured SSO providers, falling back to the AWS SSO APIs.
    async fn sso_providers(&self) -> (Arc<dyn TokenProvider>, Arc<dyn RoleCredentialsProvider>) {
        if let (Some(tokens), Some(roles)) = (&self.token_provider, &self.role_credentials_provider)
        {
            return (Arc::clone(tokens), Arc::clone(roles));
        }

        let sdk_config = self.config_loader().load().await;
        let tokens: Arc<dyn TokenProvider> = match &self.token_provider {
            Some(tokens) => Arc::clone(tokens),
            None => Arc::new(sso_oidc::Client::new(
                &sdk_config,
                self.verification_prompt.clone(),
            )),
        };
        let roles: Arc<dyn RoleCredentialsProvider> = match &self.role_credentials_provider {
            Some(roles) => Arc::clone(roles),
            None => Arc::new(sso::Client::new(&sdk_config)),
        };
        (tokens, roles)
    }

    fn config_loader(&self) -> ConfigLoader {
        let loader = aws_config::defaults(BehaviorVersion::latest());
        match &self.region {
            Some(region) => loader.region(region.clone()),
            None => loader,
        }
    }
}

impl<V> fmt::Debug for Authenticator<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("profile_name", &self.profile_name)
            .field("access_key_id", &self.access_key_id)
            .field("sso_url", &self.sso_url)
            .field("sso_role_name", &self.sso_role_name)
            .field("sso_account_id", &self.sso_account_id)
            .field("region", &self.region)
            .field("verification_prompt", &"_")
            .finish_non_exhaustive()
    }
}

/// Credentials could not be resolved for a profile login.
#[derive(Debug, thiserror::Error)]
#[error("{}", DisplayErrorContext(.0))]
struct ResolveCredentials(#[source] CredentialsError);

/// Only one half of an access key pair was given.
#[derive(Debug, thiserror::Error)]
#[error("partial credentials found, missing: {0}")]
struct PartialCredentials(&'static str);
