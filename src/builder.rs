use std::sync::Arc;

use aws_config::Region;

use crate::{
    AuthRequest, Authenticator, BrowserPrompt, RoleCredentialsProvider, TokenProvider,
    VerificationPrompt,
};

/// Builder for [`Authenticator`].
///
/// Every field is optional. Which ones matter depends on the login method eventually used, and
/// fields that don't matter are ignored.
///
/// # Example
///
/// ```
/// use std::convert::Infallible;
///
/// use aws_authenticator::{AuthenticatorBuilder, Region};
///
/// let authenticator = AuthenticatorBuilder::new()
///     .sso_url("https://myorg.awsapps.com/start")
///     .sso_account_id("012345678910")
///     .sso_role_name("PowerUser")
///     // call AWS SSO in a fixed region instead of the default region chain
///     .region(Region::new("eu-west-1"))
///     // print the URL instead of opening a browser
///     .verification_prompt(|url| async move {
///         println!("Go to {url} to sign in with SSO");
///         Ok::<_, Infallible>(())
///     })
///     .build();
/// ```
#[allow(clippy::module_name_repetitions)]
pub struct AuthenticatorBuilder<V = BrowserPrompt> {
    profile_name: Option<String>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    sso_url: Option<String>,
    sso_role_name: Option<String>,
    sso_account_id: Option<String>,
    region: Option<Region>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    role_credentials_provider: Option<Arc<dyn RoleCredentialsProvider>>,
    verification_prompt: V,
}

impl AuthenticatorBuilder<BrowserPrompt> {
    /// Construct an [`Authenticator`] builder with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for AuthenticatorBuilder<BrowserPrompt> {
    fn default() -> Self {
        Self {
            profile_name: None,
            access_key_id: None,
            secret_access_key: None,
            sso_url: None,
            sso_role_name: None,
            sso_account_id: None,
            region: None,
            token_provider: None,
            role_credentials_provider: None,
            verification_prompt: BrowserPrompt,
        }
    }
}

impl From<AuthRequest> for AuthenticatorBuilder<BrowserPrompt> {
    fn from(request: AuthRequest) -> Self {
        Self::new()
            .set_profile_name(request.profile_name)
            .set_access_key_id(request.access_key_id)
            .set_secret_access_key(request.secret_access_key)
            .set_sso_url(request.sso_url)
            .set_sso_role_name(request.sso_role_name)
            .set_sso_account_id(request.sso_account_id)
    }
}

macro_rules! optional_field {
    ($(#[$doc:meta])* $field:ident, $setter:ident) => {
        $(#[$doc])*
        #[must_use]
        pub fn $field(self, $field: impl Into<String>) -> Self {
            self.$setter(Some($field.into()))
        }

        $(#[$doc])*
        #[must_use]
        pub fn $setter(self, $field: Option<String>) -> Self {
            Self { $field, ..self }
        }
    };
}

impl<V> AuthenticatorBuilder<V> {
    optional_field!(
        /// Set the named profile used by [`Authenticator::profile`].
        profile_name,
        set_profile_name
    );

    optional_field!(
        /// Set the IAM access key ID used by [`Authenticator::iam`].
        access_key_id,
        set_access_key_id
    );

    optional_field!(
        /// Set the IAM secret access key used by [`Authenticator::iam`].
        secret_access_key,
        set_secret_access_key
    );

    optional_field!(
        /// Set the SSO user portal URL used by [`Authenticator::sso`].
        sso_url,
        set_sso_url
    );

    optional_field!(
        /// Set the SSO role name used by [`Authenticator::sso`].
        sso_role_name,
        set_sso_role_name
    );

    optional_field!(
        /// Set the SSO account ID used by [`Authenticator::sso`].
        sso_account_id,
        set_sso_account_id
    );

    /// Pin the region for sessions and SSO API calls.
    ///
    /// By default the region is resolved from the environment and AWS shared config.
    #[must_use]
    pub fn region(self, region: Region) -> Self {
        Self {
            region: Some(region),
            ..self
        }
    }

    /// Replace the AWS SSO OIDC device authorization flow used to obtain SSO access tokens.
    ///
    /// When set, the [verification prompt](Self::verification_prompt) is never used.
    #[must_use]
    pub fn token_provider(self, provider: impl TokenProvider + 'static) -> Self {
        Self {
            token_provider: Some(Arc::new(provider)),
            ..self
        }
    }

    /// Replace the AWS SSO `GetRoleCredentials` call used to exchange access tokens.
    #[must_use]
    pub fn role_credentials_provider(
        self,
        provider: impl RoleCredentialsProvider + 'static,
    ) -> Self {
        Self {
            role_credentials_provider: Some(Arc::new(provider)),
            ..self
        }
    }

    /// Set the verification prompt handler.
    ///
    /// Users need to visit a URL and explicitly grant access in order to authenticate via SSO. The
    /// default [`BrowserPrompt`] prints the URL and tries to open it in a browser.
    #[must_use]
    pub fn verification_prompt<NewV>(self, verification_prompt: NewV) -> AuthenticatorBuilder<NewV>
    where
        NewV: VerificationPrompt,
    {
        AuthenticatorBuilder {
            profile_name: self.profile_name,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            sso_url: self.sso_url,
            sso_role_name: self.sso_role_name,
            sso_account_id: self.sso_account_id,
            region: self.region,
            token_provider: self.token_provider,
            role_credentials_provider: self.role_credentials_provider,
            verification_prompt,
        }
    }
}

impl<V: VerificationPrompt> AuthenticatorBuilder<V> {
    /// Build the [`Authenticator`].
    ///
    /// Nothing is validated here; missing parameters surface when a login is attempted.
    #[must_use]
    pub fn build(self) -> Authenticator<V> {
        Authenticator {
            profile_name: self.profile_name,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            sso_url: self.sso_url,
            sso_role_name: self.sso_role_name,
            sso_account_id: self.sso_account_id,
            region: self.region,
            token_provider: self.token_provider,
            role_credentials_provider: self.role_credentials_provider,
            verification_prompt: self.verification_prompt,
        }
    }
}
