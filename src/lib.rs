#![warn(missing_docs, clippy::pedantic)]

//! Login to AWS using CLI named profiles, IAM access key credentials, or SSO.
//!
//! See [`Authenticator`] for the main entrypoint to the crate. Each login method produces a
//! [`Session`], from which any AWS SDK client can be constructed.
//!
//! ```no_run
//! # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use aws_authenticator::{Authenticator, IdentityLookup, Sts};
//!
//! let session = Authenticator::builder()
//!     .sso_url("https://myorg.awsapps.com/start")
//!     .sso_account_id("012345678910")
//!     .sso_role_name("PowerUser")
//!     .build()
//!     .sso()
//!     .await?;
//!
//! let identity = Sts.caller_identity(&session).await?;
//! println!("logged in to {:?}", identity.account);
//! # Ok(()) }
//! ```

mod authenticator;
mod builder;
pub mod cli;
mod credentials;
mod error;
mod prompt;
mod request;
mod session;
mod sso;
mod sso_oidc;
#[cfg(test)]
mod test_util;

pub use aws_config::Region;

pub use crate::{
    authenticator::Authenticator,
    builder::AuthenticatorBuilder,
    credentials::SessionCredentials,
    error::{BoxError, IdentityError, InvalidAuthMethod, LoginError},
    prompt::{BrowserPrompt, VerificationPrompt},
    request::{AuthMethod, AuthRequest, LoginConfig, ProfileLogin, SsoLogin, StaticCredentials},
    session::{CallerIdentity, IdentityLookup, Session, Sts},
    sso::{GetRoleCredentialsRequest, RoleCredentialsError, RoleCredentialsProvider},
    sso_oidc::{SsoTokenError, TokenProvider},
};

/// Name used when registering with AWS SSO OIDC and for credentials provided by this crate.
const CLIENT_NAME: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "@",
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);
