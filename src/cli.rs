//! Command line interface for smoke-testing AWS credentials.

use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing::info;

use crate::{AuthMethod, AuthRequest, AuthenticatorBuilder, IdentityLookup, Sts};

/// Login to AWS using CLI named profiles, IAM access key credentials, or SSO.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "aws-authenticator",
    version,
    about = "Login to AWS using CLI named profiles, IAM access key credentials, or SSO.",
    long_about = None,
    disable_version_flag = true
)]
pub struct Cli {
    #[allow(dead_code)]
    #[arg(short = 'v', long = "version", action = ArgAction::Version, help = "Print version")]
    version: Option<bool>,

    /// AWS authentication method. Valid values can be profile, iam, or sso.
    #[arg(short = 'm', long = "auth_method", value_name = "AUTH_METHOD")]
    pub auth_method: AuthMethod,

    /// AWSCLI profile name for authenticating with a profile.
    #[arg(short = 'p', long = "profile_name")]
    pub profile_name: Option<String>,

    /// AWSCLI IAM access key ID for authenticating with an IAM user.
    #[arg(short = 'k', long = "access_key_id")]
    pub access_key_id: Option<String>,

    /// AWSCLI IAM secret access key for authenticating with an IAM user.
    #[arg(short = 's', long = "secret_access_key")]
    pub secret_access_key: Option<String>,

    /// AWS account ID for authenticating with AWS SSO.
    #[arg(short = 'a', long = "sso_account_id")]
    pub sso_account_id: Option<String>,

    /// AWS SSO role name for authenticating with AWS SSO.
    #[arg(short = 'r', long = "sso_role_name")]
    pub sso_role_name: Option<String>,

    /// AWS SSO login URL for authenticating with AWS SSO.
    #[arg(short = 'u', long = "sso_url")]
    pub sso_url: Option<String>,
}

impl Cli {
    /// The login request described by the flags.
    #[must_use]
    pub fn request(&self) -> AuthRequest {
        AuthRequest {
            method: self.auth_method,
            profile_name: self.profile_name.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            sso_url: self.sso_url.clone(),
            sso_role_name: self.sso_role_name.clone(),
            sso_account_id: self.sso_account_id.clone(),
        }
    }

    /// Log in and print the caller identity to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if login or the identity lookup fails.
    pub async fn execute(self) -> Result<()> {
        self.execute_with(&Sts, &mut io::stdout()).await
    }

    /// Log in, look up the caller identity with `lookup`, and write it to `out` as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if login or the identity lookup fails, or `out` can't be written.
    pub async fn execute_with<L, W>(self, lookup: &L, out: &mut W) -> Result<()>
    where
        L: IdentityLookup,
        W: Write,
    {
        let request = self.request();
        let method = request.method;
        let session = AuthenticatorBuilder::from(request)
            .build()
            .authenticate(method)
            .await?;

        let identity = lookup.caller_identity(&session).await?;
        info!(account = identity.account.as_deref(), "resolved caller identity");

        serde_json::to_writer_pretty(&mut *out, &identity)?;
        writeln!(out)?;
        Ok(())
    }
}
