use std::convert::Infallible;

use tracing::warn;
use url::Url;

/// An SSO verification prompt.
///
/// The AWS SSO authentication flow requires users to explicitly grant access by visiting a URL and
/// clicking a button. There are many ways this could be implemented depending on the context, so
/// verification prompts are modelled with this trait.
///
/// The trait is implemented for async functions with a single `Url` argument and returning
/// `Result<(), E>`, so a trivial prompt could look like:
///
/// ```
/// use std::convert::Infallible;
///
/// use aws_authenticator::VerificationPrompt;
///
/// fn prompt() -> impl VerificationPrompt {
///     |verification_url| async move {
///         println!("Go to {verification_url} to grant access");
///         Ok::<_, Infallible>(())
///     }
/// }
/// ```
///
/// The default is [`BrowserPrompt`].
pub trait VerificationPrompt: Clone + Send + Sync {
    /// The future returned by the prompt.
    type Future: std::future::Future<Output = Result<(), Self::Error>> + Send;

    /// An error that could occur when attempting to prompt.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Prompt the user to grant access via the given `verification_url`.
    fn prompt(self, verification_url: Url) -> Self::Future;
}

impl<F, Fut, E> VerificationPrompt for F
where
    F: FnOnce(Url) -> Fut + Clone + Send + Sync,
    Fut: std::future::Future<Output = Result<(), E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    type Future = Fut;
    type Error = E;

    fn prompt(self, verification_url: Url) -> Fut {
        self(verification_url)
    }
}

/// Print the verification URL to stderr and try to open it in the user's browser.
///
/// Failing to launch a browser is not an error, since the URL can still be followed by hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPrompt;

impl VerificationPrompt for BrowserPrompt {
    type Future = futures::future::Ready<Result<(), Infallible>>;
    type Error = Infallible;

    fn prompt(self, verification_url: Url) -> Self::Future {
        eprintln!("Go to {verification_url} to sign in with SSO");
        if let Err(error) = webbrowser::open(verification_url.as_str()) {
            warn!(%error, "failed to open browser for SSO verification");
        }
        futures::future::ready(Ok(()))
    }
}
