use std::{env, fs};

use aws_config::{
    retry::RetryConfig, stalled_stream_protection::StalledStreamProtectionConfig, BehaviorVersion,
    Region, SdkConfig,
};
use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
use aws_smithy_types::body::SdkBody;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "AWS_CONFIG_FILE",
    "AWS_SHARED_CREDENTIALS_FILE",
    "AWS_EC2_METADATA_DISABLED",
    "AWS_REGION",
    "AWS_PROFILE",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
];

/// Throwaway AWS shared config and credentials files with a `default` profile.
///
/// Points the SDK at the files through the environment for as long as the value lives. Tests
/// using this must be `#[serial]`.
pub(crate) struct ProfileFiles {
    _dir: TempDir,
    saved: Vec<(&'static str, Option<String>)>,
}

impl ProfileFiles {
    pub(crate) const ACCESS_KEY_ID: &'static str = "AKIDPROFILEEXAMPLE";

    pub(crate) fn install() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config");
        let credentials = dir.path().join("credentials");
        fs::write(&config, "[default]\nregion = us-east-1\n").unwrap();
        fs::write(
            &credentials,
            format!(
                "[default]\naws_access_key_id = {}\naws_secret_access_key = profile-secret\n",
                Self::ACCESS_KEY_ID
            ),
        )
        .unwrap();

        let saved = VARS.iter().map(|var| (*var, env::var(var).ok())).collect();
        for var in ["AWS_PROFILE", "AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY", "AWS_SESSION_TOKEN"] {
            env::remove_var(var);
        }
        env::set_var("AWS_CONFIG_FILE", &config);
        env::set_var("AWS_SHARED_CREDENTIALS_FILE", &credentials);
        env::set_var("AWS_EC2_METADATA_DISABLED", "true");
        env::set_var("AWS_REGION", "us-east-1");

        Self { _dir: dir, saved }
    }
}

impl Drop for ProfileFiles {
    fn drop(&mut self) {
        for (var, value) in &self.saved {
            match value {
                Some(value) => env::set_var(var, value),
                None => env::remove_var(var),
            }
        }
    }
}

/// An SDK config whose clients answer requests with `responses`, in order.
///
/// Retries are disabled so every canned response maps to exactly one SDK call.
pub(crate) fn replay_config(
    responses: Vec<http::Response<SdkBody>>,
) -> (StaticReplayClient, SdkConfig) {
    let http = StaticReplayClient::new(
        responses
            .into_iter()
            .map(|response| {
                let request = http::Request::builder()
                    .uri("https://example.com/")
                    .body(SdkBody::empty())
                    .unwrap();
                ReplayEvent::new(request, response)
            })
            .collect(),
    );
    let config = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .retry_config(RetryConfig::disabled())
        .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
        .http_client(http.clone())
        .build();
    (http, config)
}

pub(crate) fn json_response(body: &'static str) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(SdkBody::from(body))
        .unwrap()
}

pub(crate) fn error_response(
    status: u16,
    error_type: &str,
    body: &'static str,
) -> http::Response<SdkBody> {
    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("x-amzn-errortype", error_type)
        .body(SdkBody::from(body))
        .unwrap()
}

/// The URL path of every request sent through `http`.
pub(crate) fn request_paths(http: &StaticReplayClient) -> Vec<String> {
    http.actual_requests()
        .map(|request| url::Url::parse(request.uri()).unwrap().path().to_owned())
        .collect()
}

/// The JSON body of the request at `index`.
pub(crate) fn request_json(http: &StaticReplayClient, index: usize) -> serde_json::Value {
    let request = http.actual_requests().nth(index).unwrap();
    serde_json::from_slice(request.body().bytes().unwrap()).unwrap()
}
