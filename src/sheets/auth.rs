use super::{Authenticate, SheetsClient};
use crate::backend::ConnectionDescriptor;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::sheets::client::AUTH_SCOPE;
use async_trait::async_trait;
use hyper_util::client::legacy::connect::HttpConnector;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use yup_oauth2::{
    InstalledFlowAuthenticator, InstalledFlowReturnMethod, ServiceAccountAuthenticator,
    authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

pub(super) type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Only the `type` field is needed to pick the flow; the rest is parsed by yup-oauth2.
#[derive(Debug, Deserialize)]
struct CredentialsKind {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Authenticates with the credentials file named in a connection descriptor.
///
/// Service account keys are used as-is. OAuth client secrets go through the
/// installed-app flow with a local redirect, and the resulting tokens are
/// cached on disk for later runs.
#[derive(Debug, Clone, Default)]
pub struct GoogleAuthenticator {
    token_cache_path: Option<PathBuf>,
}

impl GoogleAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

}

#[async_trait]
impl Authenticate for GoogleAuthenticator {
    type Session = SheetsClient;

    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    async fn authenticate(&self, descriptor: &ConnectionDescriptor) -> Result<SheetsClient> {
        let auth = create_and_verify_authenticator(
            &descriptor.credentials_path,
            self.token_cache_path.as_deref(),
        )
        .await?;

        SheetsClient::new(auth, descriptor.sheet_id.clone())
    }
}

/// Create and verify authenticator by fetching a token
async fn create_and_verify_authenticator(
    credentials_path: &Path,
    token_cache_path: Option<&Path>,
) -> Result<AuthType> {
    let contents = read_credentials(credentials_path)?;
    let kind: CredentialsKind = serde_json::from_str(&contents).map_err(|e| {
        AppError::Auth(format!(
            "Malformed credentials file {:?}: {}",
            credentials_path, e
        ))
    })?;

    let auth = match kind.kind.as_deref() {
        Some(SERVICE_ACCOUNT_TYPE) => from_service_account(&contents).await?,
        _ => from_installed_flow(&contents, token_cache_path).await?,
    };

    // Trigger authentication by requesting a token
    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    Ok(auth)
}

fn read_credentials(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(AppError::Auth(format!(
            "Credentials file not found at {:?}",
            path
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        AppError::Auth(format!("Failed to read credentials file {:?}: {}", path, e))
    })
}

async fn from_service_account(contents: &str) -> Result<AuthType> {
    let key = yup_oauth2::parse_service_account_key(contents)
        .map_err(|e| AppError::Auth(format!("Invalid service account key: {}", e)))?;

    debug!(client_email = %key.client_email, "Using service account");

    ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))
}

async fn from_installed_flow(contents: &str, token_cache_path: Option<&Path>) -> Result<AuthType> {
    let secret = yup_oauth2::parse_application_secret(contents)
        .map_err(|e| AppError::Auth(format!("Invalid OAuth client secret: {}", e)))?;

    let token_cache_path = match token_cache_path {
        Some(path) => path.to_path_buf(),
        None => token_cache_path_for_auth()?,
    };

    // Create parent directory if it doesn't exist
    if let Some(parent) = token_cache_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Auth(format!("Failed to create token cache directory: {}", e))
        })?;
    }

    // A local server on a random port receives the authorization code
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    Ok(auth)
}

/// Clear cached Google tokens by deleting the token cache file
#[instrument(name = "Clearing auth tokens for Google Sheets", skip_all)]
pub fn clear_tokens() -> Result<()> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        debug!("No Google Sheets tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| AppError::Auth(format!("Failed to delete tokens file: {}", e)))?;
    debug!("Cleared Google Sheets cached tokens");

    Ok(())
}

/// Where OAuth tokens from the installed-app flow are cached
pub fn token_cache_path() -> Result<PathBuf> {
    Config::data_file("token.json")
}

fn token_cache_path_for_auth() -> Result<PathBuf> {
    token_cache_path().map_err(|e| AppError::Auth(format!("No token cache location: {}", e)))
}
