use async_trait::async_trait;
use civic_shared::models::{
    ErrorResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest, SystemStatus,
    SystemStatusResponse, User, VerifyEmailRequest,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::FrontendConfig;
use crate::portal::Portal;

/// Errors raised while talking to the platform API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid API url: {0}")]
    Url(String),
    #[error("not available on this portal")]
    Unsupported,
}

impl ApiError {
    /// HTTP status for errors that carry one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::Url(err.to_string())
    }
}

/// Which sign-in surface a credential is presented to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginKind {
    User,
    Admin,
    Volunteer,
}

impl LoginKind {
    #[must_use]
    pub const fn for_portal(portal: Portal) -> Self {
        match portal {
            Portal::Main => Self::User,
            Portal::Admin => Self::Admin,
            Portal::Volunteer => Self::Volunteer,
        }
    }

    #[must_use]
    pub const fn login_path(self) -> &'static str {
        match self {
            Self::User => "auth/login",
            Self::Admin => "admin/login",
            Self::Volunteer => "volunteers/login",
        }
    }

    /// Self-service registration endpoint. Administrators are provisioned,
    /// never self-registered.
    #[must_use]
    pub const fn register_path(self) -> Option<&'static str> {
        match self {
            Self::User => Some("auth/register"),
            Self::Admin => None,
            Self::Volunteer => Some("volunteers/register"),
        }
    }
}

/// Identity operations consumed by the session store.
#[async_trait(?Send)]
pub trait IdentityApi {
    /// Current identity behind the browser's session cookie.
    async fn me(&self) -> Result<User, ApiError>;

    async fn login(&self, kind: LoginKind, request: &LoginRequest) -> Result<User, ApiError>;

    async fn register(
        &self,
        kind: LoginKind,
        request: &RegisterRequest,
    ) -> Result<User, ApiError>;

    async fn verify_email(&self, request: &VerifyEmailRequest) -> Result<(), ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

/// Installation status consumed by the setup gate.
#[async_trait(?Send)]
pub trait SystemStatusApi {
    /// Fetch the status document from `path`.
    ///
    /// Relative paths resolve against the API base, absolute paths against
    /// the page origin.
    async fn system_status(&self, path: &str) -> Result<SystemStatus, ApiError>;
}

/// HTTP client for the civic platform API.
#[derive(Clone, Debug)]
pub struct CivicClient {
    base_url: Url,
    client: Client,
}

impl CivicClient {
    /// Create a client rooted at `base_url`, resolved against `origin` when
    /// relative.
    ///
    /// # Errors
    /// Returns [`ApiError::Url`] if neither input forms a valid URL.
    pub fn new(origin: &str, base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: resolve_base_url(origin, base_url)?,
            client: Client::new(),
        })
    }

    /// Create a client for the current page.
    ///
    /// # Errors
    /// Returns [`ApiError::Url`] if the configured base URL is unusable.
    pub fn from_config(config: &FrontendConfig) -> Result<Self, ApiError> {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_else(|| "http://localhost".to_string());
        Self::new(&origin, &config.api_base_url)
    }

    /// Absolute URL for an API path.
    ///
    /// # Errors
    /// Returns [`ApiError::Url`] if `path` cannot be joined onto the base.
    pub fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.api_url(path)?).send().await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.api_url(path)?)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait(?Send)]
impl IdentityApi for CivicClient {
    async fn me(&self) -> Result<User, ApiError> {
        let body: MeResponse = self.get_json("auth/me").await?;
        Ok(body.user)
    }

    async fn login(&self, kind: LoginKind, request: &LoginRequest) -> Result<User, ApiError> {
        let body: LoginResponse = self.post_json(kind.login_path(), request).await?;
        Ok(body.user)
    }

    async fn register(
        &self,
        kind: LoginKind,
        request: &RegisterRequest,
    ) -> Result<User, ApiError> {
        let path = kind.register_path().ok_or(ApiError::Unsupported)?;
        let body: LoginResponse = self.post_json(path, request).await?;
        Ok(body.user)
    }

    async fn verify_email(&self, request: &VerifyEmailRequest) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.api_url("auth/verify-email")?)
            .json(request)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.api_url("auth/logout")?).send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl SystemStatusApi for CivicClient {
    async fn system_status(&self, path: &str) -> Result<SystemStatus, ApiError> {
        let body: SystemStatusResponse = self.get_json(path).await?;
        Ok(body.system)
    }
}

/// Base URL with a trailing slash so relative joins append to it.
fn resolve_base_url(origin: &str, base_url: &str) -> Result<Url, ApiError> {
    let mut base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(origin)?.join(base_url)?,
        Err(err) => return Err(err.into()),
    };
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = response
        .json::<ErrorResponse>()
        .await
        .map_or(fallback, |body| body.error);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}
