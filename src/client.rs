use std::env;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::auth::{generate_device_id, generate_signature, session_id_to_user_id, DecodeError};
use crate::model::{
    CommunitiesObject, InviteRequest, LoginRequest, MediaType, MediaUploadResponse, MembersObject,
    Thread, ThreadsObject, UserObject,
};

const DEFAULT_BASE_URL: &str = "https://service.aminoapps.com";

/// Device identity header sent with every request.
const DEVICE_ID_HEADER: &str = "NDCDEVICEID";
/// Session header (`sid=<session id>`) sent once logged in.
const AUTH_HEADER: &str = "NDCAUTH";
/// Body signature header, only present on requests that carry a body.
const SIGNATURE_HEADER: &str = "NDC-MSG-SIG";

/// The service rejects requests without a recognized mobile user agent.
const CLIENT_USER_AGENT: &str = "Apple iPhone13,4 iOS v15.6.1 Main/3.12.9";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse url: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("Request to {path} failed with status {status}: {body}")]
    RequestFailed {
        path: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to parse Amino response: {0}")]
    ResponseParsingFailed(String),
    #[error("Failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Session decoding failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("Operation requires a logged-in session")]
    NotLoggedIn,
    #[error("Login response carried no session credentials")]
    MissingSession,
}

/// Login state shared by clones of a client.
#[derive(Debug, Clone)]
struct Session {
    sid: String,
    auid: String,
}

/// Client for the Amino HTTP API.
///
/// Holds a lazily generated, memoized device identifier and the session
/// established by [`login`](Self::login) or
/// [`login_with_session`](Self::login_with_session). Cloning is cheap;
/// clones share both.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    device_id: Arc<OnceCell<String>>,
    session: Arc<Mutex<Option<Session>>>,
}

impl ApiClient {
    /// Creates a client against the base URL from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `AMINO_API_BASE_URL` contains an invalid URL.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::with_base_url(get_api_base_url()?))
    }

    /// Creates a client against the specified base URL.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url,
            device_id: Arc::new(OnceCell::new()),
            session: Arc::new(Mutex::new(None)),
        }
    }

    /// Pins the device identifier instead of generating one on first use.
    ///
    /// No-op if the identifier was already generated or set.
    #[must_use]
    pub fn with_device_id(self, device_id: String) -> Self {
        let _ = self.device_id.set(device_id);
        self
    }

    /// The device identifier sent with every request.
    ///
    /// Generated on first access and stable for the client's lifetime (and
    /// its clones) thereafter.
    pub fn device_id(&self) -> &str {
        self.device_id.get_or_init(generate_device_id)
    }

    /// The current session id, if logged in.
    pub async fn session_id(&self) -> Option<String> {
        self.session.lock().await.as_ref().map(|s| s.sid.clone())
    }

    async fn require_auid(&self) -> Result<String, Error> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|s| s.auid.clone())
            .ok_or(Error::NotLoggedIn)
    }

    async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> Result<reqwest::Response, Error> {
        let url = self.base_url.join(path)?;

        let mut request_builder = self
            .client
            .request(method, url)
            .header(ACCEPT_LANGUAGE, "en-US")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(DEVICE_ID_HEADER, self.device_id());

        if let Some(session) = self.session.lock().await.as_ref() {
            request_builder = request_builder.header(AUTH_HEADER, format!("sid={}", session.sid));
        }

        if let Some(content_type) = content_type {
            request_builder = request_builder.header(CONTENT_TYPE, content_type);
        }

        if let Some(body) = body {
            request_builder = request_builder
                .header(SIGNATURE_HEADER, generate_signature(&body))
                .body(body);
        }

        let response = request_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(%status, path, "Amino request failed");
            return Err(Error::RequestFailed {
                path: path.to_string(),
                status,
                body,
            });
        }

        tracing::debug!(path, "Amino request succeeded");
        Ok(response)
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, Error> {
        let content_type = body.as_ref().map(|_| "application/json");
        let response = self.request_raw(method, path, body, content_type).await?;
        response
            .json()
            .await
            .map_err(|e| Error::ResponseParsingFailed(e.to_string()))
    }

    async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(), Error> {
        let content_type = body.as_ref().map(|_| "application/json");
        self.request_raw(method, path, body, content_type).await?;
        Ok(())
    }

    /// Logs in with email and password and stores the issued session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no
    /// session id / account user id.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserObject, Error> {
        let request = LoginRequest {
            email: email.to_string(),
            v: 2,
            secret: format!("0 {password}"),
            device_id: self.device_id().to_string(),
            client_type: 100,
            action: "normal".to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
        let body = serde_json::to_vec(&request)?;

        let user: UserObject = self
            .request_json(Method::POST, "/api/v1/g/s/auth/login", Some(body))
            .await?;

        let sid = user.sid.clone().ok_or(Error::MissingSession)?;
        let auid = user.auid.clone().ok_or(Error::MissingSession)?;
        tracing::debug!(%auid, "logged in");
        *self.session.lock().await = Some(Session { sid, auid });

        Ok(user)
    }

    /// Resumes an existing session from its session id.
    ///
    /// Recovers the user id embedded in the session id, stores the session,
    /// and fetches the account's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the session id cannot be decoded or the profile
    /// fetch fails.
    pub async fn login_with_session(&self, session_id: &str) -> Result<UserObject, Error> {
        let auid = session_id_to_user_id(session_id)?;
        *self.session.lock().await = Some(Session {
            sid: session_id.to_string(),
            auid: auid.clone(),
        });
        self.get_user(&auid).await
    }

    /// Fetches a user profile by user id.
    pub async fn get_user(&self, user_id: &str) -> Result<UserObject, Error> {
        self.request_json(
            Method::GET,
            &format!("/api/v1/g/s/user-profile/{user_id}"),
            None,
        )
        .await
    }

    /// Lists the communities the account has joined.
    pub async fn get_communities(&self, start: u32, size: u32) -> Result<CommunitiesObject, Error> {
        self.request_json(
            Method::GET,
            &format!("/api/v1/g/s/community/joined?v=1&start={start}&size={size}"),
            None,
        )
        .await
    }

    /// Lists the chat threads the account participates in.
    pub async fn get_threads(&self, start: u32, size: u32) -> Result<ThreadsObject, Error> {
        self.request_json(
            Method::GET,
            &format!("/api/v1/g/s/chat/thread?type=joined-me&start={start}&size={size}"),
            None,
        )
        .await
    }

    /// Fetches a single chat thread.
    pub async fn get_thread(&self, thread_id: &str) -> Result<Thread, Error> {
        self.request_json(
            Method::GET,
            &format!("/api/v1/g/s/chat/thread/{thread_id}"),
            None,
        )
        .await
    }

    /// Lists the members of a chat thread.
    pub async fn get_thread_members(
        &self,
        thread_id: &str,
        start: u32,
        size: u32,
    ) -> Result<MembersObject, Error> {
        self.request_json(
            Method::GET,
            &format!(
                "/api/v1/g/s/chat/thread/{thread_id}/member?start={start}&size={size}&type=default&cv=1.2"
            ),
            None,
        )
        .await
    }

    /// Joins a chat thread as the logged-in account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without issuing a request if no
    /// session is stored.
    pub async fn join_thread(&self, thread_id: &str) -> Result<(), Error> {
        let auid = self.require_auid().await?;
        self.request_raw(
            Method::POST,
            &format!("/api/v1/g/s/chat/thread/{thread_id}/member/{auid}"),
            None,
            Some("application/x-www-form-urlencoded"),
        )
        .await?;
        Ok(())
    }

    /// Leaves a chat thread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] without issuing a request if no
    /// session is stored.
    pub async fn leave_thread(&self, thread_id: &str) -> Result<(), Error> {
        let auid = self.require_auid().await?;
        self.request_empty(
            Method::DELETE,
            &format!("/api/v1/g/s/chat/thread/{thread_id}/member/{auid}"),
            None,
        )
        .await
    }

    /// Invites users to a chat thread.
    pub async fn invite_to_thread(
        &self,
        thread_id: &str,
        user_ids: &[String],
    ) -> Result<(), Error> {
        let body = serde_json::to_vec(&InviteRequest {
            uids: user_ids.to_vec(),
            timestamp: Utc::now().timestamp_millis(),
        })?;
        self.request_empty(
            Method::POST,
            &format!("/api/v1/g/s/chat/thread/{thread_id}/member/invite"),
            Some(body),
        )
        .await
    }

    /// Uploads media and returns the service-assigned media value.
    pub async fn upload_media(
        &self,
        bytes: Vec<u8>,
        media_type: MediaType,
    ) -> Result<MediaUploadResponse, Error> {
        let response = self
            .request_raw(
                Method::POST,
                "/api/v1/g/s/media/upload",
                Some(bytes),
                Some(media_type.content_type()),
            )
            .await?;
        response
            .json()
            .await
            .map_err(|e| Error::ResponseParsingFailed(e.to_string()))
    }
}

fn get_api_base_url() -> Result<Url, Error> {
    let url_str =
        env::var("AMINO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    Url::parse(&url_str).map_err(Error::from)
}
