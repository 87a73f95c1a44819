//! # Amino Client Library
//!
//! A Rust client library for the Amino (aminoapps.com) mobile-social HTTP
//! API. It reproduces the mobile client's device-identity and
//! request-signing scheme and exposes async methods for the core endpoints:
//! login, profile lookup, community and chat-thread listing, thread
//! membership and media upload.
//!
//! ## Modules
//!
//! - [`auth`] - device identifiers, HMAC-SHA1 request signatures, session
//!   token decoding
//! - [`client`] - HTTP API client
//! - [`client_trait`] - trait seam shared by the real and mock clients
//! - [`mock_client`] - canned-data client for integration testing
//! - [`model`] - request and response data structures
//!
//! ## Protocol warning
//!
//! The signing keys, the device identifier layout and the session token
//! framing are reverse engineered from an undocumented third-party
//! protocol. A change in the remote service can break them without notice.
//!
//! ## Example
//!
//! ```rust,no_run
//! use amino_rs::ApiClient;
//!
//! # async fn run() -> Result<(), amino_rs::Error> {
//! let client = ApiClient::new()?;
//! let user = client.login("user@example.com", "password").await?;
//! let threads = client.get_threads(0, 100).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod client_trait;
pub mod mock_client;
pub mod model;

pub use auth::{
    decode_session_id, device_id_from_entropy, generate_device_id, generate_signature,
    session_id_to_user_id, DecodeError,
};
pub use client::{ApiClient, Error};
pub use client_trait::AminoClient;
pub use mock_client::MockApiClient;
pub use model::{
    Account, AvatarFrame, CommunitiesObject, Community, InviteRequest, LoginRequest, MediaType,
    MediaUploadResponse, Member, MembersObject, Thread, ThreadsObject, UserObject, UserProfile,
};
