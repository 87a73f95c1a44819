//! Trait for Amino API client implementations
//!
//! This trait defines the read-side methods needed by service layers.
//! Both the production `ApiClient` and the test `MockApiClient` implement
//! it, so services can be exercised without touching the network.

use async_trait::async_trait;

use crate::client::Error;
use crate::model::{CommunitiesObject, MembersObject, Thread, ThreadsObject, UserObject};

/// Trait for Amino API client implementations.
#[async_trait]
pub trait AminoClient: Send + Sync {
    /// Fetch a user profile by user id.
    async fn get_user(&self, user_id: &str) -> Result<UserObject, Error>;

    /// List the communities the account has joined.
    async fn get_communities(&self, start: u32, size: u32) -> Result<CommunitiesObject, Error>;

    /// List the chat threads the account participates in.
    async fn get_threads(&self, start: u32, size: u32) -> Result<ThreadsObject, Error>;

    /// Fetch a single chat thread.
    async fn get_thread(&self, thread_id: &str) -> Result<Thread, Error>;

    /// List the members of a chat thread.
    async fn get_thread_members(
        &self,
        thread_id: &str,
        start: u32,
        size: u32,
    ) -> Result<MembersObject, Error>;
}

#[async_trait]
impl AminoClient for crate::client::ApiClient {
    async fn get_user(&self, user_id: &str) -> Result<UserObject, Error> {
        Self::get_user(self, user_id).await
    }

    async fn get_communities(&self, start: u32, size: u32) -> Result<CommunitiesObject, Error> {
        Self::get_communities(self, start, size).await
    }

    async fn get_threads(&self, start: u32, size: u32) -> Result<ThreadsObject, Error> {
        Self::get_threads(self, start, size).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Thread, Error> {
        Self::get_thread(self, thread_id).await
    }

    async fn get_thread_members(
        &self,
        thread_id: &str,
        start: u32,
        size: u32,
    ) -> Result<MembersObject, Error> {
        Self::get_thread_members(self, thread_id, start, size).await
    }
}
