//! Mock API client for testing.
//!
//! `MockApiClient` implements [`AminoClient`] over in-memory data, so
//! consuming applications can integration-test service layers without a
//! network or a live session. Unknown ids produce the same
//! [`Error::RequestFailed`] shape the real client maps a 404 to, and the
//! list endpoints honor `start`/`size` paging.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::client::Error;
use crate::client_trait::AminoClient;
use crate::model::{
    Community, CommunitiesObject, Member, MembersObject, Thread, ThreadsObject, UserObject,
};

#[derive(Debug, Default)]
pub struct MockApiClient {
    users: HashMap<String, UserObject>,
    threads: HashMap<String, Thread>,
    members: HashMap<String, Vec<Member>>,
    communities: Vec<Community>,
    call_count: AtomicUsize,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user profile under the given user id.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>, user: UserObject) -> Self {
        self.users.insert(user_id.into(), user);
        self
    }

    /// Registers a thread; keyed by its `thread_id` (empty string if unset).
    #[must_use]
    pub fn with_thread(mut self, thread: Thread) -> Self {
        let key = thread.thread_id.clone().unwrap_or_default();
        self.threads.insert(key, thread);
        self
    }

    /// Registers the member list of a thread.
    #[must_use]
    pub fn with_thread_members(
        mut self,
        thread_id: impl Into<String>,
        members: Vec<Member>,
    ) -> Self {
        self.members.insert(thread_id.into(), members);
        self
    }

    /// Adds a joined community.
    #[must_use]
    pub fn with_community(mut self, community: Community) -> Self {
        self.communities.push(community);
        self
    }

    /// Number of trait calls served so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    fn not_found(path: String) -> Error {
        Error::RequestFailed {
            path,
            status: StatusCode::NOT_FOUND,
            body: "Not found".to_string(),
        }
    }

    fn page<T: Clone>(items: &[T], start: u32, size: u32) -> Vec<T> {
        items
            .iter()
            .skip(start as usize)
            .take(size as usize)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AminoClient for MockApiClient {
    async fn get_user(&self, user_id: &str) -> Result<UserObject, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/api/v1/g/s/user-profile/{user_id}")))
    }

    async fn get_communities(&self, start: u32, size: u32) -> Result<CommunitiesObject, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(CommunitiesObject {
            community_list: Some(Self::page(&self.communities, start, size)),
        })
    }

    async fn get_threads(&self, start: u32, size: u32) -> Result<ThreadsObject, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut threads: Vec<Thread> = self.threads.values().cloned().collect();
        threads.sort_by(|a, b| a.thread_id.cmp(&b.thread_id));
        Ok(ThreadsObject {
            thread_list: Some(Self::page(&threads, start, size)),
        })
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Thread, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.threads
            .get(thread_id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/api/v1/g/s/chat/thread/{thread_id}")))
    }

    async fn get_thread_members(
        &self,
        thread_id: &str,
        start: u32,
        size: u32,
    ) -> Result<MembersObject, Error> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let members = self
            .members
            .get(thread_id)
            .ok_or_else(|| Self::not_found(format!("/api/v1/g/s/chat/thread/{thread_id}/member")))?;
        Ok(MembersObject {
            member_list: Some(Self::page(members, start, size)),
        })
    }
}
