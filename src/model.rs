use serde::{Deserialize, Serialize};

/// Request payload for a credentialed login.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub v: i64,
    /// `"0 <password>"`, the service's plaintext-password marker.
    pub secret: String,
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "clientType")]
    pub client_type: i64,
    pub action: String,
    /// Unix milliseconds; covered by the request signature.
    pub timestamp: i64,
}

/// Request payload for inviting users to a chat thread.
#[derive(Debug, Serialize)]
pub struct InviteRequest {
    pub uids: Vec<String>,
    pub timestamp: i64,
}

/// Content type of an upload to the media endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Audio,
}

impl MediaType {
    pub fn content_type(self) -> &'static str {
        match self {
            MediaType::Image => "image/jpg",
            MediaType::Audio => "audio/aac",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub username: Option<String>,
    pub uid: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<i64>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub role: Option<i64>,
    pub icon: Option<String>,
    pub level: Option<i64>,
    pub nickname: Option<String>,
    pub mood_sticker: Option<serde_json::Value>,
    pub items_count: Option<i64>,
    pub modified_time: Option<String>,
    pub following_status: Option<i64>,
    pub posts_count: Option<i64>,
    pub members_count: Option<i64>,
    pub media_list: Option<serde_json::Value>,
    pub ndc_id: Option<i64>,
    pub stories_count: Option<i64>,
}

/// Login and profile responses; `auid`/`sid` are only present on login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserObject {
    pub auid: Option<String>,
    pub secret: Option<String>,
    pub sid: Option<String>,
    pub account: Option<Account>,
    pub user_profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Community {
    pub link: Option<String>,
    pub icon: Option<String>,
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub ndc_id: Option<i64>,
    pub modified_time: Option<String>,
    pub primary_language: Option<String>,
    pub join_type: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommunitiesObject {
    pub community_list: Option<Vec<Community>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thread {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub status: Option<i64>,
    pub icon: Option<String>,
    pub uid: Option<String>,
    pub title: Option<String>,
    pub content: Option<serde_json::Value>,
    pub keywords: Option<serde_json::Value>,
    pub ndc_id: Option<i64>,
    pub thread_id: Option<String>,
    pub created_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThreadsObject {
    pub thread_list: Option<Vec<Thread>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvatarFrame {
    pub status: Option<i64>,
    pub ownership_status: Option<i64>,
    pub version: Option<i64>,
    pub resource_url: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub frame_type: Option<i64>,
    pub frame_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    pub status: Option<i64>,
    pub is_nickname_verified: Option<bool>,
    pub uid: Option<String>,
    pub level: Option<i64>,
    pub account_membership_status: Option<i64>,
    pub membership_status: Option<i64>,
    pub reputation: Option<i64>,
    pub role: Option<i64>,
    pub nickname: Option<String>,
    pub icon: Option<String>,
    pub avatar_frame: Option<AvatarFrame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MembersObject {
    pub member_list: Option<Vec<Member>>,
}

/// Response from the media upload endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaUploadResponse {
    pub media_value: Option<String>,
}
