//! Typed view of a single archive post, extracted best-effort from its JSON object.

use crate::json_utils::{bool_field, count_field, entities_array, id_field, str_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A link entity (`entities.urls[]`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: Option<String>,
    pub expanded_url: Option<String>,
    pub display_url: Option<String>,
}

/// A user mention entity (`entities.user_mentions[]`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub name: Option<String>,
    pub screen_name: Option<String>,
}

/// One post of the account. Missing fields are tolerated; only `id` gates indexing.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub id: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub urls: Vec<Link>,
    pub user_mentions: Vec<Mention>,
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub in_reply_to_status_id: Option<String>,
    pub in_reply_to_screen_name: Option<String>,
    pub in_reply_to_user_id: Option<String>,
    pub retweeted: Option<bool>,
    /// The unwrapped source object, kept verbatim for pass-through outputs.
    pub raw: Value,
}

impl Link {
    fn from_value(v: &Value) -> Self {
        Self {
            url: str_field(v, "url"),
            expanded_url: str_field(v, "expanded_url"),
            display_url: str_field(v, "display_url"),
        }
    }
}

impl Mention {
    fn from_value(v: &Value) -> Self {
        Self {
            name: str_field(v, "name"),
            screen_name: str_field(v, "screen_name"),
        }
    }
}

impl Post {
    /// Build a post from an unwrapped JSON object. Never fails: absent or mistyped
    /// fields become `None`/empty/zero.
    pub fn from_value(v: Value) -> Self {
        Self {
            id: id_field(&v, "id_str").or_else(|| id_field(&v, "id")),
            text: str_field(&v, "full_text").or_else(|| str_field(&v, "text")),
            created_at: str_field(&v, "created_at"),
            urls: entities_array(&v, "urls").iter().map(Link::from_value).collect(),
            user_mentions: entities_array(&v, "user_mentions").iter().map(Mention::from_value).collect(),
            favorite_count: count_field(&v, "favorite_count").unwrap_or(0),
            retweet_count: count_field(&v, "retweet_count").unwrap_or(0),
            in_reply_to_status_id: id_field(&v, "in_reply_to_status_id_str")
                .or_else(|| id_field(&v, "in_reply_to_status_id")),
            in_reply_to_screen_name: str_field(&v, "in_reply_to_screen_name"),
            in_reply_to_user_id: id_field(&v, "in_reply_to_user_id_str")
                .or_else(|| id_field(&v, "in_reply_to_user_id")),
            retweeted: bool_field(&v, "retweeted"),
            raw: v,
        }
    }

    /// True when this post replies to another post.
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_status_id.is_some()
    }

    /// Expanded URLs of this post, in entity order, skipping links without one.
    pub fn expanded_urls(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().filter_map(|l| l.expanded_url.as_deref())
    }
}
