use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Composite identity of a post or comment: `author/permlink`.
///
/// The textual form is the key under which the entry lives in the
/// `content` region, so two payloads that name the same author and
/// permlink always land on the same entry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentKey {
    author: String,
    permlink: String,
}

impl ContentKey {
    /// Create a key from its two components.
    pub fn new(author: impl Into<String>, permlink: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            permlink: permlink.into(),
        }
    }

    /// Key of the parent entry, or `None` for a root post.
    ///
    /// A parent is only considered present when both components are
    /// non-empty.
    pub fn parent(parent_author: &str, parent_permlink: &str) -> Option<Self> {
        if parent_author.is_empty() || parent_permlink.is_empty() {
            None
        } else {
            Some(Self::new(parent_author, parent_permlink))
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn permlink(&self) -> &str {
        &self.permlink
    }

    /// The `author/permlink` string form.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.permlink)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({self})")
    }
}

impl FromStr for ContentKey {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((author, permlink)) if !author.is_empty() && !permlink.contains('/') => {
                Ok(Self::new(author, permlink))
            }
            _ => Err(TypeError::InvalidContentKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for ContentKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentKey> for String {
    fn from(key: ContentKey) -> Self {
        key.to_string()
    }
}
