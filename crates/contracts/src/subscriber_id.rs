//! SubscriberId - Cheap-to-clone subscriber identity
//!
//! Uses Arc<str> internally so every delivery can carry the id without allocating.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Subscriber identity, unique within a dispatcher.
///
/// Cloning only increments a reference count. Ids are created once at
/// registration time and then attached to every delivery and status
/// callback handed to the presentation shell.
///
/// # Examples
/// ```
/// use contracts::SubscriberId;
///
/// let id: SubscriberId = "hamid".into();
/// let id2 = id.clone();
/// assert_eq!(id, id2);
/// assert_eq!(id.as_str(), "hamid");
/// ```
#[derive(Clone, Default)]
pub struct SubscriberId(Arc<str>);

impl SubscriberId {
    /// Create a new SubscriberId from a string slice.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the underlying string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for SubscriberId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for SubscriberId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SubscriberId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for SubscriberId {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({:?})", self.0)
    }
}

impl PartialEq for SubscriberId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for SubscriberId {}

impl PartialEq<str> for SubscriberId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for SubscriberId {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl PartialEq<String> for SubscriberId {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        self.0.as_ref() == other
    }
}

// Must hash like `str` so HashMap<SubscriberId, _> can be queried with &str
impl Hash for SubscriberId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Serialize for SubscriberId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubscriberId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
