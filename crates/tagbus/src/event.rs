//! Tagged events carried through the dispatcher.
//!
//! An [`Event`] is a tag plus a key-value payload. The tag is fixed at
//! construction and selects which handlers receive the event; the payload is
//! a plain map the publisher fills before handing the event over.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Payload type of an [`Event`].
pub type EventData = HashMap<String, Value>;

/// A tagged event with a mutable key-value payload.
///
/// During asynchronous dispatch a single event is shared by every handler of
/// the publish call, and handlers only ever see `&Event`.
///
/// # Examples
///
/// ```rust
/// use tagbus::Event;
///
/// let mut event = Event::new("player:joined", None);
/// event.set("name", "alice");
///
/// assert_eq!(event.tag(), "player:joined");
/// assert!(event.has("name"));
/// assert_eq!(event.get("level"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    tag: CompactString,
    #[serde(default)]
    data: EventData,
}

impl Event {
    /// Creates a new event with the given tag and optional initial payload.
    ///
    /// Passing `None` leaves the payload empty; storage is only allocated on
    /// the first [`set`](Self::set).
    pub fn new(tag: impl AsRef<str>, data: impl Into<Option<EventData>>) -> Self {
        Self {
            tag: CompactString::new(tag.as_ref()),
            data: data.into().unwrap_or_default(),
        }
    }

    /// Returns the tag of the event.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the full payload.
    #[inline]
    pub fn data(&self) -> &EventData {
        &self.data
    }

    /// Returns the full payload for in-place edits.
    #[inline]
    pub fn data_mut(&mut self) -> &mut EventData {
        &mut self.data
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns true if the payload contains `key`.
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Sets the value for `key`, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Consumes the event and returns its payload.
    pub fn into_data(self) -> EventData {
        self.data
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.tag)?;
        // Sorted so reports are stable regardless of hash order.
        let mut keys: Vec<&String> = self.data.keys().collect();
        keys.sort();
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {}: {}", key, self.data[key])?;
        }
        if !self.data.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_event_accessors() {
        let mut event = Event::new("sometag", None);

        assert_eq!(event.tag(), "sometag");
        assert!(!event.has("foo"));
        assert_eq!(event.get("foo"), None);
        assert!(event.data().is_empty());
        assert_eq!(event.data().capacity(), 0);

        event.set("foo", 42);

        assert!(event.has("foo"));
        assert_eq!(event.get("foo"), Some(&json!(42)));
        assert_eq!(event.data().len(), 1);
    }

    #[test]
    fn test_initial_payload_and_overwrite() {
        let mut data = EventData::new();
        data.insert("bar".to_string(), json!(1));

        let mut event = Event::new("foo", data);
        assert_eq!(event.get("bar"), Some(&json!(1)));

        event.set("bar", "two");
        assert_eq!(event.get("bar"), Some(&json!("two")));
        assert_eq!(event.data().len(), 1);
    }

    #[test]
    fn test_data_mut_is_shared_view() {
        let mut event = Event::new("foo", None).with("a", true);
        event.data_mut().remove("a");
        assert!(!event.has("a"));
    }

    #[test]
    fn test_display_is_sorted() {
        let event = Event::new("foo", None).with("b", 2).with("a", "x");
        assert_eq!(event.to_string(), r#"foo { a: "x", b: 2 }"#);
        assert_eq!(Event::new("bar", None).to_string(), "bar {}");
    }

    #[test]
    fn test_serde_round_trip_keeps_tag() {
        let event = Event::new("foo", None).with("bar", 1);
        let encoded = serde_json::to_string(&event).unwrap();
        let decoded: Event = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, event);

        let bare: Event = serde_json::from_str(r#"{"tag":"only"}"#).unwrap();
        assert_eq!(bare.tag(), "only");
        assert!(bare.data().is_empty());
    }
}
