/// Tag to handler-list mapping owned by a dispatcher
use crate::handler::HandlerRef;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Handlers registered for a single tag, in subscription order.
/// Most tags carry a handful of handlers, so they stay inline.
pub(crate) type HandlerList = SmallVec<[HandlerRef; 4]>;

/// Subscription registry.
///
/// Not synchronised itself; the owning dispatcher keeps it behind its mutex.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    subscribers: HashMap<CompactString, HandlerList>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends every handler not already present for `tag`.
    ///
    /// The entry for `tag` is created as soon as at least one item is given,
    /// even if every item turns out to be absent or a duplicate.
    pub(crate) fn subscribe<I>(&mut self, tag: &str, handlers: I) -> usize
    where
        I: IntoIterator<Item = Option<HandlerRef>>,
    {
        let mut handlers = handlers.into_iter().peekable();
        if handlers.peek().is_none() {
            return 0;
        }

        let list = self
            .subscribers
            .entry(CompactString::new(tag))
            .or_insert_with(HandlerList::new);

        let mut added = 0;
        for handler in handlers.flatten() {
            if list.contains(&handler) {
                continue;
            }
            list.push(handler);
            added += 1;
        }
        added
    }

    /// Removes the first identity match of each handler; drops the entry once empty.
    pub(crate) fn unsubscribe(&mut self, tag: &str, handlers: &[HandlerRef]) -> usize {
        let Some(list) = self.subscribers.get_mut(tag) else {
            return 0;
        };

        let mut removed = 0;
        for handler in handlers {
            if let Some(pos) = list.iter().position(|h| h == handler) {
                list.remove(pos);
                removed += 1;
            }
        }

        if list.is_empty() {
            self.subscribers.remove(tag);
        }
        removed
    }

    /// Removes the whole entry for `tag`, returning how many handlers it held.
    pub(crate) fn remove_tag(&mut self, tag: &str) -> usize {
        self.subscribers.remove(tag).map_or(0, |list| list.len())
    }

    pub(crate) fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Handlers currently registered for `tag`; empty if the tag is unknown.
    pub(crate) fn handlers(&self, tag: &str) -> &[HandlerRef] {
        self.subscribers
            .get(tag)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Owned copy of the handlers for `tag`.
    pub(crate) fn snapshot(&self, tag: &str) -> HandlerList {
        self.handlers(tag).iter().cloned().collect()
    }

    pub(crate) fn contains_tag(&self, tag: &str) -> bool {
        self.subscribers.contains_key(tag)
    }

    pub(crate) fn tags(&self) -> Vec<String> {
        self.subscribers.keys().map(|tag| tag.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;

    fn noop() -> HandlerRef {
        HandlerRef::from_fn(|_: &Event| {})
    }

    #[test]
    fn test_subscribe_skips_duplicates_and_absent() {
        let mut registry = Registry::new();
        let a = noop();
        let b = noop();

        let added = registry.subscribe("foo", [Some(a.clone()), None, Some(a.clone()), Some(b.clone())]);
        assert_eq!(added, 2);
        assert_eq!(registry.handlers("foo"), &[a.clone(), b.clone()]);

        assert_eq!(registry.subscribe("foo", [Some(b.clone())]), 0);
        assert_eq!(registry.handlers("foo").len(), 2);
    }

    #[test]
    fn test_subscribe_with_only_absent_creates_entry() {
        let mut registry = Registry::new();
        registry.subscribe("foo", [None]);
        assert!(registry.contains_tag("foo"));
        assert!(registry.handlers("foo").is_empty());

        registry.subscribe("bar", std::iter::empty());
        assert!(!registry.contains_tag("bar"));
    }

    #[test]
    fn test_unsubscribe_drops_empty_entry() {
        let mut registry = Registry::new();
        let a = noop();
        let b = noop();
        registry.subscribe("foo", [Some(a.clone()), Some(b.clone())]);

        assert_eq!(registry.unsubscribe("foo", &[a.clone(), noop()]), 1);
        assert_eq!(registry.handlers("foo"), &[b.clone()]);

        assert_eq!(registry.unsubscribe("foo", &[b]), 1);
        assert!(!registry.contains_tag("foo"));
        assert_eq!(registry.unsubscribe("foo", &[a]), 0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut registry = Registry::new();
        let a = noop();
        registry.subscribe("foo", [Some(a.clone())]);

        let snapshot = registry.snapshot("foo");
        registry.clear();

        assert_eq!(snapshot.as_slice(), &[a]);
        assert!(registry.handlers("foo").is_empty());
        assert_eq!(registry.remove_tag("foo"), 0);
        assert!(registry.tags().is_empty());
    }
}
