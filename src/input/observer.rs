//! Offset observers with explicit subscription handles.

use crate::types::ScrollOffset;

/// Handle returned by `subscribe`; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Receives every committed pan offset.
pub trait OffsetObserver {
    fn offset_changed(&mut self, offset: ScrollOffset);
}

impl<F> OffsetObserver for F
where
    F: FnMut(ScrollOffset),
{
    fn offset_changed(&mut self, offset: ScrollOffset) {
        self(offset);
    }
}

/// Ordered list of observers; notification follows subscription order.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(Subscription, Box<dyn OffsetObserver>)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn OffsetObserver>) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }

    pub(crate) fn notify(&mut self, offset: ScrollOffset) {
        for (_, observer) in &mut self.observers {
            observer.offset_changed(offset);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn clear(&mut self) {
        self.observers.clear();
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("next_id", &self.next_id)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ObserverRegistry::default();
        let sink = Rc::clone(&seen);
        let sub = registry.subscribe(Box::new(move |o: ScrollOffset| sink.borrow_mut().push(o)));

        registry.notify(ScrollOffset::new(1.0, 2.0));
        assert!(registry.unsubscribe(sub));
        assert!(!registry.unsubscribe(sub));
        registry.notify(ScrollOffset::new(3.0, 4.0));

        assert_eq!(*seen.borrow(), vec![ScrollOffset::new(1.0, 2.0)]);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut registry = ObserverRegistry::default();
        let a = registry.subscribe(Box::new(|_: ScrollOffset| {}));
        let b = registry.subscribe(Box::new(|_: ScrollOffset| {}));
        assert_ne!(a, b);
    }
}
