//! Replay-last publish/subscribe channel.
//!
//! Holds one current value. A new subscriber is called with that value
//! immediately, then with every published value, in publish order. Listeners
//! run synchronously in registration order on the publishing thread.

use std::fmt;

/// Handle returned by [`Broadcast::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct Broadcast<T> {
    current: T,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Broadcast<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub const fn current(&self) -> &T {
        &self.current
    }

    /// Register a listener; it sees the current value before this returns.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        listener(&self.current);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Replace the current value and notify every listener.
    pub fn publish(&mut self, value: T) {
        self.current = value;
        for (_, listener) in &mut self.listeners {
            listener(&self.current);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Broadcast<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcast")
            .field("current", &self.current)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_replays_current_on_subscribe() {
        let mut channel = Broadcast::new(1);
        channel.publish(2);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        channel.subscribe(move |v| sink.borrow_mut().push(*v));
        channel.publish(3);

        assert_eq!(*seen.borrow(), vec![2, 3]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let mut channel = Broadcast::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            channel.subscribe(move |v| order.borrow_mut().push((name, *v)));
        }
        order.borrow_mut().clear();
        channel.publish(7);

        assert_eq!(
            *order.borrow(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut channel = Broadcast::new(0);
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = channel.subscribe(move |_| *c.borrow_mut() += 1);

        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.publish(1);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }
}
