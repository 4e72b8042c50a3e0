//! Single-shot completion notification

use std::fmt;

/// Identifies a subscription so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Delivers one completion event to every subscriber, exactly once.
///
/// After [`fire`](Self::fire) the notifier is spent: later `fire` calls do
/// nothing, and a late subscriber is invoked on the spot with the stored
/// event instead of being queued.
pub struct CompletionNotifier<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
    fired: Option<E>,
}

impl<E: Clone> CompletionNotifier<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
            fired: None,
        }
    }

    /// Register a listener
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let mut listener = listener;
        match &self.fired {
            Some(event) => listener(event),
            None => self.listeners.push((id, Box::new(listener))),
        }
        id
    }

    /// Remove a listener. Returns whether it was still registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Invoke and drop all listeners. Returns `false` if already fired.
    pub fn fire(&mut self, event: E) -> bool {
        if self.fired.is_some() {
            return false;
        }

        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
        self.listeners.clear();
        self.fired = Some(event);
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: Clone> Default for CompletionNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for CompletionNotifier<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionNotifier")
            .field("listeners", &self.listeners.len())
            .field("fired", &self.fired.is_some())
            .finish()
    }
}
