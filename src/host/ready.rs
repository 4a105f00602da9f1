//! One-shot readiness notification
//!
//! A [`ReadySignal`] is either not ready yet, holding the callbacks waiting for
//! it, or ready. The transition happens once; callbacks subscribed afterwards
//! run immediately.

/// Readiness state of a [`ReadySignal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    NotReady,
    Ready,
}

type ReadyCallback<T> = Box<dyn FnOnce(&mut T)>;

pub struct ReadySignal<T> {
    state: Readiness,
    queue: Vec<ReadyCallback<T>>,
}

impl<T> Default for ReadySignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReadySignal<T> {
    pub fn new() -> Self {
        Self {
            state: Readiness::NotReady,
            queue: Vec::new(),
        }
    }

    pub fn state(&self) -> Readiness {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == Readiness::Ready
    }

    /// Runs `callback` now if already ready, otherwise once on the transition
    pub fn subscribe<F>(&mut self, target: &mut T, callback: F)
    where
        F: FnOnce(&mut T) + 'static,
    {
        match self.state {
            Readiness::Ready => callback(target),
            Readiness::NotReady => self.queue.push(Box::new(callback)),
        }
    }

    /// Flips to ready and flushes the queue
    ///
    /// Returns true only for the call that performed the transition.
    pub fn notify(&mut self, target: &mut T) -> bool {
        if self.state == Readiness::Ready {
            return false;
        }
        self.state = Readiness::Ready;
        for callback in std::mem::take(&mut self.queue) {
            callback(target);
        }
        true
    }

    /// Callbacks still waiting for the transition
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_callbacks_fire_once() {
        let mut signal = ReadySignal::<Vec<&'static str>>::new();
        let mut seen = Vec::new();

        signal.subscribe(&mut seen, |seen| seen.push("first"));
        signal.subscribe(&mut seen, |seen| seen.push("second"));
        assert!(seen.is_empty());
        assert_eq!(signal.pending(), 2);

        assert!(signal.notify(&mut seen));
        assert!(!signal.notify(&mut seen));

        assert_eq!(seen, vec!["first", "second"]);
        assert_eq!(signal.pending(), 0);
    }

    #[test]
    fn test_subscribe_after_ready_runs_immediately() {
        let mut signal = ReadySignal::<u32>::new();
        let mut value = 0;
        signal.notify(&mut value);

        signal.subscribe(&mut value, |v| *v += 1);
        assert_eq!(value, 1);
        assert_eq!(signal.pending(), 0);
        assert_eq!(signal.state(), Readiness::Ready);
    }
}
