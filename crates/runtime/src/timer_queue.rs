use foundation::time::Millis;

/// Deterministic timer queue on a caller-driven virtual clock.
///
/// Key properties:
/// - Total ordering on `(due, id)`: timers due at the same instant fire in
///   the order they were scheduled.
/// - Cancelling withdraws the timer outright; it is never returned later.
/// - Timers scheduled while draining are seen by the same drain if already due.
///
/// Vec-backed on purpose: a map activation holds at most a few hundred timers
/// and deterministic order matters more than asymptotics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    due: Millis,
    id: TimerId,
}

#[derive(Debug)]
struct Entry<T> {
    key: Key,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schedule(&mut self, due: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            key: Key { due, id },
            payload,
        });
        id
    }

    /// Withdraws a pending timer. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.key.id == id) {
            Some(idx) => {
                self.entries.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Withdraws every timer in `ids`, returning how many were still pending.
    pub fn cancel_all(&mut self, ids: impl IntoIterator<Item = TimerId>) -> usize {
        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.key.due).min()
    }

    /// Pops the earliest timer whose due time is `<= now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(TimerId, Millis, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.key.due <= now)
            .min_by_key(|(_, e)| e.key)
            .map(|(idx, _)| idx)?;

        let entry = self.entries.swap_remove(idx);
        Some((entry.key.id, entry.key.due, entry.payload))
    }
}
