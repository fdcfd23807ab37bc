//! Bounded blocking queue connecting the pipeline tasks

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// Fixed-capacity FIFO shared between a producer and a consumer
///
/// `put` blocks while the queue is full; `get` blocks while it is empty and
/// the channel is alive. After [`Channel::kill`], `put` becomes a no-op and
/// `get` drains the buffered items before reporting end of stream.
pub struct Channel<T> {
    capacity: usize,
    state: Mutex<ChannelState<T>>,
    /// Signalled when an item leaves the queue
    space_available: Condvar,
    /// Signalled when an item enters the queue
    data_available: Condvar,
}

struct ChannelState<T> {
    queue: VecDeque<T>,
    alive: bool,
}

impl<T> Channel<T> {
    /// Creates a live channel holding at most `capacity` items (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Channel {
            capacity,
            state: Mutex::new(ChannelState {
                queue: VecDeque::with_capacity(capacity),
                alive: true,
            }),
            space_available: Condvar::new(),
            data_available: Condvar::new(),
        }
    }

    /// Maximum number of buffered items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered items
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// True if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// False once the channel has been killed
    pub fn is_alive(&self) -> bool {
        self.state.lock().alive
    }

    /// Appends `item`, waiting for space if the channel is full
    ///
    /// Returns false (dropping the item) if the channel is dead, including
    /// when it is killed while this call waits.
    pub fn put(&self, item: T) -> bool {
        let mut state = self.state.lock();
        while state.queue.len() >= self.capacity && state.alive {
            self.space_available.wait(&mut state);
        }
        if !state.alive {
            return false;
        }

        state.queue.push_back(item);
        drop(state);
        self.data_available.notify_one();
        true
    }

    /// Takes the oldest item, waiting while the channel is empty and alive
    ///
    /// Returns `None` once the channel is dead and drained.
    pub fn get(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.queue.is_empty() && state.alive {
            self.data_available.wait(&mut state);
        }

        let item = state.queue.pop_front()?;
        drop(state);
        self.space_available.notify_one();
        Some(item)
    }

    /// Marks the channel dead and wakes every waiter; idempotent
    pub fn kill(&self) {
        let mut state = self.state.lock();
        if !state.alive {
            return;
        }
        state.alive = false;
        let buffered = state.queue.len();
        drop(state);

        tracing::debug!(buffered, "channel killed");
        self.space_available.notify_all();
        self.data_available.notify_all();
    }

    /// Iterator over [`Channel::get`] until end of stream
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.get())
    }
}
