//! crates/logging/src/sink/ring_buffer.rs
//! Bounded circular text buffer and the sink that feeds it.
//!
//! The buffer stores records as newline-joined text followed by a single NUL
//! terminator, so at any point the storage reads as one C-style string holding
//! the most recent lines since the write cursor last wrapped:
//!
//! ```text
//! capacity 16, after "hello" and "world":
//! h e l l o \n w o r l d \n \0 . . .
//!                              ^ head
//! ```
//!
//! Each write needs `len + 2` bytes (newline and terminator) and reuses the
//! previous terminator slot. A record never straddles the end of the storage:
//! if it does not fit in the remaining tail, the cursor wraps to the start and
//! the tail is abandoned. A record longer than the storage keeps only its last
//! `capacity - 1` bytes followed by the terminator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Sink;
use crate::record::Record;

/// Circular text store over caller-provided storage.
///
/// The storage can be anything that derefs to a byte slice: a borrowed
/// `&mut [u8]`, a `Vec<u8>`, or a `Box<[u8]>`. The buffer is not synchronised;
/// wrap it in [`RingBufferSink`] to share it between contexts.
#[derive(Debug)]
pub struct RingBuffer<B = Box<[u8]>> {
    storage: B,
    head: usize,
}

impl RingBuffer<Box<[u8]>> {
    /// Allocates zeroed storage of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(vec![0u8; capacity].into_boxed_slice())
    }
}

impl<B> RingBuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Takes over `storage`, clearing it.
    pub fn new(mut storage: B) -> Self {
        storage.as_mut().fill(0);
        Self { storage, head: 0 }
    }

    /// Size of the storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    /// Offset where the next record will start (before terminator reuse).
    #[must_use]
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Appends `message` as one line.
    pub fn push(&mut self, message: &[u8]) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        let mut message = message;
        let mut want = message.len() + 2;
        let truncated = want > capacity;
        if truncated {
            message = &message[message.len() - (capacity - 1)..];
            want = capacity;
        }

        if self.head + want > capacity {
            self.head = 0;
        }
        if self.head > 0 {
            // Overwrite the previous terminator.
            self.head -= 1;
        }

        let storage = self.storage.as_mut();
        let mut head = self.head;
        storage[head..head + message.len()].copy_from_slice(message);
        head += message.len();
        if !truncated {
            storage[head] = b'\n';
            head += 1;
        }
        storage[head] = 0;
        head += 1;

        self.head = if head >= capacity { 0 } else { head };
    }

    /// The whole storage, including stale bytes past the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_ref()
    }

    /// Stored text up to the first terminator.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        let bytes = self.storage.as_ref();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        &bytes[..end]
    }

    /// Stored lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let contents = self.contents();
        let contents = contents.strip_suffix(b"\n").unwrap_or(contents);
        contents
            .split(|&b| b == b'\n')
            .filter(move |_| !contents.is_empty())
    }

    /// Zeroes the storage and rewinds the cursor.
    pub fn clear(&mut self) {
        self.storage.as_mut().fill(0);
        self.head = 0;
    }

    /// Returns the storage.
    pub fn into_inner(self) -> B {
        self.storage
    }
}

/// [`Sink`] that appends every record to a [`RingBuffer`].
///
/// The buffer sits behind a mutex so the sink satisfies the `Send + Sync`
/// bound shared by all sinks. Records from different threads are kept whole,
/// but their relative order is whatever order the threads reach the lock.
#[derive(Debug)]
pub struct RingBufferSink<B = Box<[u8]>> {
    ring: Mutex<RingBuffer<B>>,
}

impl RingBufferSink<Box<[u8]>> {
    /// Allocates a sink with `capacity` bytes of storage.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_ring(RingBuffer::with_capacity(capacity))
    }
}

impl<B> RingBufferSink<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wraps caller-provided storage.
    pub fn new(storage: B) -> Self {
        Self::from_ring(RingBuffer::new(storage))
    }

    /// Wraps an existing ring.
    pub fn from_ring(ring: RingBuffer<B>) -> Self {
        Self {
            ring: Mutex::new(ring),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RingBuffer<B>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Size of the storage in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Current write cursor.
    #[must_use]
    pub fn head(&self) -> usize {
        self.lock().head()
    }

    /// Copy of the whole storage.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().as_bytes().to_vec()
    }

    /// Copy of the stored text up to the first terminator.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.lock().contents().to_vec()
    }

    /// Stored lines, oldest first, decoded lossily.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .lines()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Zeroes the storage and rewinds the cursor.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns the storage.
    pub fn into_inner(self) -> B {
        self.ring
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_inner()
    }
}

impl<B> Sink for RingBufferSink<B>
where
    B: AsRef<[u8]> + AsMut<[u8]> + Send,
{
    fn write(&self, record: &Record<'_>) {
        self.lock().push(record.message());
    }
}

/// Allocates a shared [`RingBufferSink`] with `capacity` bytes of storage.
#[must_use]
pub fn ring_buffer_sink(capacity: usize) -> Arc<RingBufferSink> {
    Arc::new(RingBufferSink::with_capacity(capacity))
}
