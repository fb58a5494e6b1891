//! Process-wide scratch buffers for binary string decoding.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Capacity of a freshly allocated scratch buffer.
pub(crate) const INITIAL_CAPACITY: usize = 64;

/// Buffers that grew past this are replaced before returning to the pool.
pub(crate) const MAX_RETAINED_CAPACITY: usize = 4096;

/// Upper bound on idle buffers kept by the pool.
const MAX_POOLED: usize = 32;

static POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

/// A scratch buffer on loan from the pool; returned on drop.
pub(crate) struct PooledBuf {
    buf: Vec<u8>,
}

impl PooledBuf {
    /// Take an empty buffer from the pool, or allocate one.
    pub(crate) fn acquire() -> Self {
        // A poisoned lock only means another decoder panicked mid-push.
        let reused = match POOL.lock() {
            Ok(mut pool) => pool.pop(),
            Err(poisoned) => poisoned.into_inner().pop(),
        };
        let mut buf = reused.unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY));
        buf.clear();
        Self { buf }
    }
}

impl Deref for PooledBuf {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuf {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            buf = Vec::with_capacity(INITIAL_CAPACITY);
        }
        buf.clear();

        let mut pool = match POOL.lock() {
            Ok(pool) => pool,
            Err(poisoned) => poisoned.into_inner(),
        };
        if pool.len() < MAX_POOLED {
            pool.push(buf);
        }
    }
}
