//! Re-entrancy control for converters that delegate back to the driver.
//!
//! A converter that wants the *structural* form of a value asks the driver
//! to convert it again. The driver would dispatch to the same converter,
//! so the converter first suppresses itself for one dispatch:
//!
//! ```
//! use pj_json::guard::{Direction, ReentrancyGuard};
//!
//! let guard = ReentrancyGuard::new();
//! {
//!     let _suppressed = guard.enter(Direction::Write);
//!     // The driver asks the converter whether it may write.
//!     assert!(guard.consume(Direction::Write));
//!     // The flag is one-shot, nested values see the converter again.
//!     assert!(!guard.consume(Direction::Write));
//! }
//! assert!(!guard.is_suppressed(Direction::Write));
//! ```
//!
//! Flags live in a thread local set keyed by guard id and direction,
//! calls on other threads never observe them.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU64, Ordering};

use pj_utils::hash::{FixedHashState, HashSet};

// -----------------------------------------------------------------------------
// State

static NEXT_GUARD_ID: AtomicU64 = AtomicU64::new(0);

std::thread_local! {
    static SUPPRESSED: RefCell<HashSet<(u64, Direction)>> =
        const { RefCell::new(HashSet::with_hasher(FixedHashState)) };
}

// -----------------------------------------------------------------------------
// Direction

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Write,
    Read,
}

// -----------------------------------------------------------------------------
// ReentrancyGuard

/// Two one-shot suppression flags, one per [`Direction`], scoped to the current thread.
#[derive(Debug)]
pub struct ReentrancyGuard {
    id: u64,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self {
            id: NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Set the flag for `direction` until the returned value is dropped.
    ///
    /// Dropping clears the flag on every exit path, including errors and
    /// unwinding, even if it was never consumed.
    #[must_use = "the flag is cleared as soon as the suppression is dropped"]
    pub fn enter(&self, direction: Direction) -> Suppression {
        SUPPRESSED.with_borrow_mut(|set| set.insert((self.id, direction)));
        Suppression {
            id: self.id,
            direction,
        }
    }

    /// Read and clear the flag for `direction`.
    ///
    /// Returns `true` if it was set.
    pub fn consume(&self, direction: Direction) -> bool {
        SUPPRESSED.with_borrow_mut(|set| set.remove(&(self.id, direction)))
    }

    /// Read the flag without clearing it.
    pub fn is_suppressed(&self, direction: Direction) -> bool {
        SUPPRESSED.with_borrow(|set| set.contains(&(self.id, direction)))
    }
}

impl Default for ReentrancyGuard {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Suppression

/// A set suppression flag, see [`ReentrancyGuard::enter`].
#[derive(Debug)]
pub struct Suppression {
    id: u64,
    direction: Direction,
}

impl Drop for Suppression {
    fn drop(&mut self) {
        // The thread local may already be gone during thread teardown.
        let _ = SUPPRESSED.try_with(|set| set.borrow_mut().remove(&(self.id, self.direction)));
    }
}

// -----------------------------------------------------------------------------
// Tests
