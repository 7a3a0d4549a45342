//! The cursor contract consumed by find iterators.
//!
//! A cursor is an already-executed, forward-only handle over a result set.
//! Each fetch reports one of four structural outcomes. Drivers that fail when
//! reading from a statement that was never executed (or was already closed)
//! report [`Fetch::NotExecuted`] instead of an error; consumers treat it
//! exactly like [`Fetch::EndOfResults`].

use crate::error::CursorError;
use crate::row::Row;

/// Outcome of fetching one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    /// The next row.
    Row(Row),
    /// The result set is exhausted.
    EndOfResults,
    /// The underlying statement was never executed or is already closed.
    NotExecuted,
    /// Any other driver failure.
    Failed(CursorError),
}

impl Fetch {
    /// True for both ways a result set can have no further rows.
    pub const fn is_end(&self) -> bool {
        matches!(self, Fetch::EndOfResults | Fetch::NotExecuted)
    }
}

/// A stateful handle for pulling rows one at a time.
///
/// Fetching past the end keeps returning [`Fetch::EndOfResults`].
pub trait Cursor {
    /// Fetch the next row.
    fn fetch_row(&mut self) -> Fetch;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn fetch_row(&mut self) -> Fetch {
        (**self).fetch_row()
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn fetch_row(&mut self) -> Fetch {
        (**self).fetch_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl Cursor for Countdown {
        fn fetch_row(&mut self) -> Fetch {
            if self.0 == 0 {
                return Fetch::EndOfResults;
            }
            self.0 -= 1;
            Fetch::Row(Row::new().with("n", i64::from(self.0)))
        }
    }

    #[test]
    fn test_is_end() {
        assert!(Fetch::EndOfResults.is_end());
        assert!(Fetch::NotExecuted.is_end());
        assert!(!Fetch::Row(Row::new()).is_end());
        assert!(!Fetch::Failed(CursorError::Driver("x".into())).is_end());
    }

    fn drain<C: Cursor>(mut cursor: C) -> usize {
        let mut rows = 0;
        while let Fetch::Row(_) = cursor.fetch_row() {
            rows += 1;
        }
        rows
    }

    #[test]
    fn test_forwarding_impls() {
        let mut cursor = Countdown(3);
        assert!(matches!(cursor.fetch_row(), Fetch::Row(_)));
        assert_eq!(drain(&mut cursor), 2);
        assert_eq!(cursor.fetch_row(), Fetch::EndOfResults);

        let boxed: Box<dyn Cursor> = Box::new(Countdown(4));
        assert_eq!(drain(boxed), 4);
    }
}
