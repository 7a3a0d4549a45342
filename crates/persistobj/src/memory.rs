//! In-memory cursors.

use std::collections::VecDeque;

use persistobj_core::{Cursor, CursorError, Fetch, Row};

/// A cursor over rows held in memory.
///
/// Useful for tests and for feeding already-materialized rows through the
/// same find iterator a driver cursor would use.
#[derive(Debug, Clone, Default)]
pub struct VecCursor {
    rows: VecDeque<Row>,
    executed: bool,
    fetches: usize,
    failure: Option<(usize, CursorError)>,
}

impl VecCursor {
    /// Create an executed cursor over `rows`.
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            executed: true,
            fetches: 0,
            failure: None,
        }
    }

    /// Create a cursor whose statement was never executed.
    ///
    /// Every fetch reports [`Fetch::NotExecuted`].
    pub fn unexecuted() -> Self {
        Self::default()
    }

    /// Make the fetch with zero-based index `fetch` fail with `error`.
    ///
    /// The failing fetch consumes no row; later fetches continue normally.
    pub fn fail_at(mut self, fetch: usize, error: CursorError) -> Self {
        self.failure = Some((fetch, error));
        self
    }

    /// Rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for VecCursor {
    fn fetch_row(&mut self) -> Fetch {
        if !self.executed {
            return Fetch::NotExecuted;
        }
        let index = self.fetches;
        self.fetches += 1;

        if let Some((_, error)) = self.failure.take_if(|(at, _)| *at == index) {
            return Fetch::Failed(error);
        }

        match self.rows.pop_front() {
            Some(row) => Fetch::Row(row),
            None => Fetch::EndOfResults,
        }
    }
}
