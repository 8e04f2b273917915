//! Database gateway boundary
//!
//! The pipeline performs no I/O of its own. It submits query text to a
//! [`DatabaseGateway`] and pulls the answers, one per query, through a
//! [`DatasetSource`] in submission order.

pub mod replay;

use log::debug;

use crate::error::Result;
use crate::models::Dataset;

pub use replay::{ReplayGateway, TopicFixture};

/// Query execution against the hospital information system
pub trait DatabaseGateway {
    /// Establish the connection
    ///
    /// # Errors
    /// [`PipelineError::SourceUnavailable`](crate::error::PipelineError::SourceUnavailable)
    /// when the source cannot be reached.
    fn connect(&mut self) -> Result<()>;

    /// Run one query
    ///
    /// Execution failures are answered with the failure sentinel instead of
    /// an error, so the rest of the batch can continue.
    fn execute(&mut self, query: &str) -> Dataset;

    /// Release the connection
    fn close(&mut self);
}

/// Single-pass, pull-based stream of datasets
///
/// Yields exactly one dataset per submitted query, in submission order.
/// The gateway is closed exactly once: when the queries run out, or when the
/// source is dropped early.
pub struct DatasetSource<'g, G: DatabaseGateway + ?Sized> {
    gateway: &'g mut G,
    queries: std::vec::IntoIter<String>,
    pulled: usize,
    closed: bool,
}

impl<'g, G: DatabaseGateway + ?Sized> DatasetSource<'g, G> {
    /// Create a source over an already connected gateway
    pub fn new(gateway: &'g mut G, queries: Vec<String>) -> Self {
        Self {
            gateway,
            queries: queries.into_iter(),
            pulled: 0,
            closed: false,
        }
    }

    /// Number of datasets pulled so far
    #[must_use]
    pub const fn pulled(&self) -> usize {
        self.pulled
    }

    /// Number of queries not yet executed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queries.len()
    }

    /// Close the gateway if it is still open
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.gateway.close();
            debug!("Closed data source after {} pulls", self.pulled);
        }
    }
}

impl<G: DatabaseGateway + ?Sized> Iterator for DatasetSource<'_, G> {
    type Item = Dataset;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        match self.queries.next() {
            Some(query) => {
                self.pulled += 1;
                Some(self.gateway.execute(&query))
            }
            None => {
                self.close();
                None
            }
        }
    }
}

impl<G: DatabaseGateway + ?Sized> Drop for DatasetSource<'_, G> {
    fn drop(&mut self) {
        self.close();
    }
}
