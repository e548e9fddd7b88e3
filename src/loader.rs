//! Collection loader bookkeeping.
//!
//! The network side lives in [`crate::api`]; this module decides which
//! requests to issue, tracks batches in flight and merges completed batches
//! back into the [`Collection`]. A batch is written all at once or not at all.

use std::ops::Range;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Collection, EntityDetail, EntitySummary};

/// Half-open range of collection positions handled as one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct BatchRange {
    pub start: usize,
    pub end: usize,
}

impl BatchRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn overlaps(&self, other: &BatchRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// One-based label for user-facing messages, e.g. `#21-#40`.
    pub fn label(&self) -> String {
        if self.len() <= 1 {
            format!("#{}", self.start + 1)
        } else {
            format!("#{}-#{}", self.start + 1, self.end)
        }
    }
}

impl From<Range<usize>> for BatchRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Detail requests for one batch, in collection order.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRequest {
    pub range: BatchRange,
    pub urls: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadRequest {
    /// Every slot in the range already holds a detail record.
    Resolved,
    /// A new batch was registered; the caller must run the request.
    Issued(DetailRequest),
    /// The range overlaps a batch that is still in flight.
    Busy(BatchRange),
}

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CompletionError {
    #[error("batch {0:?} is not in flight")]
    NotInFlight(BatchRange),
    #[error("batch {range:?} returned {received} records")]
    CountMismatch { range: BatchRange, received: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
struct InFlightBatch {
    range: BatchRange,
    holds_indicator: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Loader {
    in_flight: Vec<InFlightBatch>,
    listing_in_flight: bool,
    indicator_holds: usize,
}

impl Loader {
    pub fn is_loading(&self) -> bool {
        self.indicator_holds > 0
    }

    pub fn listing_in_flight(&self) -> bool {
        self.listing_in_flight
    }

    pub fn in_flight_ranges(&self) -> Vec<BatchRange> {
        self.in_flight.iter().map(|batch| batch.range).collect()
    }

    pub fn is_in_flight(&self, index: usize) -> bool {
        self.in_flight.iter().any(|batch| batch.range.contains(index))
    }

    /// Marks the listing request as started. Returns `false` when the listing
    /// is already populated or already requested.
    pub fn begin_listing(&mut self, collection: &Collection) -> bool {
        if self.listing_in_flight || !collection.is_empty() {
            return false;
        }
        self.listing_in_flight = true;
        self.raise_indicator();
        true
    }

    pub fn finish_listing(&mut self, collection: &mut Collection, summaries: Vec<EntitySummary>) {
        if self.listing_in_flight {
            self.listing_in_flight = false;
            self.release_indicator();
        }
        collection.append_summaries(summaries);
        tracing::info!(total = collection.len(), "listing loaded");
    }

    pub fn fail_listing(&mut self) {
        if self.listing_in_flight {
            self.listing_in_flight = false;
            self.release_indicator();
        }
    }

    /// Registers a detail batch for `[start, start + count)` clipped to the
    /// collection. Overlapping an in-flight batch is refused.
    pub fn fetch_details(
        &mut self,
        collection: &Collection,
        start: usize,
        count: usize,
        show_loading: bool,
    ) -> LoadRequest {
        let range = BatchRange::from(collection.clamp(start, count));
        if range.is_empty() {
            return LoadRequest::Resolved;
        }
        if let Some(busy) = self
            .in_flight
            .iter()
            .find(|batch| batch.range.overlaps(&range))
        {
            tracing::debug!(?range, busy = ?busy.range, "detail batch overlaps in-flight batch");
            return LoadRequest::Busy(busy.range);
        }

        self.in_flight.push(InFlightBatch {
            range,
            holds_indicator: show_loading,
        });
        if show_loading {
            self.raise_indicator();
        }
        tracing::debug!(?range, "detail batch issued");
        LoadRequest::Issued(DetailRequest {
            range,
            urls: collection.source_urls(range.as_range()),
        })
    }

    /// Fetches the whole range unless every slot is already resolved.
    pub fn ensure_range(
        &mut self,
        collection: &Collection,
        start: usize,
        count: usize,
        show_loading: bool,
    ) -> LoadRequest {
        let range = collection.clamp(start, count);
        if collection.is_resolved(range) {
            return LoadRequest::Resolved;
        }
        self.fetch_details(collection, start, count, show_loading)
    }

    /// Writes a completed batch back into the collection.
    pub fn complete_details(
        &mut self,
        collection: &mut Collection,
        range: BatchRange,
        details: Vec<EntityDetail>,
    ) -> Result<BatchRange, CompletionError> {
        if !self.settle(range) {
            return Err(CompletionError::NotInFlight(range));
        }
        if details.len() != range.len() {
            return Err(CompletionError::CountMismatch {
                range,
                received: details.len(),
            });
        }
        if !collection.store_details(range.start, details) {
            return Err(CompletionError::CountMismatch {
                range,
                received: range.len(),
            });
        }
        tracing::info!(?range, "detail batch stored");
        Ok(range)
    }

    /// Drops a failed batch; nothing from it reaches the collection.
    pub fn fail_details(&mut self, range: BatchRange) -> bool {
        self.settle(range)
    }

    fn settle(&mut self, range: BatchRange) -> bool {
        let Some(position) = self.in_flight.iter().position(|batch| batch.range == range) else {
            return false;
        };
        let batch = self.in_flight.remove(position);
        if batch.holds_indicator {
            self.release_indicator();
        }
        true
    }

    fn raise_indicator(&mut self) {
        self.indicator_holds += 1;
    }

    fn release_indicator(&mut self) {
        self.indicator_holds = self.indicator_holds.saturating_sub(1);
    }
}
