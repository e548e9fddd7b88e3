use crate::loader::BatchRange;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Listing request; `url` already carries limit and offset.
    LoadListing { url: String },
    /// One detail request per URL, reported back as a single batch.
    LoadBatch { range: BatchRange, urls: Vec<String> },
}
