use std::ops::Range;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::config::CatalogConfig;
use crate::controller::{Cursors, ViewController};
use crate::loader::{BatchRange, Loader};
use crate::view::Board;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntitySummary {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityStat {
    pub name: String,
    pub base_stat: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityDetail {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<EntityStat>,
    pub artwork_url: Option<String>,
    /// Decimetres, as reported by the API.
    pub height: u16,
    /// Hectograms, as reported by the API.
    pub weight: u16,
}

impl EntityDetail {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Base stat by listing position (the API orders hp, attack, defense, ...).
    pub fn stat_at(&self, slot: usize) -> Option<u16> {
        self.stats.get(slot).map(|stat| stat.base_stat)
    }

    pub fn attack(&self) -> Option<u16> {
        self.stat_at(1)
    }

    pub fn defense(&self) -> Option<u16> {
        self.stat_at(2)
    }

    pub fn height_m(&self) -> f32 {
        self.height as f32 / 10.0
    }

    pub fn weight_kg(&self) -> f32 {
        self.weight as f32 / 10.0
    }
}

/// One collection slot: either the listing reference or the resolved record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Entity {
    Summary(EntitySummary),
    Detail(EntityDetail),
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Entity::Summary(summary) => &summary.name,
            Entity::Detail(detail) => &detail.name,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, Entity::Detail(_))
    }

    pub fn detail(&self) -> Option<&EntityDetail> {
        match self {
            Entity::Detail(detail) => Some(detail),
            Entity::Summary(_) => None,
        }
    }
}

/// Ordered entity collection, indexed by listing position.
///
/// `sources` keeps each slot's reference URL so resolved slots can be fetched
/// again when a batch containing them is refreshed. Both vectors always have
/// the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Collection {
    entries: Vec<Entity>,
    sources: Vec<String>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_summaries(summaries: Vec<EntitySummary>) -> Self {
        let mut collection = Self::new();
        collection.append_summaries(summaries);
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter()
    }

    /// Appends listing entries. Only meant to run once per session; a second
    /// call duplicates the listing.
    pub fn append_summaries(&mut self, summaries: Vec<EntitySummary>) {
        for summary in summaries {
            self.sources.push(summary.url.clone());
            self.entries.push(Entity::Summary(summary));
        }
    }

    /// `[start, start + count)` clipped to the collection.
    pub fn clamp(&self, start: usize, count: usize) -> Range<usize> {
        let len = self.len();
        let begin = start.min(len);
        let end = start.saturating_add(count).min(len);
        begin..end
    }

    pub fn is_resolved(&self, range: Range<usize>) -> bool {
        self.entries[range].iter().all(Entity::is_detail)
    }

    pub fn source_urls(&self, range: Range<usize>) -> Vec<String> {
        self.sources[range].to_vec()
    }

    /// Writes resolved details starting at `start`. Nothing is written unless
    /// every detail has a slot.
    pub fn store_details(&mut self, start: usize, details: Vec<EntityDetail>) -> bool {
        if start.saturating_add(details.len()) > self.len() {
            return false;
        }
        for (offset, detail) in details.into_iter().enumerate() {
            self.entries[start + offset] = Entity::Detail(detail);
        }
        true
    }

    /// Positions whose lowercase name contains `needle`, in collection order.
    pub fn positions_matching(&self, needle: &str) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entity)| entity.name().to_lowercase().contains(needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|entity| entity.is_detail()).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    /// Whether keystrokes go to the search input.
    pub active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub config: CatalogConfig,
    pub collection: Collection,
    pub listing: DataResource<usize>,
    pub loader: Loader,
    pub cursors: Cursors,
    pub board: Board,
    pub search: SearchState,
    pub selected_card: usize,
    /// Batch whose completion should render the next page of cards.
    pub pending_batch: Option<BatchRange>,
    /// Load more was refused because an overlapping fetch was in flight.
    pub queued_batch: bool,
    /// Entry to open in the overlay once its detail arrives.
    pub pending_open: Option<usize>,
    pub message: Option<String>,
    pub tick: u64,
}

impl AppState {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            terminal_size: (80, 24),
            cursors: Cursors::new(config.batch_size),
            config,
            collection: Collection::new(),
            listing: DataResource::Empty,
            loader: Loader::default(),
            board: Board::default(),
            search: SearchState::default(),
            selected_card: 0,
            pending_batch: None,
            queued_batch: false,
            pending_open: None,
            message: None,
            tick: 0,
        }
    }

    pub fn controller(&mut self) -> ViewController<'_, Board> {
        ViewController::new(&mut self.cursors, &self.collection, &mut self.board)
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.board.cards.get(self.selected_card).copied()
    }

    pub fn overlay_entry(&self) -> Option<(usize, &EntityDetail)> {
        let index = self.board.detail?;
        let detail = self.collection.get(index)?.detail()?;
        Some((index, detail))
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn listing_failed(&self) -> bool {
        matches!(self.listing, DataResource::Failed(_))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Collection")
                .entry("total", ron_string(&self.collection.len()))
                .entry("resolved", ron_string(&self.collection.resolved_count()))
                .entry("listing_url", ron_string(&self.config.listing_request_url())),
            DebugSection::new("Cursors")
                .entry("render", ron_string(&self.cursors.render))
                .entry("overlay", ron_string(&self.cursors.overlay))
                .entry("batch_size", ron_string(&self.cursors.batch_size))
                .entry("selected_card", ron_string(&self.selected_card)),
            DebugSection::new("Board")
                .entry("cards", ron_string(&self.board.cards.len()))
                .entry("notice", ron_string(&self.board.notice))
                .entry("load_more", ron_string(&self.board.load_more))
                .entry("reset", ron_string(&self.board.reset))
                .entry("search_input", ron_string(&self.board.search_input)),
            DebugSection::new("Status")
                .entry("loading", ron_string(&self.loader.is_loading()))
                .entry("in_flight", ron_string(&self.loader.in_flight_ranges()))
                .entry("pending_batch", ron_string(&self.pending_batch))
                .entry("queued_batch", ron_string(&self.queued_batch))
                .entry("pending_open", ron_string(&self.pending_open))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
