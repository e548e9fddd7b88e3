//! View controller: render cursor, overlay cursor and the view state derived
//! from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{BATCH_SIZE, MIN_QUERY_LEN};
use crate::error::ViewError;
use crate::state::{Collection, Entity};
use crate::view::{AffordanceId, ViewSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query shorter than the minimum; nothing changed.
    Ignored,
    Matches(Vec<usize>),
    /// Valid query without hits; the empty notice is showing.
    Empty,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cursors {
    /// Next unrendered collection offset. Advances by whole batches, so it
    /// can end up past the collection length.
    pub render: usize,
    pub overlay: Option<usize>,
    pub batch_size: usize,
}

impl Cursors {
    pub fn new(batch_size: usize) -> Self {
        Self {
            render: 0,
            overlay: None,
            batch_size: batch_size.max(1),
        }
    }
}

impl Default for Cursors {
    fn default() -> Self {
        Self::new(BATCH_SIZE)
    }
}

/// Trimmed, lowercased query, or `None` when it is too short to search.
pub fn normalize_query(query: &str) -> Option<String> {
    let normalized = query.trim().to_lowercase();
    if normalized.chars().count() < MIN_QUERY_LEN {
        return None;
    }
    Some(normalized)
}

pub struct ViewController<'a, S: ViewSink> {
    cursors: &'a mut Cursors,
    collection: &'a Collection,
    sink: &'a mut S,
}

impl<'a, S: ViewSink> ViewController<'a, S> {
    pub fn new(cursors: &'a mut Cursors, collection: &'a Collection, sink: &'a mut S) -> Self {
        Self {
            cursors,
            collection,
            sink,
        }
    }

    pub fn render_cursor(&self) -> usize {
        self.cursors.render
    }

    pub fn overlay_cursor(&self) -> Option<usize> {
        self.cursors.overlay
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursors.render >= self.collection.len()
    }

    /// Renders the next batch of cards and returns how many were added.
    pub fn advance_batch(&mut self) -> usize {
        if self.is_exhausted() {
            return 0;
        }
        let collection = self.collection;
        let batch = self.cursors.batch_size.max(1);
        self.sink.set_affordance_enabled(AffordanceId::LoadMore, false);

        let range = collection.clamp(self.cursors.render, batch);
        let cards: Vec<(usize, &Entity)> = range
            .filter_map(|index| collection.get(index).map(|entity| (index, entity)))
            .collect();
        self.sink.render_cards(&cards);
        self.cursors.render += batch;

        if self.is_exhausted() {
            self.sink.set_affordance_visible(AffordanceId::LoadMore, false);
        } else {
            self.sink.set_affordance_enabled(AffordanceId::LoadMore, true);
        }
        cards.len()
    }

    pub fn open_detail(&mut self, index: usize) -> Result<(), ViewError> {
        let collection = self.collection;
        let len = collection.len();
        let entity = collection
            .get(index)
            .ok_or(ViewError::OutOfRange { index, len })?;
        let detail = entity.detail().ok_or(ViewError::Unresolved { index })?;

        self.cursors.overlay = Some(index);
        self.sink.render_detail(index, detail);
        self.sink.set_scroll_suspended(true);
        self.sink
            .set_affordance_enabled(AffordanceId::Previous, index > 0);
        self.sink
            .set_affordance_enabled(AffordanceId::Next, index + 1 < len);
        Ok(())
    }

    /// Moves the overlay one entry. `Ok(None)` when already at the boundary
    /// or when no overlay is open.
    pub fn navigate(&mut self, direction: Direction) -> Result<Option<usize>, ViewError> {
        let Some(current) = self.cursors.overlay else {
            return Ok(None);
        };
        let target = match direction {
            Direction::Previous => {
                if current == 0 {
                    return Ok(None);
                }
                current - 1
            }
            Direction::Next => {
                if current + 1 >= self.collection.len() {
                    return Ok(None);
                }
                current + 1
            }
        };
        self.open_detail(target)?;
        Ok(Some(target))
    }

    /// Closes the overlay. Both navigation controls come back enabled no
    /// matter where the cursor was; `open_detail` recomputes them.
    pub fn close_detail(&mut self) {
        self.cursors.overlay = None;
        self.sink.hide_detail();
        self.sink.set_scroll_suspended(false);
        self.sink.set_affordance_enabled(AffordanceId::Previous, true);
        self.sink.set_affordance_enabled(AffordanceId::Next, true);
    }

    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let Some(needle) = normalize_query(query) else {
            return SearchOutcome::Ignored;
        };
        let collection = self.collection;
        let matches = collection.positions_matching(&needle);

        self.sink.clear_cards();
        let outcome = if matches.is_empty() {
            self.sink.render_empty_notice(&needle);
            SearchOutcome::Empty
        } else {
            let cards: Vec<(usize, &Entity)> = matches
                .iter()
                .filter_map(|&index| collection.get(index).map(|entity| (index, entity)))
                .collect();
            self.sink.render_cards(&cards);
            SearchOutcome::Matches(matches)
        };
        self.sink.set_affordance_visible(AffordanceId::LoadMore, false);
        self.sink.set_affordance_visible(AffordanceId::Reset, true);
        outcome
    }

    /// Back to the unfiltered first batch. The only way to rewind the render
    /// cursor.
    pub fn reset_view(&mut self) -> usize {
        self.sink.clear_cards();
        self.sink.clear_search_input();
        self.cursors.render = 0;
        self.sink.set_affordance_visible(AffordanceId::LoadMore, true);
        let rendered = self.advance_batch();
        let exhausted = self.is_exhausted();
        self.sink
            .set_affordance_visible(AffordanceId::LoadMore, !exhausted);
        self.sink.set_affordance_visible(AffordanceId::Reset, false);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityDetail, EntitySummary};
    use crate::view::Board;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Clear,
        Cards(Vec<usize>),
        Empty(String),
        Detail(usize),
        HideDetail,
        Scroll(bool),
        Visible(AffordanceId, bool),
        Enabled(AffordanceId, bool),
        ClearInput,
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<Call>,
    }

    impl ViewSink for RecordingSink {
        fn clear_cards(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn render_cards(&mut self, cards: &[(usize, &Entity)]) {
            self.calls
                .push(Call::Cards(cards.iter().map(|(idx, _)| *idx).collect()));
        }
        fn render_empty_notice(&mut self, query: &str) {
            self.calls.push(Call::Empty(query.to_string()));
        }
        fn render_detail(&mut self, index: usize, _detail: &EntityDetail) {
            self.calls.push(Call::Detail(index));
        }
        fn hide_detail(&mut self) {
            self.calls.push(Call::HideDetail);
        }
        fn set_scroll_suspended(&mut self, suspended: bool) {
            self.calls.push(Call::Scroll(suspended));
        }
        fn set_affordance_visible(&mut self, id: AffordanceId, visible: bool) {
            self.calls.push(Call::Visible(id, visible));
        }
        fn set_affordance_enabled(&mut self, id: AffordanceId, enabled: bool) {
            self.calls.push(Call::Enabled(id, enabled));
        }
        fn clear_search_input(&mut self) {
            self.calls.push(Call::ClearInput);
        }
    }

    fn resolved(names: &[&str]) -> Collection {
        let mut collection = Collection::from_summaries(
            names
                .iter()
                .enumerate()
                .map(|(idx, name)| EntitySummary {
                    name: name.to_string(),
                    url: format!("https://pokeapi.co/api/v2/pokemon/{}/", idx + 1),
                })
                .collect(),
        );
        let details = names
            .iter()
            .enumerate()
            .map(|(idx, name)| EntityDetail {
                id: idx as u16 + 1,
                name: name.to_string(),
                types: vec!["normal".to_string()],
                stats: Vec::new(),
                artwork_url: None,
                height: 1,
                weight: 1,
            })
            .collect();
        collection.store_details(0, details);
        collection
    }

    fn numbered(len: usize) -> Collection {
        let names: Vec<String> = (0..len).map(|idx| format!("mon-{idx}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        resolved(&refs)
    }

    #[test]
    fn advance_batch_disables_then_reenables_load_more() {
        let collection = numbered(50);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let rendered = ViewController::new(&mut cursors, &collection, &mut sink).advance_batch();

        assert_eq!(rendered, 20);
        assert_eq!(cursors.render, 20);
        assert_eq!(
            sink.calls,
            vec![
                Call::Enabled(AffordanceId::LoadMore, false),
                Call::Cards((0..20).collect()),
                Call::Enabled(AffordanceId::LoadMore, true),
            ]
        );
    }

    #[test]
    fn hundred_fifty_entries_exhaust_after_eight_batches() {
        let collection = numbered(150);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();

        for _ in 0..7 {
            ViewController::new(&mut cursors, &collection, &mut board).advance_batch();
        }
        assert_eq!(cursors.render, 140);
        assert!(!ViewController::new(&mut cursors, &collection, &mut board).is_exhausted());
        assert!(board.load_more.is_active());

        let last = ViewController::new(&mut cursors, &collection, &mut board).advance_batch();
        assert_eq!(last, 10);
        assert_eq!(cursors.render, 160);
        assert!(ViewController::new(&mut cursors, &collection, &mut board).is_exhausted());
        assert!(!board.load_more.visible);
        assert_eq!(board.cards.len(), 150);

        let ninth = ViewController::new(&mut cursors, &collection, &mut board).advance_batch();
        assert_eq!(ninth, 0);
        assert_eq!(cursors.render, 160);
        assert_eq!(board.cards.len(), 150);
    }

    #[test]
    fn empty_collection_starts_exhausted() {
        let collection = Collection::new();
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut sink);
        assert!(controller.is_exhausted());
        assert_eq!(controller.advance_batch(), 0);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn open_detail_sets_navigation_bounds() {
        let collection = numbered(3);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        ViewController::new(&mut cursors, &collection, &mut sink)
            .open_detail(0)
            .unwrap();
        assert_eq!(cursors.overlay, Some(0));
        assert_eq!(
            sink.calls,
            vec![
                Call::Detail(0),
                Call::Scroll(true),
                Call::Enabled(AffordanceId::Previous, false),
                Call::Enabled(AffordanceId::Next, true),
            ]
        );

        sink.calls.clear();
        ViewController::new(&mut cursors, &collection, &mut sink)
            .open_detail(2)
            .unwrap();
        assert!(sink
            .calls
            .contains(&Call::Enabled(AffordanceId::Previous, true)));
        assert!(sink.calls.contains(&Call::Enabled(AffordanceId::Next, false)));
    }

    #[test]
    fn open_detail_guards_unresolved_and_out_of_range() {
        let mut collection = numbered(2);
        collection.append_summaries(vec![EntitySummary {
            name: "mew".into(),
            url: "https://pokeapi.co/api/v2/pokemon/151/".into(),
        }]);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut sink);

        assert_eq!(
            controller.open_detail(2),
            Err(ViewError::Unresolved { index: 2 })
        );
        assert_eq!(
            controller.open_detail(9),
            Err(ViewError::OutOfRange { index: 9, len: 3 })
        );
        assert_eq!(controller.overlay_cursor(), None);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        let collection = numbered(3);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut sink);

        controller.open_detail(0).unwrap();
        assert_eq!(controller.navigate(Direction::Previous), Ok(None));
        assert_eq!(controller.overlay_cursor(), Some(0));

        assert_eq!(controller.navigate(Direction::Next), Ok(Some(1)));
        assert_eq!(controller.navigate(Direction::Next), Ok(Some(2)));
        assert_eq!(controller.navigate(Direction::Next), Ok(None));
        assert_eq!(controller.overlay_cursor(), Some(2));

        assert_eq!(controller.navigate(Direction::Previous), Ok(Some(1)));
        let opened: Vec<usize> = sink
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Detail(index) => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(opened, vec![0, 1, 2, 1]);
    }

    #[test]
    fn navigate_without_overlay_is_noop() {
        let collection = numbered(3);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut sink);
        assert_eq!(controller.navigate(Direction::Next), Ok(None));
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn close_detail_reenables_navigation_at_boundary() {
        let collection = numbered(3);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut board);
        controller.open_detail(2).unwrap();
        controller.close_detail();

        assert_eq!(cursors.overlay, None);
        assert_eq!(board.detail, None);
        assert!(!board.scroll_suspended);
        assert!(board.previous.enabled);
        assert!(board.next.enabled);
    }

    #[test]
    fn short_queries_are_ignored() {
        let collection = resolved(&["pikachu", "abra"]);
        let mut cursors = Cursors::new(20);
        let mut sink = RecordingSink::default();
        let mut controller = ViewController::new(&mut cursors, &collection, &mut sink);
        assert_eq!(controller.search("ab"), SearchOutcome::Ignored);
        assert_eq!(controller.search("  Pi  "), SearchOutcome::Ignored);
        assert!(sink.calls.is_empty());
    }

    #[test]
    fn search_filters_by_substring_in_order() {
        let collection = resolved(&["pichu", "pikachu", "raichu", "pikipek"]);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();
        let outcome = ViewController::new(&mut cursors, &collection, &mut board).search(" PIK ");

        assert_eq!(outcome, SearchOutcome::Matches(vec![1, 3]));
        assert_eq!(board.cards, vec![1, 3]);
        assert!(!board.load_more.visible);
        assert!(board.reset.visible);
    }

    #[test]
    fn search_without_hits_shows_notice() {
        let collection = resolved(&["pikachu"]);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();
        board.cards = vec![0];
        let outcome = ViewController::new(&mut cursors, &collection, &mut board).search("zzzz");

        assert_eq!(outcome, SearchOutcome::Empty);
        assert!(board.cards.is_empty());
        assert_eq!(board.notice.as_deref(), Some(crate::view::EMPTY_NOTICE));
        assert!(board.reset.visible);
    }

    #[test]
    fn reset_view_rewinds_after_filter_and_exhaustion() {
        let collection = numbered(30);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();
        {
            let mut controller = ViewController::new(&mut cursors, &collection, &mut board);
            controller.advance_batch();
            controller.advance_batch();
            assert!(controller.is_exhausted());
            controller.search("mon-2");
        }
        board.search_input = "mon-2".to_string();

        let rendered = ViewController::new(&mut cursors, &collection, &mut board).reset_view();
        assert_eq!(rendered, 20);
        assert_eq!(cursors.render, 20);
        assert_eq!(board.cards, (0..20).collect::<Vec<_>>());
        assert!(board.load_more.is_active());
        assert!(!board.reset.visible);
        assert!(board.search_input.is_empty());
        assert!(board.notice.is_none());
    }

    #[test]
    fn reset_view_keeps_load_more_hidden_for_single_batch() {
        let collection = numbered(5);
        let mut cursors = Cursors::new(20);
        let mut board = Board::default();
        ViewController::new(&mut cursors, &collection, &mut board).reset_view();
        assert_eq!(board.cards.len(), 5);
        assert!(!board.load_more.visible);
    }
}
