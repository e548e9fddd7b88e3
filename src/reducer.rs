use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::controller::{Direction, SearchOutcome};
use crate::effect::Effect;
use crate::error::ViewError;
use crate::loader::{BatchRange, CompletionError, LoadRequest};
use crate::state::AppState;
use crate::view::{AffordanceId, ViewSink};

pub const LISTING_ERROR: &str =
    "There was a problem loading the Pokémon. Please try again later.";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => request_listing(state),

        Action::ListingRetry => {
            if !state.listing_failed() {
                return DispatchResult::unchanged();
            }
            request_listing(state)
        }

        Action::ListingDidLoad(summaries) => {
            state
                .loader
                .finish_listing(&mut state.collection, summaries);
            state.listing = DataResource::Loaded(state.collection.len());
            state.message = None;
            if state.collection.is_empty() {
                state
                    .board
                    .set_affordance_visible(AffordanceId::LoadMore, false);
                return DispatchResult::changed();
            }
            load_next_batch(state)
        }

        Action::ListingDidError(error) => {
            state.loader.fail_listing();
            tracing::warn!(%error, "listing request failed");
            state.listing = DataResource::Failed(error.to_string());
            state.message = Some(LISTING_ERROR.to_string());
            DispatchResult::changed()
        }

        Action::BatchLoadMore => {
            if !state.board.load_more.is_active()
                || state.pending_batch.is_some()
                || state.queued_batch
            {
                return DispatchResult::unchanged();
            }
            load_next_batch(state)
        }

        Action::BatchDidLoad { range, details } => {
            match state
                .loader
                .complete_details(&mut state.collection, range, details)
            {
                Ok(_) => {}
                Err(err @ CompletionError::NotInFlight(_)) => {
                    tracing::debug!(%err, "ignoring stale detail batch");
                    return DispatchResult::unchanged();
                }
                Err(err) => {
                    tracing::warn!(%err, "discarding detail batch");
                    release_pending(state, range);
                    state.message = Some(batch_error_message(range));
                    return resume_queued_batch(state).unwrap_or_else(DispatchResult::changed);
                }
            }
            if state.pending_batch == Some(range) {
                state.pending_batch = None;
                state.message = None;
                state.controller().advance_batch();
            }
            open_pending(state);
            resume_queued_batch(state).unwrap_or_else(DispatchResult::changed)
        }

        Action::BatchDidError { range, error } => {
            if !state.loader.fail_details(range) {
                return DispatchResult::unchanged();
            }
            tracing::warn!(?range, %error, "detail batch failed");
            release_pending(state, range);
            state.message = Some(batch_error_message(range));
            resume_queued_batch(state).unwrap_or_else(DispatchResult::changed)
        }

        Action::CardMove(delta) => {
            if state.board.scroll_suspended || state.board.cards.is_empty() {
                return DispatchResult::unchanged();
            }
            let last = state.board.cards.len() - 1;
            let next = (state.selected_card as i64 + delta as i64).clamp(0, last as i64) as usize;
            if next == state.selected_card {
                return DispatchResult::unchanged();
            }
            state.selected_card = next;
            DispatchResult::changed()
        }

        Action::CardSelect(index) => {
            if state.board.scroll_suspended || index >= state.board.cards.len() {
                return DispatchResult::unchanged();
            }
            if index == state.selected_card {
                return DispatchResult::unchanged();
            }
            state.selected_card = index;
            DispatchResult::changed()
        }

        Action::CardOpen => {
            if state.board.scroll_suspended {
                return DispatchResult::unchanged();
            }
            let Some(position) = state.selected_position() else {
                return DispatchResult::unchanged();
            };
            open_detail(state, position)
        }

        Action::DetailOpen(index) => open_detail(state, index),

        Action::DetailPrev => navigate(state, Direction::Previous),
        Action::DetailNext => navigate(state, Direction::Next),

        Action::DetailClose => {
            if state.board.detail.is_none() && state.pending_open.is_none() {
                return DispatchResult::unchanged();
            }
            state.pending_open = None;
            state.controller().close_detail();
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.search.active
                || state.board.detail.is_some()
                || !state.listing.is_loaded()
            {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.board.search_input.push(ch);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if !state.search.active || state.board.search_input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            // nothing to filter until the listing is in
            if !state.listing.is_loaded() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            let query = state.board.search_input.clone();
            match state.controller().search(&query) {
                SearchOutcome::Ignored => {}
                SearchOutcome::Matches(_) | SearchOutcome::Empty => {
                    state.pending_batch = None;
                    state.queued_batch = false;
                    state.selected_card = 0;
                }
            }
            DispatchResult::changed()
        }

        Action::ViewReset => {
            if !state.board.reset.visible {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.pending_batch = None;
            state.queued_batch = false;
            state.selected_card = 0;
            state.controller().reset_view();
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if !state.is_loading() {
                return DispatchResult::unchanged();
            }
            state.tick = state.tick.wrapping_add(1);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn request_listing(state: &mut AppState) -> DispatchResult<Effect> {
    if !state.loader.begin_listing(&state.collection) {
        return DispatchResult::unchanged();
    }
    state.listing = DataResource::Loading;
    state.message = None;
    DispatchResult::changed_with(Effect::LoadListing {
        url: state.config.listing_request_url(),
    })
}

/// Resolves the batch under the render cursor, rendering it right away when
/// every entry already has its detail.
fn load_next_batch(state: &mut AppState) -> DispatchResult<Effect> {
    let start = state.cursors.render;
    let count = state.cursors.batch_size;
    match state
        .loader
        .ensure_range(&state.collection, start, count, true)
    {
        LoadRequest::Resolved => {
            state.controller().advance_batch();
            DispatchResult::changed()
        }
        LoadRequest::Issued(request) => {
            state.pending_batch = Some(request.range);
            state
                .board
                .set_affordance_enabled(AffordanceId::LoadMore, false);
            DispatchResult::changed_with(Effect::LoadBatch {
                range: request.range,
                urls: request.urls,
            })
        }
        LoadRequest::Busy(range) => {
            // retried from the completion of the overlapping fetch
            state.queued_batch = true;
            state
                .board
                .set_affordance_enabled(AffordanceId::LoadMore, false);
            state.message = Some(busy_message(range));
            DispatchResult::changed()
        }
    }
}

/// Re-runs a load-more request that was refused while an overlapping fetch
/// was in flight.
fn resume_queued_batch(state: &mut AppState) -> Option<DispatchResult<Effect>> {
    if !state.queued_batch || state.pending_batch.is_some() {
        return None;
    }
    state.queued_batch = false;
    Some(load_next_batch(state))
}

fn open_detail(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    match state.controller().open_detail(index) {
        Ok(()) => {
            state.pending_open = None;
            DispatchResult::changed()
        }
        Err(ViewError::Unresolved { index }) => fetch_for_overlay(state, index),
        Err(err @ ViewError::OutOfRange { .. }) => {
            tracing::debug!(%err, "ignoring overlay request");
            DispatchResult::unchanged()
        }
    }
}

fn navigate(state: &mut AppState, direction: Direction) -> DispatchResult<Effect> {
    match state.controller().navigate(direction) {
        Ok(Some(_)) => {
            state.pending_open = None;
            DispatchResult::changed()
        }
        Ok(None) => DispatchResult::unchanged(),
        Err(ViewError::Unresolved { index }) => fetch_for_overlay(state, index),
        Err(ViewError::OutOfRange { .. }) => DispatchResult::unchanged(),
    }
}

/// The overlay only shows resolved entries; fetch the single entry first and
/// open it when the detail arrives.
fn fetch_for_overlay(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    match state
        .loader
        .ensure_range(&state.collection, index, 1, false)
    {
        LoadRequest::Issued(request) => {
            state.pending_open = Some(index);
            DispatchResult::changed_with(Effect::LoadBatch {
                range: request.range,
                urls: request.urls,
            })
        }
        LoadRequest::Busy(_) => {
            state.pending_open = Some(index);
            DispatchResult::changed()
        }
        // open_detail only reports Unresolved for summary slots
        LoadRequest::Resolved => {
            tracing::debug!(index, "overlay target already resolved");
            DispatchResult::unchanged()
        }
    }
}

fn open_pending(state: &mut AppState) {
    let Some(index) = state.pending_open else {
        return;
    };
    if state.loader.is_in_flight(index) {
        return;
    }
    state.pending_open = None;
    if let Err(err) = state.controller().open_detail(index) {
        tracing::debug!(%err, "pending overlay could not open");
    }
}

fn release_pending(state: &mut AppState, range: BatchRange) {
    if state.pending_batch == Some(range) {
        state.pending_batch = None;
        state
            .board
            .set_affordance_enabled(AffordanceId::LoadMore, true);
    }
    if state
        .pending_open
        .is_some_and(|index| range.contains(index))
    {
        state.pending_open = None;
    }
}

fn batch_error_message(range: BatchRange) -> String {
    format!(
        "There was a problem loading the Pokémon details ({}). Please try again later.",
        range.label()
    )
}

fn busy_message(range: BatchRange) -> String {
    format!("Pokémon {} are still loading.", range.label())
}
