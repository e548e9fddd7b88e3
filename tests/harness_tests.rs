//! Store-level flows driven through EffectStoreTestHarness: effects are
//! inspected, then completed by hand with the action the task would send.

use pokedex_cards::{
    action::Action,
    effect::Effect,
    error::FetchError,
    loader::BatchRange,
    reducer::reducer,
    state::{AppState, EntityDetail, EntityStat, EntitySummary},
    ui::{handle_cards_event, handle_overlay_event, CardsUi, RESET_LABEL},
    view::EMPTY_NOTICE,
};
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tui_dispatch::testing::*;
use tui_dispatch::{EventKind, NumericComponentId};

const TYPES: [&str; 4] = ["grass", "fire", "water", "electric"];

fn summaries(len: usize) -> Vec<EntitySummary> {
    (0..len)
        .map(|idx| EntitySummary {
            name: format!("mon-{idx}"),
            url: format!("https://pokeapi.co/api/v2/pokemon/{}/", idx + 1),
        })
        .collect()
}

fn details(start: usize, end: usize) -> Vec<EntityDetail> {
    (start..end)
        .map(|idx| EntityDetail {
            id: idx as u16 + 1,
            name: format!("mon-{idx}"),
            types: vec![TYPES[idx % TYPES.len()].to_string()],
            stats: vec![
                EntityStat {
                    name: "hp".into(),
                    base_stat: 45,
                },
                EntityStat {
                    name: "attack".into(),
                    base_stat: 49,
                },
                EntityStat {
                    name: "defense".into(),
                    base_stat: 50,
                },
            ],
            artwork_url: Some(format!("https://img.example/{}.png", idx + 1)),
            height: 7,
            weight: 69,
        })
        .collect()
}

fn batch_loaded(start: usize, end: usize) -> Action {
    Action::BatchDidLoad {
        range: BatchRange::new(start, end),
        details: details(start, end),
    }
}

/// State with the listing loaded and the first batch rendered.
fn started(len: usize) -> AppState {
    let mut state = AppState::default();
    let _ = reducer(&mut state, Action::Init);
    let _ = reducer(&mut state, Action::ListingDidLoad(summaries(len)));
    let _ = reducer(&mut state, batch_loaded(0, 20.min(len)));
    state
}

#[test]
fn test_startup_flow_renders_first_batch() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.listing.is_loading());
    harness.assert_state(|s| s.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadListing { url }
                if url == "https://pokeapi.co/api/v2/pokemon?limit=150&offset=0"
        )
    });

    harness.complete_action(Action::ListingDidLoad(summaries(150)));
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));
    harness.assert_state(|s| s.collection.len() == 150);
    harness.assert_state(|s| s.board.cards.is_empty());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadBatch { range, urls }
                if *range == BatchRange::new(0, 20) && urls.len() == 20
        )
    });

    harness.complete_action(batch_loaded(0, 20));
    harness.process_emitted();
    harness.assert_state(|s| s.board.cards == (0..20).collect::<Vec<_>>());
    harness.assert_state(|s| s.cursors.render == 20);
    harness.assert_state(|s| s.board.load_more.is_active());
    harness.assert_state(|s| !s.is_loading());
}

#[test]
fn test_hundred_fifty_entries_page_to_the_end() {
    let mut harness = EffectStoreTestHarness::new(started(150), reducer);

    for batch in 1..8 {
        let start = batch * 20;
        let end = (start + 20).min(150);
        harness.dispatch_collect(Action::BatchLoadMore);
        let effects = harness.drain_effects();
        effects.effects_count(1);
        harness.complete_action(batch_loaded(start, end));
        harness.process_emitted();
    }

    harness.assert_state(|s| s.board.cards.len() == 150);
    harness.assert_state(|s| s.cursors.render == 160);
    harness.assert_state(|s| !s.board.load_more.visible);
    harness.assert_state(|s| s.collection.resolved_count() == 150);

    // load more is gone; nothing else is requested
    harness.dispatch_collect(Action::BatchLoadMore);
    harness.drain_effects().effects_count(0);
}

#[test]
fn test_listing_failure_then_retry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::ListingDidError(FetchError::Request(
        "connection refused".into(),
    )));
    harness.process_emitted();
    harness.assert_state(|s| s.listing_failed());
    harness.assert_state(|s| s.collection.is_empty());
    harness.assert_state(|s| {
        s.message.as_deref()
            == Some("There was a problem loading the Pokémon. Please try again later.")
    });

    harness.dispatch_collect(Action::ListingRetry);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadListing { .. }));
}

#[test]
fn test_batch_failure_keeps_collection_and_view() {
    let mut harness = EffectStoreTestHarness::new(started(60), reducer);
    harness.dispatch_collect(Action::BatchLoadMore);
    harness.drain_effects().effects_count(1);

    harness.complete_action(Action::BatchDidError {
        range: BatchRange::new(20, 40),
        error: FetchError::Request("HTTP status server error (503)".into()),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.collection.resolved_count() == 20);
    harness.assert_state(|s| s.board.cards.len() == 20);
    harness.assert_state(|s| s.cursors.render == 20);
    harness.assert_state(|s| s.board.load_more.is_active());
    harness.assert_state(|s| s.message.is_some());
}

#[test]
fn test_late_completion_after_failure_is_ignored() {
    let mut harness = EffectStoreTestHarness::new(started(60), reducer);
    harness.dispatch_collect(Action::BatchLoadMore);
    harness.drain_effects();
    harness.complete_action(Action::BatchDidError {
        range: BatchRange::new(20, 40),
        error: FetchError::Task("cancelled".into()),
    });
    harness.process_emitted();

    harness.complete_action(batch_loaded(20, 40));
    harness.process_emitted();
    harness.assert_state(|s| s.collection.resolved_count() == 20);
    harness.assert_state(|s| s.board.cards.len() == 20);
}

#[test]
fn test_search_and_reset_round_trip() {
    let mut harness = EffectStoreTestHarness::new(started(150), reducer);

    harness.dispatch_collect(Action::SearchStart);
    for ch in "MON-14".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);

    harness.assert_state(|s| {
        s.board.cards == vec![14, 140, 141, 142, 143, 144, 145, 146, 147, 148, 149]
    });
    harness.assert_state(|s| !s.board.load_more.visible);
    harness.assert_state(|s| s.board.reset.visible);

    harness.dispatch_collect(Action::ViewReset);
    harness.assert_state(|s| s.board.cards == (0..20).collect::<Vec<_>>());
    harness.assert_state(|s| s.board.load_more.is_active());
    harness.assert_state(|s| !s.board.reset.visible);
    harness.assert_state(|s| s.board.search_input.is_empty());
}

#[test]
fn test_search_without_hits_shows_notice() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    harness.dispatch_collect(Action::SearchStart);
    for ch in "zzzz".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);

    harness.assert_state(|s| s.board.cards.is_empty());
    harness.assert_state(|s| s.board.notice.as_deref() == Some(EMPTY_NOTICE));
    harness.assert_state(|s| s.board.reset.visible);
}

#[test]
fn test_overlay_fetches_unresolved_neighbour() {
    let mut harness = EffectStoreTestHarness::new(started(150), reducer);
    harness.dispatch_collect(Action::DetailOpen(19));
    harness.assert_state(|s| s.cursors.overlay == Some(19));
    harness.assert_state(|s| s.board.scroll_suspended);

    harness.dispatch_collect(Action::DetailNext);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadBatch { range, .. } if *range == BatchRange::new(20, 21))
    });

    harness.complete_action(batch_loaded(20, 21));
    harness.process_emitted();
    harness.assert_state(|s| s.cursors.overlay == Some(20));
    harness.assert_state(|s| s.board.cards.len() == 20);

    // the next batch still loads as a whole
    harness.dispatch_collect(Action::DetailClose);
    harness.dispatch_collect(Action::BatchLoadMore);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadBatch { range, .. } if *range == BatchRange::new(20, 40))
    });
}

#[test]
fn test_card_select_and_open() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    harness.dispatch_collect(Action::CardSelect(7));
    harness.assert_state(|s| s.selected_card == 7);

    // out of range selections are ignored
    harness.dispatch_collect(Action::CardSelect(99));
    harness.assert_state(|s| s.selected_card == 7);

    harness.dispatch_collect(Action::CardOpen);
    harness.assert_state(|s| s.board.detail == Some(7));
}

#[test]
fn test_keys_drive_load_more_and_overlay() {
    let mut harness = EffectStoreTestHarness::new(started(60), reducer);

    let actions = harness.send_keys::<NumericComponentId, _, _>("m", |state, event| {
        handle_cards_event(&event.kind, state).actions
    });
    actions.assert_count(1);
    actions.assert_first(Action::BatchLoadMore);

    harness.dispatch_collect(Action::DetailOpen(3));
    let actions = harness.send_keys::<NumericComponentId, _, _>("l", |state, event| {
        handle_overlay_event(&event.kind, state).actions
    });
    actions.assert_first(Action::DetailNext);
}

#[test]
fn test_click_opens_card_overlay() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    let click = EventKind::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 29,
        row: 9,
        modifiers: KeyModifiers::NONE,
    });

    let actions = handle_cards_event(&click, harness.state()).actions;
    assert_eq!(actions, vec![Action::CardSelect(4), Action::DetailOpen(4)]);
    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.selected_card == 4);
    harness.assert_state(|s| s.board.detail == Some(4));
    harness.assert_state(|s| s.board.scroll_suspended);
}

#[test]
fn test_search_during_startup_is_ignored() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::SearchStart);
    for ch in "mon-1".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);
    harness.assert_state(|s| !s.search.active && !s.board.reset.visible);

    harness.complete_action(Action::ListingDidLoad(summaries(150)));
    harness.process_emitted();
    harness.drain_effects();
    harness.complete_action(batch_loaded(0, 20));
    harness.process_emitted();

    harness.assert_state(|s| s.board.notice.is_none());
    harness.assert_state(|s| s.board.cards == (0..20).collect::<Vec<_>>());
    harness.assert_state(|s| s.cursors.render == 20);
    harness.assert_state(|s| s.board.load_more.is_active());
}

#[test]
fn test_render_cards_and_controls() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    let mut ui = CardsUi::new();

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.draw(frame, area, state);
    });
    assert!(output.contains("POKEDEX"), "header missing:\n{output}");
    assert!(output.contains("Mon 0"), "first card missing:\n{output}");
    assert!(output.contains("[m] Load more"), "load more missing:\n{output}");
    assert!(!output.contains(RESET_LABEL));
}

#[test]
fn test_render_overlay_fields() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    harness.dispatch_collect(Action::DetailOpen(1));
    let mut ui = CardsUi::new();

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.draw(frame, area, state);
    });
    assert!(output.contains("Mon 1"), "overlay title missing:\n{output}");
    assert!(output.contains("Attack: 49"), "attack missing:\n{output}");
    assert!(output.contains("Defense: 50"), "defense missing:\n{output}");
    assert!(output.contains("0.7 m"), "height missing:\n{output}");
    assert!(output.contains("6.9 kg"), "weight missing:\n{output}");
}

#[test]
fn test_render_empty_notice() {
    let mut harness = EffectStoreTestHarness::new(started(40), reducer);
    harness.dispatch_collect(Action::SearchStart);
    for ch in "nothing".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);
    let mut ui = CardsUi::new();

    let output = harness.render_plain(100, 30, |frame, area, state| {
        ui.draw(frame, area, state);
    });
    assert!(output.contains("No Pokémon found"), "notice missing:\n{output}");
    assert!(output.contains(RESET_LABEL), "reset control missing:\n{output}");
}
