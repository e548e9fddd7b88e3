//! Pokédex cards - terminal card browser for the PokeAPI listing

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex_cards::action::Action;
use pokedex_cards::api;
use pokedex_cards::config::CatalogArgs;
use pokedex_cards::effect::Effect;
use pokedex_cards::logging;
use pokedex_cards::reducer::reducer;
use pokedex_cards::state::AppState;
use pokedex_cards::ui::{CardsComponentId, CardsContext, CardsUi};

const TICK_MS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "pokedex-cards")]
#[command(about = "Browse Pokémon as cards, loaded from PokeAPI in batches")]
struct Args {
    #[command(flatten)]
    catalog: CatalogArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        catalog,
        debug: debug_args,
    } = Args::parse();

    logging::init_logging(catalog.log_file.as_deref())?;
    let config = catalog.config();
    tracing::info!(url = %config.listing_request_url(), batch = config.batch_size, "starting");

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(config))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("shutdown");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CardsUi::new()));
    let mut bus: EventBus<AppState, Action, CardsComponentId, CardsContext> = EventBus::new();
    let keybindings: Keybindings<CardsContext> = Keybindings::new();

    let ui_cards = Rc::clone(&ui);
    bus.register(CardsComponentId::Cards, move |event, state| {
        ui_cards
            .borrow_mut()
            .handle_cards_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(CardsComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(CardsComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Char('/') if state.board.detail.is_none() => {
                HandlerResponse::action(Action::SearchStart)
            }
            crossterm::event::KeyCode::Char('r') if state.listing_failed() => {
                HandlerResponse::action(Action::ListingRetry)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadListing { url } => {
            ctx.tasks().spawn(TaskKey::new("listing"), async move {
                match api::fetch_summaries(&url).await {
                    Ok(summaries) => Action::ListingDidLoad(summaries),
                    Err(err) => Action::ListingDidError(err),
                }
            });
        }
        Effect::LoadBatch { range, urls } => {
            let key = format!("batch_{}_{}", range.start, range.end);
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_details(urls).await {
                    Ok(details) => Action::BatchDidLoad { range, details },
                    Err(error) => Action::BatchDidError { range, error },
                }
            });
        }
    }
}
