use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, StatusBar,
    StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::state::{AppState, Entity, EntityDetail, EntityStat};
use crate::view::Affordance;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 5;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub const LOAD_MORE_LABEL: &str = "Load more";
pub const RESET_LABEL: &str = "Back to full list";

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CardsComponentId {
    Cards,
    Overlay,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardsContext {
    Cards,
    Overlay,
    Search,
}

impl EventRoutingState<CardsComponentId, CardsContext> for AppState {
    fn focused(&self) -> Option<CardsComponentId> {
        if self.search.active {
            Some(CardsComponentId::Search)
        } else if self.board.detail.is_some() {
            Some(CardsComponentId::Overlay)
        } else {
            Some(CardsComponentId::Cards)
        }
    }

    fn modal(&self) -> Option<CardsComponentId> {
        if self.search.active {
            Some(CardsComponentId::Search)
        } else if self.board.detail.is_some() {
            Some(CardsComponentId::Overlay)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CardsComponentId) -> CardsContext {
        match id {
            CardsComponentId::Cards => CardsContext::Cards,
            CardsComponentId::Overlay => CardsContext::Overlay,
            CardsComponentId::Search => CardsContext::Search,
        }
    }

    fn default_context(&self) -> CardsContext {
        CardsContext::Cards
    }
}

pub struct CardsUi {
    modal: Modal,
    status_bar: StatusBar,
}

impl Default for CardsUi {
    fn default() -> Self {
        Self::new()
    }
}

impl CardsUi {
    pub fn new() -> Self {
        Self {
            modal: Modal::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<CardsComponentId>,
    ) {
        let layout = screen_layout(area);
        event_ctx.set_component_area(CardsComponentId::Cards, layout[1]);
        if state.search.active {
            event_ctx.set_component_area(CardsComponentId::Search, layout[0]);
        }
        if state.board.detail.is_some() {
            event_ctx.set_component_area(CardsComponentId::Overlay, overlay_area(area));
        }
        self.draw(frame, area, state);
    }

    /// Draws the whole screen without touching event routing.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = screen_layout(area);

        render_header(frame, layout[0], state);
        render_cards(frame, layout[1], state);
        render_controls(frame, layout[2], state);
        render_footer(frame, layout[3], state, &mut self.status_bar);

        if let Some((index, detail)) = state.overlay_entry() {
            render_overlay(frame, area, state, index, detail, &mut self.modal);
        }
    }

    pub fn handle_cards_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_cards_event(event, state)
    }

    pub fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let area = Rect::new(0, 0, state.terminal_size.0, state.terminal_size.1);
        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let props = ModalProps {
            is_open: true,
            is_focused: true,
            area: overlay_area(area),
            style: overlay_style(),
            behavior: ModalBehavior {
                close_on_esc: true,
                close_on_backdrop: false,
            },
            on_close: overlay_close,
            render_content: &mut noop_render,
        };
        let actions: Vec<_> = self.modal.handle_event(event, props).into_iter().collect();
        if !actions.is_empty() {
            return handler_response(actions);
        }
        handle_overlay_event(event, state)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }
}

fn screen_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area)
}

/// Number of card columns that fit in a terminal `width` cells wide.
pub fn grid_columns(width: u16) -> usize {
    (width.saturating_sub(2) / CARD_WIDTH).max(1) as usize
}

/// Placement of the visible card rows. Rows scroll so the selected card
/// stays on screen.
struct CardGrid {
    area: Rect,
    columns: usize,
    rows: usize,
    first_row: usize,
    left: u16,
}

impl CardGrid {
    fn new(area: Rect, state: &AppState) -> Self {
        let columns = grid_columns(area.width);
        let rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected = state
            .selected_card
            .min(state.board.cards.len().saturating_sub(1));
        let first_row = (selected / columns).saturating_sub(rows - 1);
        let left = area.x + area.width.saturating_sub(columns as u16 * CARD_WIDTH) / 2;
        Self {
            area,
            columns,
            rows,
            first_row,
            left,
        }
    }

    /// Grid for the card region of a full terminal of the given size.
    fn for_terminal(state: &AppState) -> Self {
        let (width, height) = state.terminal_size;
        Self::new(screen_layout(Rect::new(0, 0, width, height))[1], state)
    }

    fn first_slot(&self) -> usize {
        self.first_row * self.columns
    }

    fn slot_count(&self) -> usize {
        self.rows * self.columns
    }

    fn slot_area(&self, slot: usize) -> Rect {
        let row = (slot / self.columns - self.first_row) as u16;
        let col = (slot % self.columns) as u16;
        Rect::new(
            self.left + col * CARD_WIDTH,
            self.area.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(self.area)
    }

    /// Card slot under a terminal cell, if any.
    fn slot_at(&self, column: u16, row: u16) -> Option<usize> {
        if row < self.area.y || row >= self.area.bottom() || column < self.left {
            return None;
        }
        let col = ((column - self.left) / CARD_WIDTH) as usize;
        let grid_row = ((row - self.area.y) / CARD_HEIGHT) as usize;
        if col >= self.columns || grid_row >= self.rows {
            return None;
        }
        Some((self.first_row + grid_row) * self.columns + col)
    }
}

/// Card position under a left click, as `(slot in the board, collection index)`.
pub fn card_at(state: &AppState, column: u16, row: u16) -> Option<(usize, usize)> {
    if state.board.notice.is_some() {
        return None;
    }
    let slot = CardGrid::for_terminal(state).slot_at(column, row)?;
    let position = state.board.cards.get(slot).copied()?;
    Some((slot, position))
}

pub fn handle_cards_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    let columns = grid_columns(state.terminal_size.0) as i16;
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Left | KeyCode::Char('h') => vec![Action::CardMove(-1)],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::CardMove(1)],
            KeyCode::Up | KeyCode::Char('k') => vec![Action::CardMove(-columns)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::CardMove(columns)],
            KeyCode::Enter => vec![Action::CardOpen],
            KeyCode::Char('m') | KeyCode::Char(' ') => vec![Action::BatchLoadMore],
            KeyCode::Char('x') => vec![Action::ViewReset],
            _ => vec![],
        },
        EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            match card_at(state, mouse.column, mouse.row) {
                Some((slot, position)) => {
                    vec![Action::CardSelect(slot), Action::DetailOpen(position)]
                }
                None => vec![],
            }
        }
        EventKind::Scroll { delta, .. } => vec![Action::CardMove(*delta as i16 * columns)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_overlay_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Left | KeyCode::Char('h') => vec![Action::DetailPrev],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::DetailNext],
            KeyCode::Esc | KeyCode::Enter => vec![Action::DetailClose],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchCancel],
            KeyCode::Enter => vec![Action::SearchSubmit],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let search = if state.search.active {
        format!("/{}_", state.board.search_input)
    } else if state.board.search_input.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.board.search_input)
    };
    let shown = state.board.cards.len();
    let total = state.collection.len();
    let mut spans = vec![
        Span::styled(
            "POKEDEX",
            Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
        Span::raw("  |  Showing "),
        Span::styled(format!("{shown}/{total}"), Style::default().fg(ACCENT_GOLD)),
    ];
    if state.is_loading() {
        let frame_idx = (state.tick as usize) % SPINNER.len();
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} loading", SPINNER[frame_idx]),
            Style::default().fg(ACCENT_GOLD),
        ));
    }

    let border = if state.search.active {
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(notice) = state.board.notice.as_deref() {
        let paragraph = Paragraph::new(notice)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(ACCENT_GOLD));
        frame.render_widget(paragraph, pad_top(area, 1));
        return;
    }
    if state.board.cards.is_empty() {
        let text = if state.listing_failed() {
            "Press r to retry."
        } else {
            "Loading Pokémon..."
        };
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(paragraph, pad_top(area, 1));
        return;
    }

    let grid = CardGrid::new(area, state);
    let selected = state.selected_card.min(state.board.cards.len() - 1);
    for (slot, &position) in state
        .board
        .cards
        .iter()
        .enumerate()
        .skip(grid.first_slot())
        .take(grid.slot_count())
    {
        let Some(entity) = state.collection.get(position) else {
            continue;
        };
        render_card(frame, grid.slot_area(slot), position, entity, slot == selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, position: usize, entity: &Entity, selected: bool) {
    let (accent, lines) = match entity {
        Entity::Detail(detail) => (
            type_color(detail.primary_type().unwrap_or("normal")),
            vec![
                Line::from(Span::styled(
                    format_name(&detail.name),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    detail.types.join(" / "),
                    Style::default().fg(TEXT_DIM),
                )),
            ],
        ),
        Entity::Summary(summary) => (
            TEXT_DIM,
            vec![
                Line::from(format_name(&summary.name)),
                Line::from(Span::styled("...", Style::default().fg(TEXT_DIM))),
            ],
        ),
    };
    let number = match entity {
        Entity::Detail(detail) => format!("#{:03}", detail.id),
        Entity::Summary(_) => format!("#{:03}", position + 1),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(number)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    if selected {
        block = block
            .border_type(BorderType::Thick)
            .style(Style::default().bg(BG_HIGHLIGHT).fg(TEXT_MAIN));
    }
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    if state.board.load_more.visible {
        spans.push(control_span("m", LOAD_MORE_LABEL, &state.board.load_more));
    }
    if state.board.reset.visible {
        if !spans.is_empty() {
            spans.push(Span::raw("    "));
        }
        spans.push(control_span("x", RESET_LABEL, &state.board.reset));
    }
    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn control_span(key: &str, label: &str, affordance: &Affordance) -> Span<'static> {
    let style = if affordance.enabled {
        Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM).add_modifier(Modifier::DIM)
    };
    Span::styled(format!("[{key}] {label}"), style)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if let Some(index) = state.pending_open {
            format!("Fetching #{}...", index + 1)
        } else if state.loader.listing_in_flight() {
            "Loading Pokémon...".to_string()
        } else if state.is_loading() {
            "Loading details...".to_string()
        } else {
            "".to_string()
        }
    });
    let hints = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    if state.board.detail.is_some() {
        return vec![
            StatusBarHint::new("h/l", "Prev/Next"),
            StatusBarHint::new("Esc", "Close"),
            StatusBarHint::new("q", "Quit"),
        ];
    }
    let mut hints = vec![
        StatusBarHint::new("hjkl", "Move"),
        StatusBarHint::new("Enter", "Open"),
    ];
    if state.listing.is_loaded() {
        hints.push(StatusBarHint::new("/", "Search"));
    }
    if state.board.load_more.is_active() {
        hints.push(StatusBarHint::new("m", "More"));
    }
    if state.board.reset.visible {
        hints.push(StatusBarHint::new("x", "Reset"));
    }
    if state.listing_failed() {
        hints.push(StatusBarHint::new("r", "Retry"));
    }
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}

fn render_overlay(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    index: usize,
    detail: &EntityDetail,
    modal: &mut Modal,
) {
    let modal_area = overlay_area(area);
    let mut render_content = |frame: &mut Frame, inner: Rect| {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                format_name(&detail.name),
                Style::default()
                    .fg(type_color(detail.primary_type().unwrap_or("normal")))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}/{}", index + 1, state.collection.len()),
                Style::default().fg(TEXT_DIM),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let body = Paragraph::new(detail_text(detail)).wrap(Wrap { trim: false });
        frame.render_widget(body, layout[1]);

        let nav = Paragraph::new(Line::from(vec![
            control_span("h", "Previous", &state.board.previous),
            Span::raw("    "),
            control_span("Esc", "Close", &Affordance::shown()),
            Span::raw("    "),
            control_span("l", "Next", &state.board.next),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(nav, layout[2]);
    };

    let props = ModalProps {
        is_open: true,
        is_focused: true,
        area: modal_area,
        style: overlay_style(),
        behavior: ModalBehavior {
            close_on_esc: true,
            close_on_backdrop: false,
        },
        on_close: overlay_close,
        render_content: &mut render_content,
    };
    Component::<Action>::render(modal, frame, area, props);
}

/// Overlay body: the fields shown for one resolved entry.
pub fn detail_text(detail: &EntityDetail) -> Text<'static> {
    let label = Style::default().fg(ACCENT_TEAL);
    let stat_value = |value: Option<u16>| {
        value
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("ID: ", label),
            Span::raw(detail.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Types: ", label),
            Span::raw(detail.types.join(", ")),
        ]),
        Line::from(vec![
            Span::styled("Attack: ", label),
            Span::raw(stat_value(detail.attack())),
            Span::styled("   Defense: ", label),
            Span::raw(stat_value(detail.defense())),
        ]),
        Line::from(vec![
            Span::styled("Height: ", label),
            Span::raw(format!("{:.1} m", detail.height_m())),
            Span::styled("   Weight: ", label),
            Span::raw(format!("{:.1} kg", detail.weight_kg())),
        ]),
        Line::from(vec![
            Span::styled("Artwork: ", label),
            Span::raw(
                detail
                    .artwork_url
                    .clone()
                    .unwrap_or_else(|| "none".to_string()),
            ),
        ]),
    ];
    if !detail.stats.is_empty() {
        lines.push(Line::from(" "));
        lines.extend(
            detail
                .stats
                .iter()
                .map(|stat| Line::from(render_stat(stat))),
        );
    }
    Text::from(lines)
}

fn overlay_area(area: Rect) -> Rect {
    centered_rect(60.min(area.width), 20.min(area.height), area)
}

fn overlay_close() -> Action {
    Action::DetailClose
}

fn overlay_style() -> ModalStyle {
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_GOLD)),
            }),
            padding: Padding::xy(2, 1),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
    }
}

/// Card accent for a type name; unknown types fall back to the normal colour.
pub fn type_color(type_name: &str) -> Color {
    match type_name {
        "fire" => Color::Rgb(0xF0, 0x80, 0x30),
        "water" => Color::Rgb(0x68, 0x90, 0xF0),
        "grass" => Color::Rgb(0x78, 0xC8, 0x50),
        "electric" => Color::Rgb(0xF8, 0xD0, 0x30),
        "psychic" => Color::Rgb(0xF8, 0x58, 0x88),
        "ice" => Color::Rgb(0x98, 0xD8, 0xD8),
        "dragon" => Color::Rgb(0x70, 0x38, 0xF8),
        "dark" => Color::Rgb(0x70, 0x58, 0x48),
        _ => Color::Rgb(0xA8, 0xA8, 0x78),
    }
}

pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_stat(stat: &EntityStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = (stat.base_stat as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.base_stat)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn pad_top(area: Rect, rows: u16) -> Rect {
    Rect {
        y: area.y + rows.min(area.height),
        height: area.height.saturating_sub(rows),
        ..area
    }
}
