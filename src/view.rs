//! Rendering capability used by the view controller, and the board that
//! implements it for the terminal UI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Entity, EntityDetail};

pub const EMPTY_NOTICE: &str = "No Pokémon found. Please check your input..";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum AffordanceId {
    LoadMore,
    Reset,
    Previous,
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Affordance {
    pub visible: bool,
    pub enabled: bool,
}

impl Affordance {
    pub fn shown() -> Self {
        Self {
            visible: true,
            enabled: true,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            enabled: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.visible && self.enabled
    }
}

/// Everything the controller may ask of a presentation layer.
pub trait ViewSink {
    fn clear_cards(&mut self);
    /// Appends cards; each item carries its absolute collection position.
    fn render_cards(&mut self, cards: &[(usize, &Entity)]);
    fn render_empty_notice(&mut self, query: &str);
    fn render_detail(&mut self, index: usize, detail: &EntityDetail);
    fn hide_detail(&mut self);
    fn set_scroll_suspended(&mut self, suspended: bool);
    fn set_affordance_visible(&mut self, id: AffordanceId, visible: bool);
    fn set_affordance_enabled(&mut self, id: AffordanceId, enabled: bool);
    fn clear_search_input(&mut self);
}

/// Render model for the terminal: which cards are on screen, which controls
/// are usable, and what the overlay shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Board {
    pub cards: Vec<usize>,
    pub notice: Option<String>,
    pub detail: Option<usize>,
    pub scroll_suspended: bool,
    pub load_more: Affordance,
    pub reset: Affordance,
    pub previous: Affordance,
    pub next: Affordance,
    pub search_input: String,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            notice: None,
            detail: None,
            scroll_suspended: false,
            load_more: Affordance::shown(),
            reset: Affordance::hidden(),
            previous: Affordance::shown(),
            next: Affordance::shown(),
            search_input: String::new(),
        }
    }
}

impl Board {
    pub fn affordance(&self, id: AffordanceId) -> &Affordance {
        match id {
            AffordanceId::LoadMore => &self.load_more,
            AffordanceId::Reset => &self.reset,
            AffordanceId::Previous => &self.previous,
            AffordanceId::Next => &self.next,
        }
    }

    fn affordance_mut(&mut self, id: AffordanceId) -> &mut Affordance {
        match id {
            AffordanceId::LoadMore => &mut self.load_more,
            AffordanceId::Reset => &mut self.reset,
            AffordanceId::Previous => &mut self.previous,
            AffordanceId::Next => &mut self.next,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.reset.visible
    }
}

impl ViewSink for Board {
    fn clear_cards(&mut self) {
        self.cards.clear();
        self.notice = None;
    }

    fn render_cards(&mut self, cards: &[(usize, &Entity)]) {
        self.cards.extend(cards.iter().map(|(index, _)| *index));
    }

    fn render_empty_notice(&mut self, _query: &str) {
        self.notice = Some(EMPTY_NOTICE.to_string());
    }

    fn render_detail(&mut self, index: usize, _detail: &EntityDetail) {
        self.detail = Some(index);
    }

    fn hide_detail(&mut self) {
        self.detail = None;
    }

    fn set_scroll_suspended(&mut self, suspended: bool) {
        self.scroll_suspended = suspended;
    }

    fn set_affordance_visible(&mut self, id: AffordanceId, visible: bool) {
        self.affordance_mut(id).visible = visible;
    }

    fn set_affordance_enabled(&mut self, id: AffordanceId, enabled: bool) {
        self.affordance_mut(id).enabled = enabled;
    }

    fn clear_search_input(&mut self) {
        self.search_input.clear();
    }
}
