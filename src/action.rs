use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::loader::BatchRange;
use crate::state::{EntityDetail, EntitySummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,
    ListingRetry,
    ListingDidLoad(Vec<EntitySummary>),
    ListingDidError(FetchError),

    /// Load-more control: resolve the next batch, then render it.
    BatchLoadMore,
    BatchDidLoad {
        range: BatchRange,
        details: Vec<EntityDetail>,
    },
    BatchDidError {
        range: BatchRange,
        error: FetchError,
    },

    CardMove(i16),
    CardSelect(usize),
    CardOpen,

    DetailOpen(usize),
    DetailPrev,
    DetailNext,
    DetailClose,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    ViewReset,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
