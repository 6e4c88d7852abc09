//! Filter state, its query-string form, and the page URL it is mirrored into.

pub mod bar;
pub mod codec;
pub mod state;
pub mod url_state;

pub use bar::FilterBar;
pub use codec::{decode, encode};
pub use state::{FilterPatch, FilterState, Limit};
pub use url_state::{HistoryBackend, MemoryHistory, UrlState};
