//! Reusable widget components.

pub mod detail;
pub mod search;
pub mod status;

pub use detail::DetailPanel;
pub use search::SearchBar;
pub use status::StatusIndicator;
