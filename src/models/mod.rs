pub mod entry;
pub mod filter;

pub use entry::{HistoryEntry, LineError, Listing};
pub use filter::filter;
