// lyrics/mod.rs - top-level lyrics module re-exporting submodules
pub mod extract;
pub mod providers;
pub mod types;

pub use extract::{GeniusExtractor, LyricExtractor};
pub use providers::GeniusClient;
pub use types::{LyricSet, LyricsError};
