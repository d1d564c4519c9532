pub mod game_state;
pub mod scoring;
pub mod word_source;

// Re-export main components
pub use game_state::*;
pub use scoring::*;
pub use word_source::*;
