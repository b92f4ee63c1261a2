//! Saved careers and the learning roadmap derived from one of them.

pub mod handlers;
pub mod roadmap;
pub mod saved;

pub use roadmap::Roadmap;
pub use saved::{SavedCareer, SavedCareers, SortBy};
