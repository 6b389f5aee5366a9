// Core algorithm exports
pub mod engine;
pub mod events;
pub mod filter;
pub mod ranker;
pub mod scoring;
pub mod swipe;

pub use engine::{EngineError, MatchEngine};
pub use events::{EngineEvent, EventChannel};
pub use filter::excluded_ids;
pub use ranker::{Ranker, DEFAULT_CANDIDATE_LIMIT};
pub use scoring::compatibility_score;
pub use swipe::{SwipeOutcome, SwipeProcessor};
