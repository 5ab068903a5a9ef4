mod cancel;
mod engine;

pub use cancel::CancelToken;
pub use engine::{CategoryFilter, IntersectionRecord, JoinOutput, SkippedPair, intersection_join};
