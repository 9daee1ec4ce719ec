pub mod exact;
mod lanes;
pub mod sw;
pub mod vsw;

pub use exact::{map_exact, AlignmentHit, ExactMapper, MapStats};
pub use lanes::Score;
pub use vsw::{align, align_with, ScoredAlignment, VswOpt, VswQuery};
