mod sorter;
mod writer;

pub use sorter::SortOutcome;
pub use sorter::sort_by_feature;
pub use sorter::sort_by_keys;
pub use writer::WriteOutcome;
pub use writer::ensure_and_populate;
