mod sort;

pub use sort::SortOptions;
pub use sort::sort;
