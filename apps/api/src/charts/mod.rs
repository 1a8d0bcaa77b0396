// Chart engine: keyword classification of work updates and chart synthesis.
// Pure and synchronous; the only nondeterminism is the injected timeline RNG.

pub mod handlers;
pub mod keywords;
pub mod metrics;
pub mod palette;
pub mod series;
pub mod svg;

pub use keywords::KeywordTable;
pub use series::ChartBundle;
