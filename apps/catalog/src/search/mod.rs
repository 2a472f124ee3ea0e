//! Query composition, parsing and execution

pub mod evaluate;
pub mod query;
pub mod query_parser;
pub mod scored;
pub mod searcher;
pub mod sort;
pub mod spatial;

pub use query::{LogicalOperator, SortField, SpatialQuery};
pub use query_parser::{Clause, DefaultOperator, Occur, QueryParser, TextQuery};
pub use scored::ScoredSet;
pub use searcher::IndexSearcher;
pub use spatial::{DistanceUnit, SpatialFilter, SpatialOperator};
