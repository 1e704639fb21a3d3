pub mod filter;
pub mod highlight;
pub mod paginator;
pub mod query_string;
pub mod worker;

pub use filter::{filter, validate_query, FilterState, FilteredView};
pub use highlight::{highlight, QueryMatcher, Span, SpanKind};
pub use paginator::{observe_sentinel, Paginator, SentinelSubscription, PAGE_SIZE};
pub use worker::catalog_worker_loop;
