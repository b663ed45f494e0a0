//! In-memory list views for an education admin dashboard.
//!
//! A [`CollectionView`] owns one page's records (students, courses, tests,
//! tasks or payments), answers search/status filter queries, and derives
//! headline statistics over either the whole collection or the filtered view.

pub mod collection;
pub mod config;
pub mod error;
pub mod filter;
pub mod import;
pub mod metric;
pub mod models;
pub mod record;
pub mod report;
pub mod seed;
pub mod session;

pub use collection::{CollectionView, FilteredView, SortOrder};
pub use error::{CollectionError, DuplicateIdentifierError, NotFoundError};
pub use filter::{FilterState, StatusFilter};
pub use metric::{DerivedStats, HeadlineStats, Metric, Scope, Stat, StatScope};
pub use record::{Field, Record, Status, Tag};
