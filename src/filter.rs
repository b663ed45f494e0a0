use serde::Serialize;

use crate::record::{Record, Status};

/// Status half of a filter: either every status or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S: Status> StatusFilter<S> {
    pub fn matches(&self, status: S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Accepts `all` or one of the entity's status names.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        S::parse(value).map(StatusFilter::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl<S: Status> Serialize for StatusFilter<S> {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Search text plus status predicate. Rebuilt on every change, never stored.
///
/// The search text is a literal pattern: no wildcard or regex syntax is
/// interpreted, so any string is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<S> {
    search: String,
    needle: String,
    status: StatusFilter<S>,
}

impl<S: Status> FilterState<S> {
    pub fn new(search: impl Into<String>, status: StatusFilter<S>) -> Self {
        let search = search.into();
        let needle = search.to_lowercase();
        Self {
            search,
            needle,
            status,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> StatusFilter<S> {
        self.status
    }

    /// True when the filter lets every record through.
    pub fn is_identity(&self) -> bool {
        self.needle.is_empty() && self.status == StatusFilter::All
    }

    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Status = S>,
    {
        if !self.status.matches(record.status()) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl<S: Status> Default for FilterState<S> {
    fn default() -> Self {
        Self::new(String::new(), StatusFilter::All)
    }
}
