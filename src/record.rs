use std::fmt;
use std::hash::Hash;

/// A closed set of named values, such as an entity's statuses or its
/// numeric fields.
pub trait Tag: Copy + Eq + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Case-insensitive lookup by name. Spaces and dashes are accepted in
    /// place of underscores.
    fn parse(value: &str) -> Option<Self> {
        let wanted = normalize(value);
        Self::ALL
            .iter()
            .copied()
            .find(|tag| normalize(tag.as_str()) == wanted)
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|tag| tag.as_str()).collect()
    }
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Marker for the status enumeration of an entity.
pub trait Status: Tag {}

/// Marker for the aggregatable numeric fields of an entity.
pub trait Field: Tag {}

/// One entity instance held by a `CollectionView`.
pub trait Record: Clone {
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display;
    type Status: Status;
    type Field: Field;

    /// Human readable entity name, used in errors and logs.
    const ENTITY: &'static str;
    /// Plural form, used for page titles.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    fn status(&self) -> Self::Status;

    /// Free-text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    fn value(&self, field: Self::Field) -> f64;
}
