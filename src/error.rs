use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} with id {id} already exists")]
pub struct DuplicateIdentifierError {
    pub entity: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} with id {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Either failure a mutation can report. Both leave the collection untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error(transparent)]
    DuplicateIdentifier(#[from] DuplicateIdentifierError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}
