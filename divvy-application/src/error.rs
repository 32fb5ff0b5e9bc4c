use crate::model::GroupId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("group '{0}' is not registered")]
    UnknownGroup(GroupId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("group '{0}' does not exist")]
    UnknownGroup(GroupId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
