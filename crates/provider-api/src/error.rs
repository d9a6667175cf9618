use thiserror::Error;

/// Errors that can occur when mutating the [`ProviderRegistry`](crate::ProviderRegistry).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderRegistryError {
    /// A provider attempted to register an identifier that already exists
    /// in the registry.
    #[error("provider id '{id}' is already registered")]
    DuplicateId { id: &'static str },
}
