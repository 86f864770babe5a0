use std::fmt;

/// Database-level failure while opening, committing or rolling back a transaction.
#[derive(Debug, Clone)]
pub struct InfraError {
    message: String,
}

impl InfraError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InfraError {}

impl From<sea_orm::DbErr> for InfraError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::new(err.to_string())
    }
}

/// Result of [`LifecycleConn::in_transaction`](super::conn::LifecycleConn::in_transaction).
///
/// Keeps errors returned by the callback (including version conflicts) apart from
/// failures of the transaction itself.
///
/// ```ignore
/// let user = db
///     .in_transaction(|tx| Box::pin(async move { repo.save(tx, &ctx, am).await }))
///     .await
///     .map_err(|e| e.into_domain(DomainError::database_infra))?;
/// ```
#[derive(Debug, Clone)]
pub enum TxError<E> {
    Domain(E),
    Infra(InfraError),
}

impl<E> TxError<E> {
    /// Collapse into the domain error type, mapping infrastructure failures with `map_infra`.
    pub fn into_domain<F>(self, map_infra: F) -> E
    where
        F: FnOnce(InfraError) -> E,
    {
        match self {
            TxError::Domain(e) => e,
            TxError::Infra(infra) => map_infra(infra),
        }
    }
}

impl<E: fmt::Display> fmt::Display for TxError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::Domain(e) => write!(f, "{e}"),
            TxError::Infra(e) => write!(f, "infrastructure error: {e}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TxError<E> {}
