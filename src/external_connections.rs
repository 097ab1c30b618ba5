use sqlx::PgConnection;

/// A borrowed or owned database connection which driven adapters can run queries against
pub trait ConnectionHandle: Send {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to external systems, such as the database. Business logic receives an
/// implementation of this trait and hands it to driven ports, so it never knows whether it's
/// talking to a plain connection pool or an open transaction.
pub trait ExternalConnectivity: Send + Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// Something which can open a transaction, producing a connectivity handle whose database
/// work is only persisted once the transaction is committed.
pub trait Transactable {
    type Handle: ExternalConnectivity + TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// An open transaction. Dropping the handle without committing rolls the transaction back.
pub trait TransactionHandle {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

/// Shorthand for connectivity which can both run queries directly and open transactions
pub trait TransactableExternalConnectivity: ExternalConnectivity + Transactable {}

impl<T> TransactableExternalConnectivity for T where T: ExternalConnectivity + Transactable {}
