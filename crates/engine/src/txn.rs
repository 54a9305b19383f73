//! Reentrant transaction scope.

use rmap_core::RmapResult;
use rmap_storage::TripleStore;

/// Run `f` inside a transaction on `store`
///
/// Opens a transaction only when none is open. A transaction opened here is
/// committed on `Ok` and rolled back on `Err`. When the caller already holds
/// one, `f` runs inside it and the caller owns commit and rollback.
pub fn in_transaction<S, T, F>(store: &S, f: F) -> RmapResult<T>
where
    S: TripleStore + ?Sized,
    F: FnOnce() -> RmapResult<T>,
{
    if store.has_transaction_open() {
        return f();
    }
    store.begin_transaction()?;
    match f() {
        Ok(value) => {
            store.commit_transaction()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = store.rollback_transaction() {
                tracing::error!(target: "rmap::store", error = %rollback, cause = %e, "rollback failed");
            }
            Err(e)
        }
    }
}
