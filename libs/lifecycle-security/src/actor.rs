use uuid::Uuid;

use crate::context::SecurityContext;

/// Resolves the identifier stamped into `created_by` / `updated_by` / `deleted_by`.
///
/// `None` means "no actor": audit columns stay unset instead of receiving a
/// placeholder value.
pub trait ActorResolver: Send + Sync {
    fn current_actor(&self) -> Option<Uuid>;
}

impl ActorResolver for SecurityContext {
    fn current_actor(&self) -> Option<Uuid> {
        self.subject_id()
    }
}

/// Resolver for callers that never have an identity (imports, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActor;

impl ActorResolver for NoActor {
    fn current_actor(&self) -> Option<Uuid> {
        None
    }
}

impl<T: ActorResolver + ?Sized> ActorResolver for &T {
    fn current_actor(&self) -> Option<Uuid> {
        (**self).current_actor()
    }
}
