//! Per-invocation execution context and capability registry.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// The context of a single dispatch.
///
/// A context borrows the emitter that triggered the dispatch and carries a
/// typed capability registry: one instance per type, registered by listeners
/// during the context-created notification and injected into handler
/// parameters at bind time.
///
/// A context never outlives its triggering `handle` call.
pub struct ExecutionContext<'e, E> {
    /// The emitter whose message triggered this dispatch.
    emitter: &'e E,
    /// Registered capability instances, keyed by type.
    capabilities: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl<'e, E> ExecutionContext<'e, E> {
    /// Create a fresh context for the given emitter.
    pub fn new(emitter: &'e E) -> Self {
        Self {
            emitter,
            capabilities: HashMap::new(),
        }
    }

    /// The emitter whose message triggered this dispatch.
    pub fn emitter(&self) -> &'e E {
        self.emitter
    }

    /// Register a capability instance under its type.
    ///
    /// Any instance previously registered for the same type is replaced.
    pub fn register_capability<C: Any + Send + Sync>(&mut self, instance: C) {
        self.capabilities.insert(TypeId::of::<C>(), Box::new(instance));
    }

    /// Get the capability instance registered for type `C`, if any.
    pub fn capability<C: Any + Send + Sync>(&self) -> Option<&C> {
        self.capabilities
            .get(&TypeId::of::<C>())
            .and_then(|instance| instance.downcast_ref())
    }

    /// Check whether a capability of type `C` is registered.
    pub fn has_capability<C: Any + Send + Sync>(&self) -> bool {
        self.capabilities.contains_key(&TypeId::of::<C>())
    }

    /// Untyped lookup used by parameter binding.
    pub(crate) fn capability_by_id(&self, key: TypeId) -> Option<&(dyn Any + Send + Sync)> {
        self.capabilities.get(&key).map(Box::as_ref)
    }
}

impl<E> fmt::Debug for ExecutionContext<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("capabilities", &self.capabilities.len())
            .finish_non_exhaustive()
    }
}
