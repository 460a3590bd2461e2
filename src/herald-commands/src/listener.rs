//! Listener protocol around command execution.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::command::CommandError;
use crate::context::ExecutionContext;
use crate::dispatcher::Dispatcher;
use crate::event::CommandEvent;

/// Error returned when adding a listener that is already registered.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("listener is already registered")]
pub struct DuplicateListenerError;

/// Error returned when removing a listener that is not registered.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("listener is not registered")]
pub struct UnknownListenerError;

/// Observer of the dispatch pipeline.
///
/// All hooks default to no-ops; implement the ones you care about. Panics
/// raised inside a hook are not caught by the dispatcher and propagate to
/// the `handle` caller.
pub trait CommandListener<E, R>: Send + Sync {
    /// Called when an execution context has been created, before anything
    /// else happens. The usual place to register capabilities for parameter
    /// injection.
    fn on_context_created(&self, _context: &mut ExecutionContext<'_, E>) {}

    /// Called when a command is about to be executed. Cancel the execution
    /// with [`CommandEvent::cancel`]; later listeners still run.
    fn on_command_execution(&self, _event: &mut CommandEvent<'_, E, R>) {}

    /// Called when a command was found but no syntax variant matched the
    /// input.
    fn on_syntax_error(&self, _context: &ExecutionContext<'_, E>) {}

    /// Called when the invoked handler failed. The error is the exact value
    /// the handler returned.
    fn on_command_exception(&self, _event: &CommandEvent<'_, E, R>, _error: &CommandError) {}

    /// Called when no command matched the message's first token.
    fn on_command_not_found(&self, _dispatcher: &Dispatcher<E, R>, _emitter: &E, _message: &str) {}
}

/// Set of listeners notified around command execution.
///
/// Listeners are identified by the allocation behind their `Arc`: adding the
/// same `Arc` (or a clone of it) twice is an error, as is removing one that
/// was never added. Notification follows insertion order.
pub struct ListenerRegistry<E, R> {
    listeners: Vec<Arc<dyn CommandListener<E, R>>>,
}

impl<E, R> ListenerRegistry<E, R> {
    /// Create an empty listener set.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Add a listener.
    pub fn add(
        &mut self,
        listener: Arc<dyn CommandListener<E, R>>,
    ) -> Result<(), DuplicateListenerError> {
        if self.listeners.iter().any(|known| same(known, &listener)) {
            return Err(DuplicateListenerError);
        }

        self.listeners.push(listener);
        Ok(())
    }

    /// Remove a previously added listener.
    pub fn remove(
        &mut self,
        listener: &Arc<dyn CommandListener<E, R>>,
    ) -> Result<(), UnknownListenerError> {
        match self.listeners.iter().position(|known| same(known, listener)) {
            Some(index) => {
                self.listeners.remove(index);
                Ok(())
            }
            None => Err(UnknownListenerError),
        }
    }

    /// The number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener that a context was created.
    pub fn notify_context_created(&self, context: &mut ExecutionContext<'_, E>) {
        for listener in &self.listeners {
            listener.on_context_created(context);
        }
    }

    /// Notify every listener that a command is about to execute.
    pub fn notify_command_execution(&self, event: &mut CommandEvent<'_, E, R>) {
        for listener in &self.listeners {
            listener.on_command_execution(event);
        }
    }

    /// Notify every listener that no syntax variant matched.
    pub fn notify_syntax_error(&self, context: &ExecutionContext<'_, E>) {
        for listener in &self.listeners {
            listener.on_syntax_error(context);
        }
    }

    /// Notify every listener that the handler failed.
    pub fn notify_command_exception(&self, event: &CommandEvent<'_, E, R>, error: &CommandError) {
        for listener in &self.listeners {
            listener.on_command_exception(event, error);
        }
    }

    /// Notify every listener that no command matched the message.
    pub fn notify_command_not_found(
        &self,
        dispatcher: &Dispatcher<E, R>,
        emitter: &E,
        message: &str,
    ) {
        for listener in &self.listeners {
            listener.on_command_not_found(dispatcher, emitter, message);
        }
    }
}

impl<E, R> Default for ListenerRegistry<E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, R> std::fmt::Debug for ListenerRegistry<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Identity comparison: same allocation behind both `Arc`s.
fn same<E, R>(a: &Arc<dyn CommandListener<E, R>>, b: &Arc<dyn CommandListener<E, R>>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Listener reporting dispatch outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl LogListener {
    /// Create a new logging listener.
    pub fn new() -> Self {
        Self
    }
}

impl<E, R> CommandListener<E, R> for LogListener {
    fn on_command_execution(&self, event: &mut CommandEvent<'_, E, R>) {
        trace!("Executing command `{}`", event.command().label());
    }

    fn on_syntax_error(&self, _context: &ExecutionContext<'_, E>) {
        debug!("Input did not match any syntax variant");
    }

    fn on_command_exception(&self, event: &CommandEvent<'_, E, R>, error: &CommandError) {
        warn!("Command `{}` failed: {}", event.command().label(), error);
    }

    fn on_command_not_found(&self, _dispatcher: &Dispatcher<E, R>, _emitter: &E, message: &str) {
        debug!("No command registered for input `{message}`");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Quiet;

    impl CommandListener<(), String> for Quiet {}

    #[test]
    fn test_add_and_remove() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let listener: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);

        registry.add(Arc::clone(&listener)).unwrap();
        assert_eq!(registry.len(), 1);

        registry.remove(&listener).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let listener: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);

        registry.add(Arc::clone(&listener)).unwrap();

        assert_eq!(
            registry.add(Arc::clone(&listener)),
            Err(DuplicateListenerError)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_unknown_rejected() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let listener: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);

        assert_eq!(registry.remove(&listener), Err(UnknownListenerError));
    }

    #[test]
    fn test_re_adding_a_removed_listener_succeeds() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let listener: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);

        registry.add(Arc::clone(&listener)).unwrap();
        registry.remove(&listener).unwrap();
        registry.add(Arc::clone(&listener)).unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_log_listener_registers_like_any_listener() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let listener: Arc<dyn CommandListener<(), String>> = Arc::new(LogListener::new());

        registry.add(Arc::clone(&listener)).unwrap();
        assert_eq!(
            registry.add(Arc::clone(&listener)),
            Err(DuplicateListenerError)
        );
        registry.remove(&listener).unwrap();
    }

    #[test]
    fn test_distinct_instances_are_distinct_listeners() {
        let mut registry: ListenerRegistry<(), String> = ListenerRegistry::new();
        let first: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);
        let second: Arc<dyn CommandListener<(), String>> = Arc::new(Quiet);

        registry.add(first).unwrap();
        registry.add(second).unwrap();

        assert_eq!(registry.len(), 2);
    }
}
