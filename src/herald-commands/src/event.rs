//! The cancellable record of one invocation attempt.

use std::fmt;

use crate::command::CommandDescriptor;
use crate::context::ExecutionContext;
use crate::dispatcher::Dispatcher;

/// The record of one invocation attempt, passed to execution listeners.
///
/// Any listener may cancel the pending execution; later listeners still run,
/// and the dispatcher checks the flag once after all of them have.
pub struct CommandEvent<'h, E, R> {
    context: &'h ExecutionContext<'h, E>,
    dispatcher: &'h Dispatcher<E, R>,
    command: &'h CommandDescriptor<E, R>,
    emitter: &'h E,
    message: &'h str,
    cancelled: bool,
}

impl<'h, E, R> CommandEvent<'h, E, R> {
    pub(crate) fn new(
        context: &'h ExecutionContext<'h, E>,
        dispatcher: &'h Dispatcher<E, R>,
        command: &'h CommandDescriptor<E, R>,
        emitter: &'h E,
        message: &'h str,
    ) -> Self {
        Self {
            context,
            dispatcher,
            command,
            emitter,
            message,
            cancelled: false,
        }
    }

    /// The execution context of this invocation.
    pub fn context(&self) -> &'h ExecutionContext<'h, E> {
        self.context
    }

    /// The dispatcher that created this event.
    pub fn dispatcher(&self) -> &'h Dispatcher<E, R> {
        self.dispatcher
    }

    /// The command about to be executed.
    pub fn command(&self) -> &'h CommandDescriptor<E, R> {
        self.command
    }

    /// The emitter whose message triggered this invocation.
    pub fn emitter(&self) -> &'h E {
        self.emitter
    }

    /// The raw message that triggered this invocation.
    pub fn message(&self) -> &'h str {
        self.message
    }

    /// Whether the execution has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel the pending execution.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Set the cancellation flag explicitly.
    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

impl<E, R> fmt::Debug for CommandEvent<'_, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEvent")
            .field("command", &self.command.label())
            .field("message", &self.message)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}
