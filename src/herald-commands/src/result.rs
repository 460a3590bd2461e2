//! The outcome of one dispatch attempt.

/// The result of [`Dispatcher::handle`](crate::Dispatcher::handle).
///
/// The distinguishing bit is whether a handler was successfully invoked, not
/// whether it produced a payload: a handler may legitimately return nothing,
/// which is still [`CommandResult::Executed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult<R> {
    /// No handler was invoked: the command was not found, no syntax variant
    /// matched, a listener cancelled the execution, or the handler failed.
    NoResult,

    /// A handler ran to completion; its payload may be absent.
    Executed(Option<R>),
}

impl<R> CommandResult<R> {
    /// Whether a handler was successfully invoked.
    pub fn is_available(&self) -> bool {
        matches!(self, CommandResult::Executed(_))
    }

    /// The payload of a successful invocation, if one was produced.
    pub fn value(&self) -> Option<&R> {
        match self {
            CommandResult::NoResult => None,
            CommandResult::Executed(value) => value.as_ref(),
        }
    }

    /// Consume the result, yielding the payload if one was produced.
    pub fn into_value(self) -> Option<R> {
        match self {
            CommandResult::NoResult => None,
            CommandResult::Executed(value) => value,
        }
    }
}
