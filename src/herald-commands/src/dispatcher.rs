//! The end-to-end dispatch pipeline.

use std::fmt;
use std::sync::Arc;

use herald_syntax::{Captures, OptionSet, Pattern};
use tracing::{debug, trace};

use crate::arguments::bind;
use crate::command::CommandDescriptor;
use crate::context::ExecutionContext;
use crate::event::CommandEvent;
use crate::listener::{
    CommandListener, DuplicateListenerError, ListenerRegistry, UnknownListenerError,
};
use crate::registry::{CommandRegistry, DuplicateLabelError};
use crate::result::CommandResult;

/// One syntax variant as seen by a match service.
#[derive(Debug, Clone, Copy)]
pub struct VariantCandidate<'p> {
    /// The variant's pattern.
    pub pattern: &'p Pattern,
    /// The variant's tie-break priority (smaller wins).
    pub priority: i32,
}

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMatch {
    /// Index of the winning candidate, in declaration order.
    pub index: usize,
    /// The values the winning pattern captured.
    pub captures: Captures,
}

/// The matching contract the dispatcher consumes.
///
/// Given a command's candidates in declaration order, the tokenized
/// remainder of the message, and the command's selector values, an
/// implementation returns the winning variant and its captures, or `None`
/// when nothing matches. Among several satisfiable candidates the one with
/// the numerically smallest priority must win; equal priorities resolve to
/// the earliest declared. Priority never excludes a candidate from being
/// tried.
pub trait MatchService: Send + Sync {
    /// Resolve the input against the candidates.
    fn resolve(
        &self,
        candidates: &[VariantCandidate<'_>],
        input: &[&str],
        options: &OptionSet,
    ) -> Option<VariantMatch>;
}

/// The default match service, backed by `herald-syntax`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxMatchService;

impl MatchService for SyntaxMatchService {
    fn resolve(
        &self,
        candidates: &[VariantCandidate<'_>],
        input: &[&str],
        options: &OptionSet,
    ) -> Option<VariantMatch> {
        let candidates = candidates.iter().map(|c| (c.pattern, c.priority));

        herald_syntax::resolve(candidates, input, options).map(|matched| VariantMatch {
            index: matched.index,
            captures: matched.captures,
        })
    }
}

/// The command dispatcher.
///
/// Owns the command registry and the listener set, and drives the full
/// pipeline for each message: label extraction, registry lookup, context
/// creation, listener notification, syntax resolution, parameter binding
/// and handler invocation.
///
/// `handle` takes `&self`, so concurrent dispatches are safe with respect to
/// each other; registration takes `&mut self`, which confines mutation to a
/// single-threaded setup phase (or an external lock) by construction.
pub struct Dispatcher<E, R> {
    registry: CommandRegistry<E, R>,
    listeners: ListenerRegistry<E, R>,
    matcher: Box<dyn MatchService>,
    prefix: Box<dyn Fn(&E) -> String + Send + Sync>,
}

impl<E, R> Dispatcher<E, R> {
    /// Create a dispatcher with the given prefix resolver.
    ///
    /// The resolver returns the (non-empty) prefix that marks a message as a
    /// command for the given emitter.
    pub fn new(prefix: impl Fn(&E) -> String + Send + Sync + 'static) -> Self {
        Self {
            registry: CommandRegistry::new(),
            listeners: ListenerRegistry::new(),
            matcher: Box::new(SyntaxMatchService),
            prefix: Box::new(prefix),
        }
    }

    /// Replace the match service.
    pub fn with_matcher(mut self, matcher: impl MatchService + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Register a command.
    pub fn register(
        &mut self,
        descriptor: CommandDescriptor<E, R>,
    ) -> Result<(), DuplicateLabelError> {
        self.registry.register(descriptor)
    }

    /// Add a listener.
    pub fn add_listener(
        &mut self,
        listener: Arc<dyn CommandListener<E, R>>,
    ) -> Result<(), DuplicateListenerError> {
        self.listeners.add(listener)
    }

    /// Remove a previously added listener.
    pub fn remove_listener(
        &mut self,
        listener: &Arc<dyn CommandListener<E, R>>,
    ) -> Result<(), UnknownListenerError> {
        self.listeners.remove(listener)
    }

    /// The registered commands.
    pub fn registry(&self) -> &CommandRegistry<E, R> {
        &self.registry
    }

    /// The prefix applicable to the given emitter.
    pub fn applicable_prefix(&self, emitter: &E) -> String {
        (self.prefix)(emitter)
    }

    /// Dispatch a message from an emitter.
    ///
    /// Calling this does not guarantee that any command executes: the result
    /// only carries a payload when a handler was found, matched, and ran to
    /// completion. Every other outcome surfaces through the listener hooks
    /// and yields [`CommandResult::NoResult`].
    ///
    /// # Panics
    ///
    /// Panics when a matched handler declares a parameter that cannot be
    /// satisfied — a programming error in the command definition, not bad
    /// user input.
    pub fn handle(&self, emitter: &E, message: &str) -> CommandResult<R> {
        let prefix = self.applicable_prefix(emitter).to_lowercase();
        let lowered = message.to_lowercase();
        let first = lowered.split_whitespace().next().unwrap_or("");
        let label = first.strip_prefix(&prefix).unwrap_or(first);

        let Some(command) = self.registry.lookup(label) else {
            debug!("No command registered for label `{label}`");
            self.listeners.notify_command_not_found(self, emitter, message);
            return CommandResult::NoResult;
        };

        let mut context = ExecutionContext::new(emitter);
        self.listeners.notify_context_created(&mut context);

        let mut event = CommandEvent::new(&context, self, command, emitter, message);
        self.listeners.notify_command_execution(&mut event);

        if event.is_cancelled() {
            debug!("Execution of `{}` was cancelled by a listener", command.label());
            return CommandResult::NoResult;
        }

        // Remainder of the raw message, so captures keep their original case.
        let input: Vec<&str> = message.split_whitespace().skip(1).collect();
        let options = command.options(&context);
        let candidates: Vec<VariantCandidate<'_>> = command
            .variants()
            .iter()
            .map(|variant| VariantCandidate {
                pattern: variant.pattern(),
                priority: variant.priority(),
            })
            .collect();

        let Some(matched) = self.matcher.resolve(&candidates, &input, &options) else {
            debug!("Input for `{}` matched no syntax variant", command.label());
            self.listeners.notify_syntax_error(&context);
            return CommandResult::NoResult;
        };

        let variant = command
            .variants()
            .get(matched.index)
            .expect("match service returned a variant index out of range");

        trace!(
            "Dispatching `{}` via pattern `{}`",
            command.label(),
            variant.pattern()
        );

        let arguments = bind(variant.params(), &matched.captures, &context);

        match variant.invoke(&arguments) {
            Ok(value) => CommandResult::Executed(value),
            Err(error) => {
                debug!("Handler for `{}` failed: {error}", command.label());
                self.listeners.notify_command_exception(&event, &error);
                CommandResult::NoResult
            }
        }
    }
}

impl<E, R> fmt::Debug for Dispatcher<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
