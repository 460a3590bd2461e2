//! Text-command routing and invocation for herald.
//!
//! This crate turns a free-text message from some emitter into a command
//! invocation: it extracts the label, looks the command up, matches the
//! remaining text against the command's syntax variants, binds captured
//! values and contextual capabilities to the handler's declared parameters,
//! invokes the handler, and reports the outcome through a listener chain
//! with cancellation support.
//!
//! # Defining commands
//!
//! Commands are built declaratively; each syntax variant pairs a pattern
//! with a handler and the parameters it declares:
//!
//! ```rust,ignore
//! use herald_commands::{CommandDescriptor, ParamSpec, SyntaxVariant};
//!
//! let hello = CommandDescriptor::builder("hello")
//!     .description("Greets people")
//!     .variant(
//!         SyntaxVariant::new("world", |_| Ok(Some("Hello World!".to_string())))?
//!             .with_priority(0),
//!     )
//!     .variant(
//!         SyntaxVariant::new("[name]", |args| {
//!             Ok(Some(format!("Hello, {}!", args.required("name"))))
//!         })?
//!         .with_priority(1)
//!         .with_param(ParamSpec::required("name")),
//!     )
//!     .build()?;
//! ```
//!
//! # Dispatching
//!
//! ```rust,ignore
//! use herald_commands::Dispatcher;
//!
//! let mut dispatcher = Dispatcher::new(|_emitter| "!".to_string());
//! dispatcher.register(hello)?;
//!
//! let result = dispatcher.handle(&emitter, "!hello world");
//! assert_eq!(result.value(), Some(&"Hello World!".to_string()));
//! ```
//!
//! # Listeners and capabilities
//!
//! Listeners observe every stage of the pipeline and can cancel a pending
//! execution. The context-created hook is where capabilities are registered
//! for injection into handler parameters declared with
//! [`ParamSpec::capability`].
//!
//! # Concurrency
//!
//! The pipeline is synchronous and blocking. [`Dispatcher::handle`] takes
//! `&self`, so concurrent dispatches are safe; registration of commands and
//! listeners takes `&mut self` and therefore belongs to a single-threaded
//! setup phase (or behind an external lock). No timeouts are applied: a
//! hung handler blocks its calling thread.

mod arguments;
mod command;
mod context;
mod dispatcher;
mod event;
mod listener;
mod registry;
mod result;

pub use arguments::Arguments;
pub use command::{
    CommandBuilder, CommandDescriptor, CommandError, DefinitionError, HandlerFn, OptionsFn,
    ParamSpec, SyntaxVariant,
};
pub use context::ExecutionContext;
pub use dispatcher::{Dispatcher, MatchService, SyntaxMatchService, VariantCandidate, VariantMatch};
pub use event::CommandEvent;
pub use listener::{
    CommandListener, DuplicateListenerError, ListenerRegistry, LogListener, UnknownListenerError,
};
pub use registry::{CommandRegistry, DuplicateLabelError};
pub use result::CommandResult;

// The pattern side of dispatch, re-exported for convenience.
pub use herald_syntax::{Captures, OptionSet, Pattern, PatternError};

/// Re-export common types for convenience.
pub mod prelude {
    pub use crate::{
        CommandDescriptor, CommandError, CommandListener, CommandResult, Dispatcher,
        ExecutionContext, ParamSpec, SyntaxVariant,
    };
}
