//! Command descriptors, syntax variants and parameter declarations.

use std::any::{self, Any, TypeId};
use std::fmt;

use herald_syntax::{OptionSet, Pattern, PatternError};
use thiserror::Error;

use crate::arguments::Arguments;
use crate::context::ExecutionContext;

/// An error produced by a command handler.
///
/// This is the domain-level failure a handler reports when its execution
/// goes wrong; the dispatcher forwards it verbatim to the exception hook of
/// every listener.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Failure described by a plain message.
    #[error("{0}")]
    Message(String),

    /// Failure caused by an underlying error.
    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl CommandError {
    /// A failure carrying just a message.
    pub fn message(text: impl Into<String>) -> Self {
        CommandError::Message(text.into())
    }

    /// A failure wrapping an underlying error.
    pub fn source(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        CommandError::Source(Box::new(error))
    }
}

/// Errors that can occur when building a command descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// The command label is empty.
    #[error("command label must not be empty")]
    EmptyLabel,

    /// The command label contains whitespace and could never be matched as
    /// the first token of a message.
    #[error("command label `{0}` must be a single token")]
    LabelWithWhitespace(String),
}

/// A declared handler parameter.
///
/// Each syntax variant declares, in order, how its handler's parameters are
/// satisfied: from a named capture, from a capability registered into the
/// execution context, or from the context itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// A named capture that must be present in the match.
    Required(String),

    /// A named capture that may be absent, bound as "no value" when it is.
    Optional(String),

    /// A capability instance registered into the execution context.
    ///
    /// Binding fails fatally when no instance of the type is registered:
    /// that is a mis-declared handler, not bad user input.
    Capability {
        /// The type the instance is registered under.
        key: TypeId,
        /// The type's name, for diagnostics.
        type_name: &'static str,
    },

    /// The execution context itself.
    Context,
}

impl ParamSpec {
    /// Declare a required named capture.
    pub fn required(name: impl Into<String>) -> Self {
        ParamSpec::Required(name.into())
    }

    /// Declare an optional named capture.
    pub fn optional(name: impl Into<String>) -> Self {
        ParamSpec::Optional(name.into())
    }

    /// Declare a capability parameter of type `C`.
    pub fn capability<C: Any + Send + Sync>() -> Self {
        ParamSpec::Capability {
            key: TypeId::of::<C>(),
            type_name: any::type_name::<C>(),
        }
    }

    /// Declare a parameter bound to the execution context itself.
    pub fn context() -> Self {
        ParamSpec::Context
    }
}

/// The handler procedure bound to a syntax variant.
pub type HandlerFn<E, R> =
    Box<dyn Fn(&Arguments<'_, E>) -> Result<Option<R>, CommandError> + Send + Sync>;

/// A supplier of selector values, consulted with the live execution context.
pub type OptionsFn<E> = Box<dyn Fn(&ExecutionContext<'_, E>) -> OptionSet + Send + Sync>;

/// One matchable pattern of a command, with its handler binding.
///
/// The priority (ascending, default `i32::MIN`) only breaks ties between
/// variants that both match the same input; it never excludes a variant from
/// being tried. An unprioritized variant therefore outranks explicitly
/// ordered ones.
pub struct SyntaxVariant<E, R> {
    pattern: Pattern,
    priority: i32,
    params: Vec<ParamSpec>,
    handler: HandlerFn<E, R>,
}

impl<E, R> SyntaxVariant<E, R> {
    /// Create a variant from a pattern string and its handler.
    pub fn new(
        pattern: &str,
        handler: impl Fn(&Arguments<'_, E>) -> Result<Option<R>, CommandError> + Send + Sync + 'static,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: pattern.parse()?,
            priority: i32::MIN,
            params: Vec::new(),
            handler: Box::new(handler),
        })
    }

    /// Set the tie-break priority (smaller wins).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Append a declared parameter.
    pub fn with_param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    /// The pattern this variant matches.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The tie-break priority of this variant.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Invoke the handler with bound parameters.
    pub(crate) fn invoke(&self, arguments: &Arguments<'_, E>) -> Result<Option<R>, CommandError> {
        (self.handler)(arguments)
    }
}

impl<E, R> fmt::Debug for SyntaxVariant<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxVariant")
            .field("pattern", &self.pattern)
            .field("priority", &self.priority)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The immutable description of a registered command.
///
/// A descriptor carries the label the dispatcher matches the first message
/// token against (case-insensitively), an optional human-readable
/// description for help output, the ordered syntax variants, and an optional
/// supplier of selector values that may depend on the execution context.
pub struct CommandDescriptor<E, R> {
    label: String,
    description: Option<String>,
    variants: Vec<SyntaxVariant<E, R>>,
    options: Option<OptionsFn<E>>,
}

impl<E, R> CommandDescriptor<E, R> {
    /// Start building a descriptor for the given label.
    pub fn builder(label: impl Into<String>) -> CommandBuilder<E, R> {
        CommandBuilder::new(label)
    }

    /// The label this command is registered under (always lowercase).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The human-readable description, if one was set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The syntax variants of this command, in declaration order.
    pub fn variants(&self) -> &[SyntaxVariant<E, R>] {
        &self.variants
    }

    /// Resolve the selector values for the given context.
    pub fn options(&self, context: &ExecutionContext<'_, E>) -> OptionSet {
        self.options
            .as_ref()
            .map(|supplier| supplier(context))
            .unwrap_or_default()
    }
}

impl<E, R> fmt::Debug for CommandDescriptor<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("label", &self.label)
            .field("description", &self.description)
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CommandDescriptor`].
///
/// Variants are declared explicitly, in order; the declaration order doubles
/// as the tie-break between variants with equal priority.
pub struct CommandBuilder<E, R> {
    label: String,
    description: Option<String>,
    variants: Vec<SyntaxVariant<E, R>>,
    options: Option<OptionsFn<E>>,
}

impl<E, R> CommandBuilder<E, R> {
    /// Start a builder for the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            variants: Vec::new(),
            options: None,
        }
    }

    /// Set the human-readable description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Set the supplier of selector values.
    pub fn options(
        mut self,
        supplier: impl Fn(&ExecutionContext<'_, E>) -> OptionSet + Send + Sync + 'static,
    ) -> Self {
        self.options = Some(Box::new(supplier));
        self
    }

    /// Append a syntax variant.
    pub fn variant(mut self, variant: SyntaxVariant<E, R>) -> Self {
        self.variants.push(variant);
        self
    }

    /// Build the descriptor, normalizing the label to lowercase.
    pub fn build(self) -> Result<CommandDescriptor<E, R>, DefinitionError> {
        if self.label.is_empty() {
            return Err(DefinitionError::EmptyLabel);
        }
        if self.label.chars().any(char::is_whitespace) {
            return Err(DefinitionError::LabelWithWhitespace(self.label));
        }

        Ok(CommandDescriptor {
            label: self.label.to_lowercase(),
            description: self.description,
            variants: self.variants,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn noop_variant(pattern: &str) -> SyntaxVariant<(), String> {
        SyntaxVariant::new(pattern, |_| Ok(None)).unwrap()
    }

    #[test]
    fn test_build_descriptor() {
        let descriptor: CommandDescriptor<(), String> = CommandDescriptor::builder("Hello")
            .description("Greets people")
            .variant(noop_variant("world").with_priority(0))
            .variant(noop_variant("[name]").with_priority(1))
            .build()
            .unwrap();

        assert_eq!(descriptor.label(), "hello");
        assert_eq!(descriptor.description(), Some("Greets people"));
        assert_eq!(descriptor.variants().len(), 2);
        assert_eq!(descriptor.variants()[0].priority(), 0);
    }

    #[test]
    fn test_empty_label_rejected() {
        let result = CommandDescriptor::<(), String>::builder("").build();

        assert!(matches!(result, Err(DefinitionError::EmptyLabel)));
    }

    #[test]
    fn test_multi_token_label_rejected() {
        let result = CommandDescriptor::<(), String>::builder("two words").build();

        assert!(matches!(
            result,
            Err(DefinitionError::LabelWithWhitespace(_))
        ));
    }

    #[test]
    fn test_default_priority_outranks_explicit_orders() {
        let variant = noop_variant("world");

        assert_eq!(variant.priority(), i32::MIN);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = SyntaxVariant::<(), String>::new("text... more", |_| Ok(None));

        assert!(result.is_err());
    }

    #[test]
    fn test_options_default_to_empty() {
        let descriptor: CommandDescriptor<(), String> =
            CommandDescriptor::builder("hello").build().unwrap();
        let emitter = ();
        let context = ExecutionContext::new(&emitter);

        assert!(descriptor.options(&context).is_empty());
    }

    #[test]
    fn test_options_see_the_context() {
        let descriptor: CommandDescriptor<String, String> = CommandDescriptor::builder("join")
            .options(|context: &ExecutionContext<String>| {
                let mut options = OptionSet::new();
                options.insert("room".to_string(), vec![context.emitter().clone()]);
                options
            })
            .build()
            .unwrap();

        let emitter = "lobby".to_string();
        let context = ExecutionContext::new(&emitter);
        let options = descriptor.options(&context);

        assert_eq!(options.get("room"), Some(&vec!["lobby".to_string()]));
    }

    #[test]
    fn test_capability_spec_carries_type_name() {
        let spec = ParamSpec::capability::<u32>();

        match spec {
            ParamSpec::Capability { type_name, .. } => assert_eq!(type_name, "u32"),
            other => panic!("unexpected spec: {other:?}"),
        }
    }
}
