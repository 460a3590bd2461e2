//! Bound handler parameters.
//!
//! Binding happens once per invocation, after a syntax variant has been
//! resolved and before its handler runs: every declared parameter is
//! satisfied from the match's captures, from the execution context's
//! capability registry, or by the context itself. A parameter that cannot be
//! satisfied is a mis-declared handler and fails fatally here, before any
//! handler code runs.

use std::any::{self, Any, TypeId};

use herald_syntax::Captures;

use crate::command::ParamSpec;
use crate::context::ExecutionContext;

/// One bound parameter value.
enum Bound<'h, E> {
    /// A required capture's raw text.
    Value(&'h str),
    /// An optional capture, absent when the input omitted it.
    MaybeValue(Option<&'h str>),
    /// A capability instance borrowed from the context.
    Capability(&'h (dyn Any + Send + Sync)),
    /// The execution context itself.
    Context(&'h ExecutionContext<'h, E>),
}

/// The bound parameters a handler is invoked with.
///
/// Accessors look parameters up by their declaration; asking for anything
/// the variant did not declare is a programming error and panics.
pub struct Arguments<'h, E> {
    entries: Vec<(&'h ParamSpec, Bound<'h, E>)>,
}

impl<'h, E> Arguments<'h, E> {
    /// The raw text of the required capture declared under `name`.
    pub fn required(&self, name: &str) -> &'h str {
        for (spec, bound) in &self.entries {
            if let ParamSpec::Required(declared) = spec
                && declared == name
                && let Bound::Value(value) = bound
            {
                return *value;
            }
        }
        panic!("handler accessed `{name}`, which is not declared as a required parameter");
    }

    /// The raw text of the optional capture declared under `name`, if the
    /// input supplied it.
    pub fn optional(&self, name: &str) -> Option<&'h str> {
        for (spec, bound) in &self.entries {
            if let ParamSpec::Optional(declared) = spec
                && declared == name
                && let Bound::MaybeValue(value) = bound
            {
                return *value;
            }
        }
        panic!("handler accessed `{name}`, which is not declared as an optional parameter");
    }

    /// The capability instance declared with type `C`.
    pub fn capability<C: Any + Send + Sync>(&self) -> &'h C {
        for (spec, bound) in &self.entries {
            if let ParamSpec::Capability { key, .. } = spec
                && *key == TypeId::of::<C>()
                && let Bound::Capability(instance) = bound
            {
                return instance
                    .downcast_ref()
                    .expect("capability instance matches its type key");
            }
        }
        panic!(
            "handler accessed capability `{}`, which is not declared as a parameter",
            any::type_name::<C>()
        );
    }

    /// The execution context, when declared as a parameter.
    pub fn context(&self) -> &'h ExecutionContext<'h, E> {
        for (_, bound) in &self.entries {
            if let Bound::Context(context) = bound {
                return *context;
            }
        }
        panic!("handler accessed the execution context without declaring a context parameter");
    }

    /// The number of bound parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the variant declared no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bind the declared parameters of a matched variant.
///
/// # Panics
///
/// Panics when a declared capability has no registered instance (a
/// mis-declared handler), or when a required capture is missing from the
/// match (a match service violating its contract). Both are configuration
/// errors, raised here rather than reported through listeners.
pub(crate) fn bind<'h, E>(
    params: &'h [ParamSpec],
    captures: &'h Captures,
    context: &'h ExecutionContext<'h, E>,
) -> Arguments<'h, E> {
    let entries = params
        .iter()
        .map(|spec| {
            let bound = match spec {
                ParamSpec::Required(name) => match captures.get(name) {
                    Some(value) => Bound::Value(value),
                    None => panic!(
                        "required parameter `{name}` has no capture; \
                         the match service violated its contract"
                    ),
                },
                ParamSpec::Optional(name) => Bound::MaybeValue(captures.get(name)),
                ParamSpec::Capability { key, type_name } => {
                    match context.capability_by_id(*key) {
                        Some(instance) => Bound::Capability(instance),
                        None => panic!(
                            "no capability of type `{type_name}` is registered; \
                             the handler declares an unsatisfiable parameter"
                        ),
                    }
                }
                ParamSpec::Context => Bound::Context(context),
            };
            (spec, bound)
        })
        .collect();

    Arguments { entries }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Clock(u64);

    #[test]
    fn test_bind_required_and_optional() {
        let mut captures = Captures::new();
        captures.insert("name", "John");
        let emitter = ();
        let context = ExecutionContext::new(&emitter);
        let params = [ParamSpec::required("name"), ParamSpec::optional("title")];

        let arguments = bind(&params, &captures, &context);

        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments.required("name"), "John");
        assert_eq!(arguments.optional("title"), None);
    }

    #[test]
    fn test_bind_optional_present() {
        let mut captures = Captures::new();
        captures.insert("title", "Dr");
        let emitter = ();
        let context = ExecutionContext::new(&emitter);
        let params = [ParamSpec::optional("title")];

        let arguments = bind(&params, &captures, &context);

        assert_eq!(arguments.optional("title"), Some("Dr"));
    }

    #[test]
    fn test_bind_capability_and_context() {
        let captures = Captures::new();
        let emitter = "user".to_string();
        let mut context = ExecutionContext::new(&emitter);
        context.register_capability(Clock(7));
        let params = [ParamSpec::capability::<Clock>(), ParamSpec::context()];

        let arguments = bind(&params, &captures, &context);

        assert_eq!(arguments.capability::<Clock>(), &Clock(7));
        assert_eq!(arguments.context().emitter(), "user");
    }

    #[test]
    #[should_panic(expected = "unsatisfiable parameter")]
    fn test_missing_capability_is_fatal() {
        let captures = Captures::new();
        let emitter = ();
        let context = ExecutionContext::new(&emitter);
        let params = [ParamSpec::capability::<Clock>()];

        bind(&params, &captures, &context);
    }

    #[test]
    #[should_panic(expected = "violated its contract")]
    fn test_missing_required_capture_is_fatal() {
        let captures = Captures::new();
        let emitter = ();
        let context = ExecutionContext::new(&emitter);
        let params = [ParamSpec::required("name")];

        bind(&params, &captures, &context);
    }

    #[test]
    #[should_panic(expected = "not declared as a required parameter")]
    fn test_undeclared_access_is_fatal() {
        let captures = Captures::new();
        let emitter = ();
        let context = ExecutionContext::new(&emitter);

        let arguments = bind(&[], &captures, &context);
        arguments.required("name");
    }
}
