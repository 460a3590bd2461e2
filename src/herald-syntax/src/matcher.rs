//! Matching tokenized input against patterns.

use std::collections::HashMap;

use crate::captures::Captures;
use crate::pattern::{Pattern, Token};

/// Possible values for selector tokens, keyed by selector name.
///
/// A selector whose name has no entry here can never match.
pub type OptionSet = HashMap<String, Vec<String>>;

/// A successful resolution across a set of candidate patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Index of the winning candidate, in the order they were given.
    pub index: usize,
    /// The values captured by the winning pattern.
    pub captures: Captures,
}

/// Match a single pattern against tokenized input.
///
/// Returns the captured values on success. Literals and selector values are
/// compared case-insensitively; captured values preserve the raw input.
pub fn match_pattern(pattern: &Pattern, input: &[&str], options: &OptionSet) -> Option<Captures> {
    let mut captures = Captures::new();

    if match_tokens(pattern.tokens(), input, options, &mut captures) {
        Some(captures)
    } else {
        None
    }
}

/// Resolve tokenized input against an ordered set of `(pattern, priority)`
/// candidates.
///
/// Among all candidates whose pattern is satisfiable by the input, the one
/// with the numerically smallest priority wins; candidates with equal
/// priority resolve to the earliest in the given order. Priority never
/// excludes a candidate from being tried.
pub fn resolve<'p, I>(candidates: I, input: &[&str], options: &OptionSet) -> Option<Match>
where
    I: IntoIterator<Item = (&'p Pattern, i32)>,
{
    let mut best: Option<(i32, Match)> = None;

    for (index, (pattern, priority)) in candidates.into_iter().enumerate() {
        let Some(captures) = match_pattern(pattern, input, options) else {
            continue;
        };

        if best.as_ref().is_none_or(|(winner, _)| priority < *winner) {
            best = Some((priority, Match { index, captures }));
        }
    }

    best.map(|(_, matched)| matched)
}

/// Recursive matcher over the remaining tokens and input.
///
/// On failure every capture recorded by the failed branch is removed again,
/// so `captures` only ever holds values from the surviving branch.
fn match_tokens(
    tokens: &[Token],
    input: &[&str],
    options: &OptionSet,
    captures: &mut Captures,
) -> bool {
    let Some((token, tail)) = tokens.split_first() else {
        return input.is_empty();
    };

    match token {
        Token::Literal(literal) => input.split_first().is_some_and(|(word, rest)| {
            word.to_lowercase() == *literal && match_tokens(tail, rest, options, captures)
        }),

        Token::Capture(name) => input.split_first().is_some_and(|(word, rest)| {
            consume(name, word, tail, rest, options, captures)
        }),

        Token::OptionalCapture(name) => {
            // Greedy: consume one token when possible, fall back to skipping.
            let consumed = input.split_first().is_some_and(|(word, rest)| {
                consume(name, word, tail, rest, options, captures)
            });

            consumed || match_tokens(tail, input, options, captures)
        }

        Token::Selector(name) => input.split_first().is_some_and(|(word, rest)| {
            let allowed = options
                .get(name)
                .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(word)));

            allowed && consume(name, word, tail, rest, options, captures)
        }),

        Token::CatchAll(name) => {
            // Trailing by construction; consumes everything that is left.
            if input.is_empty() {
                false
            } else {
                captures.insert(name.clone(), input.join(" "));
                true
            }
        }
    }
}

/// Capture `word` under `name` and continue matching; undo on failure.
fn consume(
    name: &str,
    word: &str,
    tail: &[Token],
    rest: &[&str],
    options: &OptionSet,
    captures: &mut Captures,
) -> bool {
    captures.insert(name.to_string(), word.to_string());

    if match_tokens(tail, rest, options, captures) {
        true
    } else {
        captures.remove(name);
        false
    }
}
