//! Token-grammar patterns for the herald command engine.
//!
//! This crate provides the pattern side of command dispatch: a small
//! whitespace-separated token grammar, parsing into [`Pattern`]s, and
//! matching tokenized input against an ordered set of candidate patterns.
//!
//! # Grammar
//!
//! | Token      | Meaning                                                       |
//! |------------|---------------------------------------------------------------|
//! | `word`     | literal, compared case-insensitively                          |
//! | `[name]`   | required capture, exactly one token                           |
//! | `[name?]`  | optional capture, zero or one token (greedy)                  |
//! | `{name}`   | selector, one token restricted to the values supplied for it  |
//! | `name...`  | trailing catch-all, all remaining tokens joined by spaces     |
//!
//! Captured values always preserve the raw input text.
//!
//! # Resolution
//!
//! [`resolve`] tries every candidate pattern against the input and picks the
//! match with the numerically smallest priority; equal priorities resolve to
//! the earliest candidate in the given order.
//!
//! ```rust,ignore
//! use herald_syntax::{OptionSet, Pattern, resolve};
//!
//! let eager: Pattern = "world".parse()?;
//! let permissive: Pattern = "[name]".parse()?;
//!
//! let matched = resolve(
//!     [(&eager, 0), (&permissive, 1)],
//!     &["world"],
//!     &OptionSet::new(),
//! );
//! assert_eq!(matched.unwrap().index, 0);
//! ```

mod captures;
mod matcher;
mod pattern;

pub use captures::Captures;
pub use matcher::{Match, OptionSet, match_pattern, resolve};
pub use pattern::{Pattern, PatternError, Token};
