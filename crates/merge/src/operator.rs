//! Operator registry
//!
//! Patches tag mutations with sigil-prefixed markers like `{"$push": 3}`.
//! This module is the closed table those markers resolve against: every
//! operator is a variant of [`Operator`], applied to an array target with an
//! explicit argument list. Unknown names and wrong-shaped targets are
//! rejected by the merge engine rather than silently skipped.
//!
//! ## Argument spreading
//!
//! A marker whose payload is an array spreads it as positional arguments
//! (`{"$push": [1, 2]}` pushes two elements); any other payload is a single
//! argument (`{"$push": 3}` pushes one).
//!
//! ## Return values
//!
//! Each operator yields its nominal return value — a new length, a removed
//! element, a derived array. The merge engine decides from the shape of that
//! value whether it replaces the slot or the mutated container stands (see
//! the merge result policy in [`crate::engine`]).

use docop_core::{Error, Result};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

/// First character of an operation marker key
pub const SIGIL: char = '$';

/// A named mutation applicable to an array value in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Append arguments; yields the new length
    Push,
    /// Remove the last element; yields it (null if empty)
    Pop,
    /// Remove the first element; yields it (null if empty)
    Shift,
    /// Prepend arguments in order; yields the new length
    Unshift,
    /// Yield a new array of the target followed by the arguments,
    /// array arguments flattened one level
    Concat,
    /// Yield a sub-array copy; negative indices count from the end
    Slice,
    /// Reverse in place; yields the reversed array
    Reverse,
    /// Overwrite a range with one value; yields the filled array
    Fill,
}

static BY_NAME: Lazy<HashMap<&'static str, Operator>> =
    Lazy::new(|| Operator::ALL.iter().map(|op| (op.name(), *op)).collect());

impl Operator {
    /// Every operator in the registry
    pub const ALL: [Operator; 8] = [
        Operator::Push,
        Operator::Pop,
        Operator::Shift,
        Operator::Unshift,
        Operator::Concat,
        Operator::Slice,
        Operator::Reverse,
        Operator::Fill,
    ];

    /// Operator name, without the sigil
    pub fn name(self) -> &'static str {
        match self {
            Operator::Push => "push",
            Operator::Pop => "pop",
            Operator::Shift => "shift",
            Operator::Unshift => "unshift",
            Operator::Concat => "concat",
            Operator::Slice => "slice",
            Operator::Reverse => "reverse",
            Operator::Fill => "fill",
        }
    }

    /// Resolve an operator by name (without the sigil)
    pub fn parse(name: &str) -> Option<Operator> {
        BY_NAME.get(name).copied()
    }

    /// Apply this operator to an array target
    ///
    /// Mutating operators change `items` in place; derived-array operators
    /// leave it untouched. The returned value is the operator's nominal
    /// return, which the merge engine runs through the merge result policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperatorArguments`] when the argument list has the
    /// wrong arity or a non-integer index.
    pub fn apply(self, items: &mut Vec<Value>, args: &[Value]) -> Result<Value> {
        match self {
            Operator::Push => {
                items.extend(args.iter().cloned());
                Ok(Value::from(items.len() as u64))
            }
            Operator::Pop => {
                self.expect_no_args(args)?;
                Ok(items.pop().unwrap_or(Value::Null))
            }
            Operator::Shift => {
                self.expect_no_args(args)?;
                if items.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(items.remove(0))
                }
            }
            Operator::Unshift => {
                for (i, arg) in args.iter().enumerate() {
                    items.insert(i, arg.clone());
                }
                Ok(Value::from(items.len() as u64))
            }
            Operator::Concat => {
                let mut out = items.clone();
                for arg in args {
                    match arg {
                        Value::Array(inner) => out.extend(inner.iter().cloned()),
                        other => out.push(other.clone()),
                    }
                }
                Ok(Value::Array(out))
            }
            Operator::Slice => {
                self.expect_at_most(args, 2)?;
                let len = items.len();
                let start = self.index_arg(args, 0)?.map_or(0, |i| resolve_index(i, len));
                let end = self
                    .index_arg(args, 1)?
                    .map_or(len, |i| resolve_index(i, len));
                if start >= end {
                    Ok(Value::Array(Vec::new()))
                } else {
                    Ok(Value::Array(items[start..end].to_vec()))
                }
            }
            Operator::Reverse => {
                self.expect_no_args(args)?;
                items.reverse();
                Ok(Value::Array(items.clone()))
            }
            Operator::Fill => {
                self.expect_at_most(args, 3)?;
                let value = args.first().ok_or_else(|| Error::OperatorArguments {
                    operator: self.name(),
                    detail: "a fill value is required".to_string(),
                })?;
                let len = items.len();
                let start = self.index_arg(args, 1)?.map_or(0, |i| resolve_index(i, len));
                let end = self
                    .index_arg(args, 2)?
                    .map_or(len, |i| resolve_index(i, len));
                for slot in items.iter_mut().take(end).skip(start) {
                    *slot = value.clone();
                }
                Ok(Value::Array(items.clone()))
            }
        }
    }

    fn expect_no_args(self, args: &[Value]) -> Result<()> {
        if args.is_empty() {
            Ok(())
        } else {
            Err(Error::OperatorArguments {
                operator: self.name(),
                detail: format!("takes no arguments, got {}", args.len()),
            })
        }
    }

    fn expect_at_most(self, args: &[Value], max: usize) -> Result<()> {
        if args.len() <= max {
            Ok(())
        } else {
            Err(Error::OperatorArguments {
                operator: self.name(),
                detail: format!("takes at most {} arguments, got {}", max, args.len()),
            })
        }
    }

    fn index_arg(self, args: &[Value], position: usize) -> Result<Option<i64>> {
        match args.get(position) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| Error::OperatorArguments {
                operator: self.name(),
                detail: format!("argument {} must be an integer index", position),
            }),
        }
    }
}

/// Clamp a possibly-negative index into `0..=len`, counting from the end
/// when negative
fn resolve_index(index: i64, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs() as usize)
    } else {
        (index as usize).min(len)
    }
}
