use std::{collections::HashMap, fmt};

use log::trace;
use thiserror::Error;

use crate::tree::{Node, Tree, Value};

/// The result of evaluating a complete tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Datum {
    Int(i64),
    Str(String),
}

impl Datum {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Datum::Int(x) => Some(*x),
            Datum::Str(_) => None,
        }
    }
}

impl From<i64> for Datum {
    fn from(x: i64) -> Self {
        Datum::Int(x)
    }
}

impl From<i32> for Datum {
    fn from(x: i32) -> Self {
        Datum::Int(x.into())
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::Str(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::Str(s)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Int(x) => write!(f, "{x}"),
            Datum::Str(s) => write!(f, "{s:?}"),
        }
    }
}

pub type Bindings = HashMap<String, Datum>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("variable `{0}` is not bound")]
    UnboundVariable(String),

    #[error("no operator named `{0}`")]
    UnknownOperator(String),

    #[error("operator `{op}` failed: {reason}")]
    Operator { op: String, reason: String },

    #[error("cannot evaluate the unexpanded symbol `{0}`")]
    Incomplete(String),
}

impl EvalError {
    pub fn operator(op: &str, reason: impl Into<String>) -> Self {
        EvalError::Operator {
            op: op.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, EvalError::UnboundVariable(_))
    }

    /// Errors that point at a broken grammar/evaluator setup rather than
    /// at the candidate being evaluated.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EvalError::UnknownOperator(_) | EvalError::Incomplete(_))
    }
}

pub type Operator = Box<dyn Fn(&Node, &[Datum]) -> Result<Datum, EvalError>>;

/// Interprets complete trees. Holds nothing but the operator table, so
/// repeated evaluations of the same tree redo all the work.
#[derive(Default)]
pub struct Evaluator {
    ops: HashMap<String, Operator>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_op<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&Node, &[Datum]) -> Result<Datum, EvalError> + 'static,
    {
        self.register(name, op);
        self
    }

    pub fn register<F>(&mut self, name: impl Into<String>, op: F)
    where
        F: Fn(&Node, &[Datum]) -> Result<Datum, EvalError> + 'static,
    {
        self.ops.insert(name.into(), Box::new(op));
    }

    pub fn eval(&self, tree: &Tree, binds: &Bindings) -> Result<Datum, EvalError> {
        match tree {
            Tree::Value(Value::Var(name)) => binds.get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Tree::Value(Value::Int(x)) => Ok(Datum::Int(*x)),
            Tree::Value(Value::Str(s)) => Ok(Datum::Str(s.clone())),
            Tree::Hole(sym) => Err(EvalError::Incomplete(sym.name().to_string())),
            Tree::Node(node) => {
                let op = self.ops.get(node.name())
                    .ok_or_else(|| EvalError::UnknownOperator(node.name().to_string()))?;
                let args = node.children().iter()
                    .map(|child| self.eval(child, binds))
                    .collect::<Result<Vec<_>, _>>()?;
                let res = op(&**node, args.as_slice())?;

                trace!("{node} = {res}");

                Ok(res)
            },
        }
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.ops.keys().collect();
        names.sort();

        f.debug_struct("Evaluator")
            .field("ops", &names)
            .finish()
    }
}
