use std::{fmt, rc::Rc, str::FromStr};

use log::debug;
use thiserror::Error;

use crate::{eval::{Bindings, Datum, EvalError, Evaluator}, tree::Tree};

/// One input/output pair the synthesized program has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub input: Bindings,
    pub output: Datum,
}

impl Example {
    pub fn new<K, V>(input: impl IntoIterator<Item = (K, V)>, output: impl Into<Datum>) -> Self
    where
        K: Into<String>,
        V: Into<Datum>,
    {
        Self {
            input: input.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            output: output.into(),
        }
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut input: Vec<_> = self.input.iter().collect();
        input.sort_by(|a, b| a.0.cmp(b.0));

        write!(f, "{{")?;
        for (idx, (name, val)) in input.into_iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {val}")?;
        }
        write!(f, "}} -> {}", self.output)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExampleParseError {
    #[error("expected `<bindings> -> <output>`")]
    MissingArrow,
    #[error("expected `<name>=<value>`, got `{0}`")]
    BadBinding(String),
    #[error("empty value")]
    EmptyValue,
}

fn parse_datum(s: &str) -> Result<Datum, ExampleParseError> {
    let s = s.trim();

    if s.is_empty() {
        return Err(ExampleParseError::EmptyValue);
    }

    Ok(match s.parse::<i64>() {
        Ok(x) => Datum::Int(x),
        Err(_) => Datum::Str(s.trim_matches('"').to_string()),
    })
}

/// Parses `x=0, y=1 -> -1`. Values that are not integers are read as strings.
impl FromStr for Example {
    type Err = ExampleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (input, output) = s.split_once("->").ok_or(ExampleParseError::MissingArrow)?;

        let input = input.split(',')
            .map(str::trim)
            .filter(|binding| !binding.is_empty())
            .map(|binding| {
                let (name, val) = binding.split_once('=')
                    .ok_or_else(|| ExampleParseError::BadBinding(binding.to_string()))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(ExampleParseError::BadBinding(binding.to_string()));
                }

                Ok((name.to_string(), parse_datum(val)?))
            })
            .collect::<Result<Bindings, _>>()?;

        Ok(Self {
            input,
            output: parse_datum(output)?,
        })
    }
}

/// Accepts a candidate iff it reproduces every example.
pub struct ExampleOracle {
    evaluator: Rc<Evaluator>,
    examples: Vec<Example>,
}

impl ExampleOracle {
    pub fn new(evaluator: Rc<Evaluator>, examples: Vec<Example>) -> Self {
        Self {
            evaluator,
            examples,
        }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Evaluation errors are not swallowed: an unbound variable here means
    /// the candidate cannot be judged against the examples at all.
    pub fn check(&self, candidate: &Tree) -> Result<bool, EvalError> {
        for example in &self.examples {
            let got = self.evaluator.eval(candidate, &example.input)?;

            if got != example.output {
                debug!("{candidate} fails {example}: got {got}");
                return Ok(false);
            }
        }

        Ok(true)
    }
}
