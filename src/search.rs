use std::time::{Duration, Instant};

use log::{debug, info};

use crate::{eval::EvalError, oracle::ExampleOracle, synth::Synthesizer, tree::Tree};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub timeout: Duration,
    pub stop_at_first: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            stop_at_first: true,
        }
    }
}

#[derive(Clone, Debug)]
pub enum SearchStep {
    IncorrectSample {
        cand: Tree,
        /// Set when the candidate could not be evaluated on some example.
        error: Option<EvalError>,
    },
    CorrectSample {
        cand: Tree,
    },
}

/// The guess-and-check loop: pulls candidates out of a synthesizer and
/// runs them by the oracle.
pub struct Search<S> {
    synth: S,
    oracle: ExampleOracle,
    config: SearchConfig,
    steps: usize,
}

impl<S: Synthesizer> Search<S> {
    pub fn new(synth: S, oracle: ExampleOracle, config: SearchConfig) -> Self {
        Self {
            synth,
            oracle,
            config,
            steps: 0,
        }
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Tries one candidate. Returns `None` once the synthesizer has nothing
    /// left to propose, and an error only if it is fatal.
    pub fn step(&mut self) -> Option<Result<SearchStep, EvalError>> {
        let cand = match self.synth.next_candidate()? {
            Ok(cand) => cand,
            Err(e) => return Some(Err(e)),
        };

        debug!("Try: {cand}");
        self.steps += 1;

        let step = match self.oracle.check(&cand) {
            Ok(true) => SearchStep::CorrectSample { cand },
            Ok(false) => SearchStep::IncorrectSample { cand, error: None },
            Err(e) if e.is_fatal() => return Some(Err(e)),
            Err(e) => {
                debug!("Could not evaluate {cand}: {e}");
                SearchStep::IncorrectSample { cand, error: Some(e) }
            },
        };

        match &step {
            SearchStep::CorrectSample { cand } => self.synth.feedback(cand, true),
            SearchStep::IncorrectSample { cand, .. } => self.synth.feedback(cand, false),
        }

        Some(Ok(step))
    }

    /// Steps until the timeout runs out or the candidates do, collecting
    /// the correct ones.
    pub fn run(&mut self) -> Result<Vec<Tree>, EvalError> {
        let start = Instant::now();
        let mut found = Vec::new();

        self.synth.set_deadline(start + self.config.timeout);

        while start.elapsed() < self.config.timeout {
            let Some(step) = self.step() else {
                if start.elapsed() < self.config.timeout {
                    info!("Ran out of candidates after {} steps", self.steps);
                } else {
                    info!("Timed out after {} steps", self.steps);
                }
                break;
            };

            if let SearchStep::CorrectSample { cand } = step? {
                info!("Correct guess: {cand}");
                found.push(cand);

                if self.config.stop_at_first {
                    break;
                }
            }
        }

        info!("Tried {} candidates in {:?}", self.steps, start.elapsed());

        Ok(found)
    }
}
