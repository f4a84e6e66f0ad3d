/**
 * Fallback Policy Tables
 *
 * Every flow that can fall back from one strategy to another (anonymous to
 * elevated, create to lookup) describes its chain as data: an ordered list
 * of strategies, each with the error classes that allow moving on to the
 * next one. Errors outside that set stop the chain and are reported
 * together with the strategy that produced them.
 *
 * ```text
 * Policy::new(Privilege::Anonymous)
 *     .then(&[ErrorClass::Forbidden], Privilege::Elevated)
 *
 * Anonymous --ok--> (Anonymous, value)
 *     |
 *     +--Forbidden--> Elevated --ok--> (Elevated, value)
 *     |                  |
 *     |                  +--any--> ChainFailure { Elevated, error }
 *     +--other--> ChainFailure { Anonymous, error }
 * ```
 */
use std::fmt::Debug;
use std::future::Future;

use thiserror::Error;

use super::elevation::ElevationError;
use crate::backend::store::StoreError;

/// Coarse classification used to decide escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    NotFound,
    Forbidden,
    Duplicate,
    Invalid,
    Upstream,
    Transport,
    /// The elevated session could not be obtained
    Elevation,
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Forbidden { .. } => ErrorClass::Forbidden,
            Self::Duplicate { .. } => ErrorClass::Duplicate,
            Self::Invalid { .. } => ErrorClass::Invalid,
            Self::Upstream { .. } => ErrorClass::Upstream,
            Self::Transport { .. } => ErrorClass::Transport,
        }
    }
}

/// Error produced by a single strategy attempt
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StepError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Elevation(#[from] ElevationError),
}

impl StepError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Store(e) => e.class(),
            Self::Elevation(_) => ErrorClass::Elevation,
        }
    }
}

/// Whose credentials a step runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Anonymous,
    Elevated,
}

/// One link of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<S> {
    pub strategy: S,
    /// Classes that move the chain on to the next step
    pub escalate_on: &'static [ErrorClass],
}

/// The chain stopped on `strategy` with `error`
#[derive(Debug, Clone, PartialEq)]
pub struct ChainFailure<S> {
    pub strategy: S,
    pub error: StepError,
    /// Errors of the steps that escalated before this one, in order
    pub earlier: Vec<(S, StepError)>,
}

/// Ordered strategy chain
///
/// Never empty: built from a first strategy, extended with [`Policy::then`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy<S> {
    steps: Vec<Step<S>>,
    last: S,
}

impl<S: Copy + Debug> Policy<S> {
    pub fn new(first: S) -> Self {
        Self {
            steps: Vec::new(),
            last: first,
        }
    }

    /// Fall through to `next` when the current last step fails with one of `on`
    pub fn then(mut self, on: &'static [ErrorClass], next: S) -> Self {
        self.steps.push(Step {
            strategy: self.last,
            escalate_on: on,
        });
        self.last = next;
        self
    }

    /// All steps in order; the final one never escalates
    pub fn steps(&self) -> Vec<Step<S>> {
        let mut steps = self.steps.clone();
        steps.push(Step {
            strategy: self.last,
            escalate_on: &[],
        });
        steps
    }

    /// Run `attempt` for each strategy until one succeeds or the chain stops
    ///
    /// # Returns
    /// The strategy that succeeded and its value, or the strategy that
    /// stopped the chain and its error
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<(S, T), ChainFailure<S>>
    where
        F: FnMut(S) -> Fut,
        Fut: Future<Output = Result<T, StepError>>,
    {
        let mut earlier = Vec::new();
        for step in &self.steps {
            tracing::debug!(strategy = ?step.strategy, "Attempting strategy");
            match attempt(step.strategy).await {
                Ok(value) => return Ok((step.strategy, value)),
                Err(error) if step.escalate_on.contains(&error.class()) => {
                    tracing::warn!(
                        strategy = ?step.strategy,
                        class = ?error.class(),
                        "Strategy failed, falling back"
                    );
                    earlier.push((step.strategy, error));
                }
                Err(error) => {
                    return Err(ChainFailure {
                        strategy: step.strategy,
                        error,
                        earlier,
                    })
                }
            }
        }

        tracing::debug!(strategy = ?self.last, "Attempting strategy");
        attempt(self.last)
            .await
            .map(|value| (self.last, value))
            .map_err(|error| ChainFailure {
                strategy: self.last,
                error,
                earlier,
            })
    }
}
