use crate::models::Candidate;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const PROMPT: &str = "Accept this choice? [y/n]: ";
const RULE: &str = "********************************************************";

/// Errors that can occur while deciding
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("No candidates to choose from")]
    NoCandidates,

    #[error("Expected {expected} probabilities, got {actual}")]
    ProbabilityMismatch { expected: usize, actual: usize },

    #[error("Invalid probability distribution: {0}")]
    InvalidDistribution(#[from] WeightedError),

    #[error("Cannot {action} while in state {state:?}")]
    InvalidTransition {
        state: DecisionState,
        action: &'static str,
    },

    #[error("Input closed before a choice was accepted")]
    InputClosed,

    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// The user's answer to a presented candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Accept,
    Reject,
}

impl Response {
    /// Interpret a line of console input
    ///
    /// A `y` without any `n` accepts, an `n` without any `y` rejects (case
    /// insensitive). Anything else is unrecognized and yields `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let yes = input.contains(&['y', 'Y'][..]);
        let no = input.contains(&['n', 'N'][..]);

        match (yes, no) {
            (true, false) => Some(Response::Accept),
            (false, true) => Some(Response::Reject),
            _ => None,
        }
    }
}

/// Where the accept/reject loop currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    /// A fresh candidate needs to be drawn and shown
    Present,
    /// `choice` is on screen, waiting for the user
    AwaitResponse { choice: usize },
    /// Terminal
    Accepted { choice: usize },
}

/// Accept/reject state machine over a weighted candidate list
///
/// Every draw is independent, so a rejected candidate can come up again.
#[derive(Debug)]
pub struct Decision<'a> {
    candidates: &'a [Candidate],
    distribution: WeightedIndex<f64>,
    state: DecisionState,
}

impl<'a> Decision<'a> {
    /// `probabilities` must be index-aligned with `candidates`
    pub fn new(candidates: &'a [Candidate], probabilities: &[f64]) -> Result<Self, DecisionError> {
        if candidates.is_empty() {
            return Err(DecisionError::NoCandidates);
        }

        if candidates.len() != probabilities.len() {
            return Err(DecisionError::ProbabilityMismatch {
                expected: candidates.len(),
                actual: probabilities.len(),
            });
        }

        Ok(Self {
            candidates,
            distribution: WeightedIndex::new(probabilities)?,
            state: DecisionState::Present,
        })
    }

    pub fn state(&self) -> DecisionState {
        self.state
    }

    /// The accepted candidate, once the machine has terminated
    pub fn accepted(&self) -> Option<&'a Candidate> {
        match self.state {
            DecisionState::Accepted { choice } => Some(&self.candidates[choice]),
            _ => None,
        }
    }

    /// PRESENT -> AWAIT_RESPONSE with a fresh weighted draw
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&'a Candidate, DecisionError> {
        if self.state != DecisionState::Present {
            return Err(DecisionError::InvalidTransition {
                state: self.state,
                action: "draw",
            });
        }

        let choice = self.distribution.sample(rng);
        tracing::debug!("Drew candidate {} ({})", choice, self.candidates[choice].id);

        self.state = DecisionState::AwaitResponse { choice };
        Ok(&self.candidates[choice])
    }

    /// Feed one line of user input to the AWAIT_RESPONSE state
    ///
    /// Unrecognized input leaves the state unchanged.
    pub fn respond(&mut self, input: &str) -> Result<DecisionState, DecisionError> {
        let choice = match self.state {
            DecisionState::AwaitResponse { choice } => choice,
            state => {
                return Err(DecisionError::InvalidTransition {
                    state,
                    action: "respond",
                })
            }
        };

        self.state = match Response::parse(input) {
            Some(Response::Accept) => DecisionState::Accepted { choice },
            Some(Response::Reject) => {
                tracing::debug!("Rejected {}", self.candidates[choice].id);
                DecisionState::Present
            }
            None => self.state,
        };

        Ok(self.state)
    }

    /// Drive the machine over a console until a candidate is accepted
    pub fn run<R, I, O>(
        &mut self,
        rng: &mut R,
        input: &mut I,
        output: &mut O,
    ) -> Result<&'a Candidate, DecisionError>
    where
        R: Rng + ?Sized,
        I: BufRead,
        O: Write,
    {
        let mut line = String::new();

        loop {
            match self.state {
                DecisionState::Present => {
                    let candidate = self.draw(rng)?;
                    present_candidate(output, candidate)?;
                }
                DecisionState::AwaitResponse { .. } => {
                    write!(output, "{}", PROMPT)?;
                    output.flush()?;

                    line.clear();
                    if input.read_line(&mut line)? == 0 {
                        return Err(DecisionError::InputClosed);
                    }
                    self.respond(&line)?;
                }
                DecisionState::Accepted { choice } => return Ok(&self.candidates[choice]),
            }
        }
    }
}

/// Print the candidate card shown before each prompt
pub fn present_candidate<W: Write>(output: &mut W, candidate: &Candidate) -> io::Result<()> {
    writeln!(output, "Today's choice is...")?;
    writeln!(output, "{}", RULE)?;
    writeln!(output, "{}", candidate.name)?;
    writeln!(output, "{}", candidate.display_address())?;
    writeln!(
        output,
        "Rating: {:.1} with {} reviews",
        candidate.rating, candidate.review_count
    )?;
    writeln!(output, "Is open?: {}", candidate.is_open())?;
    writeln!(output, "Website: {}", candidate.url)?;
    writeln!(output, "{}", RULE)
}
