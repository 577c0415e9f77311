use crate::config::Settings;
use crate::core::{selection_probabilities, Decision, DecisionError};
use crate::services::{HistoryError, HistoryStore, SearchClient, SearchError};
use rand::Rng;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Errors that abort a decision cycle
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// How a decision cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The search came back empty; history untouched
    NoResults,
    /// The user accepted a candidate and the history was saved
    Accepted {
        id: String,
        name: String,
        visits: u64,
    },
}

/// One full decision cycle
///
/// Search -> load history -> weight -> accept/reject loop -> record visit -> save.
/// The history is only written once a candidate has been accepted.
pub async fn decide<R, I, O>(
    settings: &Settings,
    client: &SearchClient,
    rng: &mut R,
    input: &mut I,
    output: &mut O,
) -> Result<Outcome, AppError>
where
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    let query = settings.search_query();
    tracing::info!(
        "Searching for '{}' near '{}' (limit {})",
        query.term,
        query.location,
        query.limit
    );

    let candidates = client.search(&query).await?;
    if candidates.is_empty() {
        writeln!(
            output,
            "No results found for '{}' near '{}'.",
            query.term, query.location
        )?;
        return Ok(Outcome::NoResults);
    }

    let store = HistoryStore::new(&settings.files.history);
    let mut history = store.load()?;

    let probabilities = selection_probabilities(&history, &candidates);
    let mut decision = Decision::new(&candidates, &probabilities)?;
    let chosen = decision.run(rng, input, output)?;

    let visits = history.record_visit(&chosen.id);
    store.save(&history)?;

    tracing::info!("Accepted {} ({}), visit #{}", chosen.name, chosen.id, visits);

    Ok(Outcome::Accepted {
        id: chosen.id.clone(),
        name: chosen.name.clone(),
        visits,
    })
}
