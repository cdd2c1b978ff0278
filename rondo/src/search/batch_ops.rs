use itertools::Itertools;
use rayon::prelude::*;

use rondo_core::model::{AccessTable, TransitNetwork};

use crate::model::error::{batch_routing_error, SearchError};
use crate::model::request::SearchRequest;
use crate::search::engine::{RaptorEngine, SearchResult};

/// routes every origin in parallel. searches share the immutable network
/// view and request; each one owns its round states, bitsets, and random
/// offsets, so no coordination is needed.
pub fn route_many(
    network: &TransitNetwork,
    request: &SearchRequest,
    origins: &[AccessTable],
) -> Result<Vec<SearchResult>, SearchError> {
    request.validate()?;
    log::info!("routing {} origins in parallel", origins.len());

    let outcomes: Vec<Result<SearchResult, SearchError>> = origins
        .par_iter()
        .map(|access| RaptorEngine::new(network, request, access).map(|mut engine| engine.route()))
        .collect();

    let (results, errors): (Vec<SearchResult>, Vec<SearchError>) =
        outcomes.into_iter().partition_result();
    if !errors.is_empty() {
        return Err(batch_routing_error(&errors));
    }
    Ok(results)
}
