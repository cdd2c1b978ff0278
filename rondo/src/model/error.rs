use itertools::Itertools;
use rondo_core::model::NetworkError;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("errors encountered during batch routing: {0}")]
    BatchRouting(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// folds per-origin failures into a single batch error.
pub fn batch_routing_error(errors: &[SearchError]) -> SearchError {
    let concatenated = errors.iter().map(|e| e.to_string()).join("\n  ");
    SearchError::BatchRouting(format!("[\n  {concatenated}\n]"))
}

#[cfg(test)]
mod test {
    use super::{batch_routing_error, SearchError};

    #[test]
    fn test_batch_error_concatenates_messages() {
        let errors = vec![
            SearchError::InvalidRequest("bad window".to_string()),
            SearchError::Internal("oops".to_string()),
        ];
        let combined = batch_routing_error(&errors).to_string();
        assert!(combined.contains("bad window"));
        assert!(combined.contains("oops"));
    }
}
