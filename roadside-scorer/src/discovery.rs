//! Sequential candidate discovery along a sampled route.

use geo::Coord;
use log::{debug, warn};
use roadside_core::{CandidateAggregator, Epoch, PlaceSearchProvider, SearchConfig};

use crate::board::ResultBoard;

/// Search around each sample point in turn and pool the results.
///
/// Exactly one search request is outstanding at a time. Each sample point
/// follows page tokens until `pages_per_sample` pages have been fetched or
/// the service stops returning a token. A failed search is logged and that
/// sample point is skipped. Returns `None` as soon as `epoch` stops being
/// current.
pub async fn discover<S>(
    search: &S,
    config: &SearchConfig,
    samples: &[Coord<f64>],
    board: &ResultBoard,
    epoch: Epoch,
) -> Option<CandidateAggregator>
where
    S: PlaceSearchProvider + ?Sized,
{
    let mut aggregator = CandidateAggregator::new();
    let pages = config.pages_per_sample.max(1);

    for (index, sample) in samples.iter().enumerate() {
        let mut query = config.query_at(*sample);
        for page in 0..pages {
            if !board.is_current(epoch) {
                debug!("discovery for epoch {epoch} superseded at sample {index}");
                return None;
            }
            match search.search(&query).await {
                Ok(found) => {
                    let added = aggregator.ingest(found.results);
                    debug!("sample {index} page {page}: {added} new places");
                    let Some(token) = found.next_page_token else {
                        break;
                    };
                    query = query.with_page_token(token);
                }
                Err(err) => {
                    warn!("search at sample {index} failed: {err}");
                    break;
                }
            }
        }
    }
    board.is_current(epoch).then_some(aggregator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadside_core::PointOfInterest;
    use roadside_core::test_support::StaticPlaceSearch;
    use rstest::rstest;

    fn poi(id: &str, lng: f64) -> PointOfInterest {
        PointOfInterest::new(id, id, Coord { x: lng, y: 0.0 })
    }

    fn samples() -> Vec<Coord<f64>> {
        vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.1, y: 0.0 }]
    }

    #[rstest]
    #[tokio::test]
    async fn pools_results_across_samples_without_duplicates() {
        let search = StaticPlaceSearch::with_pois([poi("a", 0.0), poi("b", 0.05), poi("c", 0.1)]);
        let board = ResultBoard::new();
        let epoch = board.invalidate();

        let pooled = discover(&search, &SearchConfig::default(), &samples(), &board, epoch).await;

        let pooled = pooled.map(CandidateAggregator::into_pois).unwrap_or_default();
        let ids: Vec<_> = pooled.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(search.calls(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_sample_is_skipped() {
        let search = StaticPlaceSearch::with_pois([poi("a", 0.0), poi("c", 0.1)]).failing_on(0);
        let board = ResultBoard::new();
        let epoch = board.invalidate();

        let pooled = discover(&search, &SearchConfig::default(), &samples(), &board, epoch).await;

        let pooled = pooled.map(CandidateAggregator::into_pois).unwrap_or_default();
        let ids: Vec<_> = pooled.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["c"]);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(5, 3)]
    #[tokio::test]
    async fn follows_page_tokens_up_to_limit(#[case] pages: usize, #[case] expected: usize) {
        let search = StaticPlaceSearch::with_pois([poi("a", 0.0), poi("b", 0.0), poi("c", 0.0)])
            .with_page_size(1);
        let config = SearchConfig::default().with_pages_per_sample(pages);
        let board = ResultBoard::new();
        let epoch = board.invalidate();

        let pooled = discover(&search, &config, &samples()[..1], &board, epoch).await;

        assert_eq!(search.calls(), expected);
        assert_eq!(pooled.map(|p| p.len()), Some(expected));
    }

    #[rstest]
    #[tokio::test]
    async fn stale_epoch_stops_discovery() {
        let search = StaticPlaceSearch::with_pois([poi("a", 0.0)]);
        let board = ResultBoard::new();
        let stale = board.invalidate();
        board.invalidate();

        let pooled = discover(&search, &SearchConfig::default(), &samples(), &board, stale).await;

        assert!(pooled.is_none());
        assert_eq!(search.calls(), 0);
    }
}
