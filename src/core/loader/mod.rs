//=========================================================================
// Scene Loading
//=========================================================================
//
// Asynchronous scene-data loading.
//
// Components:
// - `fetcher`: the `SceneFetcher` seam, load completions and the
//   file-system fetcher
// - `collector`: controller-side bounded drain of finished loads
//
//=========================================================================

//=== Module Declarations =================================================

mod collector;
mod fetcher;

//=== Public API ==========================================================

pub use collector::CompletionCollector;
pub use fetcher::{FetchError, FileFetcher, LoadCompletion, LoadOutcome, SceneFetcher};
