/// Collector module
///
/// Groups everything that drives a collection session:
/// - The idempotency probe and polling loop (`runner`)
/// - Inter-request delay strategies (`delay`)
///
/// The collector sits between:
/// - A `QuizSource` (network side)
/// - A `CollectionStore` (disk side)
///
/// Design notes:
/// - No HTTP or JSON here; sources and stores own those
/// - One fetch in flight at a time, enforced by sequential awaits
pub mod delay;
pub mod runner;

pub use delay::{DelayStrategy, NoDelay, RandomDelay};
pub use runner::{CollectSummary, Collector, ProbeVerdict, RunOutcome, StopReason};
