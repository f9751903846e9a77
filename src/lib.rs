// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// - config:    Settings loaded from JSON, all fields defaulted
// - schema:    Question records, API envelope, persisted layout
// - store:     Uniqueness index and JSON file persistence
// - source:    Question sources (Open Trivia DB adapter)
// - collector: Idempotency probe and polling loop
// - analyzer:  Aggregate statistics and console report
// - util:      Logging and time helpers
//
pub mod analyzer;
pub mod collector;
pub mod config;
pub mod schema;
pub mod source;
pub mod store;
pub mod util;
