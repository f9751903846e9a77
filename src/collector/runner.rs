use std::sync::Arc;

use crate::{
    config::CollectorConfig,
    source::QuizSource,
    store::{CollectionStore, QuizIndex},
};

use super::delay::DelayStrategy;

/// Result of the pre-flight idempotency probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// Nothing stored yet, the probe made no requests
    MustCollect,

    /// Probe requests brought nothing new, no further run needed
    Idempotent,

    /// Probe requests found `added` new records, which were saved
    ContinueCollecting { added: usize },
}

/// Why the polling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `saturation_threshold` zero-addition batches in a row
    Saturated,

    /// `max_requests` fetches issued
    RequestLimit,
}

/// End-of-loop statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectSummary {
    pub requests: u64,
    pub unique: usize,
    pub stop: StopReason,
}

/// Outcome of a full session (probe, then maybe the loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub verdict: ProbeVerdict,

    /// `None` when the probe found the collection idempotent
    pub summary: Option<CollectSummary>,
}

/// Collection session state.
///
/// Owns the uniqueness index for the lifetime of the process. The
/// index is loaded once at construction and only mutated through
/// `QuizIndex::merge` inside this type.
///
/// GUARANTEES:
/// - At most one fetch is outstanding at any time
/// - After every non-empty batch the full index is handed to the store
///
pub struct Collector {
    source: Arc<dyn QuizSource>,
    delay: Arc<dyn DelayStrategy>,
    store: Arc<dyn CollectionStore>,
    settings: CollectorConfig,
    index: QuizIndex,
}

impl Collector {
    /// Build a collector, loading prior state from `store`.
    ///
    /// A load failure is logged and the session starts empty.
    pub fn new(
        source: Arc<dyn QuizSource>,
        delay: Arc<dyn DelayStrategy>,
        store: Arc<dyn CollectionStore>,
        settings: CollectorConfig,
    ) -> Self {
        let index = match store.load() {
            Ok(index) => {
                if !index.is_empty() {
                    log::info!("Loaded {} existing quizzes", index.len());
                }
                index
            }
            Err(e) => {
                log::warn!("Error loading existing quizzes, starting empty: {}", e);
                QuizIndex::new()
            }
        };

        Self::with_index(source, delay, store, settings, index)
    }

    pub fn with_index(
        source: Arc<dyn QuizSource>,
        delay: Arc<dyn DelayStrategy>,
        store: Arc<dyn CollectionStore>,
        settings: CollectorConfig,
        index: QuizIndex,
    ) -> Self {
        Self {
            source,
            delay,
            store,
            settings,
            index,
        }
    }

    pub fn index(&self) -> &QuizIndex {
        &self.index
    }

    pub fn store_location(&self) -> String {
        self.store.location()
    }

    /// Probe, then run the polling loop unless the probe says the
    /// collection is already complete.
    pub async fn run(&mut self) -> RunOutcome {
        let verdict = self.probe().await;

        let summary = match verdict {
            ProbeVerdict::Idempotent => None,
            _ => Some(self.collect().await),
        };

        RunOutcome { verdict, summary }
    }

    /// Idempotency probe.
    ///
    /// With an empty index this returns `MustCollect` immediately.
    /// Otherwise it runs `probe_requests` fetch+merge cycles and
    /// sums what they add. Persists once, and only if something new
    /// turned up.
    pub async fn probe(&mut self) -> ProbeVerdict {
        log::info!("Checking idempotency...");

        if self.index.is_empty() {
            log::info!("No saved quizzes, starting collection from scratch.");
            return ProbeVerdict::MustCollect;
        }

        let rounds = self.settings.probe_requests;
        let mut added = 0;

        for i in 0..rounds {
            log::info!("Test request {}/{}...", i + 1, rounds);

            let batch = self.source.fetch_batch().await;
            if !batch.is_empty() {
                added += self.index.merge(batch);
            }

            if i + 1 < rounds {
                self.delay.pause().await;
            }
        }

        if added == 0 {
            log::info!(
                "Idempotency confirmed, no new quizzes found. Total unique quizzes: {}",
                self.index.len()
            );
            ProbeVerdict::Idempotent
        } else {
            log::info!("Found {} new quizzes, continue collection.", added);
            self.persist();
            ProbeVerdict::ContinueCollecting { added }
        }
    }

    /// Main polling loop.
    ///
    /// Per iteration:
    /// - empty batch: pause and retry, saturation counter untouched
    /// - otherwise merge, persist, and update the saturation counter
    ///
    /// Stops after `saturation_threshold` consecutive zero-addition
    /// batches, or once `max_requests` fetches were issued.
    pub async fn collect(&mut self) -> CollectSummary {
        log::info!("Starting quiz collection...");
        log::info!("Current unique quizzes count: {}", self.index.len());

        let threshold = self.settings.saturation_threshold;
        let mut requests: u64 = 0;
        let mut consecutive_empty: u32 = 0;

        let stop = loop {
            if let Some(max) = self.settings.max_requests {
                if requests >= max {
                    log::warn!("Request limit of {} reached, stopping.", max);
                    break StopReason::RequestLimit;
                }
            }

            requests += 1;
            log::info!("Request #{}...", requests);

            let batch = self.source.fetch_batch().await;
            if batch.is_empty() {
                log::info!("Unable to retrieve quizzes, retrying after delay...");
                self.delay.pause().await;
                continue;
            }

            let received = batch.len();
            let added = self.index.merge(batch);
            log::info!(
                "Received {} quizzes, added {} new unique. Total unique quizzes: {}",
                received,
                added,
                self.index.len()
            );

            self.persist();

            if added == 0 {
                consecutive_empty += 1;
                log::info!("Empty results count: {}/{}", consecutive_empty, threshold);

                if consecutive_empty >= threshold {
                    log::info!("Collection completed! All unique quizzes collected.");
                    break StopReason::Saturated;
                }
            } else {
                consecutive_empty = 0;
            }

            self.delay.pause().await;
        };

        CollectSummary {
            requests,
            unique: self.index.len(),
            stop,
        }
    }

    /// Hand the full index to the store.
    ///
    /// A failed save is logged and otherwise ignored: the in-memory
    /// index stays authoritative and the next save retries.
    fn persist(&self) {
        match self.store.save(&self.index) {
            Ok(saved) => {
                log::info!(
                    "Saved {} unique quizzes to {}",
                    saved.total_unique,
                    self.store.location()
                );
            }
            Err(e) => log::error!("Error saving quizzes: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::delay::NoDelay;
    use crate::schema::{Difficulty, QuestionKind, QuestionRecord, QuizCollection};
    use crate::store::StoreError;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(n: usize) -> QuestionRecord {
        QuestionRecord {
            kind: QuestionKind::Multiple,
            difficulty: Difficulty::Easy,
            category: "General Knowledge".into(),
            question: format!("question {n}"),
            correct_answer: format!("answer {n}"),
            incorrect_answers: vec![],
        }
    }

    /// Replays scripted batches, then returns empty batches.
    struct Scripted {
        batches: Mutex<VecDeque<Vec<QuestionRecord>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(batches: Vec<Vec<QuestionRecord>>) -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(batches.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl QuizSource for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_batch(&self) -> Vec<QuestionRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().pop_front().unwrap_or_default()
        }
    }

    /// Store that fails every save.
    struct BrokenStore {
        attempts: AtomicUsize,
    }

    impl CollectionStore for BrokenStore {
        fn location(&self) -> String {
            "broken".into()
        }

        fn load(&self) -> Result<QuizIndex, StoreError> {
            Err(StoreError::Io {
                path: "broken".into(),
                source: io::Error::other("disk gone"),
            })
        }

        fn save(&self, _index: &QuizIndex) -> Result<QuizCollection, StoreError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Io {
                path: "broken".into(),
                source: io::Error::other("disk gone"),
            })
        }
    }

    #[tokio::test]
    async fn failing_store_does_not_stop_the_loop() {
        let batches = vec![vec![record(1)], vec![record(1)]];
        let store = Arc::new(BrokenStore {
            attempts: AtomicUsize::new(0),
        });
        let settings = CollectorConfig {
            saturation_threshold: 1,
            ..CollectorConfig::default()
        };

        let mut collector =
            Collector::new(Scripted::new(batches), Arc::new(NoDelay), store.clone(), settings);
        assert!(collector.index().is_empty());

        let summary = collector.collect().await;
        assert_eq!(summary.stop, StopReason::Saturated);
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.unique, 1);
        assert_eq!(store.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn request_limit_bounds_a_failing_source() {
        let source = Scripted::new(vec![]);
        let store = Arc::new(BrokenStore {
            attempts: AtomicUsize::new(0),
        });
        let settings = CollectorConfig {
            max_requests: Some(4),
            ..CollectorConfig::default()
        };

        let mut collector = Collector::with_index(
            source.clone(),
            Arc::new(NoDelay),
            store.clone(),
            settings,
            QuizIndex::new(),
        );

        let summary = collector.collect().await;
        assert_eq!(summary.stop, StopReason::RequestLimit);
        assert_eq!(summary.requests, 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(store.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_index_probe_makes_no_requests() {
        let source = Scripted::new(vec![vec![record(1)]]);
        let store = Arc::new(BrokenStore {
            attempts: AtomicUsize::new(0),
        });

        let mut collector = Collector::with_index(
            source.clone(),
            Arc::new(NoDelay),
            store,
            CollectorConfig::default(),
            QuizIndex::new(),
        );

        assert_eq!(collector.probe().await, ProbeVerdict::MustCollect);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
