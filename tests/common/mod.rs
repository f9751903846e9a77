#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use quiz_harvest::collector::{Collector, DelayStrategy, NoDelay};
use quiz_harvest::config::CollectorConfig;
use quiz_harvest::schema::{Difficulty, QuestionKind, QuestionRecord, QuizCollection};
use quiz_harvest::source::QuizSource;
use quiz_harvest::store::{CollectionStore, QuizIndex, StoreError};
use quiz_harvest::util;

pub fn record(n: usize) -> QuestionRecord {
    QuestionRecord {
        kind: QuestionKind::Multiple,
        difficulty: Difficulty::Easy,
        category: "General Knowledge".to_string(),
        question: format!("question {n}"),
        correct_answer: format!("answer {n}"),
        incorrect_answers: vec!["x".to_string(), "y".to_string(), "z".to_string()],
    }
}

pub fn batch(ids: &[usize]) -> Vec<QuestionRecord> {
    ids.iter().map(|&n| record(n)).collect()
}

/// Source replaying a fixed list of batches, then empty batches.
pub struct ScriptedSource {
    batches: Mutex<VecDeque<Vec<QuestionRecord>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<QuestionRecord>>) -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(batches.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl QuizSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_batch(&self) -> Vec<QuestionRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().pop_front().unwrap_or_default()
    }
}

/// Zero-duration delay that counts how often it was taken.
#[derive(Default)]
pub struct CountingDelay {
    pauses: AtomicUsize,
}

impl CountingDelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DelayStrategy for CountingDelay {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory store that keeps every saved snapshot.
#[derive(Default)]
pub struct RecordingStore {
    initial: Vec<QuestionRecord>,
    saves: Mutex<Vec<QuizCollection>>,
}

impl RecordingStore {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seeded(initial: Vec<QuestionRecord>) -> Arc<Self> {
        Arc::new(Self {
            initial,
            saves: Mutex::new(Vec::new()),
        })
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn saves(&self) -> Vec<QuizCollection> {
        self.saves.lock().unwrap().clone()
    }
}

impl CollectionStore for RecordingStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> Result<QuizIndex, StoreError> {
        let mut index = QuizIndex::new();
        index.merge(self.initial.clone());
        Ok(index)
    }

    fn save(&self, index: &QuizIndex) -> Result<QuizCollection, StoreError> {
        let collection = index.to_collection(util::now_iso());
        self.saves.lock().unwrap().push(collection.clone());
        Ok(collection)
    }
}

/// Default settings with a generous request cap, so a broken loop
/// fails the test instead of hanging it.
pub fn guarded_settings() -> CollectorConfig {
    CollectorConfig {
        max_requests: Some(500),
        ..CollectorConfig::default()
    }
}

pub fn build_collector(source: Arc<ScriptedSource>, store: Arc<RecordingStore>) -> Collector {
    Collector::new(source, Arc::new(NoDelay), store, guarded_settings())
}

pub fn build_counting_collector(
    source: Arc<ScriptedSource>,
    store: Arc<RecordingStore>,
    delay: Arc<CountingDelay>,
) -> Collector {
    Collector::new(source, delay, store, guarded_settings())
}
