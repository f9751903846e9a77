//! Aggregate statistics over a persisted collection.
//!
//! Everything here is a pure function of a loaded `QuizCollection`.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::{self, Write};

use crate::schema::{Difficulty, QuestionRecord, QuizCollection};
use crate::util;

/// Default length of the category ranking.
pub const TOP_CATEGORIES: usize = 10;

/// One group of a partitioning.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub label: String,
    pub count: usize,

    /// Share of `total_unique`, 0.0 when the collection is empty
    pub percent: f64,
}

/// One category with its count. Categories carry no percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Example question for one difficulty level.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub difficulty: Difficulty,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizStats {
    pub total_unique: usize,
    pub last_updated: String,

    /// Groups in order of first appearance
    pub by_kind: Vec<Tally>,
    pub by_difficulty: Vec<Tally>,
    pub by_category: Vec<CategoryCount>,

    /// Highest counts first, ties in first-appearance order
    pub top_categories: Vec<CategoryCount>,

    /// One per difficulty present, in easy/medium/hard order
    pub examples: Vec<Example>,
}

impl QuizStats {
    pub fn from_collection(collection: &QuizCollection) -> Self {
        Self::with_top(collection, TOP_CATEGORIES)
    }

    pub fn with_top(collection: &QuizCollection, top: usize) -> Self {
        let total = collection.total_unique;
        let quizzes = &collection.quizzes;

        let by_kind = with_percent(group(quizzes.iter().map(|q| q.kind)), total);
        let by_difficulty = with_percent(group(quizzes.iter().map(|q| q.difficulty)), total);
        let by_category: Vec<_> = group(quizzes.iter().map(|q| q.category.as_str()))
            .into_iter()
            .map(|(label, count)| CategoryCount { label, count })
            .collect();

        let mut ranked = by_category.clone();
        // `sort_by` is stable, equal counts keep grouping order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(top);

        Self {
            total_unique: total,
            last_updated: collection.last_updated.clone(),
            by_kind,
            by_difficulty,
            by_category,
            top_categories: ranked,
            examples: examples(quizzes),
        }
    }

    pub fn total_categories(&self) -> usize {
        self.by_category.len()
    }
}

/// Count occurrences, keeping groups in order of first appearance.
fn group<K, I>(values: I) -> Vec<(String, usize)>
where
    K: Eq + Hash + Copy + ToString,
    I: IntoIterator<Item = K>,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(String, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&i) => groups[i].1 += 1,
            None => {
                slots.insert(value, groups.len());
                groups.push((value.to_string(), 1));
            }
        }
    }
    groups
}

fn with_percent(groups: Vec<(String, usize)>, total: usize) -> Vec<Tally> {
    groups
        .into_iter()
        .map(|(label, count)| Tally {
            label,
            count,
            percent: percent(count, total),
        })
        .collect()
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn examples(quizzes: &[QuestionRecord]) -> Vec<Example> {
    Difficulty::ALL
        .iter()
        .filter_map(|&d| {
            quizzes.iter().find(|q| q.difficulty == d).map(|q| Example {
                difficulty: d,
                question: q.question.clone(),
                answer: q.correct_answer.clone(),
            })
        })
        .collect()
}

// ------------------------------------------------------------
// Report rendering
// ------------------------------------------------------------

/// Write the console report for `stats`.
pub fn render<W: Write>(stats: &QuizStats, out: &mut W) -> io::Result<()> {
    writeln!(out, "STATISTICS OF COLLECTED QUIZZES")?;
    writeln!(out)?;
    writeln!(out, "Total unique quizzes: {}", stats.total_unique)?;
    writeln!(out, "Last updated: {}", util::display_timestamp(&stats.last_updated))?;

    writeln!(out)?;
    writeln!(out, "By types:")?;
    for t in &stats.by_kind {
        writeln!(out, "   {}: {} ({:.1}%)", t.label, t.count, t.percent)?;
    }

    writeln!(out)?;
    writeln!(out, "By difficulty:")?;
    for t in &stats.by_difficulty {
        writeln!(out, "   {}: {} ({:.1}%)", t.label, t.count, t.percent)?;
    }

    writeln!(out)?;
    writeln!(out, "Top-{} categories:", stats.top_categories.len())?;
    for (i, t) in stats.top_categories.iter().enumerate() {
        writeln!(out, "   {}. {}: {} quizzes", i + 1, t.label, t.count)?;
    }

    writeln!(out)?;
    writeln!(out, "Total categories: {}", stats.total_categories())?;

    writeln!(out)?;
    writeln!(out, "Examples of questions:")?;
    for ex in &stats.examples {
        writeln!(out)?;
        writeln!(out, "   {}: {}", ex.difficulty.as_str().to_uppercase(), ex.question)?;
        writeln!(out, "   Answer: {}", ex.answer)?;
    }

    Ok(())
}
