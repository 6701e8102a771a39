//! Summary statistics over journal records.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::JournalRecord;

/// Bucket for journals missing the grouping field.
const UNKNOWN: &str = "unknown";
const TOP_TAGS: usize = 10;
const RECENT_JOURNALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    pub total_journals: usize,
    /// Counts keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, usize>,
    pub by_domain: BTreeMap<String, usize>,
    pub by_complexity: BTreeMap<String, usize>,
    /// Mean `quality_score` over journals that have one, one decimal place.
    pub avg_quality_score: Option<f64>,
    pub grade_distribution: BTreeMap<String, usize>,
    pub top_tags: Vec<TagCount>,
    pub recent_journals: Vec<RecentJournal>,
    pub monthly_avg_quality: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentJournal {
    pub filename: String,
    pub date: String,
    pub domain: Option<String>,
    pub grade: Option<String>,
}

impl JournalStats {
    #[must_use]
    pub fn compute(journals: &[JournalRecord]) -> Self {
        let mut by_month: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_domain: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_complexity: BTreeMap<String, usize> = BTreeMap::new();
        let mut grade_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut tag_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut monthly_scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for journal in journals {
            let month = month_key(journal.date.as_deref());
            *by_month.entry(month.clone()).or_default() += 1;
            *by_domain.entry(bucket(journal.domain.as_deref())).or_default() += 1;
            *by_complexity
                .entry(bucket(journal.complexity.as_deref()))
                .or_default() += 1;
            if let Some(grade) = journal.grade.as_deref().filter(|g| !g.is_empty()) {
                *grade_distribution.entry(grade.to_string()).or_default() += 1;
            }
            for tag in &journal.tags {
                *tag_counts.entry(tag).or_default() += 1;
            }
            if let (Some(score), Some(_)) = (journal.quality_score, &journal.date) {
                monthly_scores.entry(month).or_default().push(score);
            }
        }

        let scores: Vec<f64> = journals.iter().filter_map(|j| j.quality_score).collect();

        let mut top_tags: Vec<TagCount> = tag_counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        top_tags.sort_by_key(|t| Reverse(t.count));
        top_tags.truncate(TOP_TAGS);

        let mut dated: Vec<&JournalRecord> =
            journals.iter().filter(|j| j.date.is_some()).collect();
        dated.sort_by(|a, b| b.date.cmp(&a.date));
        let recent_journals = dated
            .into_iter()
            .take(RECENT_JOURNALS)
            .map(|j| RecentJournal {
                filename: j.filename.clone(),
                date: j.date.clone().unwrap_or_default(),
                domain: j.domain.clone(),
                grade: j.grade.clone(),
            })
            .collect();

        let monthly_avg_quality = monthly_scores
            .into_iter()
            .filter_map(|(month, scores)| mean(&scores).map(|avg| (month, avg)))
            .collect();

        Self {
            total_journals: journals.len(),
            by_month,
            by_domain,
            by_complexity,
            avg_quality_score: mean(&scores),
            grade_distribution,
            top_tags,
            recent_journals,
            monthly_avg_quality,
        }
    }
}

/// `YYYY-MM` prefix of a date, or `unknown`.
fn month_key(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.chars().take(7).collect(),
        _ => UNKNOWN.to_string(),
    }
}

fn bucket(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Arithmetic mean rounded to one decimal place.
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    Some((avg * 10.0).round() / 10.0)
}
