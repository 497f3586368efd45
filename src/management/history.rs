use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};

use crate::{
    types::{ListeningStats, TrackRecord},
    utils,
};

/// A single play with the time-based columns derived from `played_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRow {
    pub track_name: String,
    pub artist: String,
    pub popularity: u32,
    pub played_at: DateTime<Utc>,
    pub hour: u32,
    pub day_of_week: Weekday,
    pub date: NaiveDate,
}

impl From<TrackRecord> for PlayRow {
    fn from(record: TrackRecord) -> Self {
        PlayRow {
            hour: record.played_at.hour(),
            day_of_week: record.played_at.weekday(),
            date: record.played_at.date_naive(),
            track_name: record.track_name,
            artist: record.artist,
            popularity: record.popularity,
            played_at: record.played_at,
        }
    }
}

/// Recently played tracks, in the order the API returned them (most recent
/// first), with aggregation helpers for the dashboard views.
#[derive(Debug, Clone, Default)]
pub struct ListeningHistory {
    rows: Vec<PlayRow>,
}

impl ListeningHistory {
    pub fn new(records: Vec<TrackRecord>) -> Self {
        ListeningHistory {
            rows: records.into_iter().map(PlayRow::from).collect(),
        }
    }

    pub fn rows(&self) -> &[PlayRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Summary statistics, `None` for an empty history.
    ///
    /// The top artist is the one with the most plays; ties go to the
    /// alphabetically first name.
    pub fn stats(&self) -> Option<ListeningStats> {
        if self.rows.is_empty() {
            return None;
        }

        let mut plays: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            *plays.entry(row.artist.as_str()).or_default() += 1;
        }

        let top_artist = plays
            .iter()
            .max_by(|(a_name, a_count), (b_name, b_count)| {
                a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
            })
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let total_popularity: u64 = self.rows.iter().map(|r| r.popularity as u64).sum();
        let mean = total_popularity as f64 / self.rows.len() as f64;

        Some(ListeningStats {
            total_tracks: self.rows.len(),
            unique_artists: plays.len(),
            top_artist,
            avg_popularity: utils::round_to_tenth(mean),
        })
    }

    /// Play counts per hour of day, for hours with at least one play.
    pub fn plays_by_hour(&self) -> Vec<(u32, usize)> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.hour).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Play counts per weekday, Monday first, for days with at least one play.
    pub fn plays_by_weekday(&self) -> Vec<(Weekday, usize)> {
        let mut counts: BTreeMap<u32, (Weekday, usize)> = BTreeMap::new();
        for row in &self.rows {
            counts
                .entry(row.day_of_week.num_days_from_monday())
                .or_insert((row.day_of_week, 0))
                .1 += 1;
        }
        counts.into_values().collect()
    }

    /// Mean track popularity per artist, most popular first.
    pub fn popularity_by_artist(&self) -> Vec<(String, f64)> {
        let mut totals: HashMap<&str, (u64, u64)> = HashMap::new();
        for row in &self.rows {
            let entry = totals.entry(row.artist.as_str()).or_default();
            entry.0 += row.popularity as u64;
            entry.1 += 1;
        }

        let mut result: Vec<(String, f64)> = totals
            .into_iter()
            .map(|(artist, (sum, n))| {
                (artist.to_string(), utils::round_to_tenth(sum as f64 / n as f64))
            })
            .collect();
        result.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        result
    }

    /// Distribution of popularity scores in buckets of `width`, keyed by the
    /// bucket's lower bound. Only non-empty buckets are returned.
    pub fn popularity_histogram(&self, width: u32) -> Vec<(u32, usize)> {
        let width = width.max(1);
        let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
        for row in &self.rows {
            *buckets.entry(row.popularity / width * width).or_default() += 1;
        }
        buckets.into_iter().collect()
    }

    /// The first `n` plays, i.e. the most recent ones.
    pub fn top_tracks(&self, n: usize) -> &[PlayRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}
