//! CSV and plain-text exports of a listening history.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, TimeZone};
use tabled::Table;

use crate::{
    management::ListeningHistory,
    types::{Limit, ReportTrackRow},
    utils,
};

const CSV_HEADER: &str = "track_name,artist,popularity,played_at,hour,day_of_week,date";

/// Number of tracks listed under "TOP TRACKS" in the summary report.
pub const REPORT_TOP_TRACKS: usize = 5;

/// Renders the history as CSV, one line per play, most recent first.
pub fn to_csv(history: &ListeningHistory) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for row in history.rows() {
        let fields = [
            escape_csv(&row.track_name),
            escape_csv(&row.artist),
            row.popularity.to_string(),
            row.played_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            row.hour.to_string(),
            utils::weekday_name(row.day_of_week).to_string(),
            row.date.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Renders the plain-text "Recent Rhythms Report".
pub fn summary_report<Tz>(history: &ListeningHistory, generated_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::from("Recent Rhythms Report\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M")
    ));

    out.push_str("LISTENING STATISTICS:\n");
    match history.stats() {
        Some(stats) => {
            out.push_str(&format!("- Total Tracks: {}\n", stats.total_tracks));
            out.push_str(&format!("- Unique Artists: {}\n", stats.unique_artists));
            out.push_str(&format!("- Top Artist: {}\n", stats.top_artist));
            out.push_str(&format!(
                "- Average Popularity: {:.1}\n",
                stats.avg_popularity
            ));
        }
        None => out.push_str("- No listening data\n"),
    }

    out.push_str("\nTOP TRACKS:\n");
    let rows: Vec<ReportTrackRow> = history
        .top_tracks(REPORT_TOP_TRACKS)
        .iter()
        .map(|r| ReportTrackRow {
            track_name: r.track_name.clone(),
            artist: r.artist.clone(),
            popularity: r.popularity,
        })
        .collect();
    if !rows.is_empty() {
        out.push_str(&Table::new(rows).to_string());
        out.push('\n');
    }

    out
}

pub fn csv_file_name(limit: Limit) -> String {
    format!("spotify_tracks_{}.csv", limit.get())
}

pub fn report_file_name(date: NaiveDate) -> String {
    format!("spotify_report_{}.txt", date.format("%Y%m%d"))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
