use colored::Colorize;

use crate::{cli::render_bar_chart, info, theme::Theme, types::Limit, utils};

const HISTOGRAM_BUCKET: u32 = 10;

pub async fn stats(limit: Limit, theme: Theme) {
    let history = super::fetch_history(limit).await;
    let Some(stats) = history.stats() else {
        return;
    };

    info!("Listening statistics ({} theme)", theme.display_name());
    println!("  {:<16} {}", "Total Tracks".bold(), stats.total_tracks);
    println!("  {:<16} {}", "Unique Artists".bold(), stats.unique_artists);
    println!("  {:<16} {}", "Top Artist".bold(), stats.top_artist);
    println!("  {:<16} {:.1}", "Avg Popularity".bold(), stats.avg_popularity);
    println!();

    let by_hour: Vec<(String, f64)> = history
        .plays_by_hour()
        .into_iter()
        .map(|(hour, count)| (format!("{:02}:00", hour), count as f64))
        .collect();
    println!("{}", render_bar_chart("Listening Activity by Hour", &by_hour, theme));

    let by_day: Vec<(String, f64)> = history
        .plays_by_weekday()
        .into_iter()
        .map(|(day, count)| (utils::weekday_name(day).to_string(), count as f64))
        .collect();
    println!(
        "{}",
        render_bar_chart("Listening Activity by Day of Week", &by_day, theme)
    );

    println!(
        "{}",
        render_bar_chart(
            "Track Popularity by Artist",
            &history.popularity_by_artist(),
            theme
        )
    );

    let histogram: Vec<(String, f64)> = history
        .popularity_histogram(HISTOGRAM_BUCKET)
        .into_iter()
        .map(|(start, count)| {
            (
                format!("{}-{}", start, start + HISTOGRAM_BUCKET - 1),
                count as f64,
            )
        })
        .collect();
    println!(
        "{}",
        render_bar_chart("Distribution of Track Popularity Scores", &histogram, theme)
    );
}
