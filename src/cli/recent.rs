use tabled::Table;

use crate::{
    info,
    types::{Limit, TrackTableRow},
    utils,
};

pub async fn recent(limit: Limit) {
    let history = super::fetch_history(limit).await;
    if history.is_empty() {
        return;
    }

    info!("Your {} most recent tracks:", history.len());

    let table_rows: Vec<TrackTableRow> = history
        .rows()
        .iter()
        .map(|r| TrackTableRow {
            track: r.track_name.clone(),
            artist: r.artist.clone(),
            popularity: r.popularity,
            played_at: utils::format_local(r.played_at),
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}
