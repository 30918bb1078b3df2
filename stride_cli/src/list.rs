use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use stride_core::lat_lng::LatLng;
use tracing::info;

use crate::{config::Config, parsers, session::Session};

#[derive(Args)]
pub struct ListArgs {
    /// Current position, as `lat,lng`
    #[arg(long, value_parser = parsers::parse_lat_lng)]
    at: Option<LatLng>,
}

pub async fn run(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = Session::start(config, args.at).await?;

    if session.app.store().is_empty() {
        println!("No workouts yet");
        return Ok(());
    }

    let total = session.app.pending_requests() as u64;
    let bar = ProgressBar::new(total);
    bar.enable_steady_tick(Duration::from_millis(200));
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} routes")?);

    session
        .settle_with(|app| bar.set_position(total - app.pending_requests() as u64))
        .await;
    bar.finish_and_clear();

    info!(
        "Redrew {} of {} workouts",
        session.app.map().routes(),
        session.app.store().len()
    );

    println!("{}", session.app.view().to_table());

    Ok(())
}
