use clap::Args;
use stride_core::{app::AppEvent, lat_lng::LatLng, selection::SelectionChoice};
use tracing::info;

use crate::{config::Config, parsers, session::Session};

#[derive(Args)]
pub struct RouteArgs {
    /// Start of the workout, as `lat,lng`
    #[arg(long, value_parser = parsers::parse_lat_lng)]
    from: LatLng,

    /// Destination of the workout, as `lat,lng`
    #[arg(long, value_parser = parsers::parse_lat_lng)]
    to: LatLng,

    /// Current position, as `lat,lng`
    #[arg(long, value_parser = parsers::parse_lat_lng)]
    at: Option<LatLng>,
}

pub async fn run(args: RouteArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = Session::start(config, args.at).await?;
    let before = session.app.store().len();

    for (at, choice) in [
        (args.from, SelectionChoice::Start),
        (args.to, SelectionChoice::Destination),
    ] {
        session.app.handle(AppEvent::MapClicked(at));
        session.app.handle(AppEvent::PopupChoice { at, choice });
    }

    session.settle().await;

    if session.app.store().len() == before {
        anyhow::bail!("No workout was created");
    }

    if let Some(workout) = session.app.store().workouts().last() {
        info!("Saved workout {}", workout.id);
    }

    println!("{}", session.app.view().to_table());

    Ok(())
}
