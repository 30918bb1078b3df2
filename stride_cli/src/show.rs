use clap::Args;
use stride_core::{app::AppEvent, lat_lng::LatLng, workout::WorkoutId};

use crate::{config::Config, parsers, session::Session};

#[derive(Args)]
pub struct ShowArgs {
    /// Id of the workout, as shown by `list`
    id: String,

    /// Current position, as `lat,lng`
    #[arg(long, value_parser = parsers::parse_lat_lng)]
    at: Option<LatLng>,
}

pub async fn run(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    let mut session = Session::start(config, args.at).await?;
    session.settle().await;

    let id = WorkoutId::new(args.id);
    let Some(workout) = session.app.store().find_by_id(&id).cloned() else {
        anyhow::bail!("No workout with id {}", id);
    };

    session.app.handle(AppEvent::EntryActivated(Some(id)));

    println!(
        "Workout {}: {} -> {}",
        workout.id,
        workout.start().lat_lng,
        workout.destination().lat_lng
    );
    if let Some((center, zoom)) = session.app.map().view() {
        println!("Map centered on {center} at zoom {zoom}");
    }

    Ok(())
}
