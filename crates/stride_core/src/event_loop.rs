use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    app::{App, AppEvent},
    list_view::WorkoutListView,
    map::map_surface::MapSurface,
    route_requester::RouteRequester,
    storage::key_value_store::KeyValueStore,
};

pub type EventSender = UnboundedSender<AppEvent>;
pub type EventReceiver = UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Feeds events into `app` until no route request is outstanding.
/// `on_event` runs after each handled event.
pub async fn run_until_settled<M, V, S, R, F>(
    app: &mut App<M, V, S, R>,
    events: &mut EventReceiver,
    mut on_event: F,
) where
    M: MapSurface,
    V: WorkoutListView,
    S: KeyValueStore,
    R: RouteRequester,
    F: FnMut(&App<M, V, S, R>),
{
    while app.pending_requests() > 0 {
        let Some(event) = events.recv().await else {
            break;
        };

        app.handle(event);
        on_event(app);
    }
}
