use fxhash::FxHashMap;
use jiff::Timestamp;
use tracing::{error, info, warn};

use crate::{
    lat_lng::LatLng,
    list_view::WorkoutListView,
    map::{
        map_surface::{DEFAULT_ZOOM, MapSurface, TileLayer},
        marker_registry::MarkerRegistry,
    },
    route_requester::{RequestId, RouteRequest, RouteRequester},
    route_result::RouteResult,
    routing_service::RoutingError,
    selection::{Selection, SelectionChoice, WaypointSelector},
    storage::key_value_store::KeyValueStore,
    view_binder::WorkoutViewBinder,
    waypoint::Waypoint,
    workout::{Workout, WorkoutId, WorkoutIdGenerator},
    workout_store::WorkoutStore,
};

/// Everything the app reacts to. Each event is handled to completion before the next one.
#[derive(Debug)]
pub enum AppEvent {
    PositionAcquired(LatLng),
    PositionUnavailable(String),
    MapClicked(LatLng),
    PopupChoice {
        at: LatLng,
        choice: SelectionChoice,
    },
    RouteResolved {
        request: RequestId,
        outcome: Result<Vec<RouteResult>, RoutingError>,
    },
    /// `None` when the click landed outside of any entry.
    EntryActivated(Option<WorkoutId>),
}

/// Why a route was requested.
#[derive(Debug, Clone)]
enum RouteOrigin {
    Selection { waypoints: [Waypoint; 2] },
    Replay { workout: Workout },
}

/// Single owner of the map, the markers, the pending selection and the
/// workouts. All state changes go through [`App::handle`].
pub struct App<M, V, S, R> {
    map: M,
    markers: MarkerRegistry,
    selector: WaypointSelector,
    store: WorkoutStore<S>,
    binder: WorkoutViewBinder<V>,
    requester: R,
    in_flight: FxHashMap<RequestId, RouteOrigin>,
    next_request: u64,
    workout_ids: WorkoutIdGenerator,
    replayed: bool,
}

impl<M, V, S, R> App<M, V, S, R>
where
    M: MapSurface,
    V: WorkoutListView,
    S: KeyValueStore,
    R: RouteRequester,
{
    pub fn new(map: M, view: V, storage: S, requester: R) -> Self {
        Self {
            map,
            markers: MarkerRegistry::default(),
            selector: WaypointSelector::default(),
            store: WorkoutStore::load_initial(storage),
            binder: WorkoutViewBinder::new(view),
            requester,
            in_flight: FxHashMap::default(),
            next_request: 0,
            workout_ids: WorkoutIdGenerator::default(),
            replayed: false,
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::PositionAcquired(position) => self.on_position(Some(position)),
            AppEvent::PositionUnavailable(message) => {
                error!("{}", message);
                self.map.alert(&message);
                self.on_position(None);
            }
            AppEvent::MapClicked(at) => {
                self.map.open_popup(at, &SelectionChoice::ALL);
            }
            AppEvent::PopupChoice { at, choice } => {
                self.map.close_popup();
                match choice {
                    SelectionChoice::Start => self.choose_start(at),
                    SelectionChoice::Destination => self.choose_destination(at),
                }
            }
            AppEvent::RouteResolved { request, outcome } => self.on_route_resolved(request, outcome),
            AppEvent::EntryActivated(id) => {
                self.binder
                    .on_entry_activated(id.as_ref(), &self.store, &mut self.map);
            }
        }
    }

    /// Number of route requests still waiting for an answer.
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    pub fn selection(&self) -> &Selection {
        self.selector.state()
    }

    pub fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn view(&self) -> &V {
        self.binder.view()
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    fn on_position(&mut self, position: Option<LatLng>) {
        self.map.add_tile_layer(&TileLayer::default());

        if let Some(position) = position {
            self.map.set_view(position, DEFAULT_ZOOM);
        }

        if self.replayed {
            return;
        }
        self.replayed = true;

        let workouts = self.store.workouts().to_vec();
        info!("Replaying {} stored workouts", workouts.len());
        for workout in workouts {
            let waypoints = workout.waypoints;
            self.submit(RouteOrigin::Replay { workout }, waypoints);
        }
    }

    fn choose_start(&mut self, at: LatLng) {
        if self.selector.choose_start(at) {
            self.markers.clear_pending_destination(&mut self.map);
        }
        self.markers.place_start(&mut self.map, at);
    }

    fn choose_destination(&mut self, at: LatLng) {
        self.markers.place_destination(&mut self.map, at);

        let request = self.next_request_id();
        match self.selector.choose_destination(at, request) {
            Ok(waypoints) => {
                self.submit_with_id(request, RouteOrigin::Selection { waypoints }, waypoints)
            }
            Err(err) => self.report(&err),
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    fn submit(&mut self, origin: RouteOrigin, waypoints: [Waypoint; 2]) {
        let request = self.next_request_id();
        self.submit_with_id(request, origin, waypoints);
    }

    fn submit_with_id(&mut self, id: RequestId, origin: RouteOrigin, waypoints: [Waypoint; 2]) {
        self.in_flight.insert(id, origin);
        self.requester.submit(RouteRequest { id, waypoints });
    }

    fn on_route_resolved(
        &mut self,
        request: RequestId,
        outcome: Result<Vec<RouteResult>, RoutingError>,
    ) {
        let Some(origin) = self.in_flight.remove(&request) else {
            warn!("Ignoring answer to unknown route request {:?}", request);
            return;
        };

        // The first candidate is the one we keep
        let route = outcome.and_then(|routes| routes.into_iter().next().ok_or(RoutingError::NoRoute));

        match (origin, route) {
            (RouteOrigin::Selection { waypoints }, Ok(route)) => {
                self.create_workout(request, waypoints, route)
            }
            (RouteOrigin::Selection { .. }, Err(err)) => {
                self.selector.fail(request);
                self.report(&err);
            }
            (RouteOrigin::Replay { workout }, Ok(route)) => self.draw(&workout, &route),
            (RouteOrigin::Replay { workout }, Err(err)) => {
                warn!("Could not redraw workout {}", workout.id);
                self.report(&err);
            }
        }
    }

    fn create_workout(&mut self, request: RequestId, waypoints: [Waypoint; 2], route: RouteResult) {
        let store = &self.store;
        let id = self
            .workout_ids
            .next_id(Timestamp::now(), |id| store.contains(id));
        let workout = Workout::new(id, waypoints);

        if let Err(err) = self.store.append(workout.clone()) {
            error!("Could not save workout {}: {}", workout.id, err);
            self.selector.fail(request);
            self.map.alert(&format!("Could not save workout: {err}"));
            return;
        }
        info!("Created workout {}", workout.id);

        // A newer selection may have started while this one was resolving
        if self.selector.complete(request) {
            self.markers.clear_pending(&mut self.map);
        }

        self.draw(&workout, &route);
    }

    fn draw(&mut self, workout: &Workout, route: &RouteResult) {
        self.map.draw_route(&route.polyline);
        self.markers
            .place_route_markers(&mut self.map, &workout.waypoints);

        let position = self
            .store
            .position(&workout.id)
            .unwrap_or_else(|| self.store.len());
        self.binder.render(workout, position, route);
    }

    fn report(&mut self, err: &RoutingError) {
        error!("Routing failed: {}", err);
        self.map.alert(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        storage::{
            key_value_store::PersistenceError, memory_store::MemoryStore,
            workout_persistence::WorkoutPersistence,
        },
        test_utils::{
            RecordingList, RecordingMap, RecordingRequester, TestApp, route_through, test_app,
        },
    };

    fn click(app: &mut TestApp, at: LatLng, choice: SelectionChoice) {
        app.handle(AppEvent::MapClicked(at));
        app.handle(AppEvent::PopupChoice { at, choice });
    }

    fn select_pair(app: &mut TestApp, start: LatLng, destination: LatLng) -> RequestId {
        click(app, start, SelectionChoice::Start);
        click(app, destination, SelectionChoice::Destination);
        app.requester().last().expect("a submitted request").id
    }

    fn succeed(app: &mut TestApp, request: RequestId) {
        let waypoints = app.requester().find(request).expect("submitted").waypoints;
        app.handle(AppEvent::RouteResolved {
            request,
            outcome: Ok(vec![route_through(&waypoints)]),
        });
    }

    fn fail(app: &mut TestApp, request: RequestId, message: &str) {
        app.handle(AppEvent::RouteResolved {
            request,
            outcome: Err(RoutingError::Service(message.to_string())),
        });
    }

    fn persisted_len(storage: &MemoryStore) -> usize {
        WorkoutPersistence::new(storage.clone()).load().len()
    }

    struct FullDisk;

    impl KeyValueStore for FullDisk {
        fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable(String::from("disk full")))
        }

        fn remove(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_save_keeps_selection_for_retry() {
        let mut app = App::new(
            RecordingMap::default(),
            RecordingList::default(),
            FullDisk,
            RecordingRequester::default(),
        );
        let start = LatLng::new(0.0, 0.0);
        let destination = LatLng::new(2.0, 2.0);
        for (at, choice) in [
            (start, SelectionChoice::Start),
            (destination, SelectionChoice::Destination),
        ] {
            app.handle(AppEvent::MapClicked(at));
            app.handle(AppEvent::PopupChoice { at, choice });
        }
        let request = app.requester().last().unwrap();

        app.handle(AppEvent::RouteResolved {
            request: request.id,
            outcome: Ok(vec![route_through(&request.waypoints)]),
        });

        assert!(app.store().is_empty());
        assert_eq!(
            app.map().alerts,
            vec!["Could not save workout: Storage unavailable: disk full"]
        );
        assert!(matches!(app.selection(), Selection::Unresolved { start: Some(_), .. }));
        assert!(app.markers().pending_start().is_some());
        assert!(app.markers().pending_destination().is_some());
        assert_eq!(app.map().marker_positions(), vec![start, destination]);
        assert!(app.map().routes.is_empty());
        assert!(app.view().entries.is_empty());
        assert_eq!(app.pending_requests(), 0);
    }

    #[test]
    fn test_entry_created_during_replay_stays_on_top() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            for i in 0..2 {
                let offset = i as f64;
                let request = select_pair(
                    &mut app,
                    LatLng::new(offset, offset),
                    LatLng::new(offset + 1.0, offset + 1.0),
                );
                succeed(&mut app, request);
            }
        }

        let mut app = test_app(storage);
        let stored: Vec<WorkoutId> = app.store().workouts().iter().map(|w| w.id.clone()).collect();
        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));
        let replays: Vec<RequestId> = app
            .requester()
            .submitted
            .borrow()
            .iter()
            .map(|r| r.id)
            .collect();

        let created = select_pair(&mut app, LatLng::new(5.0, 5.0), LatLng::new(6.0, 6.0));
        succeed(&mut app, created);
        succeed(&mut app, replays[1]);
        succeed(&mut app, replays[0]);

        let ids: Vec<&WorkoutId> = app.view().entries.iter().map(|e| &e.id).collect();
        assert_eq!(ids, vec![&app.store().workouts()[2].id, &stored[1], &stored[0]]);
    }

    #[test]
    fn test_map_click_offers_both_choices() {
        let mut app = test_app(MemoryStore::default());

        app.handle(AppEvent::MapClicked(LatLng::new(1.0, 1.0)));

        assert_eq!(
            app.map().popup,
            Some((LatLng::new(1.0, 1.0), SelectionChoice::ALL.to_vec()))
        );
    }

    #[test]
    fn test_choice_closes_popup() {
        let mut app = test_app(MemoryStore::default());

        click(&mut app, LatLng::new(1.0, 1.0), SelectionChoice::Start);

        assert!(app.map().popup.is_none());
        assert_eq!(app.map().marker_positions(), vec![LatLng::new(1.0, 1.0)]);
    }

    #[test]
    fn test_each_completed_pair_creates_one_workout() {
        let storage = MemoryStore::default();
        let mut app = test_app(storage.clone());

        for i in 0..3 {
            let offset = i as f64;
            let request = select_pair(
                &mut app,
                LatLng::new(offset, offset),
                LatLng::new(offset + 1.0, offset + 1.0),
            );
            succeed(&mut app, request);

            assert_eq!(app.store().len(), i + 1);
            assert_eq!(persisted_len(&storage), app.store().len());
        }

        let unique: HashSet<&WorkoutId> = app.store().workouts().iter().map(|w| &w.id).collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(app.selection(), &Selection::Idle);
    }

    #[test]
    fn test_success_swaps_pending_for_route_markers() {
        let mut app = test_app(MemoryStore::default());

        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));
        assert!(app.markers().pending_start().is_some());
        assert!(app.markers().pending_destination().is_some());

        succeed(&mut app, request);

        assert!(app.markers().pending_start().is_none());
        assert!(app.markers().pending_destination().is_none());
        assert_eq!(app.markers().route_markers().len(), 2);
        assert_eq!(app.map().markers.len(), 2);
        assert_eq!(app.map().routes.len(), 1);
        assert_eq!(app.view().entries.len(), 1);
    }

    #[test]
    fn test_second_start_is_used() {
        let mut app = test_app(MemoryStore::default());

        click(&mut app, LatLng::new(0.0, 0.0), SelectionChoice::Start);
        let request = select_pair(&mut app, LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0));
        succeed(&mut app, request);

        let workout = &app.store().workouts()[0];
        assert_eq!(workout.start(), &Waypoint::new(1.0, 1.0));
        assert_eq!(workout.destination(), &Waypoint::new(2.0, 2.0));
        assert_eq!(app.map().markers.len(), 2);
    }

    #[test]
    fn test_routing_failure_changes_nothing() {
        let storage = MemoryStore::default();
        let mut app = test_app(storage.clone());

        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));
        fail(&mut app, request, "Impossible route between points");

        assert!(app.store().is_empty());
        assert!(storage.is_empty());
        assert_eq!(app.map().alerts, vec!["Impossible route between points"]);
        assert_eq!(
            app.map().marker_positions(),
            vec![LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0)]
        );
        assert!(app.view().entries.is_empty());
        assert!(matches!(app.selection(), Selection::Unresolved { start: Some(_), .. }));
    }

    #[test]
    fn test_retry_after_failure() {
        let mut app = test_app(MemoryStore::default());
        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));
        fail(&mut app, request, "timeout");

        click(&mut app, LatLng::new(3.0, 3.0), SelectionChoice::Destination);
        let retry = app.requester().last().unwrap();
        assert_eq!(
            retry.waypoints,
            [Waypoint::new(0.0, 0.0), Waypoint::new(3.0, 3.0)]
        );
        assert_eq!(app.map().markers.len(), 2);

        succeed(&mut app, retry.id);

        assert_eq!(app.store().len(), 1);
        assert_eq!(app.map().markers.len(), 2);
    }

    #[test]
    fn test_empty_candidate_list_is_a_failure() {
        let mut app = test_app(MemoryStore::default());
        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));

        app.handle(AppEvent::RouteResolved {
            request,
            outcome: Ok(vec![]),
        });

        assert!(app.store().is_empty());
        assert_eq!(app.map().alerts.len(), 1);
    }

    #[test]
    fn test_first_candidate_wins() {
        let mut app = test_app(MemoryStore::default());
        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));
        let mut detour = route_through(&[Waypoint::new(0.0, 0.0), Waypoint::new(2.0, 2.0)]);
        detour.total_distance = 9999.0;

        app.handle(AppEvent::RouteResolved {
            request,
            outcome: Ok(vec![
                route_through(&[Waypoint::new(0.0, 0.0), Waypoint::new(2.0, 2.0)]),
                detour,
            ]),
        });

        assert_ne!(app.view().entries[0].distance, 9999.0);
    }

    #[test]
    fn test_destination_without_start_is_rejected() {
        let mut app = test_app(MemoryStore::default());

        click(&mut app, LatLng::new(2.0, 2.0), SelectionChoice::Destination);

        assert!(app.requester().submitted.borrow().is_empty());
        assert_eq!(app.pending_requests(), 0);
        assert_eq!(app.map().alerts.len(), 1);
        assert_eq!(app.map().marker_positions(), vec![LatLng::new(2.0, 2.0)]);
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_replay_is_idempotent() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            for i in 0..3 {
                let offset = i as f64;
                let request = select_pair(
                    &mut app,
                    LatLng::new(offset, offset),
                    LatLng::new(offset + 1.0, offset + 1.0),
                );
                succeed(&mut app, request);
            }
        }

        let mut app = test_app(storage.clone());
        assert_eq!(app.store().len(), 3);

        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));
        assert_eq!(app.pending_requests(), 3);

        let requests: Vec<RequestId> = app
            .requester()
            .submitted
            .borrow()
            .iter()
            .map(|r| r.id)
            .collect();
        for request in requests {
            succeed(&mut app, request);
        }

        assert_eq!(app.store().len(), 3);
        assert_eq!(persisted_len(&storage), 3);
        assert_eq!(app.map().routes.len(), 3);
        assert_eq!(app.map().markers.len(), 6);
        assert_eq!(app.view().entries.len(), 3);
    }

    #[test]
    fn test_replay_runs_once() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
            succeed(&mut app, request);
        }

        let mut app = test_app(storage);
        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));
        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));

        assert_eq!(app.requester().submitted.borrow().len(), 1);
    }

    #[test]
    fn test_replay_failure_keeps_workout() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
            succeed(&mut app, request);
        }

        let mut app = test_app(storage.clone());
        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));
        let request = app.requester().last().unwrap().id;
        fail(&mut app, request, "offline");

        assert_eq!(app.store().len(), 1);
        assert_eq!(persisted_len(&storage), 1);
        assert!(app.view().entries.is_empty());
    }

    #[test]
    fn test_position_sets_view_and_tiles() {
        let mut app = test_app(MemoryStore::default());

        app.handle(AppEvent::PositionAcquired(LatLng::new(50.85, 4.35)));

        assert_eq!(app.map().view, Some((LatLng::new(50.85, 4.35), DEFAULT_ZOOM)));
        assert_eq!(app.map().tile_layers, 1);
    }

    #[test]
    fn test_position_unavailable_still_replays() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
            succeed(&mut app, request);
        }

        let mut app = test_app(storage);
        app.handle(AppEvent::PositionUnavailable(String::from("User denied Geolocation")));

        assert_eq!(app.map().alerts, vec!["User denied Geolocation"]);
        assert!(app.map().view.is_none());
        assert_eq!(app.pending_requests(), 1);
    }

    #[test]
    fn test_entry_activation_recenters() {
        let mut app = test_app(MemoryStore::default());
        let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0));
        succeed(&mut app, request);
        let id = app.store().workouts()[0].id.clone();

        app.handle(AppEvent::EntryActivated(Some(id)));

        assert_eq!(app.map().view, Some((LatLng::new(1.0, 1.0), DEFAULT_ZOOM)));
    }

    #[test]
    fn test_activation_outside_entries_is_noop() {
        let mut app = test_app(MemoryStore::default());

        app.handle(AppEvent::EntryActivated(None));
        app.handle(AppEvent::EntryActivated(Some(WorkoutId::new("missing"))));

        assert!(app.map().view.is_none());
        assert!(app.map().alerts.is_empty());
    }

    #[test]
    fn test_stale_success_keeps_newer_selection() {
        let mut app = test_app(MemoryStore::default());
        let first = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));

        click(&mut app, LatLng::new(5.0, 5.0), SelectionChoice::Start);
        succeed(&mut app, first);

        assert_eq!(app.store().len(), 1);
        assert_eq!(
            app.selection(),
            &Selection::AwaitingDestination {
                start: Waypoint::new(5.0, 5.0)
            }
        );
        assert!(app.markers().pending_start().is_some());
    }

    #[test]
    fn test_unknown_request_is_ignored() {
        let mut app = test_app(MemoryStore::default());

        app.handle(AppEvent::RouteResolved {
            request: RequestId(42),
            outcome: Ok(vec![route_through(&[Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 1.0)])]),
        });

        assert!(app.store().is_empty());
        assert!(app.map().routes.is_empty());
    }

    #[test]
    fn test_cleared_storage_reloads_empty() {
        let storage = MemoryStore::default();
        {
            let mut app = test_app(storage.clone());
            let request = select_pair(&mut app, LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
            succeed(&mut app, request);
        }

        let mut cleared = WorkoutStore::load_initial(storage.clone());
        cleared.clear().unwrap();

        let mut app = test_app(storage);
        app.handle(AppEvent::PositionAcquired(LatLng::new(0.0, 0.0)));

        assert!(app.store().is_empty());
        assert_eq!(app.pending_requests(), 0);
        assert!(app.view().entries.is_empty());
    }
}
