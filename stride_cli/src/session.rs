use std::sync::Arc;

use stride_core::{
    app::App,
    event_loop::{self, EventReceiver},
    geolocation::{self, FixedGeolocator},
    lat_lng::LatLng,
    route_requester::TokioRouteRequester,
    storage::file_store::FileStore,
};
use stride_osrm::client::{OsrmRouteClient, OsrmRouteClientParams};
use tracing::info;

use crate::{
    config::Config,
    terminal::{TerminalList, TerminalMap},
};

pub type TerminalApp =
    App<TerminalMap, TerminalList, FileStore, TokioRouteRequester<OsrmRouteClient>>;

/// A running app with its event queue. Startup (position lookup and replay of
/// stored workouts) has been kicked off but not awaited.
pub struct Session {
    pub app: TerminalApp,
    events: EventReceiver,
}

impl Session {
    pub async fn start(config: &Config, at: Option<LatLng>) -> anyhow::Result<Self> {
        let storage = FileStore::open(&config.data_dir)?;
        info!("Using data folder {}", storage.folder().display());

        let client = OsrmRouteClient::new(OsrmRouteClientParams {
            osrm_url: config.osrm_url.clone(),
            profile: config.osrm_profile.clone(),
        });

        let (sender, events) = event_loop::channel();
        let requester = TokioRouteRequester::new(Arc::new(client), sender);
        let mut app = App::new(
            TerminalMap::default(),
            TerminalList::default(),
            storage,
            requester,
        );

        let geolocator = FixedGeolocator::new(at.or(config.home));
        app.handle(geolocation::locate(&geolocator).await);

        Ok(Self { app, events })
    }

    /// Handles events until every route request has been answered.
    pub async fn settle(&mut self) {
        event_loop::run_until_settled(&mut self.app, &mut self.events, |_| {}).await;
    }

    pub async fn settle_with<F>(&mut self, on_event: F)
    where
        F: FnMut(&TerminalApp),
    {
        event_loop::run_until_settled(&mut self.app, &mut self.events, on_event).await;
    }
}
