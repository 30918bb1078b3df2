pub mod app;
pub mod event_loop;
pub mod geolocation;
pub mod lat_lng;
pub mod list_view;
pub mod map;
pub mod route_requester;
pub mod route_result;
pub mod routing_service;
pub mod schema;
pub mod selection;
pub mod storage;
pub mod view_binder;
pub mod waypoint;
pub mod workout;
pub mod workout_store;

#[cfg(test)]
pub(crate) mod test_utils;
