pub mod map_surface;
pub mod marker_registry;
