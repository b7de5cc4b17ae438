//! Reserved names shared by the server-data pass and the route runtime

/// Named export that carries a route's server data loader.
/// It is compiled as a separate unit and never shipped inside the page module.
pub const SERVER_DATA_EXPORT: &str = "routeData";

/// Boolean export injected into page modules that had a server data loader.
/// The router reads it to decide whether to fetch server data for a route.
pub const HAS_SERVER_MARKER: &str = "__has_server";

/// Length of the digest returned by [`crate::content_hash`].
pub const CONTENT_HASH_LEN: usize = 10;
