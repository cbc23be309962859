/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const AUTH_ROUTE_COMPONENT: &str = "auth";
pub const AUTH_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", AUTH_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

pub const GROUPS_ROUTE_COMPONENT: &str = "groups";
pub const GROUPS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", GROUPS_ROUTE_COMPONENT);

pub const ANNOUNCEMENTS_ROUTE_COMPONENT: &str = "announcements";
pub const ANNOUNCEMENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", ANNOUNCEMENTS_ROUTE_COMPONENT);

pub const DEVICES_ROUTE_COMPONENT: &str = "devices";
pub const DEVICES_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", DEVICES_ROUTE_COMPONENT);
