// Route guard - Gates navigation on session presence
use crate::domain::route::{RequestedRoute, Route};

pub struct RouteGuard;

impl RouteGuard {
    /// Destination for a requested route. Pure and total.
    pub fn resolve(requested: &RequestedRoute, authenticated: bool) -> Route {
        match (requested, authenticated) {
            (RequestedRoute::Login, false) => Route::Login,
            (RequestedRoute::Login, true) => Route::Dashboard,
            (RequestedRoute::Dashboard, true) => Route::Dashboard,
            (RequestedRoute::Dashboard, false) => Route::Login,
            (RequestedRoute::Other(_), _) => Route::Login,
        }
    }

    /// Follows redirects until the destination resolves to itself.
    pub fn settle(requested: &RequestedRoute, authenticated: bool) -> Route {
        let mut route = Self::resolve(requested, authenticated);
        loop {
            let next = Self::resolve(&route.into(), authenticated);
            if next == route {
                return route;
            }
            route = next;
        }
    }
}
