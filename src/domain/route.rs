// Client routes

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
        }
    }
}

/// A navigation target as requested, before gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestedRoute {
    Login,
    Dashboard,
    Other(String),
}

impl RequestedRoute {
    /// Parses a client path. Accepts hash-router forms such as `#/dashboard`.
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/login" => RequestedRoute::Login,
            "/dashboard" => RequestedRoute::Dashboard,
            _ => RequestedRoute::Other(path.to_string()),
        }
    }
}

impl From<Route> for RequestedRoute {
    fn from(route: Route) -> Self {
        match route {
            Route::Login => RequestedRoute::Login,
            Route::Dashboard => RequestedRoute::Dashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        assert_eq!(RequestedRoute::parse("/login"), RequestedRoute::Login);
        assert_eq!(RequestedRoute::parse("#/dashboard"), RequestedRoute::Dashboard);
        assert_eq!(RequestedRoute::parse("/dashboard/?tab=1"), RequestedRoute::Dashboard);
        assert_eq!(RequestedRoute::parse("/"), RequestedRoute::Other(String::from("/")));
        assert_eq!(
            RequestedRoute::parse("/settings"),
            RequestedRoute::Other(String::from("/settings"))
        );
    }
}
