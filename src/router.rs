use crate::auth::AuthStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    /// OAuth return page.
    Redirect,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Redirect => "/redirect",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            "/" | "" => Some(Route::Landing),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/redirect" => Some(Route::Redirect),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }

    fn requires_auth(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Where a navigation to `requested` actually lands.
pub fn resolve(requested: Route, auth: &AuthStore) -> Route {
    if requested.requires_auth() && !auth.is_authenticated() {
        Route::Login
    } else {
        requested
    }
}
