//! Routes of the application and the session checks that gate them.

use crate::{
    pagination::{page_url, parse_page_param},
    session::SessionState,
};

/// Base path of the character listing
pub const LISTING_PATH: &str = "/information";

/// Navigable location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Settings,
    /// Character listing at `page`
    Information { page: u32 },
    /// Character overlay opened on top of listing `page`
    CharacterDetail { id: String, page: u32 },
    NotFound(String),
}

/// What to do with a requested route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Session still loading, render nothing yet
    Wait,
    Redirect(Route),
    Render(Route),
}

impl Route {
    /// Parses a path with an optional query string, e.g. `/information/42?page=3`
    pub fn parse(target: &str) -> Route {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let page = parse_page_param(query_param(query, "page"));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["settings"] => Route::Settings,
            ["information"] => Route::Information { page },
            ["information", id] => Route::CharacterDetail {
                id: (*id).to_string(),
                page,
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::Information { page } => page_url(LISTING_PATH, *page),
            Route::CharacterDetail { id, page } => page_url(&format!("{LISTING_PATH}/{id}"), *page),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Listing underneath an overlay, so closing it returns to the same page
    pub fn close_overlay(&self) -> Option<Route> {
        match self {
            Route::CharacterDetail { page, .. } => Some(Route::Information { page: *page }),
            _ => None,
        }
    }

    fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Settings | Route::Information { .. } | Route::CharacterDetail { .. }
        )
    }
}

/// Decides how to handle `route` for the current session state
pub fn resolve(route: &Route, state: &SessionState) -> Outcome {
    if let Route::NotFound(_) = route {
        return Outcome::Render(route.clone());
    }
    if state.is_loading() {
        return Outcome::Wait;
    }

    let signed_in = state.is_authenticated();
    match route {
        Route::Home if signed_in => Outcome::Redirect(Route::Information { page: 1 }),
        Route::Home => Outcome::Redirect(Route::Login),
        Route::Login if signed_in => Outcome::Redirect(Route::Information { page: 1 }),
        gated if gated.requires_session() && !signed_in => Outcome::Redirect(Route::Login),
        _ => Outcome::Render(route.clone()),
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserProfile;

    fn signed_in() -> SessionState {
        SessionState::Present(UserProfile::new("Rick", "Scientist"))
    }

    #[test]
    fn parses_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/settings/"), Route::Settings);
        assert_eq!(Route::parse("/information"), Route::Information { page: 1 });
        assert_eq!(
            Route::parse("/information?page=4"),
            Route::Information { page: 4 }
        );
        assert_eq!(
            Route::parse("/information/42?sort=x&page=3"),
            Route::CharacterDetail {
                id: "42".to_string(),
                page: 3
            }
        );
        assert_eq!(
            Route::parse("/information?page=-2"),
            Route::Information { page: 1 }
        );
        assert_eq!(
            Route::parse("/nowhere?page=2"),
            Route::NotFound("/nowhere".to_string())
        );
    }

    #[test]
    fn paths_round_trip_through_parse() {
        for route in [
            Route::Home,
            Route::Login,
            Route::Settings,
            Route::Information { page: 7 },
            Route::CharacterDetail {
                id: "1".to_string(),
                page: 2,
            },
        ] {
            assert_eq!(Route::parse(&route.to_path()), route);
        }
    }

    #[test]
    fn closing_overlay_keeps_listing_page() {
        let detail = Route::CharacterDetail {
            id: "5".to_string(),
            page: 3,
        };
        assert_eq!(detail.close_overlay(), Some(Route::Information { page: 3 }));
        assert_eq!(Route::Login.close_overlay(), None);
    }

    #[test]
    fn loading_session_waits() {
        for route in [Route::Home, Route::Login, Route::Information { page: 2 }] {
            assert_eq!(resolve(&route, &SessionState::Loading), Outcome::Wait);
        }
    }

    #[test]
    fn signed_out_is_sent_to_login() {
        let state = SessionState::Absent;
        assert_eq!(resolve(&Route::Home, &state), Outcome::Redirect(Route::Login));
        assert_eq!(
            resolve(&Route::Information { page: 3 }, &state),
            Outcome::Redirect(Route::Login)
        );
        assert_eq!(resolve(&Route::Settings, &state), Outcome::Redirect(Route::Login));
        assert_eq!(resolve(&Route::Login, &state), Outcome::Render(Route::Login));
    }

    #[test]
    fn signed_in_skips_login() {
        let state = signed_in();
        let listing = Route::Information { page: 1 };
        assert_eq!(resolve(&Route::Home, &state), Outcome::Redirect(listing.clone()));
        assert_eq!(resolve(&Route::Login, &state), Outcome::Redirect(listing));
        assert_eq!(
            resolve(&Route::Information { page: 9 }, &state),
            Outcome::Render(Route::Information { page: 9 })
        );
    }

    #[test]
    fn not_found_renders_regardless_of_session() {
        let route = Route::NotFound("/x".to_string());
        assert_eq!(
            resolve(&route, &SessionState::Loading),
            Outcome::Render(route.clone())
        );
    }
}
