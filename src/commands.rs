//! Operations behind the subcommands and the interactive menu.
//!
//! Each operation returns the text to print so the same code serves both
//! front ends.

use colored::Colorize;
use tracing::debug;

use crate::{
    catalog::{CharacterPage, CharacterSource},
    display,
    error::AppError,
    navigation::{Outcome, Route, resolve},
    pagination::{PageWindow, compute_window},
    profile::UserProfile,
    session::SessionStore,
    storage::KeyValueStore,
};

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 4;

/// Session store paired with a catalog source
pub struct App<S, C> {
    session: SessionStore<S>,
    source: C,
}

impl<S: KeyValueStore, C: CharacterSource> App<S, C> {
    /// Creates the app from a loaded session store
    pub fn new(session: SessionStore<S>, source: C) -> Self {
        Self { session, source }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Signs in, replacing any current profile
    pub fn login_user(&mut self, username: &str, job_title: &str) -> Result<String, AppError> {
        self.session.login(UserProfile::new(username, job_title))?;
        Ok(format!("{} {}", "signed in as".green(), username))
    }

    /// Edits the signed-in profile
    pub fn update_user(&mut self, username: &str, job_title: &str) -> Result<String, AppError> {
        self.require_session(&Route::Settings)?;
        self.session.update_profile(UserProfile::new(username, job_title))?;
        Ok(format!("{}", "profile updated".green()))
    }

    /// Signs out. Succeeds when already signed out.
    pub fn logout_user(&mut self) -> String {
        self.session.logout();
        format!("{}", "signed out".green())
    }

    /// Header for the signed-in profile
    pub fn current_user(&self) -> Result<String, AppError> {
        self.session
            .user()
            .map(display::header_line)
            .ok_or(AppError::SignInRequired)
    }

    /// Fetches listing `page` with its page window
    pub fn listing_page(&self, page: u32) -> Result<(CharacterPage, PageWindow), AppError> {
        let data = self
            .source
            .characters(page)
            .map_err(|err| as_view_failure("characters", err))?;
        let window = compute_window(i64::from(page.max(1)), i64::from(data.info.pages))?;
        Ok((data, window))
    }

    /// Listing view for `page` with the window used for next/previous
    pub fn browse(&self, page: u32) -> Result<(String, PageWindow), AppError> {
        self.require_session(&Route::Information { page })?;
        let (data, window) = self.listing_page(page)?;
        Ok((self.with_header(display::listing(&data, &window)), window))
    }

    /// Listing view for `page`
    pub fn list_characters(&self, page: u32) -> Result<String, AppError> {
        self.browse(page).map(|(view, _)| view)
    }

    /// Detail overlay for character `id`, opened over listing `page`
    pub fn show_character(&self, id: &str, page: u32) -> Result<String, AppError> {
        let route = Route::CharacterDetail {
            id: id.to_string(),
            page,
        };
        self.require_session(&route)?;
        self.render(&route)
    }

    /// Opens a path the way the browser would, following redirects
    pub fn open(&self, target: &str) -> Result<String, AppError> {
        let mut route = Route::parse(target);
        for _ in 0..MAX_REDIRECTS {
            match resolve(&route, self.session.state()) {
                Outcome::Wait => return Ok("Loading...".dimmed().to_string()),
                Outcome::Render(route) => return self.render(&route),
                Outcome::Redirect(next) => {
                    debug!(from = %route.to_path(), to = %next.to_path(), "redirecting");
                    route = next;
                }
            }
        }
        Err(AppError::InvalidArgument(format!(
            "too many redirects opening '{target}'"
        )))
    }

    fn require_session(&self, route: &Route) -> Result<(), AppError> {
        match resolve(route, self.session.state()) {
            Outcome::Redirect(Route::Login) => Err(AppError::SignInRequired),
            _ => Ok(()),
        }
    }

    fn render(&self, route: &Route) -> Result<String, AppError> {
        let body = match route {
            Route::Home => return self.render(&Route::Information { page: 1 }),
            Route::Login => {
                return Ok(format!(
                    "{}\nPlease enter your details to continue: mortydex login <username> <job title>",
                    "Welcome".bold()
                ));
            }
            Route::NotFound(path) => return Ok(format!("{} {}", "page not found:".red(), path)),
            Route::Settings => format!(
                "{}\nUpdate your profile: mortydex update <username> <job title>\nSign out: mortydex logout",
                "Settings".bold()
            ),
            Route::Information { page } => {
                let (data, window) = self.listing_page(*page)?;
                display::listing(&data, &window)
            }
            Route::CharacterDetail { id, .. } => {
                let character = self
                    .source
                    .character(id)
                    .map_err(|err| as_view_failure("character", err))?;
                let back = route
                    .close_overlay()
                    .map(|listing| listing.to_path())
                    .unwrap_or_default();
                format!("{}\n\n{} {}", display::character_detail(&character), "back:".dimmed(), back)
            }
        };

        Ok(self.with_header(body))
    }

    fn with_header(&self, body: String) -> String {
        match self.session.user() {
            Some(user) => format!("{}\n\n{}", display::header_line(user), body),
            None => body,
        }
    }
}

/// Wraps a fetch failure in the block that replaces the failed view
fn as_view_failure(what: &str, err: AppError) -> AppError {
    match err {
        AppError::Fetch(message) => AppError::Fetch(display::fetch_failure(what, &message)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{Character, PaginationInfo, tests::rick},
        storage::MemoryStore,
    };

    /// Canned catalog with 42 pages of Rick
    struct CannedSource {
        offline: bool,
    }

    impl CharacterSource for CannedSource {
        fn characters(&self, page: u32) -> Result<CharacterPage, AppError> {
            if self.offline {
                return Err(AppError::Fetch("connection refused".to_string()));
            }
            Ok(CharacterPage {
                info: PaginationInfo {
                    count: 826,
                    pages: 42,
                    next: (page < 42).then_some(page + 1),
                    prev: (page > 1).then(|| page - 1),
                },
                results: if page <= 42 { vec![rick()] } else { Vec::new() },
            })
        }

        fn character(&self, id: &str) -> Result<Character, AppError> {
            if self.offline || id != "1" {
                return Err(AppError::Fetch(format!("character {id} not found")));
            }
            Ok(rick())
        }
    }

    fn app(offline: bool) -> App<MemoryStore, CannedSource> {
        App::new(
            SessionStore::open(MemoryStore::new()),
            CannedSource { offline },
        )
    }

    fn signed_in_app(offline: bool) -> App<MemoryStore, CannedSource> {
        let mut app = app(offline);
        app.login_user("Rick Sanchez", "Scientist").unwrap();
        app
    }

    #[test]
    fn listing_requires_sign_in() {
        let app = app(false);
        assert!(matches!(
            app.list_characters(1),
            Err(AppError::SignInRequired)
        ));
        assert!(matches!(app.current_user(), Err(AppError::SignInRequired)));
    }

    #[test]
    fn listing_shows_header_cards_and_window() {
        let app = signed_in_app(false);
        let view = app.list_characters(5).unwrap();
        assert!(view.contains("RS"));
        assert!(view.contains("Rick Sanchez"));
        assert!(view.contains("[5]"));
        assert!(view.contains("Showing page 5 of 42 (826 total characters)"));
    }

    #[test]
    fn listing_window_targets_neighbours() {
        let app = signed_in_app(false);
        let (_, window) = app.listing_page(42).unwrap();
        assert_eq!(window.previous_page(), Some(41));
        assert_eq!(window.next_page(), None);
    }

    #[test]
    fn detail_links_back_to_listing_page() {
        let app = signed_in_app(false);
        let view = app.show_character("1", 3).unwrap();
        assert!(view.contains("Last Known Location: Citadel of Ricks"));
        assert!(view.contains("/information?page=3"));
    }

    #[test]
    fn fetch_failures_carry_raw_message() {
        let app = signed_in_app(true);
        match app.list_characters(1) {
            Err(AppError::Fetch(message)) => {
                assert!(message.contains("Failed to load characters"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
        assert!(matches!(
            app.show_character("1", 1),
            Err(AppError::Fetch(_))
        ));
    }

    #[test]
    fn open_follows_redirects() {
        let mut app = app(false);
        assert!(app.open("/").unwrap().contains("Welcome"));
        assert!(app.open("/information?page=2").unwrap().contains("Welcome"));

        app.login_user("Morty", "Student").unwrap();
        let home = app.open("/").unwrap();
        assert!(home.contains("Showing page 1 of 42"));
        assert!(app.open("/login").unwrap().contains("Showing page 1 of 42"));
        assert!(app.open("/information/1?page=7").unwrap().contains("/information?page=7"));
        assert!(app.open("/settings").unwrap().contains("Settings"));
        assert!(app.open("/elsewhere").unwrap().contains("page not found"));
    }

    #[test]
    fn open_waits_while_session_loads() {
        let app = App::new(
            SessionStore::new(MemoryStore::new()),
            CannedSource { offline: false },
        );
        assert!(app.open("/information").unwrap().contains("Loading"));
    }

    #[test]
    fn update_needs_a_session_and_valid_fields() {
        let mut app = app(false);
        assert!(matches!(
            app.update_user("Rick", "Scientist"),
            Err(AppError::SignInRequired)
        ));

        app.login_user("Rick", "Scientist").unwrap();
        assert!(matches!(
            app.update_user("", "Scientist"),
            Err(AppError::Validation(_))
        ));
        app.update_user("Rick", "Pickle").unwrap();
        assert!(app.current_user().unwrap().contains("Pickle"));
    }

    #[test]
    fn logout_twice_is_fine() {
        let mut app = signed_in_app(false);
        app.logout_user();
        app.logout_user();
        assert!(!app.session().is_authenticated());
    }
}
