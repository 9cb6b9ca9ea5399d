//! Navigation resolution: location → route, following redirects and guards.

use quizdesk_core::SessionIdentity;

use crate::RouteName;
use crate::authorize::{GuardDecision, guard, index_destination};

/// Upper bound on redirect hops for a single navigation attempt.
const MAX_REDIRECTS: usize = 4;

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Route the location matched before any redirect.
    pub requested: RouteName,
    /// Route that is actually entered.
    pub entered: RouteName,
    /// Document title for the entered route.
    pub title: String,
    pub hide_nav: bool,
    pub hide_footer: bool,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.entered
    }
}

/// Decides which view a navigation attempt ends up in.
///
/// Resolution is synchronous and reads only the identity passed in.
#[derive(Debug, Clone)]
pub struct Router {
    site_title: String,
}

impl Router {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    pub fn site_title(&self) -> &str {
        &self.site_title
    }

    /// Resolve a location (path with optional query/fragment).
    pub fn resolve(&self, location: &str, identity: &SessionIdentity) -> Navigation {
        self.navigate(RouteName::from_path(location), identity)
    }

    /// Resolve a named route.
    pub fn navigate(&self, requested: RouteName, identity: &SessionIdentity) -> Navigation {
        let mut current = requested;

        for _ in 0..MAX_REDIRECTS {
            let next = if current == RouteName::Index {
                Some(index_destination(identity))
            } else {
                match guard(identity, current.def().requirement) {
                    GuardDecision::Allow => None,
                    GuardDecision::Redirect(to) => Some(to),
                }
            };

            match next {
                Some(to) => {
                    tracing::debug!(from = %current, to = %to, "navigation redirected");
                    current = to;
                }
                None => break,
            }
        }

        let def = current.def();
        Navigation {
            requested,
            entered: current,
            title: self.document_title(current),
            hide_nav: def.hide_nav,
            hide_footer: def.hide_footer,
        }
    }

    /// `"{site} - {route title}"`, or the bare site title for untitled routes.
    pub fn document_title(&self, route: RouteName) -> String {
        match route.def().title {
            Some(title) => format!("{} - {}", self.site_title, title),
            None => self.site_title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        Router::new("Quizdesk")
    }

    #[test]
    fn index_sends_anonymous_to_login() {
        let nav = router().resolve("/", &SessionIdentity::new("", false));
        assert_eq!(nav.requested, RouteName::Index);
        assert_eq!(nav.entered, RouteName::Login);
        assert_eq!(nav.title, "Quizdesk - Login");
        assert!(nav.hide_nav);
    }

    #[test]
    fn index_sends_learner_to_quiz() {
        let nav = router().resolve("/", &SessionIdentity::new("alice", false));
        assert_eq!(nav.entered, RouteName::StudentQuiz);
        assert_eq!(nav.title, "Quizdesk - Quiz");
    }

    #[test]
    fn index_sends_staff_to_dashboard() {
        let nav = router().resolve("/", &SessionIdentity::new("bob", true));
        assert_eq!(nav.entered, RouteName::InstructorDashboard);
        assert!(nav.was_redirected());
    }

    #[test]
    fn learner_is_bounced_from_instructor_views() {
        let nav = router().resolve("/instructor/lessons", &SessionIdentity::new("alice", false));
        assert_eq!(nav.requested, RouteName::InstructorLessons);
        assert_eq!(nav.entered, RouteName::Login);
    }

    #[test]
    fn staff_enters_chalkboard_without_chrome() {
        let nav = router().resolve("/instructor/chalkboard", &SessionIdentity::new("bob", true));
        assert_eq!(nav.entered, RouteName::InstructorChalkboard);
        assert!(!nav.was_redirected());
        assert!(nav.hide_nav);
        assert!(nav.hide_footer);
    }

    #[test]
    fn unknown_paths_are_lost_with_bare_title() {
        let nav = router().resolve("/does/not/exist", &SessionIdentity::anonymous());
        assert_eq!(nav.entered, RouteName::Lost);
        assert_eq!(nav.title, "Quizdesk");
    }
}
