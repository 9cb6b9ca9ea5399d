//! Named routes of the client and their static metadata.

use serde::{Deserialize, Serialize};

use crate::Requirement;

/// Every destination the client can navigate to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteName {
    Login,
    Register,
    PasswordRequest,
    PasswordReset,
    Profile,
    InstructorLessons,
    InstructorQuizzes,
    InstructorChalkboard,
    InstructorDashboard,
    StudentQuiz,
    StudentScore,
    Index,
    Lost,
}

/// Static description of one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub name: RouteName,
    /// Path pattern; `None` for the catch-all.
    pub path: Option<&'static str>,
    pub title: Option<&'static str>,
    pub requirement: Requirement,
    pub hide_nav: bool,
    pub hide_footer: bool,
}

impl RouteDef {
    const fn new(name: RouteName, path: &'static str, title: &'static str, requirement: Requirement) -> Self {
        Self {
            name,
            path: Some(path),
            title: Some(title),
            requirement,
            hide_nav: false,
            hide_footer: false,
        }
    }

    const fn hide_nav(mut self) -> Self {
        self.hide_nav = true;
        self
    }

    const fn hide_footer(mut self) -> Self {
        self.hide_footer = true;
        self
    }
}

pub static ROUTES: &[RouteDef] = &[
    RouteDef::new(RouteName::Login, "/login", "Login", Requirement::Public).hide_nav(),
    RouteDef::new(RouteName::Register, "/register", "Register", Requirement::Public).hide_nav(),
    RouteDef::new(RouteName::PasswordRequest, "/password/request", "Password Request", Requirement::Public)
        .hide_nav(),
    RouteDef::new(RouteName::PasswordReset, "/password/reset", "Password Reset", Requirement::Public)
        .hide_nav(),
    RouteDef::new(RouteName::Profile, "/profile", "Profile", Requirement::Authenticated),
    RouteDef::new(RouteName::InstructorLessons, "/instructor/lessons", "Lessons", Requirement::Staff),
    RouteDef::new(RouteName::InstructorQuizzes, "/instructor/quizzes", "Quizzes", Requirement::Staff),
    RouteDef::new(RouteName::InstructorChalkboard, "/instructor/chalkboard", "Chalkboard", Requirement::Staff)
        .hide_nav()
        .hide_footer(),
    RouteDef::new(RouteName::InstructorDashboard, "/instructor/dashboard", "Dashboard", Requirement::Staff),
    RouteDef::new(RouteName::StudentQuiz, "/student/quiz", "Quiz", Requirement::Authenticated),
    RouteDef::new(RouteName::StudentScore, "/student/score", "Score", Requirement::Authenticated),
    RouteDef {
        name: RouteName::Index,
        path: Some("/"),
        title: None,
        requirement: Requirement::Public,
        hide_nav: false,
        hide_footer: false,
    },
    RouteDef {
        name: RouteName::Lost,
        path: None,
        title: None,
        requirement: Requirement::Public,
        hide_nav: true,
        hide_footer: true,
    },
];

impl RouteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Login => "login",
            RouteName::Register => "register",
            RouteName::PasswordRequest => "password-request",
            RouteName::PasswordReset => "password-reset",
            RouteName::Profile => "profile",
            RouteName::InstructorLessons => "instructor-lessons",
            RouteName::InstructorQuizzes => "instructor-quizzes",
            RouteName::InstructorChalkboard => "instructor-chalkboard",
            RouteName::InstructorDashboard => "instructor-dashboard",
            RouteName::StudentQuiz => "student-quiz",
            RouteName::StudentScore => "student-score",
            RouteName::Index => "index",
            RouteName::Lost => "lost",
        }
    }

    /// Static metadata for this route.
    pub fn def(&self) -> &'static RouteDef {
        ROUTES
            .iter()
            .find(|def| def.name == *self)
            .unwrap_or(&ROUTES[ROUTES.len() - 1])
    }

    /// Canonical path of this route (the catch-all has none).
    pub fn path(&self) -> Option<&'static str> {
        self.def().path
    }

    /// Match a location to a route; anything unknown lands on [`RouteName::Lost`].
    ///
    /// Query strings, fragments and a single trailing slash are ignored.
    pub fn from_path(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        let path = if path.is_empty() { "/" } else { path };

        ROUTES
            .iter()
            .find(|def| def.path == Some(path))
            .map(|def| def.name)
            .unwrap_or(RouteName::Lost)
    }
}

impl core::fmt::Display for RouteName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTES
            .iter()
            .map(|def| def.name)
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown route '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_has_exactly_one_definition() {
        for def in ROUTES {
            let count = ROUTES.iter().filter(|other| other.name == def.name).count();
            assert_eq!(count, 1, "duplicate route {}", def.name);
            assert_eq!(def.name.def(), def);
        }
    }

    #[test]
    fn paths_match_routes() {
        assert_eq!(RouteName::from_path("/"), RouteName::Index);
        assert_eq!(RouteName::from_path(""), RouteName::Index);
        assert_eq!(RouteName::from_path("/login"), RouteName::Login);
        assert_eq!(RouteName::from_path("/login/"), RouteName::Login);
        assert_eq!(RouteName::from_path("/student/quiz?lesson=3"), RouteName::StudentQuiz);
        assert_eq!(RouteName::from_path("/instructor/dashboard#top"), RouteName::InstructorDashboard);
        assert_eq!(RouteName::from_path("/nowhere"), RouteName::Lost);
        assert_eq!(RouteName::from_path("/instructor"), RouteName::Lost);
    }

    #[test]
    fn instructor_routes_require_staff() {
        for name in [
            RouteName::InstructorLessons,
            RouteName::InstructorQuizzes,
            RouteName::InstructorChalkboard,
            RouteName::InstructorDashboard,
        ] {
            assert_eq!(name.def().requirement, Requirement::Staff);
        }
        assert_eq!(RouteName::Profile.def().requirement, Requirement::Authenticated);
        assert_eq!(RouteName::StudentScore.def().requirement, Requirement::Authenticated);
    }

    #[test]
    fn names_round_trip_through_strings() {
        for def in ROUTES {
            assert_eq!(def.name.as_str().parse::<RouteName>(), Ok(def.name));
        }
        assert!("admin".parse::<RouteName>().is_err());
    }
}
