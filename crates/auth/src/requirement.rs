use serde::{Deserialize, Serialize};

/// What a route demands of the session before it may be entered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Anyone, including anonymous visitors.
    Public,
    /// A non-empty username.
    Authenticated,
    /// A non-empty username carrying the staff flag.
    Staff,
}

impl Requirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Requirement::Public => "public",
            Requirement::Authenticated => "authenticated",
            Requirement::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Requirement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
