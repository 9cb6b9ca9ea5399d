use serde::{Deserialize, Serialize};

use crate::SessionIdentity;

/// Coarse role derived from a [`SessionIdentity`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    Learner,
    Staff,
}

impl Role {
    pub fn of(identity: &SessionIdentity) -> Self {
        match (identity.is_authenticated(), identity.is_staff()) {
            (false, _) => Role::Anonymous,
            (true, false) => Role::Learner,
            (true, true) => Role::Staff,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Learner => "learner",
            Role::Staff => "staff",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
