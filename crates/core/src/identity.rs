//! Who is logged in, and with what role.

use serde::{Deserialize, Serialize};

use crate::Role;

/// In-memory view of the current session's identity.
///
/// An empty username means anonymous. Both fields are only ever replaced
/// together; there is no setter for a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionIdentity {
    username: String,
    is_staff: bool,
}

impl SessionIdentity {
    /// Build an identity. The staff flag is dropped for anonymous identities.
    pub fn new(username: impl Into<String>, is_staff: bool) -> Self {
        let username = username.into();
        let is_staff = is_staff && !username.is_empty();
        Self { username, is_staff }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Rebuild an identity from the two persisted string slots.
    ///
    /// Missing slots decode as anonymous / non-staff.
    pub fn from_persisted(username: Option<&str>, staff_flag: Option<&str>) -> Self {
        Self::new(username.unwrap_or_default(), decode_staff_flag(staff_flag))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    pub fn is_authenticated(&self) -> bool {
        !self.username.is_empty()
    }

    pub fn role(&self) -> Role {
        Role::of(self)
    }
}

impl From<IdentityRecord> for SessionIdentity {
    fn from(record: IdentityRecord) -> Self {
        Self::new(record.username, record.is_staff)
    }
}

/// Body of `GET /api/user/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub username: String,
    pub is_staff: bool,
}

/// Encode the staff flag for a string-valued store slot.
pub fn encode_staff_flag(is_staff: bool) -> &'static str {
    if is_staff { "true" } else { "false" }
}

/// Decode a persisted staff flag. Anything but the exact string `"true"` is `false`.
pub fn decode_staff_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn anonymous_identity_is_never_staff() {
        let identity = SessionIdentity::new("", true);
        assert!(!identity.is_authenticated());
        assert!(!identity.is_staff());
    }

    #[test]
    fn staff_flag_decodes_strictly() {
        assert!(decode_staff_flag(Some("true")));
        assert!(!decode_staff_flag(Some("True")));
        assert!(!decode_staff_flag(Some("1")));
        assert!(!decode_staff_flag(None));
    }

    #[test]
    fn persisted_slots_restore_identity() {
        let identity = SessionIdentity::from_persisted(Some("bob"), Some("true"));
        assert_eq!(identity.username(), "bob");
        assert!(identity.is_staff());

        let empty = SessionIdentity::from_persisted(None, Some("true"));
        assert_eq!(empty, SessionIdentity::anonymous());
    }

    #[test]
    fn record_deserializes_from_me_payload() {
        let record: IdentityRecord =
            serde_json::from_str(r#"{"username":"alice","is_staff":false,"email":"x"}"#).unwrap();
        let identity = SessionIdentity::from(record);
        assert_eq!(identity.username(), "alice");
        assert!(!identity.is_staff());
    }

    proptest! {
        #[test]
        fn staff_flag_survives_encoding(is_staff in any::<bool>()) {
            prop_assert_eq!(decode_staff_flag(Some(encode_staff_flag(is_staff))), is_staff);
        }
    }
}
