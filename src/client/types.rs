//! Wire types for the profile, membership and password-reset endpoints and
//! the normalized [`ProfileData`] the views work with.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Binary membership state persisted by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
    #[default]
    Inactive,
}

impl MembershipStatus {
    /// Only the literal string `"Active"` counts as active. Absent values,
    /// `null`, booleans, numbers and any other string collapse to inactive.
    #[must_use]
    pub fn from_wire(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(value)) if value == "Active" => Self::Active,
            _ => Self::Inactive,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized profile shown by the profile view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
    pub membership_active: MembershipStatus,
}

/// Profile fields as the backend sends them; every field may be missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "membershipActive")]
    pub membership_active: Option<Value>,
}

impl ProfilePayload {
    #[must_use]
    pub fn normalize(self) -> ProfileData {
        ProfileData {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            membership_active: MembershipStatus::from_wire(self.membership_active.as_ref()),
        }
    }
}

impl From<&ProfileData> for ProfilePayload {
    fn from(profile: &ProfileData) -> Self {
        Self {
            name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            membership_active: Some(Value::String(profile.membership_active.as_str().to_string())),
        }
    }
}

/// `GET /auth/profile` body: either `{ "profile": { ... } }` or the flat fields.
/// A present, non-null `profile` member must itself be well formed; it never
/// falls back to the flat reading.
#[derive(Clone, Debug)]
pub enum ProfileResponse {
    Wrapped(ProfilePayload),
    Flat(ProfilePayload),
}

impl ProfileResponse {
    #[must_use]
    pub fn into_profile(self) -> ProfileData {
        match self {
            Self::Wrapped(profile) | Self::Flat(profile) => profile.normalize(),
        }
    }
}

impl<'de> Deserialize<'de> for ProfileResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        let wrapped = value.get_mut("profile").map(Value::take);

        match wrapped {
            Some(Value::Null) | None => ProfilePayload::deserialize(value).map(Self::Flat),
            Some(inner) => ProfilePayload::deserialize(inner).map(Self::Wrapped),
        }
        .map_err(de::Error::custom)
    }
}

/// Action sent to the membership endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipAction {
    Activate,
    Deactivate,
    /// Body-less request; the backend flips the current state.
    Toggle,
}

impl MembershipAction {
    /// Value of the `action` field, `None` for the body-less toggle.
    #[must_use]
    pub const fn as_wire(self) -> Option<&'static str> {
        match self {
            Self::Activate => Some("activate"),
            Self::Deactivate => Some("deactivate"),
            Self::Toggle => None,
        }
    }

    /// Whether the action can change `current`. The single toggle always can.
    #[must_use]
    pub const fn applies_to(self, current: MembershipStatus) -> bool {
        match self {
            Self::Activate => !current.is_active(),
            Self::Deactivate => current.is_active(),
            Self::Toggle => true,
        }
    }
}

impl fmt::Display for MembershipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire().unwrap_or("toggle"))
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleMembershipRequest {
    pub action: &'static str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ToggleMembershipResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "membershipActive")]
    pub membership_active: Option<Value>,
}

/// Result of an accepted membership change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipChange {
    pub membership_active: MembershipStatus,
    pub message: Option<String>,
}

#[derive(Serialize)]
pub struct ResetPasswordRequest<'a> {
    #[serde(rename = "newPassword")]
    pub new_password: &'a str,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResetPasswordResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
