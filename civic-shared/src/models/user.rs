//! Accounts, roles and volunteer review state.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::EnumIter;

/// Account roles recognised by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Member of the public.
    User,
    /// Field volunteer.
    Volunteer,
    /// Portal administrator.
    Admin,
    /// Administrator who can manage other administrators.
    SuperAdmin,
}

impl Role {
    /// Return the canonical tag used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Volunteer => "volunteer",
            Self::Admin => "admin",
            Self::SuperAdmin => "super-admin",
        }
    }

    /// Whether the role grants access to administrative surfaces.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "volunteer" => Ok(Self::Volunteer),
            "admin" => Ok(Self::Admin),
            "super-admin" => Ok(Self::SuperAdmin),
            _ => Err("unknown user role"),
        }
    }
}

/// Review state of a volunteer account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VolunteerStatus {
    /// Awaiting review.
    Pending,
    /// Cleared to take tasks.
    Active,
    /// Temporarily barred.
    Suspended,
    /// Application declined.
    Rejected,
    /// Missing or unrecognised on the wire.
    #[serde(other)]
    Unknown,
}

impl VolunteerStatus {
    /// Whether the volunteer may use the volunteer portal.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Identifier assigned by the platform API. Older deployments emit numeric
/// ids, newer ones emit strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum UserId {
    /// Legacy numeric id.
    Number(i64),
    /// Opaque string id.
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// The kind of account behind a session.
///
/// Volunteer review state only exists on volunteer accounts, so it travels
/// with that variant instead of sitting on every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    /// Member of the public.
    User,
    /// Volunteer, with their review state.
    Volunteer {
        /// Where the volunteer's review stands.
        status: VolunteerStatus,
    },
    /// Portal administrator.
    Admin,
    /// Administrator with full rights.
    SuperAdmin,
}

impl AccountKind {
    /// Flat role tag for allow-lists.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Volunteer { .. } => Role::Volunteer,
            Self::Admin => Role::Admin,
            Self::SuperAdmin => Role::SuperAdmin,
        }
    }
}

/// User record exactly as the API serialises it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPayload {
    /// Platform id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Sign-in email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role tag.
    pub role: Role,
    /// Review state; meaningful for volunteers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volunteer_status: Option<VolunteerStatus>,
    /// Super admin flag, sent separately from the role.
    #[serde(
        default,
        rename = "isSuperAdmin",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_super_admin: Option<bool>,
}

/// An authenticated identity as seen by the front ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "UserPayload", into = "UserPayload")]
pub struct User {
    /// Platform id.
    pub id: Option<UserId>,
    /// Sign-in email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role, with volunteer review state attached.
    pub kind: AccountKind,
    /// Set by the API independently of the role tag.
    pub is_super_admin: bool,
}

impl User {
    /// Flat role tag of this account.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.kind.role()
    }

    /// Review state, present only for volunteer accounts.
    #[must_use]
    pub const fn volunteer_status(&self) -> Option<VolunteerStatus> {
        match self.kind {
            AccountKind::Volunteer { status } => Some(status),
            _ => None,
        }
    }

    /// Admin or super admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    /// Volunteer account of any review state.
    #[must_use]
    pub const fn is_volunteer(&self) -> bool {
        matches!(self.kind, AccountKind::Volunteer { .. })
    }

    /// Name to show in navigation chrome.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Account")
    }
}

impl From<UserPayload> for User {
    fn from(payload: UserPayload) -> Self {
        let kind = match payload.role {
            Role::User => AccountKind::User,
            Role::Volunteer => AccountKind::Volunteer {
                status: payload.volunteer_status.unwrap_or(VolunteerStatus::Unknown),
            },
            Role::Admin => AccountKind::Admin,
            Role::SuperAdmin => AccountKind::SuperAdmin,
        };
        Self {
            id: payload.id,
            email: payload.email,
            name: payload.name,
            kind,
            is_super_admin: payload.is_super_admin.unwrap_or(false),
        }
    }
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        let volunteer_status = user.volunteer_status();
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.kind.role(),
            volunteer_status,
            is_super_admin: Some(user.is_super_admin),
        }
    }
}
