//! Common types used across Treadstock

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Role of an admin account
///
/// Super admins can additionally manage other admin accounts; everything else
/// is available to both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl Default for AdminRole {
    fn default() -> Self {
        Self::Admin
    }
}

impl AdminRole {
    /// Check if this role can manage other admin accounts
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(format!("Invalid admin role: {}", s)),
        }
    }
}

/// Triage status of a contact inquiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    InProgress,
    Resolved,
}

impl Default for InquiryStatus {
    fn default() -> Self {
        Self::New
    }
}

impl InquiryStatus {
    /// Check if the inquiry still needs attention
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Resolved)
    }
}

impl std::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(format!("Invalid inquiry status: {}", s)),
        }
    }
}

/// Tire season rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TireSeason {
    Summer,
    Winter,
    AllSeason,
}

impl std::fmt::Display for TireSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summer => write!(f, "summer"),
            Self::Winter => write!(f, "winter"),
            Self::AllSeason => write!(f, "all_season"),
        }
    }
}

/// Wheel construction material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WheelMaterial {
    Steel,
    Alloy,
}

impl std::fmt::Display for WheelMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Steel => write!(f, "steel"),
            Self::Alloy => write!(f, "alloy"),
        }
    }
}

/// Kind of inventory item an inquiry may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Vehicle,
    Tire,
    Wheel,
}

// =============================================================================
// Database Models
// =============================================================================

/// Admin account model
///
/// The reset-token columns hold the state of the password-reset protocol:
/// only a SHA-256 hash of the token is ever stored, and the hash, expiry and
/// attempt counter are written together in single-statement updates.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<OffsetDateTime>,
    pub reset_attempts: i32,
    pub last_reset_request_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Vehicle listing model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price_cents: i64,
    pub mileage_km: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub description: Option<String>,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Tire listing model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tire {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub width_mm: i32,
    pub aspect_ratio: i32,
    pub rim_diameter_in: i32,
    pub season: TireSeason,
    pub price_cents: i64,
    pub stock_count: i32,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Wheel listing model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Wheel {
    pub id: Uuid,
    pub brand: String,
    pub rim_diameter_in: i32,
    pub bolt_pattern: String,
    pub material: WheelMaterial,
    pub price_cents: i64,
    pub stock_count: i32,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Contact inquiry model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: InquiryStatus,
    pub listing_kind: Option<ListingKind>,
    pub listing_id: Option<Uuid>,
    pub replied_at: Option<OffsetDateTime>,
    pub replied_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_default() {
        assert_eq!(AdminRole::default(), AdminRole::Admin);
    }

    #[test]
    fn test_admin_role_super_admin_check() {
        assert!(!AdminRole::Admin.is_super_admin());
        assert!(AdminRole::SuperAdmin.is_super_admin());
    }

    #[test]
    fn test_admin_role_display_and_parse() {
        assert_eq!(format!("{}", AdminRole::Admin), "admin");
        assert_eq!(format!("{}", AdminRole::SuperAdmin), "super_admin");
        assert_eq!("admin".parse::<AdminRole>().unwrap(), AdminRole::Admin);
        assert_eq!(
            "SUPER_ADMIN".parse::<AdminRole>().unwrap(),
            AdminRole::SuperAdmin
        );
        assert!("owner".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_admin_role_serde_round_trip() {
        let json = serde_json::to_string(&AdminRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let role: AdminRole = serde_json::from_str(&json).unwrap();
        assert_eq!(role, AdminRole::SuperAdmin);
    }

    #[test]
    fn test_inquiry_status_default() {
        assert_eq!(InquiryStatus::default(), InquiryStatus::New);
    }

    #[test]
    fn test_inquiry_status_is_open() {
        assert!(InquiryStatus::New.is_open());
        assert!(InquiryStatus::InProgress.is_open());
        assert!(!InquiryStatus::Resolved.is_open());
    }

    #[test]
    fn test_inquiry_status_display_and_parse() {
        assert_eq!(format!("{}", InquiryStatus::InProgress), "in_progress");
        assert_eq!(
            "in_progress".parse::<InquiryStatus>().unwrap(),
            InquiryStatus::InProgress
        );
        assert!("closed".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_tire_season_serde() {
        let json = serde_json::to_string(&TireSeason::AllSeason).unwrap();
        assert_eq!(json, "\"all_season\"");
    }

    #[test]
    fn test_admin_account_hides_secrets_in_json() {
        let account = AdminAccount {
            id: Uuid::new_v4(),
            email: "ops@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            name: "Ops".to_string(),
            role: AdminRole::Admin,
            reset_token_hash: Some("deadbeef".to_string()),
            reset_token_expires_at: None,
            reset_attempts: 0,
            last_reset_request_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("deadbeef"));
        assert!(json.contains("ops@example.com"));
    }
}
