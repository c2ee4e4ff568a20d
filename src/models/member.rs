//! Member model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::MemberRole;

/// Member of the unit
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub role: MemberRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Personal identification number (OIB, 11 digits)
    pub personal_id: Option<String>,
    /// Date of the last medical examination
    pub medical_exam_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Member {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Last First", the order used in the check-out book
    pub fn sort_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    /// Case-insensitive search over both name orders and the role
    pub fn matches(&self, needle: &str) -> bool {
        let q = needle.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&q)
            || self.sort_name().to_lowercase().contains(&q)
            || self.role.label().to_lowercase().contains(&q)
            || self.role.as_str().contains(&q)
    }
}

/// Create member request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMember {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub role: MemberRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: Option<NaiveDate>,
    pub personal_id: Option<String>,
    /// Medical examination date (YYYY-MM-DD)
    pub medical_exam_date: Option<NaiveDate>,
}

/// Update member request (in-place edit form)
///
/// Optional fields distinguish absent (left unchanged) from `null` or blank
/// (cleared).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMember {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,
    pub role: Option<MemberRole>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub email: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, nullable)]
    pub personal_id: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub medical_exam_date: Option<Option<NaiveDate>>,
}

/// Member query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct MemberQuery {
    /// Search in names and role
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member {
            id: Uuid::new_v4(),
            first_name: "Ivan".to_string(),
            last_name: "Horvat".to_string(),
            role: MemberRole::Commander,
            phone: None,
            email: None,
            birth_date: None,
            personal_id: None,
            medical_exam_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_names() {
        let m = member();
        assert_eq!(m.full_name(), "Ivan Horvat");
        assert_eq!(m.sort_name(), "Horvat Ivan");
    }

    #[test]
    fn test_free_text_contact_fields_accepted() {
        let data: CreateMember = serde_json::from_value(serde_json::json!({
            "first_name": "Ivan",
            "last_name": "Horvat",
            "role": "member",
            "email": "ivan na dvd",
            "personal_id": "1234"
        }))
        .unwrap();
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_update_absent_vs_null() {
        let data: UpdateMember = serde_json::from_value(serde_json::json!({
            "email": null,
            "birth_date": null,
            "phone": "091 123 4567"
        }))
        .unwrap();
        assert_eq!(data.email, Some(None));
        assert_eq!(data.birth_date, Some(None));
        assert_eq!(data.phone, Some(Some("091 123 4567".to_string())));
        assert_eq!(data.personal_id, None);
        assert_eq!(data.medical_exam_date, None);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_matches() {
        let m = member();
        assert!(m.matches("ivan h"));
        assert!(m.matches("horvat iv"));
        assert!(m.matches("zapovj"));
        assert!(m.matches(""));
        assert!(!m.matches("marko"));
    }
}
