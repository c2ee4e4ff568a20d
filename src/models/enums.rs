//! Shared domain enums stored as text slugs

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Implements slug conversion, `Display`, `FromStr` and the SQLx text
/// mapping for a fieldless enum. The label is the form shown in exports.
macro_rules! slug_enum {
    ($name:ident { $($variant:ident => ($slug:literal, $label:literal)),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug,)+
                }
            }

            /// Human readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($slug => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// MemberRole
// ---------------------------------------------------------------------------

/// Role of a member within the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Commander,
    Secretary,
    Other,
}

slug_enum!(MemberRole {
    Member => ("member", "Član"),
    Commander => ("commander", "Zapovjednik"),
    Secretary => ("secretary", "Tajnik"),
    Other => ("other", "Ostalo"),
});

// ---------------------------------------------------------------------------
// VehicleType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    FireEngine,
    Van,
    Other,
}

slug_enum!(VehicleType {
    FireEngine => ("fire_engine", "Navalno vozilo"),
    Van => ("van", "Kombi"),
    Other => ("other", "Ostalo"),
});

// ---------------------------------------------------------------------------
// VehicleStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Operational,
    InService,
    Faulty,
}

slug_enum!(VehicleStatus {
    Operational => ("operational", "Operativno"),
    InService => ("in_service", "U servisu"),
    Faulty => ("faulty", "Neispravno"),
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip_and_labels() {
        assert_eq!("commander".parse::<MemberRole>(), Ok(MemberRole::Commander));
        assert_eq!(" In_Service ".parse::<VehicleStatus>(), Ok(VehicleStatus::InService));
        assert!("tanker".parse::<VehicleType>().is_err());
        assert_eq!(VehicleType::FireEngine.label(), "Navalno vozilo");
        assert_eq!(MemberRole::Member.to_string(), "member");
    }

    #[test]
    fn test_serde_uses_slugs() {
        let json = serde_json::to_string(&VehicleStatus::InService).unwrap();
        assert_eq!(json, "\"in_service\"");
        let role: MemberRole = serde_json::from_str("\"secretary\"").unwrap();
        assert_eq!(role, MemberRole::Secretary);
    }
}
