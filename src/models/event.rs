//! Event model (interventions, exercises, meetings...)
//!
//! Events reference members, vehicles and equipment by id. Per-member
//! participation minutes are an optional overlay on top of the member list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Minutes a member spent on an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participation {
    pub member_id: Uuid,
    pub minutes: i64,
}

/// Event record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category_id: Option<Uuid>,
    /// Category name at the time of the last save
    pub category_name: Option<String>,
    pub activity_id: Option<Uuid>,
    /// Activity name at the time of the last save
    pub activity_name: Option<String>,
    /// Leader / reporter
    pub leader: Option<String>,
    pub description: Option<String>,
    /// Activity name, else category name, else empty
    pub kind: String,
    pub member_ids: Vec<Uuid>,
    pub vehicle_ids: Vec<Uuid>,
    pub equipment_ids: Vec<Uuid>,
    #[schema(value_type = Vec<Participation>)]
    pub participation: Json<Vec<Participation>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Scheduled duration in minutes (0 when a bound is missing or inverted)
    pub fn duration_minutes(&self) -> i64 {
        match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => (end - start).num_minutes().max(0),
            _ => 0,
        }
    }

    /// Sum of recorded participation minutes
    pub fn total_participation_minutes(&self) -> i64 {
        self.participation.iter().map(|p| p.minutes.max(0)).sum()
    }

    /// Linked members plus members that only appear in the participation overlay
    pub fn all_member_ids(&self) -> Vec<Uuid> {
        let with_time: Vec<Uuid> = self.participation.iter().map(|p| p.member_id).collect();
        union_ids(&self.member_ids, &with_time)
    }
}

/// Create event request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    pub leader: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
    #[serde(default)]
    pub vehicle_ids: Vec<Uuid>,
    #[serde(default)]
    pub equipment_ids: Vec<Uuid>,
}

/// Update event request. The edit form always sends the full record; the
/// participation overlay is kept as is.
pub type UpdateEvent = CreateEvent;

/// Column values written on create/update, after names are resolved
#[derive(Debug, Clone)]
pub struct EventFields {
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub activity_id: Option<Uuid>,
    pub activity_name: Option<String>,
    pub leader: Option<String>,
    pub description: Option<String>,
    pub kind: String,
    pub member_ids: Vec<Uuid>,
    pub vehicle_ids: Vec<Uuid>,
    pub equipment_ids: Vec<Uuid>,
}

/// Set participation minutes (time editor)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetParticipation {
    pub entries: Vec<Participation>,
}

/// Query parameters for events
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct EventQuery {
    pub category_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    /// Only events starting in this year
    pub year: Option<i32>,
}

/// Derive the event kind from the denormalized activity/category names
pub fn derive_kind(activity_name: Option<&str>, category_name: Option<&str>) -> String {
    activity_name
        .filter(|s| !s.is_empty())
        .or(category_name.filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Remove duplicate ids, keeping the first occurrence
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Order-preserving union of two id lists
pub fn union_ids(a: &[Uuid], b: &[Uuid]) -> Vec<Uuid> {
    let mut all = a.to_vec();
    all.extend_from_slice(b);
    dedup_ids(&all)
}

/// Merge time-editor input into an event.
///
/// Entries with zero or negative minutes are dropped (a later entry for the
/// same member wins). The returned member list is the union of the members
/// already on the event and the members that have time recorded.
pub fn merge_participation(event: &Event, entries: &[Participation]) -> (Vec<Participation>, Vec<Uuid>) {
    let mut minutes: indexmap::IndexMap<Uuid, i64> = indexmap::IndexMap::new();
    for entry in entries {
        minutes.insert(entry.member_id, entry.minutes);
    }

    let kept: Vec<Participation> = minutes
        .into_iter()
        .filter(|(_, m)| *m > 0)
        .map(|(member_id, minutes)| Participation { member_id, minutes })
        .collect();

    let with_time: Vec<Uuid> = kept.iter().map(|p| p.member_id).collect();
    let member_ids = union_ids(&event.all_member_ids(), &with_time);
    (kept, member_ids)
}

/// Give every member of the event the full event duration
pub fn fill_participation(event: &Event) -> Vec<Participation> {
    let duration = event.duration_minutes();
    if duration == 0 {
        return Vec::new();
    }
    event
        .all_member_ids()
        .into_iter()
        .map(|member_id| Participation { member_id, minutes: duration })
        .collect()
}

/// Format minutes as `h:mm`
pub fn format_hmm(minutes: i64) -> String {
    let m = minutes.max(0);
    format!("{}:{:02}", m / 60, m % 60)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn event(member_ids: Vec<Uuid>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Vježba".to_string(),
            starts_at: Some(Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap()),
            ends_at: Some(Utc.with_ymd_and_hms(2025, 3, 8, 11, 30, 0).unwrap()),
            location: Some("Dom".to_string()),
            category_id: None,
            category_name: None,
            activity_id: None,
            activity_name: None,
            leader: None,
            description: None,
            kind: String::new(),
            member_ids,
            vehicle_ids: Vec::new(),
            equipment_ids: Vec::new(),
            participation: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_duration_minutes() {
        let mut e = event(Vec::new());
        assert_eq!(e.duration_minutes(), 150);

        e.ends_at = Some(Utc.with_ymd_and_hms(2025, 3, 8, 8, 0, 0).unwrap());
        assert_eq!(e.duration_minutes(), 0);

        e.ends_at = None;
        assert_eq!(e.duration_minutes(), 0);
    }

    #[test]
    fn test_derive_kind() {
        assert_eq!(derive_kind(Some("Požar"), Some("Intervencije")), "Požar");
        assert_eq!(derive_kind(Some(""), Some("Intervencije")), "Intervencije");
        assert_eq!(derive_kind(None, None), "");
    }

    #[test]
    fn test_dedup_ids_keeps_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(dedup_ids(&[b, a, b, c, a]), vec![b, a, c]);
    }

    #[test]
    fn test_merge_participation() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let e = event(vec![a, b]);

        let (kept, members) = merge_participation(
            &e,
            &[
                Participation { member_id: a, minutes: 90 },
                Participation { member_id: b, minutes: 0 },
                Participation { member_id: c, minutes: 30 },
            ],
        );

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], Participation { member_id: a, minutes: 90 });
        assert_eq!(kept[1].member_id, c);
        // b stays linked even without time, c is added
        assert_eq!(members, vec![a, b, c]);
    }

    #[test]
    fn test_merge_participation_last_entry_wins() {
        let a = Uuid::new_v4();
        let e = event(vec![a]);
        let (kept, _) = merge_participation(
            &e,
            &[
                Participation { member_id: a, minutes: 10 },
                Participation { member_id: a, minutes: 0 },
            ],
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_fill_and_totals() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut e = event(vec![a, b]);
        let filled = fill_participation(&e);
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|p| p.minutes == 150));

        e.participation = Json(filled);
        assert_eq!(e.total_participation_minutes(), 300);
        assert_eq!(format_hmm(e.total_participation_minutes()), "5:00");
        assert_eq!(format_hmm(65), "1:05");
    }
}
