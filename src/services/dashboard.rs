//! Home page overview

use chrono::{Datelike, Utc};

use crate::{
    error::AppResult,
    models::{
        dashboard::{CollectionCounts, DashboardOverview, KindStats, RecentEvent},
        event::{Event, EventQuery},
    },
    repository::Repository,
};

const RECENT_EVENTS: usize = 5;

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Overview for `year` (current year by default)
    pub async fn overview(&self, year: Option<i32>) -> AppResult<DashboardOverview> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        let events = self.repository.events.list(&EventQuery::default()).await?;

        let counts = CollectionCounts {
            members: self.repository.members.count().await?,
            vehicles: self.repository.vehicles.count().await?,
            equipment: self.repository.equipment.count().await?,
            events: events.len() as i64,
        };

        Ok(build_overview(&events, year, counts))
    }
}

/// Whether an event kind counts as an intervention
pub fn is_intervention(kind: &str) -> bool {
    kind.to_lowercase().contains("interv")
}

/// Aggregate events into the overview
pub fn build_overview(events: &[Event], year: i32, counts: CollectionCounts) -> DashboardOverview {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));

    let recent_events = sorted
        .iter()
        .take(RECENT_EVENTS)
        .map(|e| RecentEvent {
            id: e.id,
            title: e.title.clone(),
            kind: e.kind.clone(),
            starts_at: e.starts_at,
        })
        .collect();

    let interventions = events.iter().filter(|e| is_intervention(&e.kind)).count() as i64;
    let kinds = KindStats {
        interventions,
        other: events.len() as i64 - interventions,
        total: events.len() as i64,
    };

    let mut monthly = [0i64; 12];
    for start in events.iter().filter_map(|e| e.starts_at) {
        if start.year() == year {
            monthly[start.month0() as usize] += 1;
        }
    }

    DashboardOverview {
        year,
        recent_events,
        kinds,
        monthly,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::tests::event;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, kind: &str) -> Event {
        let mut e = event(Vec::new());
        e.starts_at = Some(Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap());
        e.kind = kind.to_string();
        e
    }

    #[test]
    fn test_is_intervention() {
        assert!(is_intervention("Intervencije"));
        assert!(is_intervention("tehnička INTERVENCIJA"));
        assert!(!is_intervention("Vježba"));
        assert!(!is_intervention(""));
    }

    #[test]
    fn test_build_overview() {
        let mut undated = at(2025, 1, 1, "Sjednica");
        undated.starts_at = None;

        let events = vec![
            at(2025, 1, 5, "Intervencije"),
            at(2025, 1, 20, "Vježba"),
            at(2025, 3, 2, "Intervencija - požar"),
            at(2024, 12, 31, "Vježba"),
            at(2025, 11, 11, ""),
            at(2025, 6, 1, "Sjednica"),
            undated,
        ];

        let overview = build_overview(&events, 2025, CollectionCounts::default());

        assert_eq!(overview.kinds, KindStats { interventions: 2, other: 5, total: 7 });
        assert_eq!(overview.monthly[0], 2);
        assert_eq!(overview.monthly[2], 1);
        assert_eq!(overview.monthly[10], 1);
        assert_eq!(overview.monthly.iter().sum::<i64>(), 5);

        assert_eq!(overview.recent_events.len(), 5);
        assert_eq!(overview.recent_events[0].starts_at, events[4].starts_at);
        assert!(overview.recent_events.iter().all(|e| e.starts_at.is_some()));
    }
}
