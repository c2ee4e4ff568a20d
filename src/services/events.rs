//! Events service

use uuid::Uuid;
use validator::Validate;

use super::{
    changes::{ChangeHub, Collection},
    report::{render_event_report, report_file_name, ReportContext},
};
use crate::{
    error::{AppError, AppResult},
    models::event::{
        dedup_ids, derive_kind, fill_participation, merge_participation, CreateEvent, Event,
        EventFields, EventQuery, Participation, UpdateEvent,
    },
    names::trim_opt,
    repository::Repository,
};

/// Rendered report and its download name
pub struct EventReport {
    pub file_name: String,
    pub html: String,
}

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    changes: ChangeHub,
    unit_name: String,
}

impl EventsService {
    pub fn new(repository: Repository, changes: ChangeHub, unit_name: String) -> Self {
        Self { repository, changes, unit_name }
    }

    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        self.repository.events.list(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Event> {
        self.repository.events.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateEvent) -> AppResult<Event> {
        self.create_with_id(Uuid::new_v4(), data).await
    }

    pub async fn create_with_id(&self, id: Uuid, data: CreateEvent) -> AppResult<Event> {
        let fields = self.resolve(data).await?;
        let event = self.repository.events.create(id, &fields).await?;
        tracing::info!(event_id = %event.id, kind = %event.kind, "Event created");
        self.changes.publish(Collection::Events);
        Ok(event)
    }

    pub async fn update(&self, id: Uuid, data: UpdateEvent) -> AppResult<Event> {
        let fields = self.resolve(data).await?;
        let event = self.repository.events.update(id, &fields).await?;
        tracing::info!(event_id = %id, "Event updated");
        self.changes.publish(Collection::Events);
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.events.delete(id).await?;
        tracing::info!(event_id = %id, "Event deleted");
        self.changes.publish(Collection::Events);
        Ok(())
    }

    /// Store per-member minutes from the time editor
    pub async fn set_participation(&self, id: Uuid, entries: &[Participation]) -> AppResult<Event> {
        let event = self.repository.events.get_by_id(id).await?;
        let (participation, member_ids) = merge_participation(&event, entries);

        let event = self
            .repository
            .events
            .set_participation(id, participation, &member_ids)
            .await?;
        tracing::info!(
            event_id = %id,
            total_minutes = event.total_participation_minutes(),
            "Participation saved"
        );
        self.changes.publish(Collection::Events);
        Ok(event)
    }

    /// Give every linked member the full event duration
    pub async fn fill_participation(&self, id: Uuid) -> AppResult<Event> {
        let event = self.repository.events.get_by_id(id).await?;
        if event.duration_minutes() == 0 {
            return Err(AppError::BusinessRule(
                "Event has no duration (start and end are required)".to_string(),
            ));
        }
        let participation = fill_participation(&event);
        self.set_participation(id, &participation).await
    }

    /// Build the printable report of an event
    pub async fn report(&self, id: Uuid) -> AppResult<EventReport> {
        let event = self.repository.events.get_by_id(id).await?;

        let member_ids = event.all_member_ids();
        let members = self.repository.members.get_many(&member_ids).await?;
        let vehicles = self.repository.vehicles.get_many(&event.vehicle_ids).await?;
        let equipment = self.repository.equipment.get_many(&event.equipment_ids).await?;

        let html = render_event_report(
            &event,
            &ReportContext {
                unit: &self.unit_name,
                vehicles: &vehicles,
                equipment: &equipment,
                members: &members,
            },
        )
        .map_err(|e| AppError::Internal(format!("Report rendering failed: {}", e)))?;
        Ok(EventReport {
            file_name: report_file_name(&event.title),
            html,
        })
    }

    /// Validate, trim and denormalize category/activity names
    async fn resolve(&self, data: CreateEvent) -> AppResult<EventFields> {
        let data = CreateEvent {
            title: data.title.trim().to_string(),
            ..data
        };
        data.validate()?;

        let category_name = match data.category_id {
            Some(id) => Some(self.repository.categories.get_by_id(id).await?.name),
            None => None,
        };
        let activity_name = match data.activity_id {
            Some(id) => Some(self.repository.activities.get_by_id(id).await?.name),
            None => None,
        };

        Ok(EventFields {
            kind: derive_kind(activity_name.as_deref(), category_name.as_deref()),
            title: data.title,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            location: trim_opt(data.location.as_deref()),
            category_id: data.category_id,
            category_name,
            activity_id: data.activity_id,
            activity_name,
            leader: trim_opt(data.leader.as_deref()),
            description: trim_opt(data.description.as_deref()),
            member_ids: dedup_ids(&data.member_ids),
            vehicle_ids: dedup_ids(&data.vehicle_ids),
            equipment_ids: dedup_ids(&data.equipment_ids),
        })
    }
}
