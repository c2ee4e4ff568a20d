//! Business logic services

pub mod activities;
pub mod changes;
pub mod control_log;
pub mod dashboard;
pub mod equipment;
pub mod events;
pub mod inventory;
pub mod members;
pub mod realtime;
pub mod report;
pub mod seed;
pub mod vehicles;

use crate::{config::AppConfig, repository::Repository};

use changes::ChangeHub;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub changes: ChangeHub,
    pub members: members::MembersService,
    pub vehicles: vehicles::VehiclesService,
    pub equipment: equipment::EquipmentService,
    pub activities: activities::ActivitiesService,
    pub events: events::EventsService,
    pub inventory: inventory::InventoryService,
    pub control_log: control_log::ControlLogService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services around one repository and one change hub
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let changes = ChangeHub::new(config.realtime.channel_capacity);

        Self {
            members: members::MembersService::new(repository.clone(), changes.clone()),
            vehicles: vehicles::VehiclesService::new(repository.clone(), changes.clone()),
            equipment: equipment::EquipmentService::new(repository.clone(), changes.clone()),
            activities: activities::ActivitiesService::new(repository.clone(), changes.clone()),
            events: events::EventsService::new(
                repository.clone(),
                changes.clone(),
                config.unit.name.clone(),
            ),
            inventory: inventory::InventoryService::new(repository.clone(), changes.clone()),
            control_log: control_log::ControlLogService::new(
                repository.clone(),
                changes.clone(),
                config.control_log.categories.clone(),
            ),
            dashboard: dashboard::DashboardService::new(repository.clone()),
            repository,
            changes,
        }
    }
}
