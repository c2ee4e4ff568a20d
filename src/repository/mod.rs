//! Repository layer for database operations

pub mod activities;
pub mod categories;
pub mod checkouts;
pub mod control_log;
pub mod equipment;
pub mod events;
pub mod members;
pub mod stock_items;
pub mod vehicles;

use sqlx::{Pool, Postgres};

/// Main repository struct holding the database pool and one repository per
/// collection
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub members: members::MembersRepository,
    pub vehicles: vehicles::VehiclesRepository,
    pub equipment: equipment::EquipmentRepository,
    pub categories: categories::CategoriesRepository,
    pub activities: activities::ActivitiesRepository,
    pub events: events::EventsRepository,
    pub stock_items: stock_items::StockItemsRepository,
    pub checkouts: checkouts::CheckoutsRepository,
    pub control_log: control_log::ControlLogRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            members: members::MembersRepository::new(pool.clone()),
            vehicles: vehicles::VehiclesRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            activities: activities::ActivitiesRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            stock_items: stock_items::StockItemsRepository::new(pool.clone()),
            checkouts: checkouts::CheckoutsRepository::new(pool.clone()),
            control_log: control_log::ControlLogRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
