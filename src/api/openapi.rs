//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    activities, control_log, dashboard, equipment, events, health, inventory, members, realtime, vehicles,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FireTrack API",
        version = "1.0.0",
        description = "Volunteer fire brigade record keeping REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Dashboard
        dashboard::overview,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        members::update_member,
        members::delete_member,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::rename_equipment,
        equipment::delete_equipment,
        equipment::backfill_equipment_keys,
        // Activities
        activities::list_categories,
        activities::create_category,
        activities::rename_category,
        activities::delete_category,
        activities::bulk_create_activities,
        activities::list_activities,
        activities::get_activity,
        activities::create_activity,
        activities::rename_activity,
        activities::delete_activity,
        activities::backfill_activity_keys,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::set_participation,
        events::fill_participation,
        events::event_report,
        // Check-out book
        inventory::list_stock_items,
        inventory::stock_summary,
        inventory::get_stock_item,
        inventory::procure,
        inventory::update_stock_item,
        inventory::delete_stock_item,
        inventory::list_checkouts,
        inventory::export_checkouts,
        inventory::get_checkout,
        inventory::create_checkout,
        inventory::update_checkout,
        inventory::delete_checkout,
        inventory::bulk_checkout,
        // Control log
        control_log::overview,
        control_log::categories,
        control_log::get_equipment,
        control_log::create_equipment,
        control_log::update_equipment,
        control_log::delete_equipment,
        control_log::add_entry,
        control_log::update_entry,
        control_log::delete_entry,
        // Realtime
        realtime::subscribe,
    ),
    components(
        schemas(
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::UpdateMember,
            crate::models::member::MemberQuery,
            crate::models::enums::MemberRole,
            // Vehicles
            crate::models::vehicle::Vehicle,
            crate::models::vehicle::CreateVehicle,
            crate::models::vehicle::UpdateVehicle,
            crate::models::enums::VehicleType,
            crate::models::enums::VehicleStatus,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::RenameEquipment,
            crate::models::equipment::EnsuredRecord,
            // Activities
            crate::models::activity::ActivityCategory,
            crate::models::activity::Activity,
            crate::models::activity::CategoryName,
            crate::models::activity::CreateActivity,
            crate::models::activity::BulkCreateActivities,
            crate::models::activity::BulkCreateResult,
            crate::models::activity::RenameActivity,
            crate::models::activity::ActivityQuery,
            crate::models::activity::BackfillResult,
            // Events
            crate::models::event::Event,
            crate::models::event::CreateEvent,
            crate::models::event::Participation,
            crate::models::event::SetParticipation,
            crate::models::event::EventQuery,
            // Check-out book
            crate::models::inventory::StockItem,
            crate::models::inventory::StockItemAvailability,
            crate::models::inventory::StockSummary,
            crate::models::inventory::Procure,
            crate::models::inventory::UpdateStockItem,
            crate::models::inventory::Checkout,
            crate::models::inventory::CreateCheckout,
            crate::models::inventory::CheckoutDetails,
            crate::models::inventory::CheckoutQuery,
            crate::models::inventory::BulkCheckout,
            crate::models::inventory::BulkCheckoutRow,
            crate::models::inventory::RowError,
            inventory::BulkCheckoutErrors,
            // Control log
            crate::models::control_log::LogEquipment,
            crate::models::control_log::UsageEntry,
            crate::models::control_log::SaveLogEquipment,
            crate::models::control_log::SaveUsageEntry,
            crate::models::control_log::CategoryStats,
            crate::models::control_log::CategoryGroup,
            // Dashboard
            crate::models::dashboard::DashboardOverview,
            crate::models::dashboard::RecentEvent,
            crate::models::dashboard::KindStats,
            crate::models::dashboard::CollectionCounts,
            // Realtime
            crate::services::changes::Collection,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Home page overview"),
        (name = "members", description = "Member registry"),
        (name = "vehicles", description = "Vehicle registry"),
        (name = "equipment", description = "Equipment catalog"),
        (name = "activities", description = "Activity categories and activities"),
        (name = "events", description = "Events, participation and reports"),
        (name = "inventory", description = "Stock items and check-out book"),
        (name = "control-log", description = "Powered equipment usage log"),
        (name = "realtime", description = "Live collection subscriptions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
