//! Data models for FireTrack

pub mod activity;
pub mod control_log;
pub mod dashboard;
pub mod enums;
pub mod equipment;
pub mod event;
pub mod inventory;
pub mod member;
pub mod vehicle;

// Re-export commonly used types
pub use activity::{Activity, ActivityCategory};
pub use control_log::{LogEquipment, UsageEntry};
pub use enums::{MemberRole, VehicleStatus, VehicleType};
pub use equipment::Equipment;
pub use event::{Event, Participation};
pub use inventory::{Checkout, StockItem};
pub use member::Member;
pub use vehicle::Vehicle;
