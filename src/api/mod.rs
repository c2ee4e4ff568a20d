//! API handlers for FireTrack REST endpoints

pub mod activities;
pub mod control_log;
pub mod dashboard;
pub mod equipment;
pub mod events;
pub mod health;
pub mod inventory;
pub mod members;
pub mod openapi;
pub mod realtime;
pub mod vehicles;
