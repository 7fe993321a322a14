//! Monitoring point actions.

pub mod actions;
pub mod models;

pub use actions::{
    with_point, MonitoringPointsClient, DELETE_POINT_PATH, MACHINE_PATH, POINTS_PATH,
};
pub use models::{Machine, MonitoringPoint};
