// Business logic services

pub mod activity_service;
pub mod asset_service;
pub mod carbon_calculator;
pub mod coach_service;
pub mod dashboard_service;
pub mod emission_analytics;
pub mod goal_service;

pub use activity_service::ActivityService;
pub use asset_service::AssetService;
pub use carbon_calculator::CarbonCalculator;
pub use coach_service::CoachService;
pub use dashboard_service::DashboardService;
pub use emission_analytics::{AnalyticsError, EmissionAnalyzer};
pub use goal_service::GoalService;
