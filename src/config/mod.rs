// Runtime configuration loaded from the environment

pub mod analytics;
pub mod app;
pub mod database;
pub mod seeding;

pub use analytics::AnalyticsConfig;
pub use app::AppConfig;
pub use database::{run_migrations, DatabaseConfig};
pub use seeding::DatabaseSeeder;
