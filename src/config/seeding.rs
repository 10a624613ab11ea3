use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::models::*;
use crate::services::*;

pub const DEMO_EMAIL: &str = "john.doe@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_HISTORY_DAYS: i64 = 60;

/// Populates a fresh database with one demo account and two months of history
pub struct DatabaseSeeder {
    pool: PgPool,
    analyzer: EmissionAnalyzer,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool, analyzer: EmissionAnalyzer) -> Self {
        Self { pool, analyzer }
    }

    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        let Some(user_id) = self.seed_user().await? else {
            tracing::info!("Demo user already present, skipping seeding");
            return Ok(());
        };

        let today = Utc::now().date_naive();
        let (car_id, _) = self.seed_assets(user_id).await?;
        self.seed_activities(user_id, car_id, today).await?;
        self.seed_goal(user_id, today).await?;

        tracing::info!("Database seeding completed!");
        Ok(())
    }

    /// Returns the new user's id, or `None` if the demo account already exists
    async fn seed_user(&self) -> Result<Option<Uuid>> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(DEMO_EMAIL)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(None);
        }

        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, email, name, password_hash) VALUES ($1, $2, $3, $4)")
            .bind(user_id)
            .bind(DEMO_EMAIL)
            .bind("John Doe")
            .bind(hash_password(DEMO_PASSWORD)?)
            .execute(&self.pool)
            .await?;

        tracing::info!("Created demo user");
        Ok(Some(user_id))
    }

    async fn seed_assets(&self, user_id: Uuid) -> Result<(Uuid, Uuid)> {
        let assets = AssetService::new(self.pool.clone());

        let car = assets
            .create(
                user_id,
                CreateAssetRequest {
                    name: "Company Sedan".to_string(),
                    asset_type: "vehicle".to_string(),
                    fuel_type: Some("petrol".to_string()),
                    model: Some("Honda Accord".to_string()),
                    year: Some(2021),
                    emoji: None,
                    carbon_impact: Some(8.7),
                },
            )
            .await?;

        let generator = assets
            .create(
                user_id,
                CreateAssetRequest {
                    name: "Office Generator".to_string(),
                    asset_type: "machine".to_string(),
                    fuel_type: Some("diesel".to_string()),
                    model: Some("Cummins 5000".to_string()),
                    year: Some(2022),
                    emoji: Some("⚡".to_string()),
                    carbon_impact: Some(20.1),
                },
            )
            .await?;

        tracing::info!("Created 2 demo assets");
        Ok((car.id, generator.id))
    }

    async fn seed_activities(&self, user_id: Uuid, car_id: Uuid, today: NaiveDate) -> Result<()> {
        let activities = ActivityService::new(self.pool.clone());
        let mut created = 0;

        for request in demo_activities(car_id, today) {
            activities.create(user_id, request).await?;
            created += 1;
        }

        tracing::info!("Created {} demo activities", created);
        Ok(())
    }

    async fn seed_goal(&self, user_id: Uuid, today: NaiveDate) -> Result<()> {
        let goals = GoalService::new(self.pool.clone(), self.analyzer);
        let start_date = today - Duration::days(DEMO_HISTORY_DAYS / 2 - 1);

        goals
            .create(
                user_id,
                CreateGoalRequest {
                    title: "Cut commute emissions by 20%".to_string(),
                    target_reduction_percent: 20.0,
                    start_date: Some(start_date),
                    end_date: Some(start_date + Duration::days(89)),
                },
            )
            .await?;

        tracing::info!("Created demo goal");
        Ok(())
    }
}

/// Two months of history; the most recent month commutes about 25% less.
fn demo_activities(car_id: Uuid, today: NaiveDate) -> Vec<CreateActivityRequest> {
    let mut requests = Vec::new();

    for offset in 0..DEMO_HISTORY_DAYS {
        let date = today - Duration::days(offset);
        let recent = offset < DEMO_HISTORY_DAYS / 2;
        let distance = 20.0 + (offset % 7) as f64 * 3.0;

        requests.push(activity(
            "Commute to office",
            ActivityCategory::Transport,
            "car_petrol",
            if recent { distance * 0.75 } else { distance },
            Some(car_id),
            date,
        ));

        if offset % 3 == 0 {
            requests.push(activity(
                "Home electricity",
                ActivityCategory::Energy,
                "electricity_grid",
                12.0,
                None,
                date,
            ));
        }
        if offset % 5 == 0 {
            requests.push(activity(
                "Weekly groceries",
                ActivityCategory::Food,
                "chicken",
                1.5,
                None,
                date,
            ));
        }
    }

    requests
}

fn activity(
    title: &str,
    category: ActivityCategory,
    activity_type: &str,
    value: f64,
    asset_id: Option<Uuid>,
    date: NaiveDate,
) -> CreateActivityRequest {
    CreateActivityRequest {
        title: title.to_string(),
        category,
        activity_type: activity_type.to_string(),
        value,
        emission_factor: None,
        location: None,
        asset_id,
        date: Some(date),
    }
}
