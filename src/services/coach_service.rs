use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::ActivityCategory;
use crate::services::activity_service::ActivityService;
use crate::services::dashboard_service::DashboardService;

pub const TIPS_PER_CATEGORY: usize = 3;
const INSIGHT_LOOKBACK_DAYS: i64 = 30;

const GENERAL_TIPS: &[&str] = &[
    "Every small action counts! Start by tracking your daily activities to identify your biggest emission sources.",
    "Consider switching to renewable energy sources or using public transportation to reduce your carbon footprint.",
    "Reducing meat consumption, especially beef, can significantly lower your environmental impact.",
    "Try carpooling or working from home one day a week to cut down on transportation emissions.",
    "Energy-efficient appliances and LED bulbs can help reduce your electricity consumption.",
];

const TRANSPORT_TIPS: &[&str] = &[
    "Consider using public transportation, cycling, or walking for short trips.",
    "If you need a car, electric or hybrid vehicles produce significantly less emissions than traditional cars.",
    "Carpooling with colleagues can cut your commute emissions in half or more.",
    "Plan your trips efficiently to minimize unnecessary driving.",
];

const ENERGY_TIPS: &[&str] = &[
    "Switch to LED bulbs - they use 75% less energy than traditional bulbs.",
    "Unplug devices when not in use to avoid phantom energy consumption.",
    "Consider installing solar panels if feasible in your area.",
    "Use a programmable thermostat to optimize heating and cooling.",
];

const FOOD_TIPS: &[&str] = &[
    "Reducing beef consumption can have a huge impact - try plant-based alternatives.",
    "Buy local and seasonal produce to reduce transportation emissions.",
    "Reduce food waste by planning meals and storing food properly.",
    "Consider starting a compost bin for food scraps.",
];

const ACHIEVEMENT_TIPS: &[&str] = &[
    "Great progress! You're making a real difference for the planet.",
    "Keep up the excellent work! Every kg of CO₂ saved matters.",
    "You're on the right track! Consistency is key to reducing your carbon footprint.",
    "Impressive commitment to sustainability! Share your journey to inspire others.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachTopic {
    General,
    Transport,
    Energy,
    Food,
    Achievements,
}

impl CoachTopic {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "transport" => CoachTopic::Transport,
            "energy" => CoachTopic::Energy,
            "food" => CoachTopic::Food,
            "achievements" => CoachTopic::Achievements,
            _ => CoachTopic::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoachTopic::General => "general",
            CoachTopic::Transport => "transport",
            CoachTopic::Energy => "energy",
            CoachTopic::Food => "food",
            CoachTopic::Achievements => "achievements",
        }
    }

    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            CoachTopic::General => GENERAL_TIPS,
            CoachTopic::Transport => TRANSPORT_TIPS,
            CoachTopic::Energy => ENERGY_TIPS,
            CoachTopic::Food => FOOD_TIPS,
            CoachTopic::Achievements => ACHIEVEMENT_TIPS,
        }
    }
}

impl From<ActivityCategory> for CoachTopic {
    fn from(category: ActivityCategory) -> Self {
        match category {
            ActivityCategory::Transport => CoachTopic::Transport,
            ActivityCategory::Energy => CoachTopic::Energy,
            ActivityCategory::Food => CoachTopic::Food,
            ActivityCategory::Waste | ActivityCategory::Other => CoachTopic::General,
        }
    }
}

/// Route a free-text message to a topic by keyword, first match wins.
pub fn route_message(message: &str) -> CoachTopic {
    let message = message.to_lowercase();

    if mentions(&message, &["transport", "car", "drive", "commute"]) {
        CoachTopic::Transport
    } else if mentions(&message, &["energy", "electricity", "power", "heating"]) {
        CoachTopic::Energy
    } else if mentions(&message, &["food", "eat", "diet", "meat"]) {
        CoachTopic::Food
    } else {
        CoachTopic::General
    }
}

fn mentions(message: &str, words: &[&str]) -> bool {
    words.iter().any(|word| message.contains(word))
}

pub fn pick_tip<R: Rng + ?Sized>(topic: CoachTopic, rng: &mut R) -> &'static str {
    let tips = topic.tips();
    tips.choose(rng).copied().unwrap_or(GENERAL_TIPS[0])
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub topic: CoachTopic,
    pub source: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CoachInsight {
    pub insight: String,
    pub category: CoachTopic,
    pub top_category_emissions: f64,
    pub trend_message: String,
    pub source: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Rule-based eco-coach; every reply comes from the fixed tip tables
#[derive(Clone)]
pub struct CoachService {
    activities: ActivityService,
    dashboard: DashboardService,
}

impl CoachService {
    pub fn new(activities: ActivityService, dashboard: DashboardService) -> Self {
        Self { activities, dashboard }
    }

    pub fn chat(&self, request: ChatRequest) -> Result<ChatReply, AppError> {
        request.validate()?;
        let topic = route_message(&request.message);

        Ok(ChatReply {
            response: pick_tip(topic, &mut rand::thread_rng()).to_string(),
            topic,
            source: "rules",
            timestamp: Utc::now(),
        })
    }

    pub fn tips(&self, category: Option<&str>) -> (CoachTopic, Vec<&'static str>) {
        let topic = category.map_or(CoachTopic::General, CoachTopic::from_str);
        let tips = topic.tips().iter().copied().take(TIPS_PER_CATEGORY).collect();
        (topic, tips)
    }

    /// Tip aimed at the user's largest emission category over the last 30 days
    pub async fn insight(&self, user_id: Uuid, today: NaiveDate) -> Result<CoachInsight, AppError> {
        let since = today - Duration::days(INSIGHT_LOOKBACK_DAYS - 1);
        let breakdown = self.activities.category_breakdown(user_id, Some(since)).await?;
        let top = breakdown
            .iter()
            .filter(|stat| stat.total_emissions > 0.0)
            .max_by(|a, b| a.total_emissions.total_cmp(&b.total_emissions));

        let category = top.map_or(CoachTopic::General, |stat| CoachTopic::from(stat.category));
        let top_category_emissions = top.map_or(0.0, |stat| stat.total_emissions);
        let trend = self.dashboard.weekly_trend(user_id, today).await?;
        let insight = pick_tip(category, &mut rand::thread_rng()).to_string();

        Ok(CoachInsight {
            insight,
            category,
            top_category_emissions,
            trend_message: trend.message,
            source: "rules",
            timestamp: Utc::now(),
        })
    }
}
