use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_test::assert_ok;

use carbon_iq::errors::AppError;
use carbon_iq::services::coach_service::{pick_tip, route_message, ChatRequest, CoachTopic, TIPS_PER_CATEGORY};
use carbon_iq::services::{ActivityService, CoachService, DashboardService, EmissionAnalyzer};

use crate::common::lazy_pool;

fn coach() -> CoachService {
    let pool = lazy_pool();
    CoachService::new(
        ActivityService::new(pool.clone()),
        DashboardService::new(pool, EmissionAnalyzer::default()),
    )
}

#[cfg(test)]
mod coach_rules {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_chat_reply_comes_from_routed_topic() {
        let reply = assert_ok!(coach().chat(ChatRequest {
            message: "What about my electricity use?".to_string(),
        }));

        assert_eq!(reply.topic, CoachTopic::Energy);
        assert_eq!(reply.source, "rules");
        assert!(CoachTopic::Energy.tips().contains(&reply.response.as_str()));
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let result = coach().chat(ChatRequest { message: String::new() });
        assert_matches!(result, Err(AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_tips_are_capped_per_category() {
        let service = coach();

        let (topic, tips) = service.tips(Some("food"));
        assert_eq!(topic, CoachTopic::Food);
        assert_eq!(tips.len(), TIPS_PER_CATEGORY);
        assert_eq!(tips[0], CoachTopic::Food.tips()[0]);

        let (topic, _) = service.tips(None);
        assert_eq!(topic, CoachTopic::General);

        let (topic, _) = service.tips(Some("space travel"));
        assert_eq!(topic, CoachTopic::General);
    }

    #[test]
    fn test_every_topic_has_tips() {
        let topics = [
            CoachTopic::General,
            CoachTopic::Transport,
            CoachTopic::Energy,
            CoachTopic::Food,
            CoachTopic::Achievements,
        ];
        let mut rng = StdRng::seed_from_u64(42);

        for topic in topics {
            assert!(topic.tips().len() >= TIPS_PER_CATEGORY, "{} has too few tips", topic.as_str());
            assert!(topic.tips().contains(&pick_tip(topic, &mut rng)));
            assert_eq!(CoachTopic::from_str(topic.as_str()), topic);
        }
    }

    #[test]
    fn test_routing_is_case_insensitive() {
        assert_eq!(route_message("CAR or BUS?"), CoachTopic::Transport);
        assert_eq!(route_message("Power bills"), CoachTopic::Energy);
        assert_eq!(route_message("I EAT a lot of beef"), CoachTopic::Food);
    }
}
