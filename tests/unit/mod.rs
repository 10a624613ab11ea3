// Unit tests for the analytics core and the rule-based services

pub mod analytics_properties_test;
pub mod coach_rules_test;
pub mod progress_scenarios_test;
