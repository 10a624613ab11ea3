// Integration tests for API endpoints
// The carbon flow test needs TEST_DATABASE_URL and skips itself otherwise

pub mod api_endpoints_test;
pub mod carbon_flow_test;
