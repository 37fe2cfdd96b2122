mod list_tests;
mod plan_tests;
