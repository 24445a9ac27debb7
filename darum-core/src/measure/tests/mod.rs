
mod aggregation_tests;
mod histogram_tests;
