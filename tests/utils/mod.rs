pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::FailingPickStore;
#[allow(unused_imports)]
pub use setup::{
    TestSetup, TestSetupBuilder, BUF, DAL, KC, LEAGUE_ID, PHI, SEASON_ONE_WEEK, SEASON_TWO_WEEK,
};
