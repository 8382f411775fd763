//! Developer growth analytics.
//!
//! Turns contribution telemetry into career milestones, stage timelines,
//! metric forecasts and peer comparisons. Every entry point is a pure
//! function over immutable snapshots; callers supply the current time.

pub mod comparison;
pub mod error;
pub mod forecast;
pub mod milestones;
pub mod models;
pub mod predictors;
pub mod regression;
pub mod stages;
pub mod trajectory;

pub use comparison::{
    compare_developers, composite_score, find_similar_developers, generate_competitive_insights,
    rank_developers,
};
pub use error::AnalyticsError;
pub use forecast::predict_growth;
pub use milestones::extract_milestones;
pub use models::*;
pub use predictors::{
    predict_career, predict_job_matches, predict_next_milestone, predict_skill_demand,
    CareerPredictionInput,
};
pub use stages::{analyze_career_trajectory, identify_career_stages, StageAggregates};
pub use trajectory::{analyze_strengths_weaknesses, calculate_growth_rate, project_next_stage};
