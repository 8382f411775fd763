use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::milestones::extract_milestones;
use crate::models::{
    ActivityLog, CareerMilestone, CareerStage, CareerTrajectory, StageIndicators, StageName,
    Timestamp,
};
use crate::trajectory::{analyze_strengths_weaknesses, calculate_growth_rate, project_next_stage};

const JUNIOR_STAGE_MONTHS: u32 = 24;
const MID_MIN_COMMITS: u64 = 500;
const MID_MIN_REVIEWS: u64 = 50;
const SENIOR_MIN_STARS: u64 = 100;

/// Aggregate counters that gate promotion beyond junior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageAggregates {
    pub total_commits: u64,
    pub total_reviews: u64,
    pub maintainer_repo_count: u64,
    pub total_stars: u64,
}

impl StageAggregates {
    pub fn from_activity(activity: &ActivityLog) -> Self {
        Self {
            total_commits: activity.commits.len() as u64,
            total_reviews: activity.prs.iter().map(|pr| u64::from(pr.reviews)).sum(),
            maintainer_repo_count: activity
                .repos
                .iter()
                .filter(|repo| repo.role == "maintainer")
                .count() as u64,
            total_stars: activity.repos.iter().map(|repo| u64::from(repo.stars)).sum(),
        }
    }
}

/// Build the chronological stage timeline from milestones and aggregates.
///
/// Junior is always present. Mid and senior are appended when their
/// thresholds hold; lead and principal are only ever projected.
pub fn identify_career_stages(
    milestones: &[CareerMilestone],
    aggregates: &StageAggregates,
    now: Timestamp,
) -> Vec<CareerStage> {
    let mut stages = Vec::new();

    let junior_start = milestones.first().map(|m| m.date).unwrap_or(now);
    let junior_end = add_months(junior_start, JUNIOR_STAGE_MONTHS);
    stages.push(CareerStage {
        stage: StageName::Junior,
        start_date: junior_start,
        end_date: Some(junior_end),
        indicators: StageIndicators::new(40.0, 20.0, 30.0, 35.0),
        achievements: achievements_between(milestones, junior_start, Some(junior_end)),
    });

    if aggregates.total_commits > MID_MIN_COMMITS && aggregates.total_reviews > MID_MIN_REVIEWS {
        stages.push(CareerStage {
            stage: StageName::Mid,
            start_date: junior_end
                .checked_add_signed(Duration::days(1))
                .unwrap_or(junior_end),
            end_date: None,
            indicators: StageIndicators::new(70.0, 50.0, 60.0, 65.0),
            achievements: Vec::new(),
        });
    }

    if aggregates.maintainer_repo_count > 0 && aggregates.total_stars > SENIOR_MIN_STARS {
        let start_date = if stages.len() >= 2 {
            // Never start before the stage being closed out.
            now.max(stages[stages.len() - 1].start_date)
        } else {
            junior_end
        };
        if let Some(previous) = stages.last_mut() {
            if previous.stage == StageName::Mid {
                previous.end_date = Some(start_date);
            }
        }
        stages.push(CareerStage {
            stage: StageName::Senior,
            start_date,
            end_date: None,
            indicators: StageIndicators::new(85.0, 75.0, 80.0, 80.0),
            achievements: Vec::new(),
        });
    }

    for stage in stages.iter_mut().skip(1) {
        stage.achievements = achievements_between(milestones, stage.start_date, stage.end_date);
    }

    tracing::debug!(
        stages = stages.len(),
        commits = aggregates.total_commits,
        reviews = aggregates.total_reviews,
        "identified career stages"
    );
    stages
}

/// Run the full pipeline: milestones, stages, projection, growth rate and strengths.
pub fn analyze_career_trajectory(activity: &ActivityLog, now: Timestamp) -> CareerTrajectory {
    let milestones = extract_milestones(activity);
    let aggregates = StageAggregates::from_activity(activity);
    let stages = identify_career_stages(&milestones, &aggregates, now);

    // identify_career_stages always emits junior.
    let current_stage = stages
        .last()
        .cloned()
        .unwrap_or_else(|| junior_fallback(now));
    let projected_next_stage = project_next_stage(&current_stage, &stages);
    let overall_growth_rate = calculate_growth_rate(&stages);
    let (strength_areas, improvement_areas) = analyze_strengths_weaknesses(&current_stage);

    tracing::debug!(
        current = %current_stage.stage,
        growth_rate = overall_growth_rate,
        "analyzed career trajectory"
    );

    CareerTrajectory {
        stages,
        current_stage,
        projected_next_stage,
        overall_growth_rate,
        strength_areas,
        improvement_areas,
    }
}

fn junior_fallback(now: Timestamp) -> CareerStage {
    CareerStage {
        stage: StageName::Junior,
        start_date: now,
        end_date: Some(add_months(now, JUNIOR_STAGE_MONTHS)),
        indicators: StageIndicators::new(40.0, 20.0, 30.0, 35.0),
        achievements: Vec::new(),
    }
}

fn achievements_between(
    milestones: &[CareerMilestone],
    start: Timestamp,
    end: Option<Timestamp>,
) -> Vec<CareerMilestone> {
    milestones
        .iter()
        .filter(|m| m.date >= start && end.map_or(true, |end| m.date <= end))
        .cloned()
        .collect()
}

/// Calendar-month addition that saturates at the latest representable time.
pub(crate) fn add_months(date: Timestamp, months: u32) -> Timestamp {
    date.checked_add_months(Months::new(months))
        .or_else(|| date.checked_add_signed(Duration::days(i64::from(months) * 30)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
