use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::forecast::predict_growth;
use crate::models::{
    CareerPrediction, DemandDirection, JobMatch, JobPosting, MetricSnapshot, MilestonePrediction,
    SkillDemandPrediction, StageName, Timestamp, TrendMetric, TrendValues,
};
use crate::regression::{classify_demand, index_slope};
use crate::stages::add_months;

const DEFAULT_MONTHS_TO_MILESTONE: f64 = 12.0;
/// ETA horizon cap; slower trends report the raw month count but date out here.
const MAX_ESTIMATE_MONTHS: f64 = 1200.0;
const DEFAULT_SKILL_DEMAND: f64 = 60.0;
const DEFAULT_LEVEL_COMMITS: f64 = 500.0;

const SKILL_WEIGHT: f64 = 0.5;
const EXPERIENCE_WEIGHT: f64 = 0.3;
const GROWTH_WEIGHT: f64 = 0.2;

/// Ordered milestone ladder; the first unmet entry is the next target.
const MILESTONE_LADDER: [(TrendMetric, f64, &str); 7] = [
    (TrendMetric::Commits, 100.0, "100 Commits"),
    (TrendMetric::Stars, 10.0, "First 10 Stars"),
    (TrendMetric::Commits, 500.0, "500 Commits"),
    (TrendMetric::Stars, 100.0, "100 Stars"),
    (TrendMetric::Commits, 1000.0, "1,000 Commits"),
    (TrendMetric::Stars, 1000.0, "1,000 Stars"),
    (TrendMetric::Commits, 5000.0, "5,000 Commits"),
];

/// Predict when the next milestone on the ladder will be reached.
///
/// `historical_trend` is the per-month growth of the milestone's metric.
/// Returns `None` once every ladder entry has been met.
pub fn predict_next_milestone(
    current: &TrendValues,
    historical_trend: f64,
    current_stage: StageName,
    now: Timestamp,
) -> Option<MilestonePrediction> {
    let (metric, target, title) = MILESTONE_LADDER.into_iter().find(|(metric, threshold, _)| {
        current.get(metric).copied().unwrap_or(0.0) < *threshold
    })?;

    let current_value = current.get(&metric).copied().unwrap_or(0.0);
    let remaining = target - current_value;
    let months_to_milestone = if historical_trend > 0.0 {
        remaining / historical_trend
    } else {
        DEFAULT_MONTHS_TO_MILESTONE
    };
    let eta_months = if months_to_milestone.is_finite() {
        months_to_milestone.ceil().clamp(0.0, MAX_ESTIMATE_MONTHS)
    } else {
        MAX_ESTIMATE_MONTHS
    };
    let estimated_date = add_months(now, eta_months as u32);
    let probability = (60.0 + historical_trend * 5.0).clamp(0.0, 95.0);

    tracing::debug!(milestone = title, months_to_milestone, "predicted next milestone");

    Some(MilestonePrediction {
        milestone: title.to_string(),
        metric,
        current_value,
        target_value: target,
        current_stage,
        months_to_milestone,
        estimated_date,
        probability,
    })
}

/// Forecast market demand for a skill from its usage history.
pub fn predict_skill_demand(skill: &str, historical_usage: &[f64]) -> SkillDemandPrediction {
    let trend_direction = classify_demand(index_slope(historical_usage));

    let growth_rate = match (historical_usage.first(), historical_usage.last()) {
        (Some(first), Some(last)) if historical_usage.len() > 1 && *first != 0.0 => {
            (last - first) / first
        }
        _ => 0.0,
    };

    let current_demand = base_skill_demand(skill);
    let predicted_demand = (current_demand * (1.0 + growth_rate)).min(100.0);

    let recommendation = if current_demand >= 80.0 && trend_direction == DemandDirection::Rising {
        format!("High demand and rising: prioritize deepening your {skill} expertise")
    } else if current_demand >= 70.0 {
        format!("Solid demand: keep {skill} sharp with regular practice")
    } else if trend_direction == DemandDirection::Falling {
        format!("Usage of {skill} is falling: consider investing in adjacent skills")
    } else {
        format!("Monitor {skill} demand before investing further")
    };

    tracing::trace!(skill, growth_rate, predicted_demand, "predicted skill demand");

    SkillDemandPrediction {
        skill: skill.to_string(),
        current_demand,
        predicted_demand,
        trend_direction,
        growth_rate,
        recommendation,
    }
}

pub fn base_skill_demand(skill: &str) -> f64 {
    match skill.to_ascii_lowercase().as_str() {
        "python" => 92.0,
        "typescript" => 90.0,
        "javascript" => 88.0,
        "rust" => 85.0,
        "go" => 82.0,
        "kubernetes" => 84.0,
        "java" => 75.0,
        "kotlin" => 72.0,
        "swift" => 70.0,
        "c++" => 68.0,
        "c#" => 72.0,
        "ruby" => 58.0,
        "php" => 55.0,
        _ => DEFAULT_SKILL_DEMAND,
    }
}

/// Score every job against the developer and return them best match first.
pub fn predict_job_matches(
    totals: &TrendValues,
    user_skills: &[String],
    jobs: &[JobPosting],
) -> Vec<JobMatch> {
    let known: BTreeSet<String> = user_skills.iter().map(|skill| skill.to_lowercase()).collect();
    let commits = totals.get(&TrendMetric::Commits).copied().unwrap_or(0.0);

    let mut matches: Vec<JobMatch> = jobs
        .iter()
        .map(|job| {
            let (matching_skills, missing_skills): (Vec<String>, Vec<String>) = job
                .required_skills
                .iter()
                .cloned()
                .partition(|skill| known.contains(&skill.to_lowercase()));

            let required = job.required_skills.len() as f64;
            let (skill_match, growth_potential) = if required == 0.0 {
                (100.0, 0.0)
            } else {
                (
                    matching_skills.len() as f64 / required * 100.0,
                    missing_skills.len() as f64 / required * 100.0,
                )
            };
            let experience_match = (commits / level_commit_threshold(&job.level) * 100.0).min(100.0);
            let match_score = SKILL_WEIGHT * skill_match
                + EXPERIENCE_WEIGHT * experience_match
                + GROWTH_WEIGHT * growth_potential;

            let recommendation = if match_score >= 80.0 {
                "Excellent match: apply now".to_string()
            } else if match_score >= 60.0 {
                "Good match: consider applying and highlight relevant projects".to_string()
            } else if skill_match >= 70.0 {
                "Strong skill alignment: build more hands-on experience first".to_string()
            } else if missing_skills.is_empty() {
                "Build more experience before applying".to_string()
            } else {
                format!("Develop missing skills first: {}", missing_skills.join(", "))
            };

            JobMatch {
                job_id: job.id.clone(),
                title: job.title.clone(),
                match_score,
                skill_match,
                experience_match,
                growth_potential,
                matching_skills,
                missing_skills,
                recommendation,
            }
        })
        .collect();

    matches.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    tracing::debug!(jobs = matches.len(), "scored job matches");
    matches
}

fn level_commit_threshold(level: &str) -> f64 {
    match level.to_ascii_lowercase().as_str() {
        "junior" => 100.0,
        "mid" => 500.0,
        "senior" => 1000.0,
        "lead" => 2000.0,
        _ => DEFAULT_LEVEL_COMMITS,
    }
}

/// Everything [`predict_career`] needs for one developer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPredictionInput {
    #[serde(default)]
    pub history: Vec<MetricSnapshot>,
    #[serde(default)]
    pub metrics: Vec<TrendMetric>,
    #[serde(default)]
    pub current_totals: TrendValues,
    #[serde(default)]
    pub monthly_trend: f64,
    pub current_stage: Option<StageName>,
    #[serde(default)]
    pub skill_usage: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

/// Bundle growth forecasts, milestone, skill demand and job matches.
pub fn predict_career(input: &CareerPredictionInput, now: Timestamp) -> CareerPrediction {
    let growth = predict_growth(&input.history, &input.metrics, now);
    let next_milestone = predict_next_milestone(
        &input.current_totals,
        input.monthly_trend,
        input.current_stage.unwrap_or(StageName::Junior),
        now,
    );
    let skill_demand = input
        .skill_usage
        .iter()
        .map(|(skill, usage)| predict_skill_demand(skill, usage))
        .collect();
    let job_matches = predict_job_matches(&input.current_totals, &input.skills, &input.jobs);

    CareerPrediction {
        growth,
        next_milestone,
        skill_demand,
        job_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
    }

    fn totals(commits: f64, stars: f64) -> TrendValues {
        let mut values = TrendValues::new();
        values.insert(TrendMetric::Commits, commits);
        values.insert(TrendMetric::Stars, stars);
        values
    }

    fn job(id: &str, level: &str, skills: &[&str]) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: format!("{level} engineer"),
            company: None,
            level: level.to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn next_milestone_is_first_unmet_ladder_entry() {
        let prediction =
            predict_next_milestone(&totals(250.0, 4.0), 2.0, StageName::Mid, now()).unwrap();
        assert_eq!(prediction.milestone, "First 10 Stars");
        assert_eq!(prediction.metric, TrendMetric::Stars);
        assert_eq!(prediction.months_to_milestone, 3.0);
        assert_eq!(prediction.estimated_date, Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap());
        assert_eq!(prediction.probability, 70.0);
        assert_eq!(prediction.current_stage, StageName::Mid);
    }

    #[test]
    fn flat_trend_defaults_to_a_year() {
        let prediction = predict_next_milestone(&TrendValues::new(), 0.0, StageName::Junior, now()).unwrap();
        assert_eq!(prediction.milestone, "100 Commits");
        assert_eq!(prediction.months_to_milestone, 12.0);
        assert_eq!(prediction.estimated_date, Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());
        assert_eq!(prediction.probability, 60.0);
    }

    #[test]
    fn probability_is_capped() {
        let prediction = predict_next_milestone(&totals(0.0, 0.0), 40.0, StageName::Junior, now()).unwrap();
        assert_eq!(prediction.probability, 95.0);
        assert_eq!(prediction.months_to_milestone, 2.5);
        assert_eq!(prediction.estimated_date, Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn tiny_trend_caps_the_estimated_date() {
        let prediction =
            predict_next_milestone(&TrendValues::new(), 1e-6, StageName::Junior, now()).unwrap();
        assert_eq!(prediction.milestone, "100 Commits");
        assert!((prediction.months_to_milestone - 1e8).abs() < 1.0);
        assert_eq!(prediction.estimated_date, Utc.with_ymd_and_hms(2125, 1, 15, 0, 0, 0).unwrap());
        assert!((prediction.probability - 60.0).abs() < 1e-3);
    }

    #[test]
    fn completed_ladder_has_no_next_milestone() {
        assert!(predict_next_milestone(&totals(9000.0, 5000.0), 5.0, StageName::Lead, now()).is_none());
    }

    #[test]
    fn rising_rust_usage() {
        let prediction = predict_skill_demand("Rust", &[5.0, 10.0, 20.0]);
        assert_eq!(prediction.trend_direction, DemandDirection::Rising);
        assert_eq!(prediction.current_demand, 85.0);
        assert_eq!(prediction.growth_rate, 3.0);
        assert!(prediction.predicted_demand <= 100.0);
        assert!(prediction.recommendation.starts_with("High demand"));
    }

    #[test]
    fn unknown_skill_with_single_point() {
        let prediction = predict_skill_demand("COBOL-ish", &[7.0]);
        assert_eq!(prediction.current_demand, 60.0);
        assert_eq!(prediction.growth_rate, 0.0);
        assert_eq!(prediction.predicted_demand, 60.0);
        assert_eq!(prediction.trend_direction, DemandDirection::Stable);
        assert!(prediction.recommendation.starts_with("Monitor"));
    }

    #[test]
    fn falling_low_demand_skill() {
        let prediction = predict_skill_demand("php", &[40.0, 30.0, 10.0]);
        assert_eq!(prediction.trend_direction, DemandDirection::Falling);
        assert!((prediction.growth_rate + 0.75).abs() < 1e-9);
        assert!((prediction.predicted_demand - 13.75).abs() < 1e-9);
        assert!(prediction.recommendation.contains("falling"));
    }

    #[test]
    fn zero_first_usage_has_no_growth_rate() {
        let prediction = predict_skill_demand("java", &[0.0, 5.0]);
        assert_eq!(prediction.growth_rate, 0.0);
        assert!(prediction.recommendation.starts_with("Solid demand"));
    }

    #[test]
    fn job_matches_are_weighted_and_sorted() {
        let jobs = vec![
            job("a", "senior", &["Rust", "Kubernetes", "Go", "SQL"]),
            job("b", "junior", &["rust", "typescript"]),
        ];
        let skills = vec!["RUST".to_string(), "TypeScript".to_string()];
        let matches = predict_job_matches(&totals(250.0, 0.0), &skills, &jobs);

        assert_eq!(matches[0].job_id, "b");
        assert_eq!(matches[0].skill_match, 100.0);
        assert_eq!(matches[0].experience_match, 100.0);
        assert_eq!(matches[0].growth_potential, 0.0);
        assert!((matches[0].match_score - 80.0).abs() < 1e-9);
        assert!(matches[0].recommendation.starts_with("Excellent"));

        assert_eq!(matches[1].job_id, "a");
        assert_eq!(matches[1].skill_match, 25.0);
        assert_eq!(matches[1].experience_match, 25.0);
        assert_eq!(matches[1].growth_potential, 75.0);
        assert!((matches[1].match_score - 35.0).abs() < 1e-9);
        assert_eq!(matches[1].missing_skills, vec!["Kubernetes", "Go", "SQL"]);
        assert!(matches[1].recommendation.contains("Kubernetes"));
    }

    #[test]
    fn unknown_level_uses_default_threshold() {
        let matches = predict_job_matches(&totals(250.0, 0.0), &[], &[job("x", "staff", &[])]);
        assert_eq!(matches[0].experience_match, 50.0);
        assert_eq!(matches[0].skill_match, 100.0);
    }

    #[test]
    fn career_prediction_bundles_every_predictor() {
        let mut usage = BTreeMap::new();
        usage.insert("Rust".to_string(), vec![5.0, 10.0, 20.0]);
        let input = CareerPredictionInput {
            metrics: vec![TrendMetric::Commits],
            current_totals: totals(50.0, 0.0),
            monthly_trend: 10.0,
            current_stage: Some(StageName::Junior),
            skill_usage: usage,
            skills: vec!["Rust".to_string()],
            jobs: vec![job("r", "junior", &["Rust"])],
            ..CareerPredictionInput::default()
        };

        let prediction = predict_career(&input, now());
        assert_eq!(prediction.growth.len(), 1);
        assert_eq!(prediction.next_milestone.unwrap().months_to_milestone, 5.0);
        assert_eq!(prediction.skill_demand[0].skill, "Rust");
        assert_eq!(prediction.job_matches[0].job_id, "r");
    }
}
