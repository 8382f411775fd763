use chrono::{DateTime, Duration, Utc};

use crate::models::{CareerStage, IndicatorKind, StageName, StageProjection};

const DEFAULT_STAGE_YEARS: f64 = 2.0;
const DAYS_PER_YEAR: f64 = 365.25;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Project the stage after `current`, its ETA, and readiness.
///
/// Returns `None` once the developer is principal.
pub fn project_next_stage(current: &CareerStage, stages: &[CareerStage]) -> Option<StageProjection> {
    let next = current.stage.next()?;

    let avg_stage_years = if stages.len() < 2 {
        DEFAULT_STAGE_YEARS
    } else {
        let gaps: Vec<f64> = stages
            .windows(2)
            .map(|pair| {
                let millis = (pair[1].start_date - pair[0].start_date).num_milliseconds();
                millis as f64 / MILLIS_PER_DAY / DAYS_PER_YEAR
            })
            .collect();
        gaps.iter().sum::<f64>() / gaps.len() as f64
    };

    let offset = Duration::try_milliseconds((avg_stage_years * DAYS_PER_YEAR * MILLIS_PER_DAY) as i64);
    let estimated_date = offset
        .and_then(|offset| current.start_date.checked_add_signed(offset))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let progress = (current.indicators.sum() / 4.0).clamp(0.0, 100.0);

    tracing::trace!(next = %next, avg_stage_years, progress, "projected next stage");

    Some(StageProjection {
        stage: next,
        estimated_date,
        requirements: stage_requirements(next),
        progress,
    })
}

/// Mean per-transition change of the average indicator score.
pub fn calculate_growth_rate(stages: &[CareerStage]) -> f64 {
    if stages.len() < 2 {
        return 0.0;
    }
    let deltas: Vec<f64> = stages
        .windows(2)
        .map(|pair| (pair[1].indicators.sum() - pair[0].indicators.sum()) / 4.0)
        .collect();
    deltas.iter().sum::<f64>() / deltas.len() as f64
}

/// Top two indicators are strengths, bottom two are improvement areas.
///
/// With four indicators the two lists always partition the whole set.
pub fn analyze_strengths_weaknesses(stage: &CareerStage) -> (Vec<IndicatorKind>, Vec<IndicatorKind>) {
    let mut ranked = stage.indicators.entries().to_vec();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let strengths = ranked.iter().take(2).map(|(kind, _)| *kind).collect();
    let improvements = ranked.iter().skip(ranked.len() - 2).map(|(kind, _)| *kind).collect();
    (strengths, improvements)
}

pub fn stage_requirements(stage: StageName) -> Vec<String> {
    let items: &[&str] = match stage {
        StageName::Junior => &[
            "Ship your first contributions to a shared codebase",
            "Learn the team's tooling and review process",
        ],
        StageName::Mid => &[
            "Contribute 500+ commits across active projects",
            "Participate in 50+ code reviews",
            "Own features end to end",
            "Write tests and documentation for your changes",
        ],
        StageName::Senior => &[
            "Maintain at least one repository",
            "Earn 100+ stars across your projects",
            "Mentor other developers",
            "Lead technical design discussions",
        ],
        StageName::Lead => &[
            "Lead a team or a multi-contributor project",
            "Define technical direction and architecture",
            "Drive cross-team collaboration",
            "Grow contributors into maintainers",
        ],
        StageName::Principal => &[
            "Set technical strategy across multiple teams",
            "Build widely adopted projects or standards",
            "Represent the organization in the wider community",
            "Influence industry practice through talks or publications",
        ],
    };
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StageIndicators, Timestamp};
    use chrono::TimeZone;

    fn stage(name: StageName, start: Timestamp, indicators: StageIndicators) -> CareerStage {
        CareerStage {
            stage: name,
            start_date: start,
            end_date: None,
            indicators,
            achievements: Vec::new(),
        }
    }

    fn junior(start: Timestamp) -> CareerStage {
        stage(StageName::Junior, start, StageIndicators::new(40.0, 20.0, 30.0, 35.0))
    }

    fn mid(start: Timestamp) -> CareerStage {
        stage(StageName::Mid, start, StageIndicators::new(70.0, 50.0, 60.0, 65.0))
    }

    #[test]
    fn single_stage_uses_default_length() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let current = junior(start);
        let projection = project_next_stage(&current, std::slice::from_ref(&current)).unwrap();

        assert_eq!(projection.stage, StageName::Mid);
        assert_eq!(projection.estimated_date, start + Duration::hours(2 * 8766));
        assert!((projection.progress - 31.25).abs() < 1e-9);
        assert_eq!(projection.requirements, stage_requirements(StageName::Mid));
    }

    #[test]
    fn average_gap_drives_estimate() {
        let first = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let second = first + Duration::days(1461);
        let stages = vec![junior(first), mid(second)];
        let projection = project_next_stage(&stages[1], &stages).unwrap();

        assert_eq!(projection.stage, StageName::Senior);
        assert_eq!(projection.estimated_date, second + Duration::days(1461));
        assert!((projection.progress - 61.25).abs() < 1e-9);
    }

    #[test]
    fn principal_has_no_next_stage() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let current = stage(StageName::Principal, start, StageIndicators::new(95.0, 95.0, 95.0, 95.0));
        assert!(project_next_stage(&current, &[]).is_none());
    }

    #[test]
    fn requirement_lists_differ_per_stage() {
        assert_ne!(stage_requirements(StageName::Lead), stage_requirements(StageName::Principal));
        assert!(!stage_requirements(StageName::Senior).is_empty());
    }

    #[test]
    fn growth_rate_averages_indicator_deltas() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(calculate_growth_rate(&[junior(start)]), 0.0);
        assert_eq!(calculate_growth_rate(&[]), 0.0);

        let senior = stage(StageName::Senior, start, StageIndicators::new(85.0, 75.0, 80.0, 80.0));
        let rate = calculate_growth_rate(&[junior(start), mid(start), senior]);
        // (30 + 18.75) / 2
        assert!((rate - 24.375).abs() < 1e-9);
    }

    #[test]
    fn strengths_and_improvements_cover_all_indicators() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let (strengths, improvements) = analyze_strengths_weaknesses(&junior(start));
        assert_eq!(
            strengths,
            vec![IndicatorKind::TechnicalSkills, IndicatorKind::Communication]
        );
        assert_eq!(improvements, vec![IndicatorKind::Impact, IndicatorKind::Leadership]);
    }
}
