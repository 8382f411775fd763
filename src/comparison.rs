use crate::models::{
    CompetitiveInsights, ComparisonResult, ComparisonStrengths, DeveloperComparison,
    DeveloperMetrics, DeveloperProfile, MarketPosition, MetricName, MetricPercentile, OverallScore,
    RankedDeveloper, Significance, SimilarDeveloper, Winner,
};

const TIE_EPSILON: f64 = 0.01;
const OVERALL_TIE_BAND: f64 = 5.0;
const MAX_STRENGTHS: usize = 3;
const MAX_MATCHING_AREAS: usize = 5;
const MATCHING_TOLERANCE: f64 = 0.2;

/// Weights of the composite ranking score.
pub const COMPOSITE_WEIGHTS: [(MetricName, f64); 8] = [
    (MetricName::CommitFrequency, 0.10),
    (MetricName::PrVelocity, 0.10),
    (MetricName::CodeQualityScore, 0.15),
    (MetricName::CollaborationScore, 0.15),
    (MetricName::SkillDiversity, 0.10),
    (MetricName::RepoStars, 0.15),
    (MetricName::CommunityEngagement, 0.10),
    (MetricName::IssueResolutionRate, 0.15),
];

/// Compare two developers metric by metric.
pub fn compare_developers(user1: &DeveloperMetrics, user2: &DeveloperMetrics) -> DeveloperComparison {
    let metrics: Vec<ComparisonResult> = MetricName::ALL
        .into_iter()
        .map(|metric| compare_metric(metric, user1.value(metric), user2.value(metric)))
        .collect();

    let total = metrics.len() as f64;
    let wins = |side: Winner| metrics.iter().filter(|result| result.winner == side).count() as f64;
    let user1_score = wins(Winner::User1) / total * 100.0;
    let user2_score = wins(Winner::User2) / total * 100.0;
    let overall_winner = if (user1_score - user2_score).abs() < OVERALL_TIE_BAND {
        Winner::Tie
    } else if user1_score > user2_score {
        Winner::User1
    } else {
        Winner::User2
    };

    let strengths_of = |side: Winner| -> Vec<MetricName> {
        metrics
            .iter()
            .filter(|result| result.winner == side && result.significance != Significance::Low)
            .take(MAX_STRENGTHS)
            .map(|result| result.metric)
            .collect()
    };
    let strengths = ComparisonStrengths {
        user1: strengths_of(Winner::User1),
        user2: strengths_of(Winner::User2),
    };

    tracing::debug!(
        user1 = user1_score,
        user2 = user2_score,
        winner = ?overall_winner,
        "compared developers"
    );

    DeveloperComparison {
        metrics,
        overall_score: OverallScore {
            user1: user1_score,
            user2: user2_score,
            winner: overall_winner,
        },
        strengths,
    }
}

fn compare_metric(metric: MetricName, v1: f64, v2: f64) -> ComparisonResult {
    let difference = v1 - v2;
    let percentage_diff = if v2 != 0.0 {
        difference / v2 * 100.0
    } else if v1 > 0.0 {
        100.0
    } else {
        0.0
    };

    let winner = if difference.abs() < TIE_EPSILON {
        Winner::Tie
    } else if difference > 0.0 {
        Winner::User1
    } else {
        Winner::User2
    };

    let significance = if percentage_diff.abs() >= 50.0 {
        Significance::High
    } else if percentage_diff.abs() >= 20.0 {
        Significance::Medium
    } else {
        Significance::Low
    };

    ComparisonResult {
        metric,
        user1_value: v1,
        user2_value: v2,
        difference,
        percentage_diff,
        winner,
        significance,
    }
}

pub fn composite_score(metrics: &DeveloperMetrics) -> f64 {
    COMPOSITE_WEIGHTS
        .iter()
        .map(|(metric, weight)| metrics.value(*metric) * weight)
        .sum()
}

/// Rank developers by composite score, best first.
///
/// Equal scores keep their input order and still receive distinct ranks.
pub fn rank_developers(developers: &[DeveloperProfile]) -> Vec<RankedDeveloper> {
    let mut scored: Vec<(&DeveloperProfile, f64)> = developers
        .iter()
        .map(|developer| (developer, composite_score(&developer.metrics)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    tracing::debug!(developers = scored.len(), "ranked developers");

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (developer, score))| RankedDeveloper {
            rank: index + 1,
            id: developer.id.clone(),
            name: developer.name.clone(),
            composite_score: score,
        })
        .collect()
}

/// Similarity in `[0, 100]`; identical metric sets score 100.
pub fn similarity(target: &DeveloperMetrics, candidate: &DeveloperMetrics) -> f64 {
    let distances: Vec<f64> = MetricName::ALL
        .into_iter()
        .map(|metric| {
            let (v1, v2) = (target.value(metric), candidate.value(metric));
            (v1 - v2).abs() / v1.max(v2).max(1.0)
        })
        .collect();
    let mean_distance = distances.iter().sum::<f64>() / distances.len() as f64;
    ((1.0 - mean_distance) * 100.0).round()
}

fn matching_areas(target: &DeveloperMetrics, candidate: &DeveloperMetrics) -> Vec<MetricName> {
    MetricName::ALL
        .into_iter()
        .filter(|metric| {
            let (v1, v2) = (target.value(*metric), candidate.value(*metric));
            let average = (v1 + v2) / 2.0;
            // A zero average has no relative difference to match on.
            average != 0.0 && (v1 - v2).abs() / average < MATCHING_TOLERANCE
        })
        .take(MAX_MATCHING_AREAS)
        .collect()
}

/// Candidates most similar to `target`, best first, at most `limit`.
pub fn find_similar_developers(
    target: &DeveloperMetrics,
    candidates: &[DeveloperProfile],
    limit: usize,
) -> Vec<SimilarDeveloper> {
    let mut similar: Vec<SimilarDeveloper> = candidates
        .iter()
        .map(|candidate| SimilarDeveloper {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            similarity: similarity(target, &candidate.metrics),
            matching_areas: matching_areas(target, &candidate.metrics),
        })
        .collect();

    similar.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    similar.truncate(limit);
    tracing::debug!(candidates = candidates.len(), kept = similar.len(), "found similar developers");
    similar
}

/// Percentile of `value` within `population`: share of the population
/// ranked at or below it when sorted best first.
fn percentile_of(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let n = population.len() as f64;
    let rank = population.iter().filter(|other| **other > value).count() as f64;
    ((n - rank) / n * 100.0).clamp(0.0, 100.0)
}

/// Position the user against a peer group on every metric.
pub fn generate_competitive_insights(
    user: &DeveloperMetrics,
    peers: &[DeveloperMetrics],
) -> CompetitiveInsights {
    let percentiles: Vec<MetricPercentile> = MetricName::ALL
        .into_iter()
        .map(|metric| {
            let value = user.value(metric);
            let population: Vec<f64> = peers
                .iter()
                .map(|peer| peer.value(metric))
                .chain(std::iter::once(value))
                .collect();
            MetricPercentile {
                metric,
                value,
                percentile: percentile_of(value, &population),
            }
        })
        .collect();

    let avg_percentile =
        percentiles.iter().map(|entry| entry.percentile).sum::<f64>() / percentiles.len() as f64;
    let position = if avg_percentile >= 75.0 {
        MarketPosition::Top
    } else if avg_percentile >= 60.0 {
        MarketPosition::AboveAverage
    } else if avg_percentile >= 40.0 {
        MarketPosition::Average
    } else {
        MarketPosition::BelowAverage
    };

    let outperforming_areas: Vec<MetricName> = percentiles
        .iter()
        .filter(|entry| entry.percentile >= 70.0)
        .map(|entry| entry.metric)
        .collect();
    let underperforming_areas: Vec<MetricName> = percentiles
        .iter()
        .filter(|entry| entry.percentile < 40.0)
        .map(|entry| entry.metric)
        .collect();

    let actionable_insights = actionable_insights(&outperforming_areas, &underperforming_areas);

    tracing::debug!(peers = peers.len(), avg_percentile, "generated competitive insights");

    CompetitiveInsights {
        position,
        avg_percentile,
        percentiles,
        outperforming_areas,
        underperforming_areas,
        actionable_insights,
    }
}

fn actionable_insights(outperforming: &[MetricName], underperforming: &[MetricName]) -> Vec<String> {
    let mut insights: Vec<String> = underperforming
        .iter()
        .filter_map(|metric| match metric {
            MetricName::CodeQualityScore => {
                Some("Improve code quality through thorough reviews and refactoring")
            }
            MetricName::CollaborationScore => {
                Some("Collaborate more: review pull requests and pair on issues")
            }
            MetricName::CommitFrequency => {
                Some("Build a steadier commit cadence with smaller, regular changes")
            }
            MetricName::CommunityEngagement => {
                Some("Engage with the community through discussions and issue triage")
            }
            MetricName::TestCoverageAverage => Some("Raise test coverage on your core projects"),
            MetricName::DocumentationScore => {
                Some("Invest in documentation so others can adopt your work")
            }
            _ => None,
        })
        .map(str::to_string)
        .collect();

    insights.extend(outperforming.iter().filter_map(|metric| match metric {
        MetricName::RepoStars => {
            Some("Leverage your project visibility to attract contributors".to_string())
        }
        MetricName::MentorshipActivity => {
            Some("Your mentorship stands out: consider formal leadership roles".to_string())
        }
        MetricName::CodeQualityScore => {
            Some("Your code quality is a differentiator: share your practices".to_string())
        }
        _ => None,
    }));

    if insights.is_empty() {
        insights.push("Keep a consistent contribution pattern to hold your position".to_string());
    }
    insights
}
