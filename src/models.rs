use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

pub type Timestamp = DateTime<Utc>;

/// Raw contribution history for a single developer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    #[serde(default)]
    pub commits: Vec<CommitRecord>,
    #[serde(default)]
    pub prs: Vec<PullRequestRecord>,
    #[serde(default)]
    pub repos: Vec<RepositoryRecord>,
    #[serde(default)]
    pub skills: Vec<SkillRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub date: Timestamp,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRecord {
    pub date: Timestamp,
    pub reviews: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub created: Timestamp,
    pub stars: u32,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub skill: String,
    pub first_used: Timestamp,
    pub last_used: Timestamp,
}

/// Identifier for every field of [`DeveloperMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricName {
    CommitFrequency,
    PrVelocity,
    CodeQualityScore,
    CollaborationScore,
    SkillDiversity,
    RepoStars,
    Forks,
    CommunityEngagement,
    IssueResolutionRate,
    TestCoverageAverage,
    DocumentationScore,
    BugRate,
    MentorshipActivity,
    LearningVelocity,
    ProjectComplexity,
    Dependents,
    Downloads,
    CodeReviewParticipation,
}

impl MetricName {
    pub const ALL: [MetricName; 18] = [
        MetricName::CommitFrequency,
        MetricName::PrVelocity,
        MetricName::CodeQualityScore,
        MetricName::CollaborationScore,
        MetricName::SkillDiversity,
        MetricName::RepoStars,
        MetricName::Forks,
        MetricName::CommunityEngagement,
        MetricName::IssueResolutionRate,
        MetricName::TestCoverageAverage,
        MetricName::DocumentationScore,
        MetricName::BugRate,
        MetricName::MentorshipActivity,
        MetricName::LearningVelocity,
        MetricName::ProjectComplexity,
        MetricName::Dependents,
        MetricName::Downloads,
        MetricName::CodeReviewParticipation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::CommitFrequency => "commitFrequency",
            MetricName::PrVelocity => "prVelocity",
            MetricName::CodeQualityScore => "codeQualityScore",
            MetricName::CollaborationScore => "collaborationScore",
            MetricName::SkillDiversity => "skillDiversity",
            MetricName::RepoStars => "repoStars",
            MetricName::Forks => "forks",
            MetricName::CommunityEngagement => "communityEngagement",
            MetricName::IssueResolutionRate => "issueResolutionRate",
            MetricName::TestCoverageAverage => "testCoverageAverage",
            MetricName::DocumentationScore => "documentationScore",
            MetricName::BugRate => "bugRate",
            MetricName::MentorshipActivity => "mentorshipActivity",
            MetricName::LearningVelocity => "learningVelocity",
            MetricName::ProjectComplexity => "projectComplexity",
            MetricName::Dependents => "dependents",
            MetricName::Downloads => "downloads",
            MetricName::CodeReviewParticipation => "codeReviewParticipation",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricName::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnknownMetric(s.to_string()))
    }
}

/// Point-in-time metric snapshot supplied by the metrics provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeveloperMetrics {
    pub commit_frequency: f64,
    pub pr_velocity: f64,
    pub code_quality_score: f64,
    pub collaboration_score: f64,
    pub skill_diversity: f64,
    pub repo_stars: f64,
    pub forks: f64,
    pub community_engagement: f64,
    pub issue_resolution_rate: f64,
    pub test_coverage_average: f64,
    pub documentation_score: f64,
    pub bug_rate: f64,
    pub mentorship_activity: f64,
    pub learning_velocity: f64,
    pub project_complexity: f64,
    pub dependents: f64,
    pub downloads: f64,
    pub code_review_participation: f64,
}

impl DeveloperMetrics {
    pub fn value(&self, metric: MetricName) -> f64 {
        match metric {
            MetricName::CommitFrequency => self.commit_frequency,
            MetricName::PrVelocity => self.pr_velocity,
            MetricName::CodeQualityScore => self.code_quality_score,
            MetricName::CollaborationScore => self.collaboration_score,
            MetricName::SkillDiversity => self.skill_diversity,
            MetricName::RepoStars => self.repo_stars,
            MetricName::Forks => self.forks,
            MetricName::CommunityEngagement => self.community_engagement,
            MetricName::IssueResolutionRate => self.issue_resolution_rate,
            MetricName::TestCoverageAverage => self.test_coverage_average,
            MetricName::DocumentationScore => self.documentation_score,
            MetricName::BugRate => self.bug_rate,
            MetricName::MentorshipActivity => self.mentorship_activity,
            MetricName::LearningVelocity => self.learning_velocity,
            MetricName::ProjectComplexity => self.project_complexity,
            MetricName::Dependents => self.dependents,
            MetricName::Downloads => self.downloads,
            MetricName::CodeReviewParticipation => self.code_review_participation,
        }
    }

    pub fn set(&mut self, metric: MetricName, value: f64) {
        let slot = match metric {
            MetricName::CommitFrequency => &mut self.commit_frequency,
            MetricName::PrVelocity => &mut self.pr_velocity,
            MetricName::CodeQualityScore => &mut self.code_quality_score,
            MetricName::CollaborationScore => &mut self.collaboration_score,
            MetricName::SkillDiversity => &mut self.skill_diversity,
            MetricName::RepoStars => &mut self.repo_stars,
            MetricName::Forks => &mut self.forks,
            MetricName::CommunityEngagement => &mut self.community_engagement,
            MetricName::IssueResolutionRate => &mut self.issue_resolution_rate,
            MetricName::TestCoverageAverage => &mut self.test_coverage_average,
            MetricName::DocumentationScore => &mut self.documentation_score,
            MetricName::BugRate => &mut self.bug_rate,
            MetricName::MentorshipActivity => &mut self.mentorship_activity,
            MetricName::LearningVelocity => &mut self.learning_velocity,
            MetricName::ProjectComplexity => &mut self.project_complexity,
            MetricName::Dependents => &mut self.dependents,
            MetricName::Downloads => &mut self.downloads,
            MetricName::CodeReviewParticipation => &mut self.code_review_participation,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProfile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub metrics: DeveloperMetrics,
}

/// Activity counters tracked over time for forecasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendMetric {
    Commits,
    Stars,
    PullRequests,
    Reviews,
    Followers,
    Repositories,
    Issues,
    Forks,
    Contributions,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 9] = [
        TrendMetric::Commits,
        TrendMetric::Stars,
        TrendMetric::PullRequests,
        TrendMetric::Reviews,
        TrendMetric::Followers,
        TrendMetric::Repositories,
        TrendMetric::Issues,
        TrendMetric::Forks,
        TrendMetric::Contributions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrendMetric::Commits => "commits",
            TrendMetric::Stars => "stars",
            TrendMetric::PullRequests => "pullRequests",
            TrendMetric::Reviews => "reviews",
            TrendMetric::Followers => "followers",
            TrendMetric::Repositories => "repositories",
            TrendMetric::Issues => "issues",
            TrendMetric::Forks => "forks",
            TrendMetric::Contributions => "contributions",
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrendMetric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| AnalyticsError::UnknownMetric(s.to_string()))
    }
}

/// Values of tracked counters at one point in time.
pub type TrendValues = BTreeMap<TrendMetric, f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub date: Timestamp,
    #[serde(default)]
    pub metrics: TrendValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneType {
    Skill,
    Achievement,
    Contribution,
    Recognition,
    Leadership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerMilestone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MilestoneType,
    pub title: String,
    pub description: String,
    pub date: Timestamp,
    pub impact: Impact,
    pub category: String,
}

/// Career stages in promotion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
}

impl StageName {
    pub const ORDER: [StageName; 5] = [
        StageName::Junior,
        StageName::Mid,
        StageName::Senior,
        StageName::Lead,
        StageName::Principal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Junior => "junior",
            StageName::Mid => "mid",
            StageName::Senior => "senior",
            StageName::Lead => "lead",
            StageName::Principal => "principal",
        }
    }

    pub fn next(self) -> Option<StageName> {
        let position = StageName::ORDER.iter().position(|stage| *stage == self)?;
        StageName::ORDER.get(position + 1).copied()
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        StageName::ORDER
            .into_iter()
            .find(|stage| stage.as_str() == lowered)
            .ok_or_else(|| AnalyticsError::UnknownStage(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorKind {
    TechnicalSkills,
    Leadership,
    Impact,
    Communication,
}

/// Stage indicator scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageIndicators {
    pub technical_skills: f64,
    pub leadership: f64,
    pub impact: f64,
    pub communication: f64,
}

impl StageIndicators {
    pub fn new(technical_skills: f64, leadership: f64, impact: f64, communication: f64) -> Self {
        Self {
            technical_skills,
            leadership,
            impact,
            communication,
        }
    }

    /// Indicator values in declaration order.
    pub fn entries(&self) -> [(IndicatorKind, f64); 4] {
        [
            (IndicatorKind::TechnicalSkills, self.technical_skills),
            (IndicatorKind::Leadership, self.leadership),
            (IndicatorKind::Impact, self.impact),
            (IndicatorKind::Communication, self.communication),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.technical_skills + self.leadership + self.impact + self.communication
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerStage {
    pub stage: StageName,
    pub start_date: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Timestamp>,
    pub indicators: StageIndicators,
    pub achievements: Vec<CareerMilestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProjection {
    pub stage: StageName,
    pub estimated_date: Timestamp,
    pub requirements: Vec<String>,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerTrajectory {
    pub stages: Vec<CareerStage>,
    pub current_stage: CareerStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_next_stage: Option<StageProjection>,
    pub overall_growth_rate: f64,
    pub strength_areas: Vec<IndicatorKind>,
    pub improvement_areas: Vec<IndicatorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPrediction {
    pub metric: TrendMetric,
    pub current_value: f64,
    pub predicted_3_months: f64,
    pub predicted_6_months: f64,
    pub predicted_12_months: f64,
    pub confidence: f64,
    pub trend: Trend,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestonePrediction {
    pub milestone: String,
    pub metric: TrendMetric,
    pub current_value: f64,
    pub target_value: f64,
    pub current_stage: StageName,
    pub months_to_milestone: f64,
    pub estimated_date: Timestamp,
    pub probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandDirection {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDemandPrediction {
    pub skill: String,
    pub current_demand: f64,
    pub predicted_demand: f64,
    pub trend_direction: DemandDirection,
    pub growth_rate: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: String,
    pub title: String,
    pub match_score: f64,
    pub skill_match: f64,
    pub experience_match: f64,
    pub growth_potential: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendation: String,
}

/// Bundle of every forward-looking prediction for one developer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPrediction {
    pub growth: Vec<GrowthPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<MilestonePrediction>,
    pub skill_demand: Vec<SkillDemandPrediction>,
    pub job_matches: Vec<JobMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Winner {
    User1,
    User2,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub metric: MetricName,
    pub user1_value: f64,
    pub user2_value: f64,
    pub difference: f64,
    pub percentage_diff: f64,
    pub winner: Winner,
    pub significance: Significance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub user1: f64,
    pub user2: f64,
    pub winner: Winner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStrengths {
    pub user1: Vec<MetricName>,
    pub user2: Vec<MetricName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperComparison {
    pub metrics: Vec<ComparisonResult>,
    pub overall_score: OverallScore,
    pub strengths: ComparisonStrengths,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDeveloper {
    pub rank: usize,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub composite_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarDeveloper {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub similarity: f64,
    pub matching_areas: Vec<MetricName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketPosition {
    Top,
    AboveAverage,
    Average,
    BelowAverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPercentile {
    pub metric: MetricName,
    pub value: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitiveInsights {
    pub position: MarketPosition,
    pub avg_percentile: f64,
    pub percentiles: Vec<MetricPercentile>,
    pub outperforming_areas: Vec<MetricName>,
    pub underperforming_areas: Vec<MetricName>,
    pub actionable_insights: Vec<String>,
}
