use std::collections::BTreeSet;

use crate::models::{
    ActivityLog, CareerMilestone, CommitRecord, Impact, MilestoneType, PullRequestRecord,
    RepositoryRecord, Timestamp,
};

const COMMIT_ACHIEVEMENT: usize = 100;
const POPULAR_REPO_STARS: u32 = 100;
const POLYGLOT_LANGUAGES: usize = 5;

/// Scan an activity log and return every career milestone it proves, oldest first.
pub fn extract_milestones(activity: &ActivityLog) -> Vec<CareerMilestone> {
    let mut commits: Vec<&CommitRecord> = activity.commits.iter().collect();
    commits.sort_by_key(|commit| commit.date);
    let mut prs: Vec<&PullRequestRecord> = activity.prs.iter().collect();
    prs.sort_by_key(|pr| pr.date);
    let mut repos: Vec<&RepositoryRecord> = activity.repos.iter().collect();
    repos.sort_by_key(|repo| repo.created);

    let mut milestones = Vec::new();

    if let Some(first) = commits.first() {
        milestones.push(milestone(
            "first-commit",
            MilestoneType::Contribution,
            "First Commit",
            "Made the first tracked commit".to_string(),
            first.date,
            Impact::Low,
            "development",
        ));
    }

    if let Some(hundredth) = commits.get(COMMIT_ACHIEVEMENT - 1) {
        milestones.push(milestone(
            "commits-100",
            MilestoneType::Achievement,
            "100 Commits",
            "Reached 100 commits".to_string(),
            hundredth.date,
            Impact::Medium,
            "development",
        ));
    }

    if let Some(repo) = repos.iter().find(|repo| repo.stars > 0) {
        milestones.push(milestone(
            "first-star",
            MilestoneType::Recognition,
            "First Starred Repository",
            "A repository received its first star".to_string(),
            repo.created,
            Impact::Medium,
            "recognition",
        ));
    }

    // max_by_key keeps the last maximum; prefer the earliest repo on ties.
    let most_starred = repos
        .iter()
        .rev()
        .max_by_key(|repo| repo.stars)
        .filter(|repo| repo.stars >= POPULAR_REPO_STARS);
    if let Some(repo) = most_starred {
        milestones.push(milestone(
            "popular-repo",
            MilestoneType::Recognition,
            "Popular Repository",
            format!("Built a repository with {} stars", repo.stars),
            repo.created,
            Impact::High,
            "recognition",
        ));
    }

    if let Some(pr) = prs.iter().find(|pr| pr.reviews >= 1) {
        milestones.push(milestone(
            "first-review",
            MilestoneType::Leadership,
            "First Reviewed Pull Request",
            "Collaborated through a reviewed pull request".to_string(),
            pr.date,
            Impact::Medium,
            "collaboration",
        ));
    }

    if let Some(repo) = repos.iter().find(|repo| repo.role == "maintainer") {
        milestones.push(milestone(
            "first-maintainer",
            MilestoneType::Leadership,
            "Repository Maintainer",
            "Became maintainer of a repository".to_string(),
            repo.created,
            Impact::High,
            "leadership",
        ));
    }

    let languages: BTreeSet<&str> = commits
        .iter()
        .map(|commit| commit.language.as_str())
        .collect();
    if languages.len() >= POLYGLOT_LANGUAGES {
        if let Some(latest) = commits.last() {
            milestones.push(milestone(
                "polyglot",
                MilestoneType::Skill,
                "Polyglot Developer",
                format!("Committed code in {} languages", languages.len()),
                latest.date,
                Impact::High,
                "skills",
            ));
        }
    }

    milestones.sort_by_key(|milestone| milestone.date);
    tracing::debug!(count = milestones.len(), "extracted career milestones");
    milestones
}

fn milestone(
    id: &str,
    kind: MilestoneType,
    title: &str,
    description: String,
    date: Timestamp,
    impact: Impact,
    category: &str,
) -> CareerMilestone {
    CareerMilestone {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description,
        date,
        impact,
        category: category.to_string(),
    }
}
