use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use devgrowth::{
    analyze_career_trajectory, compare_developers, find_similar_developers,
    generate_competitive_insights, predict_career, predict_growth, predict_job_matches,
    predict_next_milestone, predict_skill_demand, rank_developers, ActivityLog,
    CareerPredictionInput, DeveloperMetrics, DeveloperProfile, JobPosting, StageName, TrendMetric,
    TrendValues,
};

mod load;

#[derive(Parser)]
#[command(name = "devgrowth")]
#[command(about = "Developer growth analytics and forecasting", long_about = None)]
struct Cli {
    /// Evaluation time (RFC 3339 or YYYY-MM-DD); defaults to the system clock
    #[arg(long, global = true, env = "DEVGROWTH_NOW")]
    now: Option<String>,
    /// Emit single-line JSON
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive milestones, stages and the projected next stage
    Trajectory {
        #[arg(long)]
        activity: PathBuf,
    },
    /// Forecast metrics from a history CSV
    Forecast {
        #[arg(long)]
        history: PathBuf,
        /// Metrics to forecast; defaults to every CSV column
        #[arg(long = "metric")]
        metrics: Vec<TrendMetric>,
    },
    /// Run every predictor over a bundled input file
    Career {
        #[arg(long)]
        input: PathBuf,
    },
    /// Predict the next activity milestone
    Milestone {
        #[arg(long)]
        totals: PathBuf,
        /// Monthly growth of the milestone metric
        #[arg(long, default_value_t = 0.0)]
        trend: f64,
        #[arg(long, default_value = "junior")]
        stage: StageName,
    },
    /// Predict demand for skills from usage series
    Skills {
        #[arg(long)]
        usage: PathBuf,
    },
    /// Score job postings against a developer profile
    Jobs {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        jobs: PathBuf,
    },
    /// Compare two developers metric by metric
    Compare {
        #[arg(long)]
        user1: PathBuf,
        #[arg(long)]
        user2: PathBuf,
    },
    /// Rank developers by composite score
    Rank {
        #[arg(long)]
        developers: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Find developers similar to a target
    Similar {
        #[arg(long)]
        target: PathBuf,
        #[arg(long)]
        candidates: PathBuf,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Position a developer against peers
    Insights {
        #[arg(long)]
        user: PathBuf,
        #[arg(long)]
        peers: PathBuf,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobProfile {
    #[serde(default)]
    totals: TrendValues,
    #[serde(default)]
    skills: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = resolve_now(cli.now.as_deref())?;
    tracing::debug!(%now, "resolved evaluation time");

    match cli.command {
        Commands::Trajectory { activity } => {
            let activity: ActivityLog = load::load_json(&activity)?;
            emit(&analyze_career_trajectory(&activity, now), cli.compact)?;
        }
        Commands::Forecast { history, metrics } => {
            let (columns, snapshots) = load::load_history_csv(&history)?;
            let metrics = if metrics.is_empty() { columns } else { metrics };
            emit(&predict_growth(&snapshots, &metrics, now), cli.compact)?;
        }
        Commands::Career { input } => {
            let input: CareerPredictionInput = load::load_json(&input)?;
            emit(&predict_career(&input, now), cli.compact)?;
        }
        Commands::Milestone {
            totals,
            trend,
            stage,
        } => {
            let totals: TrendValues = load::load_json(&totals)?;
            let prediction = predict_next_milestone(&totals, trend, stage, now);
            if prediction.is_none() {
                tracing::info!("every tracked milestone has been reached");
            }
            emit(&prediction, cli.compact)?;
        }
        Commands::Skills { usage } => {
            let usage: BTreeMap<String, Vec<f64>> = load::load_json(&usage)?;
            let predictions: Vec<_> = usage
                .iter()
                .map(|(skill, series)| predict_skill_demand(skill, series))
                .collect();
            emit(&predictions, cli.compact)?;
        }
        Commands::Jobs { profile, jobs } => {
            let profile: JobProfile = load::load_json(&profile)?;
            let jobs: Vec<JobPosting> = load::load_json(&jobs)?;
            emit(
                &predict_job_matches(&profile.totals, &profile.skills, &jobs),
                cli.compact,
            )?;
        }
        Commands::Compare { user1, user2 } => {
            let user1: DeveloperMetrics = load::load_json(&user1)?;
            let user2: DeveloperMetrics = load::load_json(&user2)?;
            emit(&compare_developers(&user1, &user2), cli.compact)?;
        }
        Commands::Rank { developers, limit } => {
            let developers: Vec<DeveloperProfile> = load::load_json(&developers)?;
            if developers.is_empty() {
                tracing::info!("no developers supplied");
            }
            let ranked: Vec<_> = rank_developers(&developers).into_iter().take(limit).collect();
            emit(&ranked, cli.compact)?;
        }
        Commands::Similar {
            target,
            candidates,
            limit,
        } => {
            let target: DeveloperMetrics = load::load_json(&target)?;
            let candidates: Vec<DeveloperProfile> = load::load_json(&candidates)?;
            emit(&find_similar_developers(&target, &candidates, limit), cli.compact)?;
        }
        Commands::Insights { user, peers } => {
            let user: DeveloperMetrics = load::load_json(&user)?;
            let peers: Vec<DeveloperMetrics> = load::load_json(&peers)?;
            emit(&generate_competitive_insights(&user, &peers), cli.compact)?;
        }
    }

    Ok(())
}

fn resolve_now(raw: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match raw {
        Some(value) => load::parse_date(value).context("invalid --now / DEVGROWTH_NOW"),
        None => Ok(Utc::now()),
    }
}

fn emit<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    println!("{}", render(value, compact)?);
    Ok(())
}

fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}
