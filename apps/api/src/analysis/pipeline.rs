//! Analysis pipeline — runs one resume/job comparison end to end.
//!
//! Flow: resolved job → comparison metrics → feedback → insight collaborator.
//!
//! The deterministic metrics are computed before the insight call and never
//! depend on it: an insight outage only fills `insight.error`.

use serde::Serialize;
use tracing::{error, info};

use crate::acquisition::ResolvedJob;
use crate::analysis::analyzer::{SkillCount, SkillVocabulary};
use crate::analysis::feedback::{synthesize, ComparisonResult};
use crate::llm_client::InsightProvider;

/// Narrative insight, or the reason there is none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InsightOutcome {
    pub text: Option<String>,
    pub error: Option<String>,
}

/// Full structured result returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub insight: InsightOutcome,
    pub keyword_match_count: usize,
    pub common_keywords: Vec<String>,
    pub resume_experience_years: u32,
    pub job_experience_years: u32,
    pub missing_skills: Vec<String>,
    pub resume_skills: SkillCount,
    pub job_skills: SkillCount,
    pub feedback: Vec<String>,
    pub job_description: ResolvedJob,
    pub warnings: Vec<String>,
}

/// Runs the comparison and the insight call for one request.
///
/// Steps:
/// 1. job.analysis_text() → the job text to analyze (empty on failed acquisition)
/// 2. ComparisonResult::compute() → keywords, skills, experience
/// 3. synthesize() → ordered recommendations
/// 4. insight.insight() → narrative text, skipped when there is no job text
pub async fn analyze(
    resume_text: &str,
    job: ResolvedJob,
    vocabulary: &SkillVocabulary,
    insight: &dyn InsightProvider,
) -> AnalysisReport {
    let job_text = job.analysis_text();
    let mut warnings: Vec<String> = job.warning().into_iter().collect();

    if resume_text.trim().is_empty() {
        warnings.push("No text could be extracted from the resume.".to_string());
    }

    let comparison = ComparisonResult::compute(resume_text, job_text, vocabulary);
    let feedback = synthesize(resume_text, job_text, vocabulary);
    info!(
        "Comparison: {} common keywords, {} missing skills, {}y resume vs {}y job",
        comparison.keyword_match_count,
        comparison.missing_skills.len(),
        comparison.resume_experience_years,
        comparison.job_experience_years
    );

    let insight = if job_text.trim().is_empty() {
        InsightOutcome {
            text: None,
            error: Some("Insight skipped: no job description text to compare against.".to_string()),
        }
    } else {
        match insight.insight(resume_text, job_text).await {
            Ok(text) => InsightOutcome {
                text: Some(text),
                error: None,
            },
            Err(e) => {
                error!("Insight generation failed: {e}");
                InsightOutcome {
                    text: None,
                    error: Some(format!("Error generating insights: {e}")),
                }
            }
        }
    };

    AnalysisReport {
        insight,
        keyword_match_count: comparison.keyword_match_count,
        common_keywords: comparison.common_keywords,
        resume_experience_years: comparison.resume_experience_years,
        job_experience_years: comparison.job_experience_years,
        missing_skills: comparison.missing_skills,
        resume_skills: comparison.resume_skills,
        job_skills: comparison.job_skills,
        feedback,
        job_description: job,
        warnings,
    }
}
