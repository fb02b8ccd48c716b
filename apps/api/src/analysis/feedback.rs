//! Feedback Synthesizer — turns the resume/job comparison into ordered recommendations.
//!
//! Order is fixed: the skills sentence always comes first, the experience
//! sentence (if any) second.

use serde::Serialize;

use crate::analysis::analyzer::{
    compare_keywords, extract_experience_years, extract_skills, SkillCount, SkillVocabulary,
};

/// Everything derived from one resume/job comparison. Built once per request.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub keyword_match_count: usize,
    pub common_keywords: Vec<String>,
    pub resume_experience_years: u32,
    pub job_experience_years: u32,
    pub missing_skills: Vec<String>,
    pub resume_skills: SkillCount,
    pub job_skills: SkillCount,
}

impl ComparisonResult {
    pub fn compute(resume_text: &str, job_text: &str, vocabulary: &SkillVocabulary) -> Self {
        let keywords = compare_keywords(job_text, resume_text);
        let resume_skills = extract_skills(resume_text, vocabulary);
        let job_skills = extract_skills(job_text, vocabulary);

        Self {
            keyword_match_count: keywords.count,
            common_keywords: keywords.keywords.into_iter().collect(),
            resume_experience_years: extract_experience_years(resume_text),
            job_experience_years: extract_experience_years(job_text),
            missing_skills: missing_skills(&resume_skills, &job_skills),
            resume_skills,
            job_skills,
        }
    }

    /// Recommendation sentences for this comparison.
    pub fn feedback(&self) -> Vec<String> {
        let mut feedback = vec![skills_sentence(&self.missing_skills)];
        if let Some(sentence) =
            experience_sentence(self.resume_experience_years, self.job_experience_years)
        {
            feedback.push(sentence);
        }
        feedback
    }
}

/// Builds the feedback list for a resume against a job description.
pub fn synthesize(resume_text: &str, job_text: &str, vocabulary: &SkillVocabulary) -> Vec<String> {
    ComparisonResult::compute(resume_text, job_text, vocabulary).feedback()
}

/// A skill is missing when the job mentions it and the resume never does.
fn missing_skills(resume: &SkillCount, job: &SkillCount) -> Vec<String> {
    job.present()
        .filter(|skill| resume.get(skill) == Some(0))
        .map(str::to_string)
        .collect()
}

fn skills_sentence(missing: &[String]) -> String {
    if missing.is_empty() {
        "You have all the key skills listed in the job description.".to_string()
    } else {
        format!(
            "Consider adding or emphasizing the following missing skills: {}.",
            missing.join(", ")
        )
    }
}

fn experience_sentence(resume_years: u32, job_years: u32) -> Option<String> {
    use std::cmp::Ordering;

    match resume_years.cmp(&job_years) {
        Ordering::Less => Some(format!(
            "You might want to highlight more experience: your resume mentions {resume_years} years, \
             {} short of the {job_years} years the job description asks for.",
            job_years - resume_years
        )),
        Ordering::Greater => Some(format!(
            "Your experience exceeds the job requirement of {job_years} years by {} years.",
            resume_years - job_years
        )),
        Ordering::Equal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> SkillVocabulary {
        SkillVocabulary::new(["python", "java", "sql"])
    }

    #[test]
    fn test_missing_skill_named_and_no_experience_sentence_when_equal() {
        let feedback = synthesize("I enjoy gardening.", "Must know Java.", &vocab());
        assert_eq!(feedback.len(), 1);
        assert!(feedback[0].contains("java"));
        assert!(feedback[0].starts_with("Consider adding"));
    }

    #[test]
    fn test_all_skills_present_affirms() {
        let feedback = synthesize("Python and SQL daily", "python, sql", &vocab());
        assert_eq!(
            feedback,
            vec!["You have all the key skills listed in the job description.".to_string()]
        );
    }

    #[test]
    fn test_missing_skills_listed_in_vocabulary_order() {
        let feedback = synthesize("", "SQL, then Python", &vocab());
        assert_eq!(
            feedback[0],
            "Consider adding or emphasizing the following missing skills: python, sql."
        );
    }

    #[test]
    fn test_experience_gap_cites_requirement_and_gap() {
        let feedback = synthesize(
            "3 years of Python",
            "5 years of Python required",
            &vocab(),
        );
        assert_eq!(feedback.len(), 2);
        assert!(feedback[1].contains("5 years"));
        assert!(feedback[1].contains("2 short"));
    }

    #[test]
    fn test_experience_surplus_noted() {
        let feedback = synthesize("10 years python", "python, 4 yrs", &vocab());
        assert_eq!(feedback.len(), 2);
        assert!(feedback[1].starts_with("Your experience exceeds the job requirement of 4 years"));
        assert!(feedback[1].contains("by 6 years"));
    }

    #[test]
    fn test_skills_sentence_always_first() {
        let feedback = synthesize("1 year", "java, 8 years", &vocab());
        assert!(feedback[0].contains("missing skills"));
        assert!(feedback[1].contains("highlight more experience"));
    }

    #[test]
    fn test_comparison_result_fields() {
        let result = ComparisonResult::compute(
            "Python developer, 3 years",
            "Python and Java developer, 5 years",
            &vocab(),
        );
        assert_eq!(result.resume_experience_years, 3);
        assert_eq!(result.job_experience_years, 5);
        assert_eq!(result.missing_skills, vec!["java".to_string()]);
        assert_eq!(
            result.common_keywords,
            vec!["developer".to_string(), "python".to_string(), "years".to_string()]
        );
        assert_eq!(result.keyword_match_count, 3);
    }
}
