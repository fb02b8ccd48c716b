// Prompt constants for the insight collaborator.
// Resume and job text are embedded verbatim: no truncation, no sanitization.

/// System instruction sent alongside every insight prompt.
pub const INSIGHT_SYSTEM: &str = "You are an experienced technical recruiter and career coach. \
    Be specific, cite evidence from the resume, and keep the tone constructive.";

/// Insight prompt template. Replace `{resume_text}` and `{job_text}` before sending.
pub const INSIGHT_PROMPT_TEMPLATE: &str = r#"Analyze the following resume against the job description. Provide insights into how well the resume matches the job description, highlighting strengths, skills, and any potential gaps.

Resume: {resume_text}

Job Description: {job_text}

Provide insights into skill match, experience relevance, and any notable gaps in the resume."#;

/// Builds the single prompt string handed to the insight collaborator.
pub fn build_prompt(resume_text: &str, job_text: &str) -> String {
    // Job first, then the resume slot (which precedes the job in the template),
    // so placeholder-looking text inside either input is never substituted.
    INSIGHT_PROMPT_TEMPLATE
        .replacen("{job_text}", job_text, 1)
        .replacen("{resume_text}", resume_text, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_both_texts_verbatim() {
        let resume = "Jane Doe\n  5 years Python <script>";
        let job = "Backend role — SQL, Java";
        let prompt = build_prompt(resume, job);
        assert!(prompt.contains(&format!("Resume: {resume}")));
        assert!(prompt.contains(&format!("Job Description: {job}")));
        assert!(prompt.contains("skill match, experience relevance, and any notable gaps"));
    }

    #[test]
    fn test_prompt_does_not_truncate_large_input() {
        let resume = "python ".repeat(50_000);
        let prompt = build_prompt(&resume, "job");
        assert!(prompt.len() > resume.len());
        assert!(prompt.contains(&resume));
    }

    #[test]
    fn test_placeholder_text_inside_inputs_is_left_alone() {
        let prompt = build_prompt("mentions {job_text}", "mentions {resume_text}");
        assert!(prompt.contains("Resume: mentions {job_text}"));
        assert!(prompt.contains("Job Description: mentions {resume_text}"));
    }
}
