// file: src/analyzer/prompt.rs
// description: prompt construction for CV versus requirements analysis

use crate::models::TargetSpec;

pub const SYSTEM_PROMPT: &str =
    "You are an expert HR recruiter. Always respond with valid JSON only.";

pub fn build_user_prompt(cv_text: &str, target: &TargetSpec) -> String {
    format!(
        r#"You are an expert HR recruiter analyzing a CV against job requirements.

JOB REQUIREMENTS:
{requirements}

CV CONTENT:
{cv_text}

Please analyze this CV and provide a detailed match assessment. Return your response as a JSON object with the following structure:
{{
    "match_percentage": <0-100>,
    "skills_match": <0-100>,
    "experience_match": <0-100>,
    "education_match": <0-100>,
    "overall_match": <0-100>,
    "summary": "<brief 2-3 sentence summary>",
    "strengths": ["strength1", "strength2", "strength3"],
    "weaknesses": ["weakness1", "weakness2"]
}}

Consider:
- Skills: How well the candidate's skills match the requirements
- Experience: Relevance and depth of work experience
- Education: Educational background alignment
- Overall: Comprehensive match considering all factors

Be honest and critical in your assessment. Return ONLY the JSON object, no additional text.
"#,
        requirements = target.requirements.trim(),
        cv_text = cv_text,
    )
}
