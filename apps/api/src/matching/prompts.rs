// LLM prompt constants for the Matching module.
// The JSON-only system prompt is shared from llm_client::prompts.

/// Semantic match prompt. Replace `{resume_text}` and `{job_text}` before sending.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"Analyze the following resume and job description for comprehensive matching.

Return a JSON object with this EXACT schema:
{
  "score": 0,
  "reasoning": "detailed explanation",
  "matched_skills": ["skill1", "skill2"],
  "missing_skills": ["skill3"],
  "experience_match": 0,
  "education_match": 0
}

All numeric fields are between 0 and 100.

Resume:
{resume_text}

Job Description:
{job_text}

Focus on:
- Technical skills matching
- Experience level compatibility
- Education requirements
- Overall suitability"#;

/// Skill extraction prompt. Replace `{text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract technical skills, experience level, and education from the following text.

Return a JSON object with this EXACT schema:
{
  "skills": ["skill1", "skill2"],
  "experience_years": 0,
  "education_level": "bachelor"
}

education_level is one of: phd, master, bachelor, associate, high_school.

Text:
{text}

Focus on:
- Programming languages and frameworks
- Tools and technologies
- Years of experience
- Highest education level"#;
