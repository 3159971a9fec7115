//! Skill vocabulary shared by upload-time fact extraction and the manual
//! fallback of AI skill extraction. Both paths must read this one table.

/// Known technology / skill keywords, lowercase. Matched as case-insensitive
/// substrings, so short terms ("go", "api") also hit inside longer words.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "javascript",
    "go",
    "c++",
    "c#",
    "php",
    "ruby",
    "swift",
    "kotlin",
    "react",
    "angular",
    "vue",
    "node",
    "django",
    "flask",
    "spring",
    "laravel",
    "express",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "git",
    "linux",
    "windows",
    "agile",
    "scrum",
    "ci/cd",
    "jenkins",
    "github",
    "gitlab",
    "html",
    "css",
    "typescript",
    "graphql",
    "rest",
    "api",
    "microservices",
];

/// Returns every vocabulary term found in `text`, title-cased, in table order.
pub fn match_skills(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut skills: Vec<String> = Vec::new();
    for term in SKILL_VOCABULARY {
        if lower.contains(term) {
            let display = title_case(term);
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(&display)) {
                skills.push(display);
            }
        }
    }
    skills
}

/// Upper-cases the first letter of every word. A word starts after any
/// character that is not alphanumeric or `_`, so "ci/cd" becomes "Ci/Cd".
pub fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut at_word_start = true;
    for c in term.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let unique: HashSet<_> = SKILL_VOCABULARY.iter().collect();
        assert_eq!(unique.len(), SKILL_VOCABULARY.len());
    }

    #[test]
    fn test_vocabulary_is_lowercase() {
        for term in SKILL_VOCABULARY {
            assert_eq!(*term, term.to_lowercase());
        }
    }

    #[test]
    fn test_title_case_simple_word() {
        assert_eq!(title_case("python"), "Python");
    }

    #[test]
    fn test_title_case_symbols() {
        assert_eq!(title_case("c++"), "C++");
        assert_eq!(title_case("c#"), "C#");
        assert_eq!(title_case("ci/cd"), "Ci/Cd");
    }

    #[test]
    fn test_title_case_keeps_existing_capitals() {
        assert_eq!(title_case("machine learning"), "Machine Learning");
        assert_eq!(title_case("PostgreSQL"), "PostgreSQL");
    }

    #[test]
    fn test_match_skills_case_insensitive() {
        let skills = match_skills("Built services in RUST and Python on Kubernetes");
        assert!(skills.contains(&"Python".to_string()));
        assert!(skills.contains(&"Kubernetes".to_string()));
    }

    #[test]
    fn test_match_skills_substring_hits_are_kept() {
        // "javascript" contains "java"; both vocabulary terms contribute.
        let skills = match_skills("JavaScript");
        assert_eq!(skills, vec!["Java".to_string(), "Javascript".to_string()]);
    }

    #[test]
    fn test_match_skills_empty_text() {
        assert!(match_skills("").is_empty());
    }
}
