//! Prompt templates for site analysis.

/// Question used when the caller leaves it blank.
pub const DEFAULT_ANALYSIS_QUESTION: &str =
    "What are their sustainability initiatives, ESG metrics, and green projects?";

/// Build the site-analysis prompt.
///
/// The model only sees the URL; no page content is fetched here.
pub fn analysis_prompt(url: &str, question: &str) -> String {
    let question = match question.trim() {
        "" => DEFAULT_ANALYSIS_QUESTION,
        q => q,
    };

    format!(
        "I need to analyze information from this website: {url}.\n\
         Please answer this question: {question}\n\
         Provide a detailed analysis based on available information."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_url_and_question() {
        let prompt = analysis_prompt("https://acme.com", "Do they use solar?");
        assert!(prompt.contains("https://acme.com"));
        assert!(prompt.contains("Please answer this question: Do they use solar?"));
        assert!(prompt.ends_with("based on available information."));
    }

    #[test]
    fn test_blank_question_uses_default() {
        let prompt = analysis_prompt("https://acme.com", "   ");
        assert!(prompt.contains(DEFAULT_ANALYSIS_QUESTION));
    }
}
