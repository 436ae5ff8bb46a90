// Prompt constants and builders for answer synthesis.

/// Reply used when the model returns nothing usable.
pub const NO_ANSWER: &str = "I’m not able to answer right now.";

/// Builds the system prompt for the candidate named in the résumé.
pub fn system_prompt(candidate: Option<&str>) -> String {
    let candidate = candidate.unwrap_or("the candidate");
    format!(
        "You are a professional assistant representing {candidate}. \
        Write in third person and refer to {candidate} by name. \
        Do not mention or hint at any sources. Write naturally in plain sentences, no markdown and no asterisks. \
        Keep answers concise, no more than 4 sentences unless the user explicitly asks for more. \
        If the user asks how to contact {candidate}, provide the email and LinkedIn exactly as found in the Profile Context. \
        If a specific fact about {candidate} is not in the context, respond briefly without speculating. \
        For general questions unrelated to {candidate}, ignore the context and answer normally in a friendly tone."
    )
}

/// Wraps the assembled context and the question into the user message.
pub fn user_prompt(context: &str, question: &str) -> String {
    let context = if context.is_empty() { "(none)" } else { context };
    format!("Profile Context:\n{context}\n\nUser Question:\n{question}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_candidate() {
        let prompt = system_prompt(Some("Sam Doe"));
        assert!(prompt.contains("representing Sam Doe"));
        assert!(!prompt.contains("the candidate"));
    }

    #[test]
    fn test_system_prompt_without_name() {
        assert!(system_prompt(None).contains("representing the candidate"));
    }

    #[test]
    fn test_user_prompt_marks_missing_context() {
        assert_eq!(
            user_prompt("", "Where did Sam study?"),
            "Profile Context:\n(none)\n\nUser Question:\nWhere did Sam study?"
        );
        assert!(user_prompt("- Skills: Rust", "q").contains("- Skills: Rust"));
    }
}
