use crate::resume::models::CanonicalResume;

/// Starter prompts offered to a visitor before they type anything.
pub fn suggestions(resume: &CanonicalResume) -> Vec<String> {
    let who = resume.name.as_deref().unwrap_or("the candidate");

    let mut prompts = vec![
        format!("What are {who}'s strongest technical skills?"),
        "Summarize the experience.".to_string(),
        "What are the top 3 projects?".to_string(),
        format!("Where did {who} study?"),
        format!("How can I contact {who}?"),
    ];

    if let Some(company) = resume.experience.iter().find_map(|e| e.company.as_deref()) {
        prompts.push(format!("What impact did {who} have at {company}?"));
    }

    prompts
}
