//! Prompt construction for draft generation.

use crate::content::ContentType;

/// System instructions for the copywriting model, tuned per platform and
/// content type.
pub fn build_instructions(platform: &str, brand_id: &str, content_type: ContentType) -> String {
    let base = format!(
        "You are a senior social media copywriter for {}.\n\
         Write ORIGINAL, non-generic marketing content based on the topic and brand context.\n\
         No fluff. Clear hook + value + CTA.\n\
         Avoid vague claims. Be concrete.",
        brand_id
    );

    let style = match platform {
        "linkedin" => {
            "LinkedIn style:\n\
             - professional, insight-driven\n\
             - 120-220 words\n\
             - include 3-5 bullet points if helpful\n\
             - no hashtags OR max 3 hashtags at the end"
        }
        "facebook" | "instagram" => {
            "Facebook/Instagram style:\n\
             - punchy, short-form\n\
             - 60-150 words\n\
             - strong first line hook\n\
             - include 5-12 relevant hashtags at the end (not spam)"
        }
        _ => "Generic social style. Keep it clear and direct.",
    };

    let output = match content_type {
        ContentType::Text => {
            "Content type: TEXT\n\
             Respond with JSON: {\"body_text\": \"...\", \"hashtags\": \"...\"}"
        }
        ContentType::Image => {
            "Content type: IMAGE\n\
             Respond with JSON: {\"body_text\": \"...\", \"hashtags\": \"...\", \
             \"media_prompt\": \"a single detailed prompt for generating the image that \
             matches the caption and brand style\"}"
        }
        ContentType::Video => {
            "Content type: VIDEO\n\
             Respond with JSON: {\"body_text\": \"...\", \"hashtags\": \"...\", \
             \"media_prompt\": \"short video concept: scene + camera + on-screen text + \
             duration, plus a thumbnail description\"}"
        }
    };

    format!("{}\n\n{}\n\n{}", base, style, output)
}

/// Compact brand-context block appended to the user prompt. Kept short so the
/// model does not ramble.
pub fn brand_context_block(brand_id: &str, summary: Option<&str>) -> String {
    format!(
        "BRAND CONTEXT (use this to avoid generic writing):\n\
         Brand: {}\n\n\
         Brand summary:\n{}",
        brand_id,
        summary.unwrap_or("(No summary provided)")
    )
}

/// The full user prompt for one item.
pub fn user_prompt(topic_text: &str, brand_id: &str, brand_context: Option<&str>) -> String {
    format!(
        "{}\n\nTOPIC:\n{}",
        brand_context_block(brand_id, brand_context),
        topic_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkedin_instructions() {
        let instructions = build_instructions("linkedin", "acme", ContentType::Text);
        assert!(instructions.contains("LinkedIn style"));
        assert!(instructions.contains("acme"));
        assert!(instructions.contains("body_text"));
        assert!(!instructions.contains("media_prompt"));
    }

    #[test]
    fn test_image_instructions_ask_for_media_prompt() {
        let instructions = build_instructions("instagram", "acme", ContentType::Image);
        assert!(instructions.contains("Facebook/Instagram style"));
        assert!(instructions.contains("media_prompt"));
    }

    #[test]
    fn test_unknown_platform_falls_back_to_generic() {
        let instructions = build_instructions("myspace", "acme", ContentType::Text);
        assert!(instructions.contains("Generic social style"));
    }

    #[test]
    fn test_user_prompt_contains_topic_and_context() {
        let prompt = user_prompt("Why RAG pipelines fail", "acme", Some("B2B dev tools brand"));
        assert!(prompt.contains("Why RAG pipelines fail"));
        assert!(prompt.contains("B2B dev tools brand"));

        let prompt = user_prompt("topic", "acme", None);
        assert!(prompt.contains("(No summary provided)"));
    }
}
