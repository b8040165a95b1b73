//! Brand profiling: distill scraped text into a structured profile.

use std::sync::Arc;

use async_trait::async_trait;

use crate::generation::{CompletionRequest, LlmClient};

use super::ProfileError;

/// Structured output of one profiling pass.
#[derive(Debug, Clone)]
pub struct ProfileDocument {
    pub profile: serde_json::Value,
    pub summary: String,
}

/// Trait for brand profilers.
#[async_trait]
pub trait BrandProfiler: Send + Sync {
    /// Turn scraped site text into a structured profile plus a summary
    /// suitable for prompting.
    async fn build_profile(
        &self,
        brand_id: &str,
        website_url: &str,
        raw_text: &str,
    ) -> Result<ProfileDocument, ProfileError>;
}

/// Profiler backed by an LLM chat client.
pub struct LlmBrandProfiler {
    client: Arc<dyn LlmClient>,
}

impl LlmBrandProfiler {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    fn prompt(brand_id: &str, website_url: &str, raw_text: &str) -> String {
        format!(
            "You are a brand strategist and social media content director.\n\n\
             Your job:\n\
             1) Read the website scrape text\n\
             2) Extract key brand signals (copy, tone, positioning, products/services, CTAs)\n\
             3) Produce a compact, structured brand profile.\n\n\
             Rules:\n\
             - Be specific, not generic.\n\
             - If information is missing, infer carefully and label it as \"inferred\".\n\
             - Keep arrays short and punchy.\n\n\
             Respond with JSON only:\n\
             {{\"one_liner\": \"\", \"tone\": {{\"tags\": []}}, \
             \"positioning\": {{\"value_props\": []}}, \"audiences\": [], \
             \"products_services\": [], \"cta_style\": [], \"content_angles\": [], \
             \"keywords\": []}}\n\n\
             Brand: {}\nWebsite: {}\n\nSCRAPE TEXT:\n{}",
            brand_id, website_url, raw_text
        )
    }

    /// Human-readable summary for the generation prompt and the UI.
    fn summarize(profile: &serde_json::Value) -> String {
        let get_str = |path: &[&str]| -> Option<String> {
            let mut value = profile;
            for key in path {
                value = value.get(key)?;
            }
            value.as_str().map(str::to_string)
        };

        let get_list = |path: &[&str]| -> Vec<String> {
            let mut value = profile;
            for key in path {
                match value.get(key) {
                    Some(v) => value = v,
                    None => return Vec::new(),
                }
            }
            value
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .take(6)
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut lines = Vec::new();
        if let Some(one_liner) = get_str(&["one_liner"]).filter(|s| !s.is_empty()) {
            lines.push(format!("One-liner: {}", one_liner));
        }
        let tone = get_list(&["tone", "tags"]);
        if !tone.is_empty() {
            lines.push(format!("Tone: {}", tone.join(", ")));
        }
        let services = get_list(&["products_services"]);
        if !services.is_empty() {
            lines.push(format!("Products/Services: {}", services.join(", ")));
        }
        let value_props = get_list(&["positioning", "value_props"]);
        if !value_props.is_empty() {
            lines.push(format!("Value props: {}", value_props.join("; ")));
        }
        let angles = get_list(&["content_angles"]);
        if !angles.is_empty() {
            lines.push(format!("Content angles: {}", angles.join("; ")));
        }

        lines.join("\n")
    }
}

#[async_trait]
impl BrandProfiler for LlmBrandProfiler {
    async fn build_profile(
        &self,
        brand_id: &str,
        website_url: &str,
        raw_text: &str,
    ) -> Result<ProfileDocument, ProfileError> {
        let completion = self
            .client
            .complete(
                CompletionRequest::new(Self::prompt(brand_id, website_url, raw_text))
                    .with_max_tokens(2048)
                    .with_temperature(0.4),
            )
            .await
            .map_err(|e| ProfileError::Profiling(e.to_string()))?;

        let text = completion.text;
        let start = text.find('{');
        let end = text.rfind('}');
        let json = match (start, end) {
            (Some(s), Some(e)) if e > s => &text[s..=e],
            _ => {
                return Err(ProfileError::Profiling(
                    "profiler did not return JSON".to_string(),
                ))
            }
        };

        let profile: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ProfileError::Profiling(e.to_string()))?;

        let summary = Self::summarize(&profile);

        Ok(ProfileDocument { profile, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_collects_known_fields() {
        let profile = serde_json::json!({
            "one_liner": "Dev tools that get out of the way",
            "tone": {"tags": ["direct", "technical"]},
            "products_services": ["CI runner", "artifact cache"],
            "positioning": {"value_props": ["fast builds"]},
            "content_angles": ["build speed benchmarks"]
        });

        let summary = LlmBrandProfiler::summarize(&profile);
        assert!(summary.contains("Dev tools that get out of the way"));
        assert!(summary.contains("direct, technical"));
        assert!(summary.contains("CI runner"));
        assert!(summary.contains("fast builds"));
        assert!(summary.contains("build speed benchmarks"));
    }

    #[test]
    fn test_summarize_empty_profile() {
        let summary = LlmBrandProfiler::summarize(&serde_json::json!({}));
        assert!(summary.is_empty());
    }
}
