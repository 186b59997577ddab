use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shown when the model comes back with an empty answer.
pub const NO_INFO_FALLBACK: &str =
    "I couldn't find specific info on that right now. Try checking the /economy menu in-game.";

/// Persona and domain guidance sent with every request. Constant across
/// calls; the conversation itself is not replayed upstream.
const SYSTEM_INSTRUCTION: &str = "\
You are the \"Donut SMP Tycoon Master\". Your goal is to help players make money on the Minecraft server \"Donut SMP\".

Context about Donut SMP:
- It is a Hardcore/Lifesteal style server or standard SMP depending on the season.
- Economy is usually driven by Spawners (Iron Golem, Blaze), Farming (Cactus, Cane), and PVP.
- \"AFK\"ing is a common strategy.

Your style:
- Concise, gamer-speak (use terms like \"meta\", \"buffed\", \"nerfed\", \"AFK\", \"grind\").
- Helpful and numeric where possible.

Tools:
- Use Google Search to find the ABSOLUTE LATEST methods, as server economies change every season (wipes).
- If a user asks about \"glitches\" or \"dupes\", warn them that it's bannable but explain legitimate high-yield alternatives.";

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("network error talking to the Gemini API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Gemini API returned {status}: {body}")]
    Endpoint {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not parse the Gemini API response: {0}")]
    MalformedPayload(#[source] reqwest::Error),
    #[error("advice request task failed")]
    TaskFailed,
}

/// One answer from the assistant: the text plus any search-grounding
/// citations, in the order the endpoint returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub text: String,
    pub source_urls: Vec<Url>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    google_search: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Deserialize)]
struct WebSource {
    uri: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(api_key, model, API_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One question in, one answer out. Single attempt, search grounding
    /// enabled so the model can pull the current season's meta.
    pub async fn strategy_advice(&self, question: &str) -> Result<Advice, AdviceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: question.to_string(),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            tools: vec![Tool {
                google_search: serde_json::json!({}),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(AdviceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdviceError::Endpoint { status, body });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(AdviceError::MalformedPayload)?;

        Ok(extract_advice(payload))
    }
}

fn extract_advice(payload: GenerateResponse) -> Advice {
    let candidate = payload.candidates.into_iter().next();

    let text = candidate
        .as_ref()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| NO_INFO_FALLBACK.to_string());

    // Keep citation order as returned; skip anything that isn't a
    // well-formed absolute URL. No dedup.
    let source_urls = candidate
        .and_then(|c| c.grounding_metadata)
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| Url::parse(&web.uri).ok())
        .collect();

    Advice { text, source_urls }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_payload(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn extracts_answer_text_and_sources_in_order() {
        let payload = parse_payload(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Golem spawners are the meta."}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "https://a.example/one"}},
                            {"web": {"uri": "https://b.example/two"}},
                            {"web": {"uri": "https://c.example/three"}}
                        ]
                    }
                }]
            }"#,
        );
        let advice = extract_advice(payload);
        assert_eq!(advice.text, "Golem spawners are the meta.");
        let urls: Vec<String> = advice.source_urls.iter().map(|u| u.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example/one",
                "https://b.example/two",
                "https://c.example/three"
            ]
        );
    }

    #[test]
    fn empty_answer_falls_back_to_fixed_string() {
        let payload = parse_payload(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        );
        let advice = extract_advice(payload);
        assert_eq!(advice.text, NO_INFO_FALLBACK);
        assert!(advice.source_urls.is_empty());
    }

    #[test]
    fn missing_candidates_fall_back_to_fixed_string() {
        let advice = extract_advice(parse_payload("{}"));
        assert_eq!(advice.text, NO_INFO_FALLBACK);
        assert!(advice.source_urls.is_empty());
    }

    #[test]
    fn malformed_citation_uris_are_skipped() {
        let payload = parse_payload(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "answer"}]},
                    "groundingMetadata": {
                        "groundingChunks": [
                            {"web": {"uri": "not a url"}},
                            {"web": {"uri": "https://ok.example/"}},
                            {"web": null}
                        ]
                    }
                }]
            }"#,
        );
        let advice = extract_advice(payload);
        assert_eq!(advice.source_urls.len(), 1);
        assert_eq!(advice.source_urls[0].as_str(), "https://ok.example/");
    }

    #[test]
    fn multi_part_answers_are_joined() {
        let payload = parse_payload(
            r#"{"candidates": [{"content": {"parts": [{"text": "part one. "}, {"text": "part two."}]}}]}"#,
        );
        assert_eq!(extract_advice(payload).text, "part one. part two.");
    }
}
