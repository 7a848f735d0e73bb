//! External LLM augmentation for the chat assistant
//!
//! Optional: the assistant works without a key, this only upgrades the
//! canned reply to a generated one. Callers treat every failure here as
//! "no augmentation" and fall back silently.

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "You are a helpful assistant for a medical equipment supplier. \
You help customers with inquiries about medical equipment, surgical instruments, \
endoscopy equipment, and medical imaging solutions. Be professional, helpful, and \
knowledgeable about medical equipment. If you don't know specific product details, \
recommend contacting the sales team. Keep responses concise and helpful.";

/// Ask the LLM for a reply to a customer message. `Ok(None)` means the
/// upstream answered but produced nothing usable.
pub async fn chat_completion(
    client: &reqwest::Client,
    api_key: &str,
    message: &str,
) -> Result<Option<String>, BoxError> {
    let response = client
        .post(CHAT_COMPLETIONS_URL)
        .bearer_auth(api_key)
        .json(&serde_json::json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": message },
            ],
            "max_tokens": 200,
            "temperature": 0.7,
        }))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        tracing::debug!("LLM upstream returned {status}");
        return Ok(None);
    }

    let body: serde_json::Value = response.json().await?;
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(content)
}
