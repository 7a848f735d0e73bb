//! Storefront chat assistant
//!
//! POST /api/chat
//!
//! Keyword search over the active catalog plus a canned topic reply,
//! optionally upgraded by an external LLM when a key is configured. This
//! endpoint never surfaces a 500 for store trouble: a failed lookup
//! degrades to an apology with no suggestions.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::collections::HashMap;

use crate::db;
use crate::llm;
use crate::state::AppState;

const SUGGESTION_LIMIT: i64 = 5;

const APOLOGY_REPLY: &str = "I apologize, but I'm experiencing some technical difficulties. \
Please contact our support team for immediate assistance with your inquiry.";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub products: Vec<ProductSuggestion>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSuggestion {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub short_desc: Option<String>,
    pub category: String,
    pub image_urls: serde_json::Value,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::validation("Message is required"));
    }

    let products = match find_suggestions(&state, &message).await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!("Chat product search failed: {e}");
            return Ok(Json(ChatResponse {
                response: APOLOGY_REPLY.to_string(),
                products: Vec::new(),
            }));
        }
    };

    let mut response = match augment_with_llm(&state, &message).await {
        Some(generated) => generated,
        None => fallback_reply(&message).to_string(),
    };

    append_suggestions(&mut response, &products);

    Ok(Json(ChatResponse { response, products }))
}

async fn find_suggestions(
    state: &AppState,
    message: &str,
) -> Result<Vec<ProductSuggestion>, sqlx::Error> {
    let patterns: Vec<String> = extract_keywords(message)
        .into_iter()
        .map(|kw| format!("%{kw}%"))
        .collect();
    if patterns.is_empty() {
        return Ok(Vec::new());
    }

    let products = db::products::search_active(&state.pool, &patterns, SUGGESTION_LIMIT).await?;

    let category_names: HashMap<i64, String> = db::categories::list(&state.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    Ok(products
        .into_iter()
        .map(|p| ProductSuggestion {
            id: p.id,
            name: p.name,
            price: p.price,
            short_desc: p.short_desc,
            category: category_names
                .get(&p.category_id)
                .cloned()
                .unwrap_or_default(),
            image_urls: p.image_urls,
        })
        .collect())
}

async fn augment_with_llm(state: &AppState, message: &str) -> Option<String> {
    let api_key = state.openai_api_key.as_deref()?;
    match llm::chat_completion(&state.http_client, api_key, message).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!("LLM augmentation unavailable, using canned reply: {e}");
            None
        }
    }
}

/// Search terms: lowercased words longer than two characters, first
/// occurrence wins.
fn extract_keywords(message: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in message.to_lowercase().split_whitespace() {
        let term: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if term.len() > 2 && !keywords.contains(&term) {
            keywords.push(term);
        }
    }
    keywords
}

/// Canned reply picked by topic when no LLM answer is available.
fn fallback_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();

    if lower.contains("price") || lower.contains("cost") {
        "For pricing information on our medical equipment, please contact our sales team. \
         We offer competitive prices and can provide detailed quotations based on your \
         specific requirements."
    } else if lower.contains("endoscop") {
        "We offer a comprehensive range of endoscopy equipment including HD endoscopes, \
         laparoscopic cameras, and endoscopic accessories. Our products are designed for \
         precision and reliability in minimally invasive procedures."
    } else if lower.contains("surgical") || lower.contains("instrument") {
        "We provide high-quality surgical instruments including forceps, scissors, \
         retractors, and specialized surgical tools. All our instruments meet international \
         quality standards and are designed for durability and precision."
    } else if lower.contains("imaging") || lower.contains("x-ray") || lower.contains("ultrasound")
    {
        "Our medical imaging solutions include digital X-ray systems, ultrasound machines, \
         and advanced imaging equipment. These systems provide high-resolution images for \
         accurate diagnosis and treatment planning."
    } else if lower.contains("support") || lower.contains("help") || lower.contains("service") {
        "We provide comprehensive technical support, training, and maintenance services for \
         all our products. Our support team is available to help you with installation, \
         training, and ongoing technical assistance."
    } else {
        "Hello! I'm here to help you with information about our medical equipment. We \
         specialize in surgical instruments, endoscopy equipment, and medical imaging \
         solutions. How can I assist you today?"
    }
}

fn append_suggestions(response: &mut String, products: &[ProductSuggestion]) {
    if products.is_empty() {
        return;
    }
    response.push_str("\n\nHere are some relevant products from our catalog:\n");
    for (index, product) in products.iter().enumerate() {
        response.push_str(&format!(
            "\n{}. {} - ₹{} ({})",
            index + 1,
            product.name,
            product.price,
            product.category
        ));
        if let Some(desc) = &product.short_desc {
            response.push_str(&format!("\n   {desc}"));
        }
    }
    response.push_str(
        "\n\nWould you like more details about any of these products? Please contact our \
         team for personalized assistance.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords() {
        assert_eq!(
            extract_keywords("Do you sell HD endoscopes?"),
            vec!["you", "sell", "endoscopes"]
        );
        assert_eq!(extract_keywords("an is to"), Vec::<String>::new());
        // Duplicates collapse, punctuation is stripped
        assert_eq!(extract_keywords("X-ray, x-ray!"), vec!["xray"]);
    }

    #[test]
    fn test_fallback_reply_topics() {
        assert!(fallback_reply("what is the PRICE of this").contains("pricing"));
        assert!(fallback_reply("endoscopy gear?").contains("endoscopy"));
        assert!(fallback_reply("surgical tools").contains("surgical instruments"));
        assert!(fallback_reply("ultrasound machines").contains("imaging"));
        assert!(fallback_reply("need help").contains("technical support"));
        assert!(fallback_reply("hi there").starts_with("Hello!"));
    }

    #[test]
    fn test_append_suggestions() {
        let mut response = String::from("Sure.");
        append_suggestions(&mut response, &[]);
        assert_eq!(response, "Sure.");

        let suggestions = vec![ProductSuggestion {
            id: 1,
            name: "HD Endoscope".into(),
            price: "45000.00".parse().unwrap(),
            short_desc: Some("1080p imaging head".into()),
            category: "Endoscopy".into(),
            image_urls: serde_json::json!([]),
        }];
        append_suggestions(&mut response, &suggestions);
        assert!(response.contains("1. HD Endoscope - ₹45000.00 (Endoscopy)"));
        assert!(response.contains("1080p imaging head"));
    }
}
