//! Scripted shopping assistant.
//!
//! Not a model: an ordered keyword table picks a canned reply and a handful
//! of catalog products. The first rule with a keyword contained in the
//! lower-cased message wins; otherwise one of a few generic replies is chosen
//! at random.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use nextshop_core::ProductId;

use crate::config::{DelayRange, StorefrontConfig};
use crate::models::Product;

/// First message of every conversation.
pub const GREETING: &str = "Hi! I'm your AI shopping assistant. I can help you find products, answer questions, and provide personalized recommendations. What are you looking for today?";

const FALLBACK_REPLIES: [&str; 4] = [
    "That's a great question! Let me help you find exactly what you're looking for. Could you tell me more about your preferences?",
    "I'd be happy to help! Based on our current inventory, I can recommend some excellent options. What's your budget range?",
    "Interesting! I can suggest some products that might be perfect for you. Are you looking for something specific or just browsing?",
    "I understand what you're looking for. Let me show you some of our top-rated products that match your needs.",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
}

/// One keyword rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
    /// Which products to recommend.
    pub select: fn(&Product) -> bool,
    pub limit: usize,
    pub reason: &'static str,
    pub confidence: f32,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }

    fn recommend(&self, products: &[Product]) -> Vec<Recommendation> {
        products
            .iter()
            .filter(|p| (self.select)(p))
            .take(self.limit)
            .map(|p| Recommendation {
                product_id: p.id,
                reason: self.reason.to_string(),
                confidence: self.confidence,
            })
            .collect()
    }
}

fn is_audio(product: &Product) -> bool {
    product.category == "Electronics"
        && (product.name.to_lowercase().contains("headphone") || product.has_tag("wireless"))
}

fn is_fitness(product: &Product) -> bool {
    product.name.to_lowercase().contains("fitness") || product.has_tag("fitness")
}

fn is_organic(product: &Product) -> bool {
    product.has_tag("organic")
}

const fn any_product(_: &Product) -> bool {
    true
}

/// The rule table, in priority order.
pub const RULES: [Rule; 4] = [
    Rule {
        keywords: &["headphone", "audio"],
        reply: "I found some excellent headphones for you! Based on your interest in audio products, I'd recommend checking out our premium wireless headphones. They feature noise cancellation and exceptional sound quality.",
        select: is_audio,
        limit: 2,
        reason: "High-quality audio with premium features",
        confidence: 0.95,
    },
    Rule {
        keywords: &["fitness", "watch", "health"],
        reply: "For fitness tracking, I highly recommend our smart fitness watch. It includes heart rate monitoring, GPS tracking, and comprehensive health analytics to help you reach your goals.",
        select: is_fitness,
        limit: 1,
        reason: "Perfect for fitness tracking and health monitoring",
        confidence: 0.92,
    },
    Rule {
        keywords: &["sustainable", "eco", "environment"],
        reply: "I love that you're thinking about sustainability! All our products include carbon offset shipping options, and we donate a portion of proceeds to environmental causes. Our organic tea set is particularly eco-friendly with sustainable packaging.",
        select: is_organic,
        limit: 1,
        reason: "Eco-friendly and sustainably sourced",
        confidence: 0.88,
    },
    Rule {
        keywords: &["gift", "present"],
        reply: "Looking for the perfect gift? I'd recommend our premium wireless headphones or the minimalist backpack - both are popular gift choices with excellent reviews and beautiful packaging.",
        select: any_product,
        limit: 2,
        reason: "Popular gift choice with premium quality",
        confidence: 0.85,
    },
];

/// A product suggested alongside a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: ProductId,
    pub reason: String,
    pub confidence: f32,
}

/// A reply before it is placed in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub recommendations: Vec<Recommendation>,
}

/// Matches messages against [`RULES`].
#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    rules: &'static [Rule],
}

impl Default for ScriptedResponder {
    fn default() -> Self {
        Self { rules: &RULES }
    }
}

impl ScriptedResponder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule `message` would trigger, if any.
    #[must_use]
    pub fn rule_for(&self, message: &str) -> Option<&'static Rule> {
        let lowered = message.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&lowered))
    }

    /// Reply to `message`, recommending from `products`.
    pub fn respond<R: rand::Rng + ?Sized>(
        &self,
        message: &str,
        products: &[Product],
        rng: &mut R,
    ) -> Reply {
        if let Some(rule) = self.rule_for(message) {
            return Reply {
                text: rule.reply.to_string(),
                recommendations: rule.recommend(products),
            };
        }

        let text = FALLBACK_REPLIES
            .choose(rng)
            .copied()
            .unwrap_or(FALLBACK_REPLIES[0]);
        Reply {
            text: text.to_string(),
            recommendations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Shopper,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
}

impl ChatMessage {
    fn new(sender: Sender, text: String, recommendations: Vec<Recommendation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            text,
            timestamp: Utc::now(),
            recommendations,
        }
    }
}

/// A conversation with the assistant.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    responder: ScriptedResponder,
    typing_delay: DelayRange,
    rng: StdRng,
}

impl ChatSession {
    /// Start a conversation with the greeting already in the transcript.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Start a conversation with a caller-supplied random source.
    #[must_use]
    pub fn with_rng(config: &StorefrontConfig, rng: StdRng) -> Self {
        Self {
            messages: vec![ChatMessage::new(
                Sender::Assistant,
                GREETING.to_string(),
                Vec::new(),
            )],
            responder: ScriptedResponder::new(),
            typing_delay: config.typing_delay,
            rng,
        }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send a shopper message and wait for the assistant's reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` for blank input; the transcript is
    /// left unchanged.
    #[instrument(skip(self, products), fields(transcript_len = self.messages.len()))]
    pub async fn send(
        &mut self,
        text: &str,
        products: &[Product],
    ) -> Result<ChatMessage, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        self.messages
            .push(ChatMessage::new(Sender::Shopper, text.to_string(), Vec::new()));

        let delay = self.typing_delay.sample(&mut self.rng);
        tokio::time::sleep(delay).await;

        let reply = self.responder.respond(text, products, &mut self.rng);
        tracing::debug!(
            recommendations = reply.recommendations.len(),
            "Assistant replied"
        );
        let message = ChatMessage::new(Sender::Assistant, reply.text, reply.recommendations);
        self.messages.push(message.clone());
        Ok(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::seed;

    fn ids(reply: &Reply) -> Vec<u64> {
        reply
            .recommendations
            .iter()
            .map(|r| r.product_id.as_u64())
            .collect()
    }

    fn respond(message: &str) -> Reply {
        let mut rng = StdRng::seed_from_u64(1);
        ScriptedResponder::new().respond(message, &seed::products(), &mut rng)
    }

    #[test]
    fn test_audio_rule() {
        let reply = respond("Any good HEADPHONES?");
        assert!(reply.text.starts_with("I found some excellent headphones"));
        assert_eq!(ids(&reply), vec![1]);
        let first = reply.recommendations.first().unwrap();
        assert_eq!(first.reason, "High-quality audio with premium features");
        assert!((first.confidence - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fitness_rule() {
        let reply = respond("something to track my health");
        assert_eq!(ids(&reply), vec![2]);
    }

    #[test]
    fn test_eco_rule() {
        let reply = respond("I care about the environment");
        assert_eq!(ids(&reply), vec![4]);
        assert_eq!(
            reply.recommendations.first().unwrap().reason,
            "Eco-friendly and sustainably sourced"
        );
    }

    #[test]
    fn test_gift_rule_takes_first_two() {
        let reply = respond("need a present for my dad");
        assert_eq!(ids(&reply), vec![1, 2]);
    }

    #[test]
    fn test_every_keyword_triggers_its_rule() {
        let cases: [(&str, usize, &[u64]); 10] = [
            ("headphone", 0, &[1]),
            ("audio", 0, &[1]),
            ("fitness", 1, &[2]),
            ("watch", 1, &[2]),
            ("health", 1, &[2]),
            ("sustainable", 2, &[4]),
            ("eco", 2, &[4]),
            ("environment", 2, &[4]),
            ("gift", 3, &[1, 2]),
            ("present", 3, &[1, 2]),
        ];
        for (keyword, rule, expected) in cases {
            let message = format!("Tell me about {keyword} options");
            let reply = respond(&message);
            assert_eq!(reply.text, RULES[rule].reply, "keyword {keyword}");
            assert_eq!(ids(&reply), expected, "keyword {keyword}");
            assert!(
                reply
                    .recommendations
                    .iter()
                    .all(|r| r.reason == RULES[rule].reason),
                "keyword {keyword}"
            );
        }
    }

    #[test]
    fn test_first_rule_wins() {
        // "watch" and "audio" both appear; the audio rule comes first
        let reply = respond("a watch with audio");
        assert_eq!(ids(&reply), vec![1]);
    }

    #[test]
    fn test_fallback_has_no_recommendations() {
        let reply = respond("hello there");
        assert!(FALLBACK_REPLIES.contains(&reply.text.as_str()));
        assert!(reply.recommendations.is_empty());
        assert!(ScriptedResponder::new().rule_for("hello there").is_none());
    }

    #[test]
    fn test_rules_see_catalog_edits() {
        let mut products = seed::products();
        products.retain(|p| !p.has_tag("organic"));
        let mut rng = StdRng::seed_from_u64(3);
        let reply = ScriptedResponder::new().respond("eco", &products, &mut rng);
        assert!(reply.recommendations.is_empty());
        assert!(reply.text.starts_with("I love that you're thinking about sustainability"));
    }

    #[tokio::test]
    async fn test_chat_session_transcript() {
        let config = StorefrontConfig::default().without_delays();
        let mut chat = ChatSession::with_rng(&config, StdRng::seed_from_u64(9));
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages().first().unwrap().text, GREETING);

        let products = seed::products();
        assert_eq!(chat.send("   ", &products).await, Err(ChatError::EmptyMessage));
        assert_eq!(chat.messages().len(), 1);

        let reply = chat.send("gift ideas?", &products).await.unwrap();
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.recommendations.len(), 2);

        let senders: Vec<_> = chat.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::Assistant, Sender::Shopper, Sender::Assistant]
        );
    }
}
