use chrono::{DateTime, Local};
use rand::seq::SliceRandom;
use rand::Rng;

const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["crystal", "structure"],
        "Crystal structures are fundamental to understanding material properties. Different crystal systems (cubic, tetragonal, orthorhombic, etc.) lead to different physical and mechanical properties.",
    ),
    (
        &["mechanical", "strength"],
        "Mechanical properties like tensile strength, yield strength, and fracture toughness are crucial for engineering applications. These depend on microstructure, defects, and processing history.",
    ),
    (
        &["thermal", "temperature"],
        "Thermal properties such as thermal conductivity, expansion coefficient, and specific heat are important for high-temperature applications and thermal management.",
    ),
    (
        &["database"],
        "Materials databases are invaluable for research and design. They contain property data, phase diagrams, and processing information for thousands of materials.",
    ),
    (
        &["predict", "model"],
        "Predictive modeling in materials science uses computational methods like DFT, molecular dynamics, and machine learning to predict material properties before synthesis.",
    ),
];

pub const GENERAL_REPLIES: &[&str] = &[
    "That's an interesting question about materials science! Let me help you with that.",
    "Based on your query, I can provide insights into material properties and behavior.",
    "Materials science involves understanding structure-property relationships. What specific aspect interests you?",
    "I can assist with crystallography, thermodynamics, mechanical properties, and more. What would you like to explore?",
    "Great question! In materials science, we often consider processing-structure-property-performance relationships.",
    "I'm here to help with your materials research. Could you provide more details about what you're working on?",
    "Materials engineering combines physics, chemistry, and engineering principles. What's your specific application?",
    "From nanomaterials to bulk properties, I can discuss various scales of material behavior. What interests you most?",
];

/// Canned answer to a chat message. Keyword groups are checked in order.
pub fn reply_for(message: &str, rng: &mut impl Rng) -> &'static str {
    let lower = message.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .or_else(|| GENERAL_REPLIES.choose(rng).copied())
        .unwrap_or(GENERAL_REPLIES[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Messages of the chat view, oldest first. Survives view switches.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            sender,
            text: text.into(),
            at: Local::now(),
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn keyword_replies_are_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(reply_for("Tell me about CRYSTAL lattices", &mut rng).starts_with("Crystal structures"));
        assert!(reply_for("yield strength of steel?", &mut rng).starts_with("Mechanical properties"));
        assert!(reply_for("which database has GaN", &mut rng).starts_with("Materials databases"));
    }

    #[test]
    fn earlier_groups_win() {
        let mut rng = StdRng::seed_from_u64(0);
        // "structure" beats "model"
        assert!(reply_for("model the structure", &mut rng).starts_with("Crystal structures"));
    }

    #[test]
    fn anything_else_gets_a_general_reply() {
        let mut rng = StdRng::seed_from_u64(5);
        let reply = reply_for("hello there", &mut rng);
        assert!(GENERAL_REPLIES.contains(&reply));
    }
}
