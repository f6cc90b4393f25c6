use serde::Serialize;

/// A selectable income range with the amount used for scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeBracket {
    pub tier: &'static str,
    pub label: &'static str,
    pub amount: f64,
}

/// Monthly income brackets, in tier order
pub const INCOME_BRACKETS: [IncomeBracket; 9] = [
    IncomeBracket { tier: "Low", label: "< ₹15,000", amount: 10000.0 },
    IncomeBracket { tier: "Low", label: "₹15,000 - ₹25,000", amount: 20000.0 },
    IncomeBracket { tier: "Low", label: "₹25,000 - ₹35,000", amount: 30000.0 },
    IncomeBracket { tier: "Medium", label: "₹35,000 - ₹50,000", amount: 45000.0 },
    IncomeBracket { tier: "Medium", label: "₹50,000 - ₹75,000", amount: 65000.0 },
    IncomeBracket { tier: "Medium", label: "₹75,000 - ₹1,00,000", amount: 90000.0 },
    IncomeBracket { tier: "High", label: "₹1,00,000 - ₹1,50,000", amount: 125000.0 },
    IncomeBracket { tier: "High", label: "₹1,50,000 - ₹2,00,000", amount: 175000.0 },
    IncomeBracket { tier: "High", label: "> ₹2,00,000", amount: 225000.0 },
];

/// Find a bracket by its label
pub fn find_bracket(label: &str) -> Option<&'static IncomeBracket> {
    let label = label.trim();
    INCOME_BRACKETS.iter().find(|b| b.label == label)
}

/// Brackets grouped by tier, preserving tier order
pub fn brackets_by_tier() -> Vec<(&'static str, Vec<&'static IncomeBracket>)> {
    let mut tiers: Vec<(&'static str, Vec<&'static IncomeBracket>)> = Vec::new();
    for bracket in INCOME_BRACKETS.iter() {
        match tiers.iter_mut().find(|(tier, _)| *tier == bracket.tier) {
            Some((_, brackets)) => brackets.push(bracket),
            None => tiers.push((bracket.tier, vec![bracket])),
        }
    }
    tiers
}
