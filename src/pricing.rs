use log::{info, warn};

/// USD rates per 1000 tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEntry {
    pub prompt: f64,
    pub completion: f64,
}

/// Static reference table; models absent here report "no estimate" instead
/// of a figure.
const PRICING_RATES: &[(&str, PricingEntry)] = &[
    ("gpt-3.5-turbo", PricingEntry { prompt: 0.001, completion: 0.002 }),
    ("gpt-3.5-turbo-1106", PricingEntry { prompt: 0.001, completion: 0.002 }),
    ("gpt-3.5-turbo-0613", PricingEntry { prompt: 0.001, completion: 0.002 }),
    ("gpt-3.5-turbo-16k", PricingEntry { prompt: 0.001, completion: 0.002 }),
    ("gpt-4", PricingEntry { prompt: 0.03, completion: 0.06 }),
    ("gpt-4-0613", PricingEntry { prompt: 0.03, completion: 0.06 }),
    ("gpt-4-32k", PricingEntry { prompt: 0.06, completion: 0.12 }),
    ("gpt-4-32k-0613", PricingEntry { prompt: 0.06, completion: 0.12 }),
    ("gpt-4-1106-preview", PricingEntry { prompt: 0.01, completion: 0.03 }),
];

#[must_use]
pub fn pricing_for(model: &str) -> Option<PricingEntry> {
    PRICING_RATES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, entry)| *entry)
}

/// Estimated expense with six fractional digits; `None` for unpriced models.
#[must_use]
pub fn estimate(model: &str, prompt_tokens: u64, completion_tokens: u64) -> Option<String> {
    let entry = pricing_for(model)?;
    let expense = (prompt_tokens as f64 / 1000.0) * entry.prompt
        + (completion_tokens as f64 / 1000.0) * entry.completion;
    Some(format!("{expense:.6}"))
}

/// Reports total tokens used and the expense estimate (or the no-pricing
/// warning). The driver invokes this exactly once on every termination path.
pub fn report_session_expense(model: &str, prompt_tokens: u64, completion_tokens: u64) {
    info!("Total tokens used: {}", prompt_tokens + completion_tokens);

    match estimate(model, prompt_tokens, completion_tokens) {
        Some(expense) => info!("Estimated expense: ${expense}"),
        None => warn!("No expense estimate available for model {model}"),
    }
}
