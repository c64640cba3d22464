use std::collections::{HashMap, HashSet};

use crate::domain::Intent;

/// Maps free text to an intent. Implementations hold no per-request state and are
/// built once at startup, then shared by every request.
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

impl<F> IntentClassifier for F
where
    F: Fn(&str) -> Intent + Send + Sync,
{
    fn classify(&self, text: &str) -> Intent {
        self(text)
    }
}

/// Labelled phrases the default classifier is trained on.
pub const TRAINING_PHRASES: &[(&str, Intent)] = &[
    ("What's my account balance?", Intent::CheckBalance),
    ("Can you show me my balance?", Intent::CheckBalance),
    ("Check my current balance.", Intent::CheckBalance),
    ("I want to see my bank balance.", Intent::CheckBalance),
    ("Show me the available balance.", Intent::CheckBalance),
    ("Transfer money to John.", Intent::TransferMoney),
    ("Send $500 to my savings account.", Intent::TransferMoney),
    ("I need to transfer funds to my checking account.", Intent::TransferMoney),
    ("Move $1000 to account number 123456.", Intent::TransferMoney),
    ("I want to transfer money.", Intent::TransferMoney),
    ("Show my last five transactions.", Intent::GetLastTransactions),
    ("What are my recent transactions?", Intent::GetLastTransactions),
    ("Can I see my previous transactions?", Intent::GetLastTransactions),
    ("Display the last five transactions.", Intent::GetLastTransactions),
    ("I want to check my transaction history.", Intent::GetLastTransactions),
];

/// Lowercase word tokens with a trailing plural "s" removed.
fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let word = word.to_lowercase();
            match word.strip_suffix('s') {
                Some(stem) if stem.len() >= 3 && !stem.ends_with('s') => stem.to_string(),
                _ => word,
            }
        })
        .collect()
}

struct Example {
    intent: Intent,
    tokens: HashSet<String>,
    norm: f64,
}

/// Nearest-phrase classifier over IDF-weighted token sets.
///
/// Each example phrase becomes a binary vector weighted by inverse document
/// frequency; the input is scored by cosine similarity against every example
/// and takes the intent of the best one. Inputs sharing no vocabulary with the
/// training set classify as `Intent::Unknown`.
pub struct PhraseClassifier {
    examples: Vec<Example>,
    idf: HashMap<String, f64>,
}

impl PhraseClassifier {
    pub fn new(training: &[(&str, Intent)]) -> Self {
        let tokenized: Vec<(Intent, HashSet<String>)> = training
            .iter()
            .map(|(text, intent)| (*intent, tokenize(text)))
            .collect();

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        for (_, tokens) in &tokenized {
            for token in tokens {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let total = tokenized.len() as f64;
        let idf: HashMap<String, f64> = document_frequency
            .into_iter()
            .map(|(token, df)| (token, (total / df as f64).ln() + 1.0))
            .collect();

        let examples = tokenized
            .into_iter()
            .map(|(intent, tokens)| {
                let norm = tokens
                    .iter()
                    .map(|t| idf[t].powi(2))
                    .sum::<f64>()
                    .sqrt();
                Example {
                    intent,
                    tokens,
                    norm,
                }
            })
            .collect();

        Self { examples, idf }
    }

    /// Best matching intent with its similarity score in `0.0..=1.0`.
    pub fn score(&self, text: &str) -> (Intent, f64) {
        let query: Vec<(String, f64)> = tokenize(text)
            .into_iter()
            .filter_map(|token| self.idf.get(&token).map(|w| (token, *w)))
            .collect();

        let query_norm = query.iter().map(|(_, w)| w.powi(2)).sum::<f64>().sqrt();
        if query_norm == 0.0 {
            return (Intent::Unknown, 0.0);
        }

        self.examples
            .iter()
            .map(|example| {
                let dot: f64 = query
                    .iter()
                    .filter(|(token, _)| example.tokens.contains(token))
                    .map(|(_, w)| w.powi(2))
                    .sum();
                (example.intent, dot / (query_norm * example.norm))
            })
            .fold((Intent::Unknown, 0.0), |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            })
    }
}

impl Default for PhraseClassifier {
    fn default() -> Self {
        Self::new(TRAINING_PHRASES)
    }
}

impl IntentClassifier for PhraseClassifier {
    fn classify(&self, text: &str) -> Intent {
        let (intent, score) = self.score(text);
        tracing::debug!(text, %intent, score, "classified command");
        intent
    }
}
