//! Text similarity scoring for incident retrieval.
//!
//! Descriptions become lower-cased alphanumeric term-frequency vectors and
//! are compared by cosine similarity. Scores fall in `[0, 1]`, higher is
//! closer.

use std::collections::HashMap;

use crate::domain::ticket::{SimilarIncident, Ticket};

/// Term frequencies of lower-cased alphanumeric tokens.
pub fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut counts = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        *counts.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Cosine similarity of two term-frequency vectors.
pub fn cosine(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, weight)| large.get(term).map(|other| weight * other))
        .sum();
    let norm = |v: &HashMap<String, f64>| v.values().map(|w| w * w).sum::<f64>().sqrt();

    (dot / (norm(a) * norm(b))).clamp(0.0, 1.0)
}

/// Up to `k` tickets most similar to `query`, best first.
///
/// Equal scores put the newer ticket first. Tickets sharing no terms with
/// the query are never returned.
pub fn rank_similar<'a>(
    query: &str,
    tickets: impl IntoIterator<Item = &'a Ticket>,
    k: usize,
) -> Vec<SimilarIncident> {
    if k == 0 {
        return Vec::new();
    }

    let query_terms = term_frequencies(query);
    let mut scored: Vec<(usize, f64, &Ticket)> = tickets
        .into_iter()
        .enumerate()
        .map(|(position, ticket)| {
            let score = cosine(&query_terms, &term_frequencies(ticket.description()));
            (position, score, ticket)
        })
        .filter(|(_, score, _)| *score > 0.0)
        .collect();

    scored.sort_by(|(pos_a, score_a, a), (pos_b, score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.created_at().cmp(a.created_at()))
            .then_with(|| pos_b.cmp(pos_a))
    });

    scored
        .into_iter()
        .take(k)
        .map(|(_, score, ticket)| {
            SimilarIncident::new(
                ticket.id().clone(),
                ticket.subject(),
                ticket.description(),
                score,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{TicketId, Timestamp};
    use crate::domain::ticket::Severity;

    fn ticket(id: &str, description: &str, created: &str) -> Ticket {
        Ticket::open(
            TicketId::new(id).unwrap(),
            format!("subject {}", id),
            description,
            "user@example.com",
            Severity::Medium,
            Timestamp::parse(created).unwrap(),
        )
    }

    #[test]
    fn tokens_are_lowercased_alphanumerics() {
        let tf = term_frequencies("VPN vpn, Outlook-2016!");
        assert_eq!(tf.get("vpn"), Some(&2.0));
        assert_eq!(tf.get("outlook"), Some(&1.0));
        assert_eq!(tf.get("2016"), Some(&1.0));
        assert_eq!(tf.len(), 3);
    }

    #[test]
    fn identical_text_scores_one() {
        let a = term_frequencies("printer offline again");
        let score = cosine(&a, &a);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_text_scores_zero() {
        let score = cosine(&term_frequencies("printer"), &term_frequencies("vpn"));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(cosine(&term_frequencies(""), &term_frequencies("vpn")), 0.0);
    }

    #[test]
    fn ranks_best_match_first_and_drops_unrelated() {
        let tickets = vec![
            ticket("TCK-00000001", "Printer on floor 3 is offline", "2024-01-01T00:00:00Z"),
            ticket("TCK-00000002", "VPN disconnects every hour", "2024-01-02T00:00:00Z"),
            ticket("TCK-00000003", "Cannot connect to VPN from home", "2024-01-03T00:00:00Z"),
        ];

        let results = rank_similar("cannot connect to VPN", &tickets, 5);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ticket_id.as_str(), "TCK-00000003");
        assert_eq!(results[1].ticket_id.as_str(), "TCK-00000002");
        assert!(results[0].similarity_score > results[1].similarity_score);
    }

    #[test]
    fn ties_prefer_newer_ticket() {
        let tickets = vec![
            ticket("TCK-00000001", "Teams crash", "2024-01-01T00:00:00Z"),
            ticket("TCK-00000002", "Teams crash", "2024-02-01T00:00:00Z"),
        ];

        let results = rank_similar("teams crash", &tickets, 5);

        assert_eq!(results[0].ticket_id.as_str(), "TCK-00000002");
    }

    #[test]
    fn respects_k() {
        let tickets: Vec<Ticket> = (1..=9)
            .map(|i| ticket(&format!("TCK-0000000{}", i), "mailbox full", "2024-01-01T00:00:00Z"))
            .collect();

        assert_eq!(rank_similar("mailbox", &tickets, 5).len(), 5);
        assert!(rank_similar("mailbox", &tickets, 0).is_empty());
    }

    #[test]
    fn scores_stay_within_unit_interval() {
        let tickets = vec![ticket("TCK-00000001", "a a a b", "2024-01-01T00:00:00Z")];
        let results = rank_similar("a b b", &tickets, 1);
        let score = results[0].similarity_score;
        assert!(score > 0.0 && score <= 1.0);
    }
}
