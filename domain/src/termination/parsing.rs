//! Consensus verdict parsing.
//!
//! Moderators are asked to end their turn with a verdict line such as
//! `CONSENSUS: REACHED` or `CONSENSUS: NOT REACHED`. These helpers pull
//! that verdict out of free-form text. Pure text matching, no I/O.

const AFFIRMATIVE: &[&str] = &["REACHED", "YES", "TRUE", "ACHIEVED"];
const NEGATIONS: &[&str] = &["NOT", "NO", "NONE", "FALSE", "UNREACHED", "PARTIAL"];

/// Extract the moderator's consensus verdict.
///
/// Looks at the last line starting with `CONSENSUS` (case-insensitive,
/// optional markdown emphasis). Returns `Some(true)` for an affirmative
/// verdict, `Some(false)` for a negative or unclear one, and `None` when
/// there is no verdict line at all.
///
/// ```
/// use debate_domain::termination::parsing::parse_consensus_verdict;
///
/// assert_eq!(parse_consensus_verdict("...\nCONSENSUS: REACHED"), Some(true));
/// assert_eq!(parse_consensus_verdict("**Consensus:** not reached"), Some(false));
/// assert_eq!(parse_consensus_verdict("We agree on most points."), None);
/// ```
pub fn parse_consensus_verdict(text: &str) -> Option<bool> {
    let line = text
        .lines()
        .map(|l| l.trim().trim_start_matches(['*', '#', '-', '>', ' ']).to_uppercase())
        .filter(|l| l.starts_with("CONSENSUS"))
        .last()?;

    let verdict = line
        .trim_start_matches("CONSENSUS")
        .trim_start_matches(['*', ':', ' ', '='])
        .to_string();
    let words: Vec<&str> = verdict
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    // The first verdict word decides; later prose ("no open issues") does not
    let verdict = words.iter().find_map(|w| {
        if NEGATIONS.contains(w) {
            Some(false)
        } else if AFFIRMATIVE.contains(w) {
            Some(true)
        } else {
            None
        }
    });
    Some(verdict.unwrap_or(false))
}

/// Whether `text` carries an affirmative consensus verdict.
pub fn is_consensus_reached(text: &str) -> bool {
    parse_consensus_verdict(text).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_forms() {
        assert!(is_consensus_reached("Summary of round.\nCONSENSUS: REACHED"));
        assert!(is_consensus_reached("consensus: yes"));
        assert!(is_consensus_reached("**CONSENSUS**: Reached."));
        assert!(is_consensus_reached("## Consensus = achieved"));
    }

    #[test]
    fn test_negated_forms() {
        assert_eq!(parse_consensus_verdict("CONSENSUS: NOT REACHED"), Some(false));
        assert_eq!(parse_consensus_verdict("Consensus: no"), Some(false));
        assert_eq!(parse_consensus_verdict("CONSENSUS: partial, still reached on X"), Some(false));
    }

    #[test]
    fn test_trailing_prose_does_not_negate() {
        assert_eq!(
            parse_consensus_verdict("CONSENSUS: REACHED - no remaining disagreement"),
            Some(true)
        );
        assert_eq!(parse_consensus_verdict("CONSENSUS: REACHED (no open issues)"), Some(true));
        assert_eq!(
            parse_consensus_verdict("CONSENSUS: NOT REACHED, yes on scope only"),
            Some(false)
        );
    }

    #[test]
    fn test_last_verdict_line_wins() {
        let text = "CONSENSUS: NOT REACHED\nAfter reflection:\nCONSENSUS: REACHED";
        assert_eq!(parse_consensus_verdict(text), Some(true));
    }

    #[test]
    fn test_mentions_without_verdict_line() {
        assert_eq!(parse_consensus_verdict("There is no consensus yet."), None);
        assert!(!is_consensus_reached(""));
    }

    #[test]
    fn test_unclear_verdict_is_negative() {
        assert_eq!(parse_consensus_verdict("CONSENSUS: maybe"), Some(false));
    }
}
