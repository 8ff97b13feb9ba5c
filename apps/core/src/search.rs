use crate::model::{normalize_for_search, Favourite};

const EXACT_MATCH_BONUS: i64 = 20_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filtered<'a> {
    pub favourite: &'a Favourite,
    /// True when the favourite was kept because it matched a non-empty query.
    pub matched: bool,
}

/// Filters `favourites` against `query`, best match first. A blank query
/// passes everything through in the order given.
pub fn filter<'a>(favourites: &'a [Favourite], query: &str) -> Vec<Filtered<'a>> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return favourites
            .iter()
            .map(|favourite| Filtered {
                favourite,
                matched: false,
            })
            .collect();
    }

    let normalized_query = normalize_for_search(trimmed);
    let mut scored: Vec<(i64, usize, &Favourite)> = favourites
        .iter()
        .enumerate()
        .filter_map(|(index, favourite)| {
            let score = if normalized_query.is_empty() {
                score_favourite_raw(favourite, trimmed)
            } else {
                score_favourite(favourite, &normalized_query)
            };
            score.map(|score| (score, index, favourite))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    scored
        .into_iter()
        .map(|(_, _, favourite)| Filtered {
            favourite,
            matched: true,
        })
        .collect()
}

fn score_favourite(favourite: &Favourite, normalized_query: &str) -> Option<i64> {
    let key = favourite.normalized_key();
    let text_score = score_normalized_text(key, normalized_query)?;
    let exact = key == normalized_query || favourite.normalized_name() == normalized_query;
    let exact_bonus = if exact { EXACT_MATCH_BONUS } else { 0 };

    Some(text_score + exact_bonus)
}

/// Queries with no alphanumerics are matched against the lowercased raw key.
fn score_favourite_raw(favourite: &Favourite, query: &str) -> Option<i64> {
    let key = favourite.search_key().to_lowercase();
    let query = query.to_lowercase();
    let text_score = score_normalized_text(&key, &query)?;
    let exact = key == query || favourite.name.to_lowercase() == query;
    let exact_bonus = if exact { EXACT_MATCH_BONUS } else { 0 };

    Some(text_score + exact_bonus)
}

fn score_normalized_text(normalized_text: &str, query: &str) -> Option<i64> {
    if normalized_text.is_empty() || query.is_empty() {
        return None;
    }

    if let Some(position) = normalized_text.find(query) {
        let prefix_bonus = if position == 0 { 400 } else { 0 };
        let compact_bonus = (query.len() as i64) * 40;
        let position_penalty = position as i64;
        let length_penalty = (normalized_text.len() as i64 - query.len() as i64).abs();
        return Some(10_000 + prefix_bonus + compact_bonus - position_penalty - length_penalty);
    }

    let positions = subsequence_positions(normalized_text, query)?;
    let start_penalty = positions[0] as i64;
    let gap_penalty: i64 = positions
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0] + 1) as i64)
        .sum();
    let length_penalty = (normalized_text.len() as i64 - query.len() as i64).max(0);

    Some(5_000 + (query.len() as i64) * 30 - gap_penalty * 6 - start_penalty - length_penalty)
}

fn subsequence_positions(haystack: &str, needle: &str) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(needle.len());
    let mut next_start = 0;

    for needle_char in needle.chars() {
        let mut found = None;
        for (offset, hay_char) in haystack[next_start..].char_indices() {
            if hay_char == needle_char {
                let absolute = next_start + offset;
                found = Some(absolute);
                next_start = absolute + hay_char.len_utf8();
                break;
            }
        }

        let position = found?;
        positions.push(position);
    }

    Some(positions)
}

#[cfg(test)]
mod tests {
    use super::{filter, score_normalized_text};
    use crate::model::{ConnectionType, Favourite};

    fn remote(id: &str, name: &str, server: &str) -> Favourite {
        Favourite::new(id, name, "Data", "", server, ConnectionType::Sftp)
    }

    #[test]
    fn substring_outranks_subsequence() {
        let substring = score_normalized_text("serverlogs", "logs").unwrap();
        let subsequence = score_normalized_text("lotsofgoodstuff", "logs").unwrap();
        assert!(substring > subsequence);
    }

    #[test]
    fn subsequence_matches_scattered_query() {
        let favourites = vec![remote("1", "Ubuntu ISOs", "ftp.ubuntu.com")];
        let results = filter(&favourites, "ubiso");
        assert_eq!(results.len(), 1);
        assert!(results[0].matched);
    }

    #[test]
    fn exact_name_beats_longer_prefix_match() {
        let favourites = vec![
            remote("long", "NAS Backup", "10.0.0.1"),
            remote("exact", "NAS", "10.0.0.2"),
        ];
        let results = filter(&favourites, "nas");
        assert_eq!(results[0].favourite.id, "exact");
        assert_eq!(results[1].favourite.id, "long");
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let favourites = vec![remote("a", "Same", "host"), remote("b", "Same", "host")];
        let ids: Vec<&str> = filter(&favourites, "same")
            .iter()
            .map(|r| r.favourite.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn punctuation_only_query_matches_raw_text() {
        let favourites = vec![
            remote("dotted", "Mirror", "ftp.example.com"),
            remote("bare", "Box", "localhost"),
        ];
        let results = filter(&favourites, "  .  ");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].favourite.id, "dotted");
        assert!(results[0].matched);

        assert!(filter(&favourites, "@@@").is_empty());
    }

    #[test]
    fn whitespace_query_passes_everything_through() {
        let favourites = vec![remote("a", "Alpha", "a"), remote("b", "Beta", "b")];
        let results = filter(&favourites, " \t ");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.matched));
    }
}
