//! "Did you mean" suggestions for mistyped metric keys.

/// Closest metric key to `input`, or `None` when nothing is near enough.
///
/// Case and `_`/`-` separators are ignored, so `total_sales` finds
/// `totalSales`. A candidate qualifies when its edit distance is at most half
/// the longer normalized key.
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let wanted = normalize(input);

    let (name, dist, len) = candidates
        .iter()
        .map(|&candidate| {
            let key = normalize(candidate);
            (candidate, levenshtein(&wanted, &key), key.chars().count())
        })
        .min_by_key(|&(_, dist, _)| dist)?;

    let max_len = wanted.chars().count().max(len);
    (dist <= max_len / 2).then_some(name)
}

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Single-row Levenshtein distance over chars.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRIC_KEYS: &[&str] = &[
        "card_share",
        "card_daily",
        "live_share",
        "live_daily",
        "live_price",
        "image_text_share",
        "totalSales",
        "liveSpec",
        "liveSalesDiff",
    ];

    #[test]
    fn levenshtein_basic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn fuzzy_match_finds_close() {
        assert_eq!(fuzzy_match("card_shar", METRIC_KEYS), Some("card_share"));
        assert_eq!(fuzzy_match("total_sales", METRIC_KEYS), Some("totalSales"));
        assert_eq!(fuzzy_match("livespec", METRIC_KEYS), Some("liveSpec"));
        assert_eq!(fuzzy_match("image-text-share", METRIC_KEYS), Some("image_text_share"));
    }

    #[test]
    fn fuzzy_match_rejects_distant() {
        assert_eq!(fuzzy_match("zzzzzzzzzzzzz", METRIC_KEYS), None);
    }
}
