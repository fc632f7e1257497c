//! Fuzzy name matching.
//!
//! Picks the registered name closest to a requested one. The general case
//! ranks candidates by Levenshtein edit distance. A missing or empty request
//! is a separate branch: the empty (or unnamed) candidate wins if present,
//! otherwise the shortest name does. Ties always go to the candidate seen
//! first.

/// Find the candidate closest to `requested`.
///
/// Unnamed candidates (`None`) compare as the empty string. Returns the index
/// of the winning candidate, or `None` if there are no candidates.
///
/// ```
/// use ligature_core::fuzzy::closest_name;
///
/// let names = [Some("Detail"), Some("List"), Some("Lists")];
/// assert_eq!(closest_name(Some("Lis"), names), Some(1));
/// assert_eq!(closest_name(None, names), Some(1));
/// ```
pub fn closest_name<'a, I>(requested: Option<&str>, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let requested = requested.unwrap_or("");
    let candidates = candidates.into_iter().map(|c| c.unwrap_or(""));

    if requested.is_empty() {
        return closest_to_empty(candidates);
    }

    candidates
        .enumerate()
        .map(|(index, candidate)| (strsim::levenshtein(requested, candidate), index))
        .min()
        .map(|(_, index)| index)
}

/// Empty request: an exact empty candidate, else the shortest one.
fn closest_to_empty<'a>(candidates: impl Iterator<Item = &'a str>) -> Option<usize> {
    let mut shortest: Option<(usize, usize)> = None;
    for (index, candidate) in candidates.enumerate() {
        if candidate.is_empty() {
            return Some(index);
        }
        let len = candidate.chars().count();
        if shortest.is_none_or(|(best, _)| len < best) {
            shortest = Some((len, index));
        }
    }
    shortest.map(|(_, index)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_candidate_always_wins() {
        assert_eq!(closest_name(Some("Fo"), [Some("Foo")]), Some(0));
        assert_eq!(closest_name(Some("completely different"), [Some("x")]), Some(0));
    }

    #[test]
    fn no_candidates() {
        assert_eq!(closest_name(Some("Foo"), []), None);
        assert_eq!(closest_name(None, []), None);
    }

    #[test]
    fn ties_go_to_first() {
        // "Bar" and "Baz" are both one edit from "Ba?"
        assert_eq!(closest_name(Some("Bax"), [Some("Bar"), Some("Baz")]), Some(0));
        assert_eq!(closest_name(Some("Bax"), [Some("Baz"), Some("Bar")]), Some(0));
    }

    #[test]
    fn nearest_by_edit_distance() {
        let names = [Some("Settings"), Some("Setting"), Some("Set")];
        assert_eq!(closest_name(Some("Settin"), names), Some(1));
        assert_eq!(closest_name(Some("Se"), names), Some(2));
    }

    #[test]
    fn empty_request_prefers_empty_candidate() {
        let names = [Some("A"), Some(""), Some("B")];
        assert_eq!(closest_name(None, names), Some(1));
        assert_eq!(closest_name(Some(""), names), Some(1));

        let names = [Some("Long"), None];
        assert_eq!(closest_name(Some(""), names), Some(1));
    }

    #[test]
    fn empty_request_falls_back_to_shortest() {
        let names = [Some("Detail"), Some("Ab"), Some("Cd"), Some("Abc")];
        assert_eq!(closest_name(None, names), Some(1));
    }
}
