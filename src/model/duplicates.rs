/// Duplicate annotation stage.
///
/// A pass-through over the final list answering one extra question per
/// row: does this row's display text occur anywhere else? Computed on
/// demand with a linear scan that stops at the second occurrence; list
/// sizes are bounded by the limit, so the quadratic worst case over a full
/// re-render stays in the tens of comparisons.
pub(crate) fn is_duplicate<'a, F>(len: usize, row: usize, text_at: F) -> bool
where
    F: Fn(usize) -> Option<&'a str>,
{
    let Some(display) = text_at(row) else {
        return false;
    };

    let mut seen = 0;
    for other in 0..len {
        if text_at(other) == Some(display) {
            seen += 1;
            if seen == 2 {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(texts: &[&'static str], row: usize) -> bool {
        is_duplicate(texts.len(), row, |i| texts.get(i).copied())
    }

    #[test]
    fn every_occurrence_of_a_repeated_text_is_flagged() {
        let texts = ["Calculator", "Files", "Calculator"];
        assert!(probe(&texts, 0));
        assert!(!probe(&texts, 1));
        assert!(probe(&texts, 2));
    }

    #[test]
    fn comparison_is_exact_and_case_sensitive() {
        let texts = ["calculator", "Calculator"];
        assert!(!probe(&texts, 0));
        assert!(!probe(&texts, 1));
    }

    #[test]
    fn out_of_range_row_is_not_a_duplicate() {
        assert!(!probe(&["a"], 5));
    }
}
