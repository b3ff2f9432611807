use super::Query;

/// Whether a row with the given text stays visible for `query`. The empty
/// query matches every row.
pub fn row_visible(text: &str, query: &Query) -> bool {
    query.is_empty() || text.to_lowercase().contains(query.as_str())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// One flag per input row, in input order.
    pub visible: Vec<bool>,
    pub visible_count: usize,
}

impl FilterOutcome {
    pub fn total(&self) -> usize {
        self.visible.len()
    }

    pub fn show_sentinel(&self) -> bool {
        self.visible_count == 0
    }
}

pub fn filter_rows<I, S>(texts: I, query: &Query) -> FilterOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let visible: Vec<bool> = texts
        .into_iter()
        .map(|text| row_visible(text.as_ref(), query))
        .collect();
    let visible_count = visible.iter().filter(|v| **v).count();

    FilterOutcome { visible, visible_count }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 3] = ["Apple Pie", "Banana Bread", "Cherry Tart"];

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let query = Query::new("BREAD");
        assert!(row_visible("Banana Bread", &query));
        assert!(!row_visible("Apple Pie", &query));
    }

    #[test]
    fn test_filter_counts_matches() {
        let outcome = filter_rows(ROWS, &Query::new("an"));
        assert_eq!(outcome.visible, vec![false, true, false]);
        assert_eq!(outcome.visible_count, 1);
        assert!(!outcome.show_sentinel());
    }

    #[test]
    fn test_no_match_shows_sentinel() {
        let outcome = filter_rows(ROWS, &Query::new("xyz"));
        assert_eq!(outcome.visible_count, 0);
        assert!(outcome.show_sentinel());
        assert_eq!(outcome.total(), 3);
    }

    #[test]
    fn test_empty_and_blank_queries_match_all() {
        for raw in ["", "   "] {
            let outcome = filter_rows(ROWS, &Query::new(raw));
            assert_eq!(outcome.visible_count, 3, "query {:?}", raw);
        }
    }

    #[test]
    fn test_empty_table_shows_sentinel() {
        let outcome = filter_rows(Vec::<String>::new(), &Query::new(""));
        assert!(outcome.show_sentinel());
    }

    #[test]
    fn test_matches_agree_with_lowercased_contains() {
        let queries = ["a", "PIE", " t", "rr", "e b", "", "q"];
        for raw in queries {
            let query = Query::new(raw);
            for row in ROWS {
                let expected = row.to_lowercase().contains(&raw.to_lowercase().trim().to_string());
                assert_eq!(row_visible(row, &query), expected, "row {:?} query {:?}", row, raw);
            }
        }
    }
}
