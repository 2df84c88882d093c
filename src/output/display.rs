//! Text rendering for index lookups and search results

use crate::index::{Posting, SearchHit};

/// Renders the postings of one term, one block per page
pub fn render_postings(term: &str, postings: &[Posting]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Inverted index for {}\n\n", term));

    for posting in postings {
        out.push_str(&format!("Page: {}\n", posting.page));
        out.push_str(&format!("Number of occurrences: {}\n\n", posting.frequency));
    }

    out
}

/// Renders ranked results, most relevant first, one URL per line
pub fn render_results(hits: &[SearchHit]) -> String {
    let mut out = String::from("Search results for your query with the most relevant page first.\n\n");

    for hit in hits {
        out.push_str(&format!("{}\n", hit.page));
    }

    out
}
