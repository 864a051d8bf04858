#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_aggregator::models::{CanonicalPaper, PaperSource};
use paper_aggregator::rank::{RankOptions, merge_and_rank};

// Byte layout: [limit, from, to, then (citations, year) pairs...]
fuzz_target!(|data: &[u8]| {
    let [limit, from, to, rest @ ..] = data else {
        return;
    };

    let year = |b: u8| (b != 0).then(|| 1950 + i32::from(b % 80));
    let options = RankOptions { year_from: year(*from), year_to: year(*to), limit: usize::from(*limit) };

    let papers: Vec<CanonicalPaper> = rest
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let source = if i % 2 == 0 { PaperSource::SemanticScholar } else { PaperSource::CrossRef };
            let mut paper = CanonicalPaper::new(source, i.to_string());
            paper.citation_count = i64::from(pair[0] % 8);
            paper.year = year(pair[1]);
            paper
        })
        .collect();

    let ranked = merge_and_rank(vec![(PaperSource::CrossRef, papers)], options);

    assert!(ranked.len() <= options.limit);
    assert!(ranked.windows(2).all(|w| w[0].citation_count >= w[1].citation_count));
    for paper in &ranked {
        assert!(!paper.outside_years(options.year_from, options.year_to));
    }
});
