use {
    crate::stream_core::{
        score, Event, Lexicon, RollingAggregator, SignalDetector, Snapshot,
    },
    chrono::{TimeZone, Utc},
};

const TEXTS: [&str; 8] = [
    "Jesus saves through grace",
    "I feel lost and searching for truth",
    "",
    "Read a psalm and felt blessed, praise the Lord",
    "traffic was terrible today",
    "struggling to find meaning, need hope",
    "heaven, eternal soul, holy spirit",
    "Sharing my testimony: born again by grace through faith in Christ",
];

const SENTIMENTS: [f64; 5] = [-0.9, -0.2, 0.0, 0.35, 0.9];

fn build_event(i: usize) -> Event {
    let text = TEXTS[i % TEXTS.len()];
    Event {
        text: text.to_string(),
        author: format!("author{}", i % 7),
        timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
        sentiment: SENTIMENTS[(i / TEXTS.len()) % SENTIMENTS.len()],
        declared_category: ["faith", "humor", "tech"][i % 3].to_string(),
        declared_keyword: String::new(),
        length: text.chars().count(),
    }
}

fn feed(agg: &mut RollingAggregator, count: usize) -> Vec<Snapshot> {
    let lexicon = Lexicon::default();
    let detector = SignalDetector::with_defaults();
    (0..count)
        .map(|i| {
            let event = build_event(i);
            let result = score(&event, &lexicon, &detector);
            agg.update(&event, &result);
            agg.snapshot()
        })
        .collect()
}

/// Series length tracks min(N, events) and holds the newest timestamps in order
#[test]
fn test_series_bounded_and_ordered() {
    let capacity = 7;
    let mut agg = RollingAggregator::new(capacity);
    let snapshots = feed(&mut agg, 40);

    for (i, snapshot) in snapshots.iter().enumerate() {
        let processed = i + 1;
        let expected_len = processed.min(capacity);
        assert_eq!(snapshot.content_series.len(), expected_len);
        assert_eq!(snapshot.impact_series.len(), expected_len);

        let expected: Vec<i64> = (processed - expected_len..processed)
            .map(|j| 1_700_000_000 + j as i64)
            .collect();
        let content: Vec<i64> = snapshot
            .content_series
            .iter()
            .map(|p| p.timestamp.timestamp())
            .collect();
        let impact: Vec<i64> = snapshot
            .impact_series
            .iter()
            .map(|p| p.timestamp.timestamp())
            .collect();
        assert_eq!(content, expected);
        assert_eq!(impact, expected);
    }
}

/// Counters, keyword counts and contributors never go backwards
#[test]
fn test_monotonic_counters() {
    let mut agg = RollingAggregator::new(5);
    let snapshots = feed(&mut agg, 60);

    for pair in snapshots.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        assert_eq!(after.totals.event_count, before.totals.event_count + 1);
        assert!(after.totals.high_impact_count >= before.totals.high_impact_count);
        assert!(after.totals.opportunity_count >= before.totals.opportunity_count);
        assert!(after.totals.significant_count >= before.totals.significant_count);
        assert!(after.contributor_count >= before.contributor_count);

        for tc in &before.keyword_counts {
            let later = after
                .keyword_counts
                .iter()
                .find(|k| k.term == tc.term)
                .map(|k| k.count)
                .unwrap_or(0);
            assert!(later >= tc.count, "count for {} decreased", tc.term);
        }
    }
}

#[test]
fn test_flag_counts_bounded_by_events() {
    let mut agg = RollingAggregator::new(5);
    for snapshot in feed(&mut agg, 80) {
        let totals = snapshot.totals;
        assert!(totals.high_impact_count <= totals.event_count);
        assert!(totals.opportunity_count <= totals.event_count);
        assert!(totals.significant_count <= totals.event_count);
        for point in snapshot.content_series.iter().chain(&snapshot.impact_series) {
            assert!((0.0..=1.0).contains(&point.value));
        }
        for (content, impact) in snapshot.content_series.iter().zip(&snapshot.impact_series) {
            assert!(impact.value <= content.value);
        }
    }
}

#[test]
fn test_keyword_snapshot_sorted_descending() {
    let mut agg = RollingAggregator::new(5);
    let snapshot = feed(&mut agg, 50).pop().unwrap();

    assert!(!snapshot.keyword_counts.is_empty());
    for pair in snapshot.keyword_counts.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
}

#[test]
fn test_contributors_counted_once() {
    let mut agg = RollingAggregator::new(5);
    feed(&mut agg, 30);

    assert_eq!(agg.contributor_count(), 7);
    assert!(agg.has_contributor("author0"));
    assert!(!agg.has_contributor("nobody"));
}

/// N+1 events evict exactly the oldest entry
#[test]
fn test_capacity_plus_one_evicts_oldest() {
    let mut agg = RollingAggregator::new(50);
    let snapshots = feed(&mut agg, 51);

    let full = &snapshots[49];
    let after = &snapshots[50];
    assert_eq!(full.content_series.len(), 50);
    assert_eq!(after.content_series.len(), 50);
    assert_eq!(after.content_series[..49], full.content_series[1..]);
    assert_eq!(
        after.content_series.last().unwrap().timestamp.timestamp(),
        1_700_000_050
    );
}

#[test]
fn test_empty_text_leaves_keywords_untouched() {
    let mut agg = RollingAggregator::new(5);
    let lexicon = Lexicon::default();
    let detector = SignalDetector::with_defaults();

    let mut event = build_event(2);
    event.sentiment = -0.5;
    let result = score(&event, &lexicon, &detector);
    agg.update(&event, &result);

    let snapshot = agg.snapshot();
    assert!(snapshot.keyword_counts.is_empty());
    assert_eq!(snapshot.content_series[0].value, 0.0);
    assert_eq!(snapshot.impact_series[0].value, 0.0);
    assert_eq!(snapshot.totals.opportunity_count, 0);
    assert_eq!(snapshot.totals.event_count, 1);
}

#[test]
fn test_snapshot_idempotent_without_updates() {
    let mut agg = RollingAggregator::new(5);
    feed(&mut agg, 12);

    let first = agg.snapshot();
    let second = agg.snapshot();
    assert_eq!(first, second);

    agg.record_skipped();
    let third = agg.snapshot();
    assert_eq!(third.totals.skipped_count, 1);
    assert_eq!(third.content_series, first.content_series);
    assert_eq!(third.keyword_counts, first.keyword_counts);
}
