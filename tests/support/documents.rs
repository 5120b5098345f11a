//! Snapshot documents shared by the integration tests.

/// A snapshot exercising every detection path:
///
/// - `single`: binary, asks 0.40 / 0.55 (Layer 1, margin 0.05)
/// - `winner`: three outcomes, asks 0.30 / 0.30 / 0.35 (Layer 2, margin 0.05)
/// - `p0`..`p2`: binaries whose YES outcomes form an exhaustive partition,
///   YES asks 0.20 / 0.30 / 0.40 (Layer 2, margin 0.10)
/// - `thin`: binary with no NO liquidity (nothing)
/// - `broken`: an ask priced at 1.5 (rejected level, numeric diagnostic)
pub const SCAN_DOCUMENT: &str = r#"{
    "version": 7,
    "markets": [
        {
            "id": "politics",
            "title": "Politics",
            "conditions": [
                {
                    "id": "single",
                    "question": "Will the bill pass?",
                    "outcomes": [
                        {"id": "single-yes", "name": "Yes", "book": {"bids": [[0.38, 50]], "asks": [[0.40, 100]]}},
                        {"id": "single-no", "name": "No", "book": {"bids": [[0.53, 50]], "asks": [[0.55, 80]]}}
                    ]
                },
                {
                    "id": "winner",
                    "question": "Who wins?",
                    "outcomes": [
                        {"id": "winner-x", "book": {"asks": [[0.30, 40]]}},
                        {"id": "winner-y", "book": {"asks": [[0.30, 60]]}},
                        {"id": "winner-z", "book": {"asks": [[0.35, 50]]}}
                    ]
                }
            ]
        },
        {
            "id": "sports",
            "conditions": [
                {"id": "p0", "outcomes": [
                    {"id": "p0-yes", "book": {"asks": [[0.20, 30]]}},
                    {"id": "p0-no"}
                ]},
                {"id": "p1", "outcomes": [
                    {"id": "p1-yes", "book": {"asks": [[0.30, 30]]}},
                    {"id": "p1-no"}
                ]},
                {"id": "p2", "outcomes": [
                    {"id": "p2-yes", "book": {"asks": [[0.40, 30]]}},
                    {"id": "p2-no"}
                ]},
                {"id": "thin", "outcomes": [
                    {"id": "thin-yes", "book": {"asks": [[0.10, 10]]}},
                    {"id": "thin-no"}
                ]},
                {"id": "broken", "outcomes": [
                    {"id": "broken-yes", "book": {"asks": [[1.5, 10]]}},
                    {"id": "broken-no", "book": {"asks": [[0.5, 10]]}}
                ]}
            ]
        }
    ],
    "relations": [
        {"type": "exhaustive_partition", "outcomes": ["p0-yes", "p1-yes", "p2-yes"]}
    ]
}"#;

/// A snapshot with nothing to find.
pub const FAIR_DOCUMENT: &str = r#"{
    "version": 1,
    "markets": [{
        "id": "m",
        "conditions": [{
            "id": "fair",
            "outcomes": [
                {"id": "fair-yes", "book": {"bids": [[0.49, 10]], "asks": [[0.51, 10]]}},
                {"id": "fair-no", "book": {"bids": [[0.48, 10]], "asks": [[0.52, 10]]}}
            ]
        }]
    }]
}"#;
