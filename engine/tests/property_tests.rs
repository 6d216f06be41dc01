use edithra_engine::analyzers::{Analyzers, SENTIMENT_FALLBACK, SENTIMENT_RULES};
use edithra_engine::config::OptimizerConfig;
use edithra_engine::execution::Optimizer;
use edithra_engine::memory::{ExperienceStore, NO_MEMORY};
use edithra_engine::task_queue::{TaskQueue, NO_TASKS};
use proptest::prelude::*;
use serde_json::json;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

// Recall always returns the last stored experience, and unseen users get the sentinel
proptest! {
    #[test]
    fn test_recall_returns_last_stored(
        user in "[a-z0-9]{1,12}",
        experiences in prop::collection::vec("\\PC{0,32}", 1..20),
    ) {
        let rt = runtime();
        let store = ExperienceStore::new();

        let (before, last) = rt.block_on(async {
            let before = store.recall(&user).await;
            for e in &experiences {
                store.store(&user, json!(e)).await;
            }
            (before, store.recall(&user).await)
        });

        prop_assert_eq!(before, json!(NO_MEMORY));
        prop_assert_eq!(last, json!(experiences.last().expect("non-empty")));
    }

    #[test]
    fn test_users_never_interfere(
        u1 in "[a-m]{1,8}",
        u2 in "[n-z]{1,8}",
        experience in "\\PC{1,32}",
    ) {
        let rt = runtime();
        let store = ExperienceStore::new();

        let other = rt.block_on(async {
            store.store(&u1, json!(experience)).await;
            store.recall(&u2).await
        });

        prop_assert_eq!(other, json!(NO_MEMORY));
    }
}

// Draining the queue yields non-increasing priorities, FIFO among ties, then the sentinel
proptest! {
    #[test]
    fn test_queue_drains_in_priority_order(priorities in prop::collection::vec(-50i64..50, 0..40)) {
        let rt = runtime();
        let queue = TaskQueue::new();

        let drained = rt.block_on(async {
            for (i, p) in priorities.iter().enumerate() {
                queue.add(format!("{}:{}", i, p), *p).await;
            }
            let mut drained = Vec::new();
            loop {
                let label = queue.pop_next().await;
                if label == NO_TASKS {
                    break;
                }
                drained.push(label);
            }
            drained
        });

        prop_assert_eq!(drained.len(), priorities.len());

        let parsed: Vec<(usize, i64)> = drained
            .iter()
            .map(|label| {
                let (i, p) = label.split_once(':').expect("label format");
                (i.parse().expect("index"), p.parse().expect("priority"))
            })
            .collect();

        for pair in parsed.windows(2) {
            let ((i1, p1), (i2, p2)) = (pair[0], pair[1]);
            prop_assert!(p1 >= p2, "priority increased: {} then {}", p1, p2);
            if p1 == p2 {
                prop_assert!(i1 < i2, "tie not FIFO: {} before {}", i1, i2);
            }
        }
    }
}

// k-th self_optimize() call from 90 reports min(100, 90 + 5k)
proptest! {
    #[test]
    fn test_self_optimize_progression(k in 1u32..40) {
        let optimizer = Optimizer::new(&OptimizerConfig::default());
        let mut last = String::new();
        for _ in 0..k {
            last = optimizer.self_optimize();
        }

        let expected = (90 + 5 * k).min(100);
        prop_assert_eq!(last, format!("AI Self-Optimized - Current Efficiency: {}%", expected));
        prop_assert_eq!(optimizer.level(), expected);
    }
}

// "angry" always wins over "happy" regardless of surrounding text or case
proptest! {
    #[test]
    fn test_angry_wins_over_happy(
        prefix in "[a-z ]{0,10}",
        middle in "[a-z ]{0,10}",
        upper in any::<bool>(),
    ) {
        let analyzers = Analyzers::new().expect("rules compile");
        let keyword = if upper { "ANGRY" } else { "angry" };
        let text = format!("{}{}{}happy", prefix, keyword, middle);

        prop_assert_eq!(analyzers.detect_emotion(&text), SENTIMENT_RULES[0].1);
    }

    #[test]
    fn test_no_keyword_yields_generic(text in "[b-f ]{0,30}") {
        let analyzers = Analyzers::new().expect("rules compile");
        prop_assert_eq!(analyzers.detect_emotion(&text), SENTIMENT_FALLBACK);
    }
}
