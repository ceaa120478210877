use speculate2::speculate;
use versiondocs::index::{KeyedIndex, CAPACITIES, MAX_LOAD_FACTOR};

speculate! {
    describe "integer keys" {
        before {
            let mut index: KeyedIndex<u32, String> = KeyedIndex::new();
        }

        it "inserts and finds values" {
            assert!(index.insert(3, "three".to_string()).is_none());
            assert_eq!(index.get(&3).map(String::as_str), Some("three"));
            assert!(index.get(&4).is_none());
            assert_eq!(index.len(), 1);
        }

        it "overwrites existing keys" {
            index.insert(3, "old".to_string());
            let previous = index.insert(3, "new".to_string());

            assert_eq!(previous.as_deref(), Some("old"));
            assert_eq!(index.get(&3).map(String::as_str), Some("new"));
            assert_eq!(index.len(), 1);
        }

        it "removes keys" {
            index.insert(1, "one".to_string());
            index.insert(2, "two".to_string());

            assert_eq!(index.remove(&1).as_deref(), Some("one"));
            assert!(index.remove(&1).is_none());
            assert!(!index.contains_key(&1));
            assert!(index.contains_key(&2));
            assert_eq!(index.len(), 1);
        }

        it "edits values in place" {
            index.insert(9, "nine".to_string());
            if let Some(value) = index.get_mut(&9) {
                value.push('!');
            }
            assert_eq!(index.get(&9).map(String::as_str), Some("nine!"));
        }
    }

    describe "string keys" {
        before {
            let mut index: KeyedIndex<String, usize> = KeyedIndex::new();
        }

        it "looks up owned keys by str" {
            index.insert("report.txt".to_string(), 1);
            index.insert("Report.txt".to_string(), 2);

            assert_eq!(index.get("report.txt"), Some(&1));
            assert_eq!(index.get("Report.txt"), Some(&2));
            assert!(index.get("report").is_none());
        }

        it "handles empty and non-ascii keys" {
            index.insert(String::new(), 0);
            index.insert("brouillon-été".to_string(), 1);

            assert_eq!(index.get(""), Some(&0));
            assert_eq!(index.get("brouillon-été"), Some(&1));
        }
    }

    describe "resizing" {
        it "keeps every entry across many rehashes" {
            let mut index = KeyedIndex::new();
            for id in 0..5_000u32 {
                index.insert(id, id * 2);
            }

            assert_eq!(index.len(), 5_000);
            assert!(index.capacity() > CAPACITIES[0]);
            assert!(CAPACITIES.contains(&index.capacity()));
            assert!(index.load_factor() <= MAX_LOAD_FACTOR);
            assert!(!index.is_saturated());
            assert!((0..5_000u32).all(|id| index.get(&id) == Some(&(id * 2))));
        }

        it "grows string tables too" {
            let mut index = KeyedIndex::new();
            for i in 0..500 {
                index.insert(format!("untitled{i}"), i);
            }

            assert!(index.load_factor() <= MAX_LOAD_FACTOR);
            assert!((0..500).all(|i| index.get(format!("untitled{i}").as_str()) == Some(&i)));
        }

        it "keeps working past the largest capacity" {
            static TIERS: &[usize] = &[2, 3];
            let mut index = KeyedIndex::with_tiers(TIERS);
            for id in 0..50i64 {
                index.insert(id - 25, id);
            }

            assert!(index.is_saturated());
            assert_eq!(index.capacity(), 3);
            assert_eq!(index.get(&-25), Some(&0));
            assert_eq!(index.remove(&24), Some(49));
            assert_eq!(index.len(), 49);
        }
    }

    describe "iteration" {
        it "visits every entry exactly once" {
            let mut index = KeyedIndex::new();
            for id in 0..40u32 {
                index.insert(id, ());
            }
            index.remove(&7);

            let mut seen = Vec::new();
            index.for_each(|key, _| seen.push(*key));
            seen.sort_unstable();

            let expected: Vec<u32> = (0..40).filter(|id| *id != 7).collect();
            assert_eq!(seen, expected);
            assert_eq!(index.keys().count(), 39);
        }
    }
}
