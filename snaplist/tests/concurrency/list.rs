use std::sync::Arc;

use snaplist::CowList;

use super::common::{
    assert_distinct, assert_pushes_complete_and_ordered, perform_random_operation, Tagged, Tally,
    NUM_ITERATIONS, NUM_OPERATIONS, NUM_PREEMPTIONS, NUM_THREADS,
};

fn push_tagged_values(list: Arc<CowList<Tagged>>) {
    let mut handles = Vec::new();
    for i in 0..NUM_THREADS {
        let list = list.clone();
        handles.push(shuttle::thread::spawn(move || {
            for j in 0..NUM_OPERATIONS {
                list.push((i, j));
                shuttle::thread::yield_now();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_pushes_complete_and_ordered(&list.to_vec(), NUM_THREADS, NUM_OPERATIONS);
}

mod shuttle_checks {
    use super::*;

    #[test]
    fn concurrent_pushes_are_never_lost() {
        shuttle::check_random(|| push_tagged_values(Arc::new(CowList::new())), NUM_ITERATIONS);
    }

    #[test]
    fn concurrent_pushes_are_never_lost_under_pct() {
        shuttle::check_pct(
            || push_tagged_values(Arc::new(CowList::new())),
            NUM_ITERATIONS,
            NUM_PREEMPTIONS,
        );
    }

    #[test]
    fn random_operations_account_for_every_change() {
        shuttle::check_random(
            || {
                let initial = vec![1, 2, 3];
                let list = Arc::new(CowList::from(initial.clone()));
                let mut handles = Vec::new();
                for _ in 0..NUM_THREADS {
                    let list = list.clone();
                    handles.push(shuttle::thread::spawn(move || {
                        let mut rng = shuttle::rand::thread_rng();
                        let mut tally = Tally::default();
                        for _ in 0..NUM_OPERATIONS {
                            perform_random_operation(&list, &mut rng, &mut tally);
                            shuttle::thread::yield_now();
                        }
                        tally
                    }));
                }
                let (added, removed) = handles
                    .into_iter()
                    .map(|h| h.join().unwrap())
                    .fold((0, 0), |(a, r), t| (a + t.added, r + t.removed));
                assert_eq!(list.len(), initial.len() + added - removed);
            },
            NUM_ITERATIONS,
        );
    }

    #[test]
    fn push_if_absent_adds_each_value_once() {
        shuttle::check_random(
            || {
                let list = Arc::new(CowList::new());
                let mut handles = Vec::new();
                for _ in 0..NUM_THREADS {
                    let list = list.clone();
                    handles.push(shuttle::thread::spawn(move || {
                        let mut added = 0;
                        for value in 0..5u32 {
                            if list.push_if_absent(value) {
                                added += 1;
                            }
                            shuttle::thread::yield_now();
                        }
                        added
                    }));
                }
                let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
                assert_eq!(added, 5);
                assert_distinct(&list.to_vec());
            },
            NUM_ITERATIONS,
        );
    }

    #[test]
    fn extend_absent_never_duplicates() {
        shuttle::check_random(
            || {
                let list = Arc::new(CowList::from(vec![0u32]));
                let mut handles = Vec::new();
                for i in 0..NUM_THREADS as u32 {
                    let list = list.clone();
                    handles.push(shuttle::thread::spawn(move || {
                        list.extend_absent(vec![i, i + 1, i + 1, i + 2])
                    }));
                }
                let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
                let elements = list.to_vec();
                assert_distinct(&elements);
                assert_eq!(elements.len(), 1 + added);
                assert_eq!(elements.len(), NUM_THREADS + 2);
            },
            NUM_ITERATIONS,
        );
    }
}

#[cfg(not(shuttle))]
mod os_threads {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    const PUSHES_PER_THREAD: usize = 1_000;
    const NUM_OS_THREADS: usize = 8;

    #[test]
    fn concurrent_pushes_are_never_lost() {
        let list: Arc<CowList<Tagged>> = Arc::new(CowList::new());
        let mut handles = Vec::new();
        for i in 0..NUM_OS_THREADS {
            let list = list.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..PUSHES_PER_THREAD {
                    list.push((i, j));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_pushes_complete_and_ordered(&list.to_vec(), NUM_OS_THREADS, PUSHES_PER_THREAD);
    }

    #[test]
    fn random_operations_account_for_every_change() {
        let list = Arc::new(CowList::from(vec![1, 2, 3]));
        let mut handles = Vec::new();
        for i in 0..NUM_OS_THREADS {
            let list = list.clone();
            handles.push(std::thread::spawn(move || {
                let mut rng = SmallRng::seed_from_u64(i as u64);
                let mut tally = Tally::default();
                for _ in 0..PUSHES_PER_THREAD {
                    perform_random_operation(&list, &mut rng, &mut tally);
                }
                tally
            }));
        }
        let (added, removed) = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .fold((0, 0), |(a, r), t| (a + t.added, r + t.removed));
        assert_eq!(list.len(), 3 + added - removed);
    }

    #[test]
    fn readers_only_see_whole_snapshots() {
        // Each write replaces every element with the same value, so a
        // partially built snapshot would show up as mixed values.
        let list = Arc::new(CowList::from(vec![0u32; 64]));
        let writer = {
            let list = list.clone();
            std::thread::spawn(move || {
                for round in 1..=500u32 {
                    list.replace_all(|_| round);
                }
            })
        };
        let mut readers = Vec::new();
        for _ in 0..4 {
            let list = list.clone();
            readers.push(std::thread::spawn(move || {
                for _ in 0..500 {
                    let elements = list.to_vec();
                    assert_eq!(elements.len(), 64);
                    assert!(elements.iter().all(|&e| e == elements[0]));
                }
            }));
        }
        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(list.get(63), Ok(500));
    }
}
