use std::sync::Arc;

use snaplist::CowList;

use super::common::{assert_is_prefix, NUM_ITERATIONS, NUM_OPERATIONS, NUM_PREEMPTIONS};

/// A writer pushes `0, 1, 2, ...` while a reader walks a cursor created
/// part way through. The cursor must yield exactly what was visible when it
/// was created.
fn iterate_while_pushing(list: Arc<CowList<usize>>) {
    let writer = {
        let list = list.clone();
        shuttle::thread::spawn(move || {
            for i in 0..NUM_OPERATIONS {
                list.push(i);
                shuttle::thread::yield_now();
            }
        })
    };
    let reader = {
        let list = list.clone();
        shuttle::thread::spawn(move || {
            shuttle::thread::yield_now();
            let mut cursor = list.cursor();
            let visible = cursor.snapshot().to_vec();
            let mut observed = Vec::new();
            while cursor.has_next() {
                observed.push(cursor.try_next().unwrap());
                shuttle::thread::yield_now();
            }
            assert_eq!(observed, visible);
            observed
        })
    };
    writer.join().unwrap();
    let observed = reader.join().unwrap();
    assert_is_prefix(&observed, &list.to_vec());
}

#[test]
fn cursor_never_sees_later_pushes() {
    shuttle::check_random(|| iterate_while_pushing(Arc::new(CowList::new())), NUM_ITERATIONS);
}

#[test]
fn cursor_never_sees_later_pushes_under_pct() {
    shuttle::check_pct(
        || iterate_while_pushing(Arc::new(CowList::new())),
        NUM_ITERATIONS,
        NUM_PREEMPTIONS,
    );
}

#[test]
fn cursor_walking_backwards_survives_removals() {
    shuttle::check_random(
        || {
            let list = Arc::new(CowList::from((0..NUM_OPERATIONS).collect::<Vec<_>>()));
            let remover = {
                let list = list.clone();
                shuttle::thread::spawn(move || {
                    while list.remove_at(0).is_ok() {
                        shuttle::thread::yield_now();
                    }
                })
            };
            let mut cursor = list.cursor();
            while cursor.next().is_some() {}
            let expected: Vec<usize> = cursor.snapshot().iter().rev().copied().collect();
            let mut observed = Vec::new();
            while let Some(value) = cursor.previous() {
                observed.push(value);
                shuttle::thread::yield_now();
            }
            remover.join().unwrap();
            assert_eq!(observed, expected);
            assert!(list.is_empty());
        },
        NUM_ITERATIONS,
    );
}

#[cfg(not(shuttle))]
#[test]
fn os_thread_cursors_always_see_prefixes() {
    const PUSHES: usize = 2_000;

    let list = Arc::new(CowList::new());
    let writer = {
        let list = list.clone();
        std::thread::spawn(move || {
            for i in 0..PUSHES {
                list.push(i);
            }
        })
    };
    let mut readers = Vec::new();
    for _ in 0..4 {
        let list = list.clone();
        readers.push(std::thread::spawn(move || {
            for _ in 0..200 {
                let observed: Vec<usize> = list.iter().collect();
                let expected: Vec<usize> = (0..observed.len()).collect();
                assert_eq!(observed, expected);
            }
        }));
    }
    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(list.len(), PUSHES);
}
