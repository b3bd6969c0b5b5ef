use std::sync::Arc;

use snaplist::{CowList, Error};

use super::common::{NUM_ITERATIONS, NUM_OPERATIONS, NUM_THREADS};

#[test]
fn view_never_heals_after_outside_push() {
    shuttle::check_random(
        || {
            let list = Arc::new(CowList::from(vec!["A", "B", "C", "D"]));
            let view = list.view(1, 3).unwrap();
            let pusher = {
                let list = list.clone();
                shuttle::thread::spawn(move || list.push("E"))
            };
            let mut stale = false;
            for _ in 0..NUM_OPERATIONS {
                match view.to_vec() {
                    Ok(elements) => {
                        assert!(!stale, "view recovered after a modification");
                        assert_eq!(elements, vec!["B", "C"]);
                    }
                    Err(Error::ConcurrentModification) => stale = true,
                    Err(e) => panic!("unexpected error {e}"),
                }
                shuttle::thread::yield_now();
            }
            pusher.join().unwrap();
            assert_eq!(view.len(), Err(Error::ConcurrentModification));
        },
        NUM_ITERATIONS,
    );
}

/// Every thread pushes through its own view of the list. A push succeeds
/// only while the thread's view is live; a stale view must publish nothing.
fn push_through_competing_views(list: Arc<CowList<usize>>) {
    let initial = list.len();
    let mut handles = Vec::new();
    for i in 0..NUM_THREADS {
        let list = list.clone();
        handles.push(shuttle::thread::spawn(move || {
            let mut view = list.view(0, list.len()).unwrap();
            let mut successes = 0;
            for _ in 0..NUM_OPERATIONS {
                match view.push(i) {
                    Ok(()) => successes += 1,
                    Err(Error::ConcurrentModification) => {
                        view = list.view(0, list.len()).unwrap();
                    }
                    Err(e) => panic!("unexpected error {e}"),
                }
                shuttle::thread::yield_now();
            }
            successes
        }));
    }
    let successes: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert!(successes > 0);
    assert_eq!(list.len(), initial + successes);
}

#[test]
fn stale_views_never_publish() {
    shuttle::check_random(
        || push_through_competing_views(Arc::new(CowList::from(vec![100]))),
        NUM_ITERATIONS,
    );
}

#[cfg(not(shuttle))]
#[test]
fn os_thread_views_count_every_successful_push() {
    const PUSHES: usize = 500;

    let list = Arc::new(CowList::new());
    let mut handles = Vec::new();
    for i in 0..NUM_THREADS {
        let list = list.clone();
        handles.push(std::thread::spawn(move || {
            let mut successes = 0;
            let mut view = list.view(0, list.len()).unwrap();
            while successes < PUSHES {
                match view.push(i) {
                    Ok(()) => successes += 1,
                    Err(Error::ConcurrentModification) => {
                        view = list.view(0, list.len()).unwrap();
                    }
                    Err(e) => panic!("unexpected error {e}"),
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(list.len(), NUM_THREADS * PUSHES);
}
