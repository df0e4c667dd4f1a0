//! Top-k queue behaviour the processors lean on.

use talpa::TopKQueue;

#[test]
fn test_threshold_reflects_kth_best() {
    let mut queue = TopKQueue::new(3);
    for (docid, score) in [4.0f32, 1.0, 3.0, 2.0, 5.0].iter().enumerate() {
        queue.insert(*score, docid as u32);
    }
    // Top 3 are {5, 4, 3}; the live threshold is the 3rd best.
    assert_eq!(queue.threshold(), 3.0);
}

#[test]
fn test_finalize_orders_and_truncates() {
    let mut queue = TopKQueue::new(2);
    queue.insert(1.0, 5);
    queue.insert(3.0, 1);
    queue.insert(2.0, 9);
    queue.finalize();
    assert_eq!(queue.topk(), &[(3.0, 1), (2.0, 9)]);
}

#[test]
fn test_would_enter_strictness() {
    let mut queue = TopKQueue::new(1);
    queue.insert(2.0, 0);
    // Equal to the minimum of a full queue: not strictly greater, stays out.
    assert!(!queue.would_enter(2.0));
    assert!(queue.would_enter(2.0 + f32::EPSILON * 4.0));
}

#[test]
fn test_clear_between_queries() {
    let mut queue = TopKQueue::new(2);
    queue.insert(9.0, 1);
    queue.insert(8.0, 2);
    queue.finalize();
    queue.clear();
    assert!(queue.is_empty());
    assert_eq!(queue.threshold(), 0.0);
    assert!(queue.insert(0.5, 3));
}
