//! Integration tests for the runtime abstraction.
//!
//! These cover the primitives the list engine leans on: ordered fan-out,
//! watch-based state publication, broadcast events and `Notify` gates.

use core_async::{sync, task, time};
use std::sync::Arc;

#[core_async::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[core_async::test]
async fn test_join_ordered_keeps_input_order() {
    // Later futures finish first; output still follows input order.
    let delays = [30u64, 20, 10, 0];
    let futures = delays.iter().enumerate().map(|(index, delay)| async move {
        time::sleep(time::Duration::from_millis(*delay)).await;
        index
    });

    let order = task::join_ordered(futures).await;
    assert_eq!(order, vec![0, 1, 2, 3]);
}

#[core_async::test]
async fn test_join_ordered_runs_concurrently() {
    let start = time::Instant::now();
    let futures = (0..5).map(|_| time::sleep(time::Duration::from_millis(40)));
    task::join_ordered(futures).await;

    // Sequential execution would take 200ms.
    assert!(start.elapsed() < time::Duration::from_millis(150));
}

#[core_async::test]
async fn test_join_ordered_empty() {
    let values: Vec<u8> = task::join_ordered(Vec::<std::future::Ready<u8>>::new()).await;
    assert!(values.is_empty());
}

#[core_async::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[core_async::test]
async fn test_notify_permit_is_stored() {
    let notify = Arc::new(sync::Notify::new());
    // Permit issued before anyone waits must not be lost.
    notify.notify_one();

    let notify_clone = notify.clone();
    let handle = task::spawn(async move {
        notify_clone.notified().await;
        "released"
    });

    assert_eq!(handle.await.unwrap(), "released");
}

#[core_async::test]
async fn test_watch_send_if_modified() {
    let (tx, rx) = sync::watch::channel(1u32);

    let changed = tx.send_if_modified(|value| {
        if *value == 2 {
            *value = 3;
            true
        } else {
            false
        }
    });

    assert!(!changed);
    assert_eq!(*rx.borrow(), 1);
}

#[core_async::test]
async fn test_watch_wait_for() {
    let (tx, mut rx) = sync::watch::channel(0u32);

    task::spawn(async move {
        for i in 1..=5 {
            time::sleep(time::Duration::from_millis(5)).await;
            tx.send_replace(i);
        }
    });

    let seen = *rx.wait_for(|value| *value >= 5).await.unwrap();
    assert_eq!(seen, 5);
}

#[core_async::test]
async fn test_broadcast_channel() {
    let (tx, mut rx1) = sync::broadcast::channel(10);
    let mut rx2 = tx.subscribe();

    for i in 0..3 {
        tx.send(i).unwrap();
    }

    let mut values1 = vec![];
    let mut values2 = vec![];
    for _ in 0..3 {
        values1.push(rx1.recv().await.unwrap());
        values2.push(rx2.recv().await.unwrap());
    }

    assert_eq!(values1, vec![0, 1, 2]);
    assert_eq!(values2, vec![0, 1, 2]);
}

#[core_async::test]
async fn test_time_utilities() {
    assert!(time::now_millis() > 0);
}
