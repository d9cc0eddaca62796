use std::time::Duration;

use simfeed::application::scheduler::{
    FeedTrigger, ProgressiveFeed, SchedulerConfig, SchedulerState, run_feed_growth,
};
use tokio::sync::{mpsc, watch};

fn sentinel(event_id: u64, distance: f64) -> FeedTrigger {
    FeedTrigger::SentinelProximity { event_id, distance }
}

#[test]
fn visible_count_is_monotonic_and_capped() {
    let mut feed = ProgressiveFeed::new(SchedulerConfig::default(), 20);
    let mut observed = vec![feed.visible_count()];

    for event_id in 1..=4 {
        feed.handle(sentinel(event_id, 0.0));
        feed.settle();
        observed.push(feed.visible_count());
    }

    assert_eq!(observed, vec![8, 14, 20, 20, 20]);
    assert!(observed.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(feed.is_complete());
}

#[tokio::test(start_paused = true)]
async fn driver_ignores_far_and_repeated_sentinels() {
    let config = SchedulerConfig {
        idle_delay: Duration::from_secs(60),
        ..Default::default()
    };
    let feed = ProgressiveFeed::new(config, 40);
    let (trigger_tx, trigger_rx) = mpsc::channel(16);
    let (visible_tx, visible_rx) = watch::channel(0);
    let driver = tokio::spawn(run_feed_growth(feed, trigger_rx, visible_tx));

    for trigger in [
        sentinel(1, 5_000.0),
        sentinel(2, 10.0),
        sentinel(2, 10.0),
        sentinel(3, 599.0),
    ] {
        trigger_tx.send(trigger).await.expect("driver alive");
    }
    drop(trigger_tx);

    let feed = driver.await.expect("driver joins");
    assert_eq!(feed.visible_count(), 20);
    assert_eq!(*visible_rx.borrow(), 20);
    assert_eq!(feed.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn driver_follows_length_changes() {
    let feed = ProgressiveFeed::new(SchedulerConfig::default(), 10);
    let (trigger_tx, trigger_rx) = mpsc::channel(16);
    let (visible_tx, mut visible_rx) = watch::channel(0);
    let driver = tokio::spawn(run_feed_growth(feed, trigger_rx, visible_tx));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*visible_rx.borrow_and_update(), 10);

    trigger_tx
        .send(FeedTrigger::LengthChanged(4))
        .await
        .expect("driver alive");
    visible_rx.changed().await.expect("shrunk");
    assert_eq!(*visible_rx.borrow_and_update(), 4);

    trigger_tx
        .send(FeedTrigger::LengthChanged(30))
        .await
        .expect("driver alive");
    trigger_tx.send(sentinel(1, 0.0)).await.expect("driver alive");
    drop(trigger_tx);

    let feed = driver.await.expect("driver joins");
    assert_eq!(feed.total(), 30);
    assert_eq!(feed.visible_count(), 10);
    assert!(!feed.is_complete());
}
