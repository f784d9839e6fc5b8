use super::*;
use crate::orders::test_support::order_with_status;
use shared::models::Coordinates;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

const PREP: Duration = Duration::from_millis(1000);
const TICK: Duration = Duration::from_millis(100);
const TICKS: u32 = 4;

fn test_config() -> SimulationConfig {
    SimulationConfig {
        preparation_delay: PREP,
        tick_interval: TICK,
        max_ticks: TICKS,
        origin: Coordinates::new(0.0, 0.0),
    }
}

fn preparing() -> Order {
    order_with_status(OrderStatus::Preparing)
}

fn drain(rx: &mut broadcast::Receiver<LifecycleEvent>) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(n)) => panic!("receiver lagged by {n}"),
        }
    }
}

/// Sleep to a point between timer deadlines so no wakeups coincide
async fn sleep_past(d: Duration) {
    tokio::time::sleep(d + Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn test_starts_preparing_at_origin() {
    let engine = LifecycleEngine::new(test_config());
    let order = preparing();
    let tracking = engine.start(order.clone()).unwrap();

    assert_eq!(tracking.order_id(), order.id);
    let snapshot = engine.active_order().unwrap();
    assert_eq!(snapshot.status(), OrderStatus::Preparing);
    assert_eq!(snapshot.position, Coordinates::new(0.0, 0.0));
    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.max_ticks, TICKS);
}

#[tokio::test(start_paused = true)]
async fn test_delivering_after_preparation_delay() {
    let engine = LifecycleEngine::new(test_config());
    let _tracking = engine.start(preparing()).unwrap();

    tokio::time::sleep(PREP - Duration::from_millis(50)).await;
    assert_eq!(engine.active_order().unwrap().status(), OrderStatus::Preparing);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let snapshot = engine.active_order().unwrap();
    assert_eq!(snapshot.status(), OrderStatus::Delivering);
    assert_eq!(snapshot.tick, 0);
    assert_eq!(snapshot.position, Coordinates::new(0.0, 0.0));
}

#[tokio::test(start_paused = true)]
async fn test_delivery_ends_exactly_at_destination() {
    let engine = LifecycleEngine::new(test_config());
    let tracking = engine.start(preparing()).unwrap();

    let completed = tracking.completed().await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);

    // Completed order stays active until released
    let snapshot = engine.active_order().unwrap();
    assert_eq!(snapshot.status(), OrderStatus::Completed);
    assert_eq!(snapshot.position, Coordinates::new(10.0, 20.0));
    assert_eq!(snapshot.tick, TICKS);
    assert_eq!(snapshot.progress(), 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_completion_takes_configured_time() {
    let config = test_config();
    let engine = LifecycleEngine::new(config.clone());
    let started = tokio::time::Instant::now();
    engine.start(preparing()).unwrap().completed().await.unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= config.total_duration());
    assert!(elapsed < config.total_duration() + TICK);
}

#[tokio::test(start_paused = true)]
async fn test_event_sequence() {
    let engine = LifecycleEngine::new(test_config());
    let mut rx = engine.subscribe();
    let order = preparing();
    let id = order.id.clone();
    engine.start(order).unwrap().completed().await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2 + TICKS as usize + 1);
    assert_eq!(events[0], LifecycleEvent::Placed { order_id: id.clone() });
    assert_eq!(
        events[1],
        LifecycleEvent::StatusChanged {
            order_id: id.clone(),
            status: OrderStatus::Delivering
        }
    );
    let positions: Vec<_> = events[2..2 + TICKS as usize]
        .iter()
        .map(|e| match e {
            LifecycleEvent::PositionUpdated { tick, position, .. } => (*tick, *position),
            other => panic!("expected position update, got {other:?}"),
        })
        .collect();
    assert_eq!(
        positions,
        vec![
            (1, Coordinates::new(2.5, 5.0)),
            (2, Coordinates::new(5.0, 10.0)),
            (3, Coordinates::new(7.5, 15.0)),
            (4, Coordinates::new(10.0, 20.0)),
        ]
    );
    assert_eq!(
        events.last(),
        Some(&LifecycleEvent::StatusChanged {
            order_id: id,
            status: OrderStatus::Completed
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_mid_delivery_stops_everything() {
    let engine = LifecycleEngine::new(test_config());
    let mut rx = engine.subscribe();
    let tracking = engine.start(preparing()).unwrap();

    sleep_past(PREP + TICK * 2).await;
    let before = engine.active_order().unwrap();
    assert_eq!(before.status(), OrderStatus::Delivering);
    assert_eq!(before.tick, 2);

    let cleared = engine.clear_active_order().unwrap();
    assert_eq!(cleared.status, OrderStatus::Delivering);
    assert!(!engine.has_active_order());
    drain(&mut rx);

    // Well past the would-be completion time
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(engine.active_order().is_none());
    assert!(drain(&mut rx).is_empty());

    match tracking.completed().await {
        Err(OrderError::Cancelled { order_id }) => assert_eq!(order_id, cleared.id),
        other => panic!("expected Cancelled, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancel_while_preparing_emits_cancelled() {
    let engine = LifecycleEngine::new(test_config());
    let mut rx = engine.subscribe();
    let order = preparing();
    let id = order.id.clone();
    let _tracking = engine.start(order).unwrap();

    engine.clear_active_order();
    sleep_past(PREP * 3).await;

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            LifecycleEvent::Placed { order_id: id.clone() },
            LifecycleEvent::Cancelled { order_id: id },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_clear_without_active_order() {
    let engine = LifecycleEngine::new(test_config());
    assert!(engine.clear_active_order().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_second_order_rejected_while_active() {
    let engine = LifecycleEngine::new(test_config());
    let first = preparing();
    let first_id = first.id.clone();
    let _tracking = engine.start(first).unwrap();

    match engine.start(preparing()) {
        Err(OrderError::ActiveOrderExists { order_id }) => assert_eq!(order_id, first_id),
        other => panic!("expected ActiveOrderExists, got {other:?}"),
    }
    assert_eq!(engine.active_order().unwrap().order.id, first_id);
}

#[tokio::test(start_paused = true)]
async fn test_completed_but_unreleased_still_blocks() {
    let engine = LifecycleEngine::new(test_config());
    engine.start(preparing()).unwrap().completed().await.unwrap();

    assert!(matches!(
        engine.start(preparing()),
        Err(OrderError::ActiveOrderExists { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_start_rejects_non_preparing_order() {
    let engine = LifecycleEngine::new(test_config());
    let result = engine.start(order_with_status(OrderStatus::Delivering));
    assert!(matches!(
        result,
        Err(OrderError::InvalidState {
            status: OrderStatus::Delivering,
            expected: OrderStatus::Preparing,
            ..
        })
    ));
    assert!(!engine.has_active_order());
}

#[tokio::test(start_paused = true)]
async fn test_release_completed() {
    let engine = LifecycleEngine::new(test_config());
    let order = preparing();
    let id = order.id.clone();
    let _tracking = engine.start(order).unwrap();

    // Not yet completed
    assert!(matches!(
        engine.release_completed(&id),
        Err(OrderError::InvalidState { expected: OrderStatus::Completed, .. })
    ));
    assert!(matches!(
        engine.release_completed("SOMEONE-ELSE"),
        Err(OrderError::NoActiveOrder)
    ));

    sleep_past(test_config().total_duration()).await;
    let released = engine.release_completed(&id).unwrap();
    assert!(released.is_completed());
    assert!(!engine.has_active_order());
    assert!(matches!(
        engine.release_completed(&id),
        Err(OrderError::NoActiveOrder)
    ));

    // Slot is free again
    assert!(engine.start(preparing()).is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_stale_callbacks_are_discarded() {
    let engine = LifecycleEngine::new(test_config());
    let order = preparing();
    let id = order.id.clone();
    let _tracking = engine.start(order).unwrap();
    let mut rx = engine.subscribe();

    // Wrong status for a tick
    assert_eq!(on_delivery_tick(&engine.inner, &engine.event_tx, &id), Step::Stale);
    // Wrong order
    assert_eq!(
        on_preparation_elapsed(&engine.inner, &engine.event_tx, "NOT-THIS-ONE"),
        Step::Stale
    );
    assert_eq!(engine.active_order().unwrap().status(), OrderStatus::Preparing);
    assert!(drain(&mut rx).is_empty());

    // Order replaced: callbacks for the old one must not touch the new one
    engine.clear_active_order();
    let replacement = preparing();
    let _tracking = engine.start(replacement.clone()).unwrap();
    drain(&mut rx);
    assert_eq!(
        on_preparation_elapsed(&engine.inner, &engine.event_tx, &id),
        Step::Stale
    );
    let snapshot = engine.active_order().unwrap();
    assert_eq!(snapshot.order.id, replacement.id);
    assert_eq!(snapshot.status(), OrderStatus::Preparing);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_engine_cancels_tracking() {
    let engine = LifecycleEngine::new(test_config());
    let tracking = engine.start(preparing()).unwrap();
    drop(engine);

    assert!(matches!(
        tracking.completed().await,
        Err(OrderError::Cancelled { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_single_tick_delivery() {
    let mut config = test_config();
    config.max_ticks = 1;
    let engine = LifecycleEngine::new(config);
    engine.start(preparing()).unwrap().completed().await.unwrap();

    let snapshot = engine.active_order().unwrap();
    assert_eq!(snapshot.position, Coordinates::new(10.0, 20.0));
    assert_eq!(snapshot.tick, 1);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_timings_still_complete() {
    let engine = LifecycleEngine::new(SimulationConfig {
        preparation_delay: Duration::from_millis(u64::MAX),
        tick_interval: Duration::from_millis(u64::MAX),
        max_ticks: 2,
        origin: Coordinates::new(0.0, 0.0),
    });
    let completed = engine.start(preparing()).unwrap().completed().await.unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert_eq!(
        engine.active_order().unwrap().position,
        Coordinates::new(10.0, 20.0)
    );
}
