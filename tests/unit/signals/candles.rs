//! Unit tests for the candle aggregator

use chrono::{DateTime, Duration, TimeZone, Utc};
use orionis::signals::CandleAggregator;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap()
}

#[test]
fn test_first_tick_opens_without_closing() {
    let mut agg = CandleAggregator::new(1000);
    assert!(agg.update(100.0, base_time()).is_none());
    assert_eq!(agg.candle_count(), 0);
    assert_eq!(agg.last_price(), Some(100.0));
}

#[test]
fn test_same_minute_updates_extremes() {
    let mut agg = CandleAggregator::new(1000);
    let t = base_time();
    agg.update(100.0, t);
    agg.update(103.0, t + Duration::seconds(10));
    agg.update(98.0, t + Duration::seconds(40));
    // candle still open
    assert_eq!(agg.candle_count(), 0);

    let closed = agg.update(101.0, t + Duration::seconds(70)).unwrap();
    assert_eq!(closed.open, 100.0);
    assert_eq!(closed.high, 103.0);
    assert_eq!(closed.low, 98.0);
    // close is the last price before the rollover tick
    assert_eq!(closed.close, 98.0);
    assert_eq!(closed.minute, t);
}

#[test]
fn test_three_minutes_close_two_candles() {
    let mut agg = CandleAggregator::new(1000);
    let t = base_time();
    let mut price = 100.0;
    let mut closed = 0;
    for minute in 0..3 {
        for tick in 0..3 {
            price += 0.5;
            let ts = t + Duration::seconds(minute * 60 + tick * 15);
            if agg.update(price, ts).is_some() {
                closed += 1;
            }
        }
    }
    assert_eq!(closed, 2);
    assert_eq!(agg.candle_count(), 2);

    // monotonically increasing ticks: each candle's low is its first
    // tick, its high the last tick of its minute
    let highs = agg.highs();
    let lows = agg.lows();
    assert_eq!(lows, vec![100.5, 102.0]);
    assert_eq!(highs, vec![101.5, 103.0]);
    assert_eq!(agg.closes(), vec![101.5, 103.0]);
}

#[test]
fn test_eviction_keeps_most_recent_thousand() {
    let mut agg = CandleAggregator::new(1000);
    let t = base_time();
    for i in 0..1050i64 {
        agg.update(1000.0 + i as f64, t + Duration::minutes(i));
    }
    // 1049 candles closed, window capped at 1000
    assert_eq!(agg.candle_count(), 1000);
    assert_eq!(agg.price_count(), 1000);
    // closes are [p0..p1048]; after dropping the oldest 49 the front
    // is tick 49's price
    assert_eq!(agg.oldest_close(), Some(1049.0));
    assert_eq!(agg.closes().last().copied(), Some(2048.0));
}

#[test]
fn test_minute_boundary_is_truncated_not_elapsed() {
    let mut agg = CandleAggregator::new(1000);
    let t = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 55).unwrap();
    agg.update(100.0, t);
    // 10 seconds later but in the next wall-clock minute
    let closed = agg.update(101.0, t + Duration::seconds(10));
    assert!(closed.is_some());
}
