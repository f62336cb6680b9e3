use super::*;
use std::thread;
use std::time::Duration;

#[test]
fn test_debug_timer() {
    let timer = DebugTimer::new("test");
    thread::sleep(Duration::from_millis(10));
    assert!(timer.elapsed_ms() >= 10.0);
}

#[test]
fn test_debug_timer_reports_on_drop() {
    let logger = Logger::capture();
    {
        let _timer = DebugTimer::new("scan").reporting_to(&logger);
    }
    let lines = logger.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[DEBUG] scan took "));
}

#[test]
fn test_silent_timer_reports_nothing() {
    let logger = Logger::capture();
    drop(DebugTimer::new("scan"));
    assert!(logger.lines().is_empty());
}
