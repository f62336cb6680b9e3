use super::*;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_registry_put_and_get() {
    let mut registry = ModuleRegistry::new();
    registry.put(ModuleRecord::resolved("x", Value::from(42)));

    assert!(registry.has("x"));
    assert!(!registry.has("y"));
    let record = registry.get("x").expect("record");
    assert!(record.is_resolved());
    assert_eq!(record.value(), &Value::from(42));
}

#[test]
fn test_registry_last_writer_wins() {
    let mut registry = ModuleRegistry::new();
    assert!(registry.put(ModuleRecord::resolved("x", Value::from(1))).is_none());
    let first_generation = registry.get("x").map(ModuleRecord::generation);

    let previous = registry.put(ModuleRecord::resolved("x", Value::from(2)));
    assert_eq!(previous.map(|r| r.value().clone()), Some(Value::from(1)));
    assert_eq!(registry.get("x").map(|r| r.value().clone()), Some(Value::from(2)));
    assert_ne!(registry.get("x").map(ModuleRecord::generation), first_generation);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_is_satisfied_returns_values_in_requested_order() {
    let mut registry = ModuleRegistry::new();
    registry.put(ModuleRecord::resolved("x", Value::from(1)));
    registry.put(ModuleRecord::resolved("y", Value::from(2)));

    let values = registry.is_satisfied(&names(&["y", "x"]));
    assert_eq!(values, Some(vec![Value::from(2), Value::from(1)]));
}

#[test]
fn test_is_satisfied_is_all_or_nothing() {
    let mut registry = ModuleRegistry::new();
    registry.put(ModuleRecord::resolved("a", Value::from(1)));
    registry.put(ModuleRecord::pending("b", names(&["c"]), Value::Null, None));

    assert_eq!(registry.is_satisfied(&names(&["a", "missing"])), None);
    assert_eq!(registry.is_satisfied(&names(&["a", "b"])), None);
    // repeated polling has no side effects
    assert_eq!(registry.is_satisfied(&names(&["a", "b"])), None);
    assert_eq!(registry.is_satisfied(&[]), Some(vec![]));
}

#[test]
fn test_mark_resolved_is_monotonic() {
    let mut record = ModuleRecord::pending("b", names(&["a"]), Value::from("preset"), None);
    assert!(record.mark_resolved(None));
    assert_eq!(record.value(), &Value::from("preset"));

    assert!(!record.mark_resolved(Some(Value::from("late"))));
    assert_eq!(record.value(), &Value::from("preset"));
}
