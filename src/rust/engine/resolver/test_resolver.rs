use super::*;
use crate::engine::scheduler::TaskQueue;
use std::cell::RefCell;

fn resolver() -> (Resolver, TaskQueue) {
    let queue = TaskQueue::new();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    (resolver, queue)
}

/// Callback that records every invocation's values
fn recorder() -> (Rc<RefCell<Vec<Vec<Value>>>>, impl Fn() -> Box<dyn FnOnce(Vec<Value>)>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let make = move || {
        let sink = Rc::clone(&sink);
        Box::new(move |values: Vec<Value>| sink.borrow_mut().push(values)) as Box<dyn FnOnce(Vec<Value>)>
    };
    (calls, make)
}

#[test]
fn test_immediate_value_fires_synchronously() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.define_value("a", 42);
    resolver.require(["a"], callback());

    assert_eq!(*calls.borrow(), vec![vec![Value::from(42)]]);
    queue.run_until_idle();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_values_follow_declared_dependency_order() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.define_value("x", 1);
    resolver.define_value("y", 2);
    resolver.require(["y", "x"], callback());
    queue.run_until_idle();

    assert_eq!(*calls.borrow(), vec![vec![Value::from(2), Value::from(1)]]);
}

#[test]
fn test_finalizer_value_feeds_dependents() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.define_computed("a", Dependencies::none(), |_| Value::from(5));
    resolver.define_computed("b", ["a"], |values| {
        Value::from(values[0].as_number().unwrap_or_default() + 1.0)
    });
    resolver.require(["b"], callback());
    queue.run_until_idle();

    assert_eq!(*calls.borrow(), vec![vec![Value::from(6)]]);
}

#[test]
fn test_computed_module_without_dependencies_resolves_during_define() {
    let (resolver, _queue) = resolver();
    resolver.define_computed("a", Dependencies::none(), |values| {
        assert!(values.is_empty());
        Value::from("ready")
    });

    assert!(resolver.is_resolved("a"));
    assert_eq!(resolver.resolved_value("a"), Some(Value::from("ready")));
}

#[test]
fn test_define_after_ignores_dependency_values() {
    let (resolver, queue) = resolver();

    resolver.define_after("ready", ["config"], true);
    assert!(resolver.is_defined("ready"));
    assert!(!resolver.is_resolved("ready"));

    resolver.define_value("config", "ignored");
    queue.run_until_idle();

    assert_eq!(resolver.resolved_value("ready"), Some(Value::from(true)));
}

#[test]
fn test_callback_fires_once_even_after_redefinition() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.define_value("a", 1);
    resolver.require(["a"], callback());
    resolver.define_value("a", 2);
    resolver.define_value("a", 3);
    queue.run_until_idle();

    assert_eq!(*calls.borrow(), vec![vec![Value::from(1)]]);
}

#[test]
fn test_partial_satisfaction_blocks_until_complete() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.require(["a", "b"], callback());
    resolver.define_value("a", "A");
    queue.run_until_idle();

    assert!(calls.borrow().is_empty());
    assert_eq!(resolver.waiting_names(), vec!["b".to_string()]);

    resolver.define_value("b", "B");
    queue.run_until_idle();

    assert_eq!(*calls.borrow(), vec![vec![Value::from("A"), Value::from("B")]]);
    assert!(resolver.waiting_names().is_empty());
}

#[test]
fn test_one_define_unblocks_a_chain_of_requests() {
    let (resolver, queue) = resolver();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let resolver = resolver.clone();
        let order = Rc::clone(&order);
        move |_values: Vec<Value>| {
            order.borrow_mut().push("first");
            resolver.define_value("b", 2);
        }
    };
    let second = {
        let resolver = resolver.clone();
        let order = Rc::clone(&order);
        move |_values: Vec<Value>| {
            order.borrow_mut().push("second");
            resolver.define_value("c", 3);
        }
    };
    let third = {
        let order = Rc::clone(&order);
        move |values: Vec<Value>| {
            assert_eq!(values, vec![Value::from(3)]);
            order.borrow_mut().push("third");
        }
    };

    resolver.require(["c"], third);
    resolver.require(["b"], second);
    resolver.require(["a"], first);
    assert!(order.borrow().is_empty());

    resolver.define_value("a", 1);
    queue.run_until_idle();

    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    assert_eq!(resolver.waiting_count(), 0);
}

#[test]
fn test_later_entries_need_the_deferred_scan() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    // the request sits before the finalize step it depends on
    resolver.require(["b"], callback());
    resolver.define_computed("b", ["a"], |values| values[0].clone());
    resolver.define_value("a", 7);

    assert!(resolver.is_resolved("b"));
    assert!(calls.borrow().is_empty());
    assert_eq!(queue.len(), 1);

    queue.run_until_idle();
    assert_eq!(*calls.borrow(), vec![vec![Value::from(7)]]);
}

#[test]
fn test_unresolvable_names_wait_forever() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    resolver.require(["p"], callback());
    resolver.require(["q"], callback());
    queue.run_until_idle();

    assert!(calls.borrow().is_empty());
    assert_eq!(resolver.waiting_names(), vec!["p".to_string(), "q".to_string()]);
    assert!(queue.is_empty());
}

#[test]
fn test_dependency_cycle_never_resolves() {
    let (resolver, queue) = resolver();

    resolver.define_computed("p", ["q"], |values| values[0].clone());
    resolver.define_computed("q", ["p"], |values| values[0].clone());
    queue.run_until_idle();

    assert!(!resolver.is_resolved("p"));
    assert!(!resolver.is_resolved("q"));
    assert_eq!(resolver.waiting_names(), vec!["q".to_string(), "p".to_string()]);
}

#[test]
fn test_waiting_names_are_deduplicated() {
    let (resolver, _queue) = resolver();
    resolver.define_value("a", 1);
    resolver.require(["a", "b"], |_| {});
    resolver.require(["b", "c"], |_| {});

    assert_eq!(resolver.waiting_names(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn test_single_name_dependency() {
    let (resolver, _queue) = resolver();
    let (calls, callback) = recorder();

    resolver.define_value("solo", "value");
    resolver.require("solo", callback());

    assert_eq!(*calls.borrow(), vec![vec![Value::from("value")]]);
}

#[test]
fn test_redefinition_discards_stale_finalizer() {
    let (resolver, queue) = resolver();

    resolver.define_computed("m", ["dep"], |_| Value::from("old"));
    resolver.define_computed("m", ["dep"], |_| Value::from("new"));
    resolver.define_value("dep", 0);
    queue.run_until_idle();

    assert_eq!(resolver.resolved_value("m"), Some(Value::from("new")));
}

#[test]
fn test_redefining_a_resolved_module_replaces_it() {
    let (resolver, queue) = resolver();

    resolver.define_value("m", 1);
    resolver.define_after("m", ["later"], 2);
    queue.run_until_idle();

    assert!(!resolver.is_resolved("m"));
    assert_eq!(resolver.resolved_value("m"), None);
    assert_eq!(resolver.waiting_names(), vec!["later".to_string()]);
}

#[test]
fn test_finalizer_may_reenter_the_resolver() {
    let (resolver, queue) = resolver();
    let (calls, callback) = recorder();

    let inner = resolver.clone();
    resolver.define_computed("outer", ["base"], move |values| {
        inner.define_value("side", "effect");
        values[0].clone()
    });
    resolver.require(["outer", "side"], callback());
    resolver.define_value("base", "b");
    queue.run_until_idle();

    assert_eq!(
        *calls.borrow(),
        vec![vec![Value::from("b"), Value::from("effect")]]
    );
}

#[test]
fn test_compaction_drops_fired_records() {
    let (resolver, queue) = resolver();

    resolver.define_value("a", 1);
    for _ in 0..5 {
        resolver.require(["a"], |_| {});
    }
    resolver.require(["missing"], |_| {});
    queue.run_until_idle();

    assert_eq!(resolver.work_list_len(), 1);
    assert_eq!(resolver.waiting_count(), 1);
}

#[test]
fn test_without_compaction_fired_records_stay_inert() {
    let queue = TaskQueue::new();
    let resolver = Resolver::builder(Rc::new(queue.clone()))
        .compact(false)
        .build();

    resolver.define_value("a", 1);
    for _ in 0..5 {
        resolver.require(["a"], |_| {});
    }
    queue.run_until_idle();

    assert_eq!(resolver.work_list_len(), 5);
    assert_eq!(resolver.waiting_count(), 0);
}

#[test]
fn test_deferred_scans_are_coalesced() {
    let (resolver, queue) = resolver();

    resolver.define_value("a", 1);
    resolver.require(["a"], |_| {});
    resolver.require(["a"], |_| {});

    assert_eq!(queue.len(), 1);
    queue.run_until_idle();
    assert!(queue.is_empty());
}

#[test]
fn test_debug_messages() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::builder(Rc::new(queue.clone()))
        .logger(logger.clone())
        .debug(true)
        .build();

    resolver.require(["a", "b"], |_| {});
    resolver.define_value("a", 1);
    resolver.define_value("b", 2);
    queue.run_until_idle();
    resolver.define_value("b", 3);

    let lines = logger.lines();
    assert!(lines.contains(&"[DEBUG] required: a,b".to_string()));
    assert!(lines.contains(&"[DEBUG] waiting: a,b".to_string()));
    assert!(lines.contains(&"[DEBUG] waiting: b".to_string()));
    assert!(lines.contains(&"[DEBUG] resolved: a,b".to_string()));
    assert!(lines.contains(&"[WARN] redefined: b".to_string()));
}

#[test]
fn test_debug_is_silent_by_default() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::builder(Rc::new(queue.clone()))
        .logger(logger.clone())
        .build();

    resolver.require(["a"], |_| {});
    resolver.define_value("a", 1);
    queue.run_until_idle();

    assert!(logger.lines().is_empty());
    resolver.debug(true);
    assert!(resolver.is_debug());
}

#[test]
fn test_instances_are_independent() {
    let (first, _) = resolver();
    let (second, _) = resolver();

    first.define_value("shared", 1);
    assert!(first.is_resolved("shared"));
    assert!(!second.is_defined("shared"));
}

#[test]
fn test_injected_registry_is_used() {
    let mut registry = ModuleRegistry::new();
    registry.put(ModuleRecord::resolved("seed", Value::from("preloaded")));

    let queue = TaskQueue::new();
    let resolver = Resolver::builder(Rc::new(queue.clone()))
        .registry(registry)
        .build();
    let (calls, callback) = recorder();
    resolver.require(["seed"], callback());

    assert_eq!(*calls.borrow(), vec![vec![Value::from("preloaded")]]);
    assert_eq!(resolver.with_registry(|registry| registry.len()), 1);
}

#[test]
fn test_handle_does_not_keep_resolver_alive() {
    let (resolver, _queue) = resolver();
    let handle = resolver.handle();
    assert!(handle.upgrade().is_some());
    drop(resolver);
    assert!(handle.upgrade().is_none());
}
