use super::*;
use crate::engine::scheduler::{Scheduler, TaskQueue};
use std::collections::HashMap;

/// Loader over an in-memory table of scripts; completes on the task queue
struct TableLoader {
    queue: TaskQueue,
    scripts: HashMap<String, Rc<dyn Fn()>>,
}

impl Loader for TableLoader {
    fn load(&self, url: &str, on_success: Completion, on_failure: Failure) {
        match self.scripts.get(url).cloned() {
            Some(script) => self.queue.defer(Box::new(move || {
                script();
                on_success();
            })),
            None => {
                let error = LoadError::new(url, "not found");
                self.queue.defer(Box::new(move || on_failure(error)));
            }
        }
    }
}

fn setup(resolver: &Resolver, queue: &TaskQueue, logger: &Logger) -> Includer {
    let mut scripts: HashMap<String, Rc<dyn Fn()>> = HashMap::new();
    let target = resolver.clone();
    scripts.insert(
        "db.js".to_string(),
        Rc::new(move || target.define_value("db", "connected")),
    );

    let loader = TableLoader {
        queue: queue.clone(),
        scripts,
    };
    Includer::new(Rc::new(loader), logger.clone())
}

#[test]
fn test_include_runs_script_then_success_callback() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    let includer = setup(&resolver, &queue, &logger);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    resolver.require(["db"], move |values| sink.borrow_mut().push(values));

    let loaded = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&loaded);
    includer.include("db.js", Some(Box::new(move || *flag.borrow_mut() = true)));

    // nothing happens until the loader completes
    assert!(seen.borrow().is_empty());
    queue.run_until_idle();

    assert!(*loaded.borrow());
    assert_eq!(*seen.borrow(), vec![vec![Value::from("connected")]]);
    assert!(logger.lines().is_empty());
}

#[test]
fn test_failed_include_reports_name_and_does_not_retry() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    let includer = setup(&resolver, &queue, &logger);

    let failures = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&failures);
    includer.set_error_handler(move |name| sink.borrow_mut().push(name.to_string()));

    resolver.require(["missing"], |_| panic!("must not fire"));
    includer.include("missing.js", Some(Box::new(|| panic!("must not succeed"))));
    queue.run_until_idle();

    assert_eq!(*failures.borrow(), vec!["missing.js".to_string()]);
    assert_eq!(resolver.waiting_names(), vec!["missing".to_string()]);
    assert!(queue.is_empty());
    assert_eq!(
        logger.lines(),
        vec![
            "[ERROR] Error loading script: missing.js".to_string(),
            "   -> not found".to_string(),
        ]
    );
}

#[test]
fn test_default_error_handler_logs_module_name() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    let includer = setup(&resolver, &queue, &logger);

    includer.handle_error("widgets");
    assert_eq!(
        logger.lines(),
        vec!["[ERROR] Error loading module: widgets".to_string()]
    );
}

#[test]
fn test_builtins_expose_resolver_and_includer() {
    let queue = TaskQueue::new();
    let logger = Logger::capture();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    let includer = setup(&resolver, &queue, &logger);
    register_builtins(&resolver, &includer);

    let captured = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&captured);
    resolver.require([RESOLVER_MODULE, INCLUDE_MODULE], move |values| {
        *sink.borrow_mut() = Some(values);
    });

    let values = captured.borrow_mut().take().expect("builtins resolve immediately");
    let own = resolver_from(&values[0]).expect("resolver handle");
    own.define_value("through-handle", 1);
    assert!(resolver.is_resolved("through-handle"));

    let include = includer_from(&values[1]).expect("includer");
    include.include("db.js", None);
    queue.run_until_idle();
    assert_eq!(resolver.resolved_value("db"), Some(Value::from("connected")));
}
