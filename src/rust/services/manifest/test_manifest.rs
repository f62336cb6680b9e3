use super::*;
use crate::engine::loader::{Completion, Failure, Loader};
use crate::engine::scheduler::TaskQueue;
use crate::tools::logger::Logger;

/// Loader that only records what it was asked for
#[derive(Default)]
struct RecordingLoader {
    urls: RefCell<Vec<String>>,
}

impl Loader for RecordingLoader {
    fn load(&self, url: &str, _on_success: Completion, _on_failure: Failure) {
        self.urls.borrow_mut().push(url.to_string());
    }
}

fn target(base_url: Option<&str>) -> (ManifestTarget, TaskQueue, Rc<RecordingLoader>) {
    let queue = TaskQueue::new();
    let resolver = Resolver::new(Rc::new(queue.clone()));
    let loader = Rc::new(RecordingLoader::default());
    let includer = Includer::new(loader.clone(), Logger::capture());
    let target = ManifestTarget {
        resolver,
        includer,
        report: Report::new(),
        base_url: base_url.map(str::to_string),
    };
    (target, queue, loader)
}

const SAMPLE: &str = r#"
[[define]]
name = "config"
value = { port = 8080 }

[[define]]
name = "ready"
deps = ["config"]
value = true

[[define]]
name = "app"
deps = ["config", "ready"]

[[require]]
label = "boot"
deps = ["app"]

[[require]]
deps = "db"

[[include]]
url = "db.toml"
"#;

#[test]
fn test_parse_sample_manifest() {
    let manifest = Manifest::parse("main.toml", SAMPLE).expect("parse");

    assert_eq!(manifest.defines.len(), 3);
    assert_eq!(manifest.requires.len(), 2);
    assert_eq!(manifest.requires[1].deps, NameList::One("db".to_string()));
    assert_eq!(manifest.includes[0].url, "db.toml");
    assert!(!manifest.is_empty());
}

#[test]
fn test_unknown_keys_are_rejected() {
    let error = Manifest::parse("bad.toml", "[[define]]\nname = \"a\"\nvalu = 1\n")
        .expect_err("unknown key");
    assert!(error.to_string().contains("bad.toml"));
}

#[test]
fn test_apply_resolves_and_reports() {
    let (target, queue, loader) = target(None);
    let manifest = Manifest::parse("project/main.toml", SAMPLE).expect("parse");

    manifest.apply(&target, "project/main.toml");
    queue.run_until_idle();

    let fired = target.report.fired();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].label, "boot");

    let app = &fired[0].values[0];
    assert_eq!(
        app.get("config").and_then(|c| c.get("port")).and_then(Value::as_number),
        Some(8080.0)
    );
    assert_eq!(app.get("ready"), Some(&Value::Boolean(true)));

    assert_eq!(target.resolver.waiting_names(), vec!["db".to_string()]);
    let expected = Path::new("project").join("db.toml");
    assert_eq!(
        *loader.urls.borrow(),
        vec![expected.to_string_lossy().into_owned()]
    );
}

#[test]
fn test_define_without_value_or_deps_is_null() {
    let (target, _queue, _loader) = target(None);
    let manifest = Manifest::parse("m.toml", "[[define]]\nname = \"flag\"\n").expect("parse");
    manifest.apply(&target, "m.toml");
    assert_eq!(target.resolver.resolved_value("flag"), Some(Value::Null));
}

#[test]
fn test_base_url_prefixes_relative_includes() {
    let (target, _queue, loader) = target(Some("https://cdn.example.com/mods/"));
    let manifest =
        Manifest::parse("m.toml", "[[include]]\nurl = \"db.toml\"\n").expect("parse");
    manifest.apply(&target, "local/m.toml");
    assert_eq!(
        *loader.urls.borrow(),
        vec!["https://cdn.example.com/mods/db.toml".to_string()]
    );
}

#[test]
fn test_resolve_url() {
    assert_eq!(
        resolve_url(None, "https://host/a/main.toml", "db.toml"),
        "https://host/a/db.toml"
    );
    assert_eq!(
        resolve_url(None, "main.toml", "db.toml"),
        "db.toml"
    );
    assert_eq!(
        resolve_url(Some("https://cdn"), "main.toml", "https://other/x.toml"),
        "https://other/x.toml"
    );
}

#[test]
fn test_resolve_url_keeps_host_of_bare_origin() {
    assert_eq!(
        resolve_url(None, "https://example.com", "db.toml"),
        "https://example.com/db.toml"
    );
    assert_eq!(
        resolve_url(None, "https://example.com/", "db.toml"),
        "https://example.com/db.toml"
    );
    assert_eq!(
        resolve_url(None, "https://example.com/main.toml", "db.toml"),
        "https://example.com/db.toml"
    );
}

#[test]
fn test_empty_deps_without_value_is_empty_map() {
    let (target, _queue, _loader) = target(None);
    let manifest =
        Manifest::parse("m.toml", "[[define]]\nname = \"app\"\ndeps = []\n").expect("parse");
    manifest.apply(&target, "m.toml");
    assert_eq!(
        target.resolver.resolved_value("app"),
        Some(Value::Map(HashMap::new()))
    );
}
