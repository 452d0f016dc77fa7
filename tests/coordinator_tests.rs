/* tests/coordinator_tests.rs */

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio::fatal::FatalPolicy;
use folio::console::Console;
use folio::frontend::{ConsoleFrontEnd, FrontEnd, FrontEndKind};
use folio::source::{ContentSource, Engine, EngineArg, SourceError, SourceKind, StaticSource};
use folio::{Folio, FolioError};
use serde_json::{Value, json};

type CallLog = Arc<Mutex<Vec<String>>>;

/// Records every lifecycle call into a log shared between sources.
struct Recording {
	name: &'static str,
	calls: CallLog,
	engine: Mutex<Engine>,
	received: Mutex<Vec<Vec<EngineArg>>>,
	delay: Duration,
	fail_with: Option<SourceError>,
	finished: AtomicBool,
	console: Console,
}

impl Recording {
	fn new(name: &'static str, calls: &CallLog) -> Self {
		Self {
			name,
			calls: Arc::clone(calls),
			engine: Mutex::new(format!("{name}-engine")),
			received: Mutex::new(Vec::new()),
			delay: Duration::ZERO,
			fail_with: None,
			finished: AtomicBool::new(false),
			console: Console::new(false),
		}
	}

	fn slow(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	fn failing(mut self, error: SourceError) -> Self {
		self.fail_with = Some(error);
		self
	}

	fn record(&self, call: &str) {
		self.calls.lock().unwrap().push(format!("{}:{call}", self.name));
	}
}

#[async_trait]
impl ContentSource for Recording {
	fn watch(&self) -> Result<(), SourceError> {
		self.record("watch");
		Ok(())
	}

	fn unwatch(&self) -> Result<(), SourceError> {
		self.record("unwatch");
		Ok(())
	}

	fn engine(&self) -> Engine {
		self.engine.lock().unwrap().clone()
	}

	fn set_engine(&self, args: &[EngineArg]) -> Result<(), SourceError> {
		self.record("engine");
		self.received.lock().unwrap().push(args.to_vec());
		if let Some(name) = args.first().and_then(Value::as_str) {
			*self.engine.lock().unwrap() = name.to_string();
		}
		Ok(())
	}

	async fn load(&self) -> Result<(), SourceError> {
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		self.finished.store(true, Ordering::SeqCst);
		match &self.fail_with {
			Some(error) => Err(error.clone()),
			None => Ok(()),
		}
	}

	fn console(&self) -> &Console {
		&self.console
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

fn folio_with(components: Arc<Recording>, docs: Arc<Recording>) -> Folio {
	Folio::builder()
		.components(components)
		.docs(docs)
		.install_fatal_handler(false)
		.build()
		.unwrap()
}

#[test]
fn test_source_lookup_by_name() {
	let calls = CallLog::default();
	let components = Arc::new(Recording::new("components", &calls));
	let docs = Arc::new(Recording::new("docs", &calls));
	let folio = folio_with(Arc::clone(&components), Arc::clone(&docs));

	let found: Arc<Recording> = folio.source_as("components").unwrap();
	assert!(Arc::ptr_eq(&found, &components));
	let again: Arc<Recording> = folio.source_as("components").unwrap();
	assert!(Arc::ptr_eq(&found, &again));
	let found: Arc<Recording> = folio.source_as("docs").unwrap();
	assert!(Arc::ptr_eq(&found, &docs));

	let as_dyn = folio.source("docs").unwrap();
	assert_eq!(as_dyn.engine(), "docs-engine");
}

#[test]
fn test_unknown_source_is_configuration_error() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();

	for name in ["templates", "", "Components", "docs "] {
		match folio.source(name) {
			Err(FolioError::UnknownSource(err)) => {
				assert_eq!(err.0, name);
				assert!(err.to_string().starts_with("configuration error"));
			}
			Err(other) => panic!("Expected UnknownSource for {name:?}, got {other:?}"),
			Ok(_) => panic!("Expected UnknownSource for {name:?}"),
		}
	}
}

#[test]
fn test_source_as_wrong_type() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();
	assert!(matches!(
		folio.source_as::<Recording>("components"),
		Err(FolioError::SourceType {
			kind: SourceKind::Components,
			..
		})
	));
	assert!(folio.source_as::<StaticSource>("components").is_ok());
}

#[test]
fn test_watch_then_unwatch_in_registry_order() {
	let calls = CallLog::default();
	let folio = folio_with(
		Arc::new(Recording::new("components", &calls)),
		Arc::new(Recording::new("docs", &calls)),
	);

	folio.watch().unwrap();
	folio.unwatch().unwrap();

	assert_eq!(
		*calls.lock().unwrap(),
		vec!["components:watch", "docs:watch", "components:unwatch", "docs:unwatch"]
	);
}

#[test]
fn test_engine_read_returns_each_source_engine() {
	let calls = CallLog::default();
	let folio = folio_with(
		Arc::new(Recording::new("components", &calls)),
		Arc::new(Recording::new("docs", &calls)),
	);

	let engines = folio.engine(&[]).unwrap().expect("read returns a map");
	assert_eq!(engines.len(), 2);
	assert_eq!(engines["components"], "components-engine");
	assert_eq!(engines["docs"], "docs-engine");
	assert_eq!(folio.engines(), engines);
	// A read does not touch the setters.
	assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_engine_write_forwards_identical_args() {
	let calls = CallLog::default();
	let components = Arc::new(Recording::new("components", &calls));
	let docs = Arc::new(Recording::new("docs", &calls));
	let folio = folio_with(Arc::clone(&components), Arc::clone(&docs));

	let args = [json!("nunjucks"), json!({ "cache": false })];
	assert!(folio.engine(&args).unwrap().is_none());

	assert_eq!(*calls.lock().unwrap(), vec!["components:engine", "docs:engine"]);
	assert_eq!(*components.received.lock().unwrap(), vec![args.to_vec()]);
	assert_eq!(*docs.received.lock().unwrap(), vec![args.to_vec()]);
	assert_eq!(folio.engines()["docs"], "nunjucks");
}

#[tokio::test]
async fn test_load_resolves_when_all_sources_resolve() {
	let calls = CallLog::default();
	let components = Arc::new(Recording::new("components", &calls).slow(Duration::from_millis(20)));
	let docs = Arc::new(Recording::new("docs", &calls));
	let folio = folio_with(Arc::clone(&components), Arc::clone(&docs));

	folio.load().await.unwrap();
	assert!(components.finished.load(Ordering::SeqCst));
	assert!(docs.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_load_fails_fast_and_leaves_siblings_running() {
	let calls = CallLog::default();
	let slow = Arc::new(Recording::new("components", &calls).slow(Duration::from_millis(300)));
	let failing = Arc::new(
		Recording::new("docs", &calls).failing(SourceError::Load("missing index".to_string())),
	);
	let folio = folio_with(Arc::clone(&slow), failing);

	let outcome = tokio::time::timeout(Duration::from_millis(200), folio.load())
		.await
		.expect("failure surfaces before the slow source finishes");

	match outcome {
		Err(FolioError::Source { kind, error }) => {
			assert_eq!(kind, SourceKind::Docs);
			assert_eq!(error, SourceError::Load("missing index".to_string()));
		}
		other => panic!("Expected docs load failure, got {other:?}"),
	}
	assert!(!slow.finished.load(Ordering::SeqCst));

	// The orphaned load keeps running to completion.
	tokio::time::sleep(Duration::from_millis(400)).await;
	assert!(slow.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_static_sources_fill_missing_slots() {
	let folio = Folio::builder()
		.overrides(json!({ "docs": { "engine": "markdown" } }))
		.docs(Arc::new(
			StaticSource::new(SourceKind::Docs).with_items(vec![json!({ "title": "Intro" })]),
		))
		.install_fatal_handler(false)
		.build()
		.unwrap();

	assert_eq!(folio.source_kinds(), SourceKind::ALL.to_vec());
	// Supplied sources keep their own engine; filled ones read the overlay.
	assert_eq!(folio.engines()["components"], "handlebars");
	assert_eq!(folio.engines()["docs"], "handlebars");

	folio.watch().unwrap();
	folio.load().await.unwrap();

	let docs: Arc<StaticSource> = folio.source_as("docs").unwrap();
	assert!(docs.is_watching());
	assert_eq!(docs.items().len(), 1);
	let components: Arc<StaticSource> = folio.source_as("components").unwrap();
	assert!(components.is_loaded());
	assert!(components.items().is_empty());

	folio.unwatch().unwrap();
	assert!(!docs.is_watching());
}

#[test]
fn test_static_source_engine_from_config() {
	let folio = Folio::builder()
		.overrides(json!({ "components": { "engine": "nunjucks" } }))
		.install_fatal_handler(false)
		.build()
		.unwrap();
	assert_eq!(folio.engines()["components"], "nunjucks");

	let err = folio.engine(&[json!(42)]).unwrap_err();
	assert!(matches!(
		err,
		FolioError::Source {
			kind: SourceKind::Components,
			error: SourceError::Engine(_),
		}
	));
}

#[test]
fn test_version_strips_leading_marker() {
	for (raw, expected) in [("v2.3.1", "2.3.1"), ("V1.0.0", "1.0.0"), ("3.0.0", "3.0.0")] {
		let folio = Folio::builder()
			.overrides(json!({ "version": raw }))
			.install_fatal_handler(false)
			.build()
			.unwrap();
		assert_eq!(folio.version(), expected);
	}
}

#[test]
fn test_debug_follows_env() {
	for (env, expected) in [("DEBUG", true), ("Debug", true), ("debug", true), ("production", false)] {
		let folio = Folio::builder()
			.overrides(json!({ "env": env }))
			.install_fatal_handler(false)
			.build()
			.unwrap();
		assert_eq!(folio.debug(), expected, "env = {env}");
		assert_eq!(folio.fatal_policy(), FatalPolicy::for_debug(expected));
		assert!(!folio.fatal_handler_installed());
	}
}

#[test]
fn test_derived_accessors_track_live_config() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();
	assert!(!folio.debug());

	folio.set("env", json!("debug")).unwrap();
	folio.set("version", json!("v9.9.9")).unwrap();
	assert!(folio.debug());
	assert_eq!(folio.version(), "9.9.9");
	// Decided at construction, not re-evaluated.
	assert_eq!(folio.fatal_policy(), FatalPolicy::Terminate);
}

#[test]
fn test_lifecycle_emits_events() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();
	let seen = Arc::new(Mutex::new(Vec::new()));
	for name in ["watch", "unwatch", "engine"] {
		let seen = Arc::clone(&seen);
		folio.on(name, move |event| {
			seen.lock().unwrap().push(event.name.clone());
			Ok(())
		});
	}

	folio.watch().unwrap();
	folio.engine(&[json!("twig")]).unwrap();
	folio.unwatch().unwrap();

	assert_eq!(*seen.lock().unwrap(), vec!["watch", "engine", "unwatch"]);
}

#[tokio::test]
async fn test_failing_listener_fails_the_operation() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();
	folio.on("loaded", |_| Err("reporter offline".into()));

	assert!(matches!(folio.load().await, Err(FolioError::Event(_))));
	assert_eq!(folio.emit("other", json!(null)).unwrap(), 0);
}

#[tokio::test]
async fn test_overrides_from_project_config() {
	let dir = tempfile::tempdir().unwrap();
	tokio::fs::write(
		dir.path().join("folio.json"),
		r#"{"env": "debug", "project": {"title": "Atlas"}}"#,
	)
	.await
	.unwrap();

	let folio = Folio::builder()
		.overrides_from(dir.path(), "folio")
		.await
		.unwrap()
		.build()
		.unwrap();

	assert!(folio.debug());
	assert!(folio.console().is_debug());
	assert_eq!(folio.fatal_policy(), FatalPolicy::Propagate);
	assert!(!folio.fatal_handler_installed());
	assert_eq!(folio.get("project.title"), Some(json!("Atlas")));

	// A missing project file keeps the defaults.
	let folio = Folio::builder()
		.overrides_from(dir.path(), "absent")
		.await
		.unwrap()
		.install_fatal_handler(false)
		.build()
		.unwrap();
	assert!(!folio.debug());
}

#[tokio::test]
async fn test_invalid_project_config() {
	let dir = tempfile::tempdir().unwrap();
	tokio::fs::write(dir.path().join("folio.json"), "{ not json").await.unwrap();

	assert!(matches!(
		Folio::builder().overrides_from(dir.path(), "folio").await,
		Err(FolioError::Config(_))
	));
}

/// Front end with its own console, standing in for a real CLI or server.
struct Shell {
	kind: FrontEndKind,
	console: Console,
}

impl FrontEnd for Shell {
	fn kind(&self) -> FrontEndKind {
		self.kind
	}

	fn console(&self) -> &Console {
		&self.console
	}
}

#[test]
fn test_registered_front_ends_are_held() {
	let cli: Arc<dyn FrontEnd> = Arc::new(Shell {
		kind: FrontEndKind::Cli,
		console: Console::new(true),
	});
	let web: Arc<dyn FrontEnd> = Arc::new(Shell {
		kind: FrontEndKind::Web,
		console: Console::new(false),
	});
	let folio = Folio::builder()
		.cli(Arc::clone(&cli))
		.web(Arc::clone(&web))
		.install_fatal_handler(false)
		.build()
		.unwrap();

	assert!(Arc::ptr_eq(folio.cli(), &cli));
	assert!(Arc::ptr_eq(folio.web(), &web));
	assert_eq!(folio.web().kind(), FrontEndKind::Web);
	// The coordinator console is the CLI's, whatever `env` says.
	assert!(!folio.debug());
	assert!(folio.console().is_debug());
}

#[test]
fn test_front_end_slot_replaced_by_later_registration() {
	let first: Arc<dyn FrontEnd> = Arc::new(ConsoleFrontEnd::new(FrontEndKind::Web, false));
	let second: Arc<dyn FrontEnd> = Arc::new(ConsoleFrontEnd::new(FrontEndKind::Web, true));
	let folio = Folio::builder()
		.front_end(FrontEndKind::Web, first)
		.front_end(FrontEndKind::Web, Arc::clone(&second))
		.install_fatal_handler(false)
		.build()
		.unwrap();

	assert!(Arc::ptr_eq(folio.web(), &second));
	assert!(folio.web().console().is_debug());
}

#[test]
fn test_default_front_ends_follow_env() {
	for (env, debug) in [("debug", true), ("production", false)] {
		let folio = Folio::builder()
			.overrides(json!({ "env": env }))
			.install_fatal_handler(false)
			.build()
			.unwrap();

		assert_eq!(folio.cli().kind(), FrontEndKind::Cli);
		assert_eq!(folio.web().kind(), FrontEndKind::Web);
		assert_eq!(folio.cli().console().is_debug(), debug);
		assert_eq!(folio.web().console().is_debug(), debug);
		assert_eq!(folio.console().is_debug(), debug);
		assert_eq!(FrontEndKind::Web.to_string(), "web");
	}
}

#[test]
fn test_filled_sources_carry_console() {
	let calls = CallLog::default();
	let folio = Folio::builder()
		.overrides(json!({ "env": "debug" }))
		.docs(Arc::new(Recording::new("docs", &calls)))
		.install_fatal_handler(false)
		.build()
		.unwrap();

	// Filled from config: follows `env`.
	assert!(folio.source("components").unwrap().console().is_debug());
	// Supplied: keeps its own.
	assert!(!folio.source("docs").unwrap().console().is_debug());
}

#[test]
fn test_engine_options_follow_selection() {
	let folio = Folio::builder().install_fatal_handler(false).build().unwrap();
	let docs: Arc<StaticSource> = folio.source_as("docs").unwrap();
	assert!(docs.engine_options().is_empty());

	folio
		.engine(&[json!("nunjucks"), json!({ "autoescape": true }), json!(["filters"])])
		.unwrap();
	assert_eq!(docs.engine(), "nunjucks");
	assert_eq!(
		docs.engine_options(),
		vec![json!({ "autoescape": true }), json!(["filters"])]
	);

	// A bare name clears earlier options.
	folio.engine(&[json!("handlebars")]).unwrap();
	assert!(docs.engine_options().is_empty());

	// A rejected selection leaves the previous one.
	assert!(docs.set_engine(&[]).is_err());
	assert_eq!(docs.engine(), "handlebars");
}
