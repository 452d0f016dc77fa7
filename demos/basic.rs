/* demos/basic.rs */

//! Builds a coordinator over two in-memory sources, reads an optional
//! `folio.{json,toml,yaml}` from the working directory, then walks the
//! lifecycle once.

use std::sync::Arc;

use folio::source::{SourceKind, StaticSource};
use folio::{Folio, FolioError};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), FolioError> {
	let components = StaticSource::new(SourceKind::Components).with_items(vec![
		json!({ "handle": "button", "status": "ready" }),
		json!({ "handle": "card", "status": "wip" }),
	]);
	let docs = StaticSource::new(SourceKind::Docs)
		.with_items(vec![json!({ "title": "Getting started" })]);

	let folio = Arc::new(
		Folio::builder()
			.overrides_from(".", "folio")
			.await?
			.components(Arc::new(components))
			.docs(Arc::new(docs))
			.build()?,
	);

	folio.on("loaded", |event| {
		log::info!("sources loaded: {}", event.payload);
		Ok(())
	});

	let app = Arc::clone(&folio);
	folio
		.run(async move {
			app.load().await?;
			app.watch()?;

			let console = app.console();
			console.success(format_args!("folio {} ready", app.version()));
			for (kind, engine) in app.engines() {
				console.log(format_args!("{kind}: {engine}"));
			}
			let docs: Arc<StaticSource> = app.source_as("docs")?;
			println!("{} docs page(s), engines {:?}", docs.items().len(), app.engines());

			app.unwatch()
		})
		.await
}
