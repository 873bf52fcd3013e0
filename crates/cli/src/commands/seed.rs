use std::sync::Arc;

use anyhow::Result;
use lessonhub_service::TaxonomyService;
use lessonhub_storage::StorageBackend;

pub(crate) async fn run(storage: Arc<StorageBackend>) -> Result<()> {
    let report = TaxonomyService::new(storage).seed_defaults().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
