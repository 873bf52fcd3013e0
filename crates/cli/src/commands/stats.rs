use std::sync::Arc;

use anyhow::Result;
use lessonhub_service::AdminService;
use lessonhub_storage::StorageBackend;

pub(crate) async fn run(storage: Arc<StorageBackend>) -> Result<()> {
    let stats = AdminService::new(storage).stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
