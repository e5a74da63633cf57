// 初期データシード
//
// HTTPサービスの初回起動時に、レコードテーブルが空の場合のみ
// 初期レコードを投入します。既にデータが存在する場合は何もしません。

use crate::adapters::record_store::RecordStore;
use crate::core::error::StoreError;
use crate::core::record::Record;
use tracing::info;

/// 初回起動時に投入する初期レコード
pub fn initial_records() -> Vec<Record> {
    vec![
        Record::new(1, "Davida123"),
        Record::new(2, "Brianabc"),
        Record::new(3, "Jeff"),
    ]
}

/// ストアが空の場合のみ初期レコードを投入
///
/// # Arguments
///
/// * `store` - 対象のレコードストア（スキーマ作成済みであること）
///
/// # Returns
///
/// 投入したレコード数（既にデータがある場合は0）
pub async fn seed_initial_records(store: &dyn RecordStore) -> Result<usize, StoreError> {
    let existing = store.fetch_all().await?;
    if !existing.is_empty() {
        return Ok(0);
    }

    let records = initial_records();

    let mut tx = store.begin().await?;
    for record in &records {
        tx.upsert(record).await?;
    }
    tx.commit().await?;

    info!(count = records.len(), "Seeded initial records");

    Ok(records.len())
}
