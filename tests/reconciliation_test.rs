/// 照合エンジンの統合テスト
///
/// 一時ディレクトリ上のSQLiteストアを使用して、照合実行の中心的な性質
/// （原子性、冪等性、競合解決、空ソース）を検証します。
use ferry::adapters::record_store::{RecordStore, SqlRecordStore};
use ferry::core::config::Config;
use ferry::core::error::Phase;
use ferry::core::record::Record;
use ferry::services::reconciliation;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use tempfile::TempDir;

/// 一時ディレクトリ内のSQLite接続記述子を生成
fn descriptor(temp_dir: &TempDir, name: &str) -> String {
    let db_path = temp_dir.path().join(name);
    format!("sqlite://{}?mode=rwc", db_path.to_str().unwrap())
}

/// ストアに接続してスキーマを作成し、レコードを投入
async fn populate(descriptor: &str, records: &[Record]) {
    let store = SqlRecordStore::connect(descriptor).await.unwrap();
    store.ensure_schema().await.unwrap();

    if !records.is_empty() {
        let mut tx = store.begin().await.unwrap();
        for record in records {
            tx.upsert(record).await.unwrap();
        }
        tx.commit().await.unwrap();
    }

    store.close().await;
}

/// ストアの現在の内容を取得
async fn snapshot(descriptor: &str) -> Vec<Record> {
    let store = SqlRecordStore::connect(descriptor).await.unwrap();
    let records = store.fetch_all().await.unwrap();
    store.close().await;
    records
}

#[tokio::test]
async fn test_insert_only_case_replicates_all_records() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    let records = vec![
        Record::new(1, "Davida123"),
        Record::new(2, "Brianabc"),
        Record::new(3, "Jeff"),
    ];
    populate(&source_url, &records).await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };
    let report = reconciliation::run(&config).await.unwrap();

    assert_eq!(report.migrated, 3);
    assert_eq!(snapshot(&dest_url).await, records);
}

#[tokio::test]
async fn test_conflict_resolution_overwrites_name_keeps_id() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    populate(&source_url, &[Record::new(1, "New")]).await;
    populate(&dest_url, &[Record::new(1, "Old")]).await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };
    let report = reconciliation::run(&config).await.unwrap();

    assert_eq!(report.migrated, 1);
    assert_eq!(snapshot(&dest_url).await, vec![Record::new(1, "New")]);
}

#[tokio::test]
async fn test_merge_preserves_unrelated_destination_records() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    populate(&source_url, &[Record::new(2, "Brianabc")]).await;
    populate(&dest_url, &[Record::new(9, "Resident")]).await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };
    reconciliation::run(&config).await.unwrap();

    // デスティネーション固有のレコードは削除されず、ソースのレコードがマージされる
    assert_eq!(
        snapshot(&dest_url).await,
        vec![Record::new(2, "Brianabc"), Record::new(9, "Resident")]
    );
}

#[tokio::test]
async fn test_idempotence_second_run_changes_nothing() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    populate(
        &source_url,
        &[Record::new(1, "Davida123"), Record::new(2, "Brianabc")],
    )
    .await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };

    let first = reconciliation::run(&config).await.unwrap();
    let after_first = snapshot(&dest_url).await;

    let second = reconciliation::run(&config).await.unwrap();
    let after_second = snapshot(&dest_url).await;

    assert_eq!(first.migrated, 2);
    assert_eq!(second.migrated, 2);
    // 2回目の実行後もレコードの重複や内容の変化はない
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_empty_source_completes_without_touching_destination() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    populate(&source_url, &[]).await;
    populate(&dest_url, &[Record::new(7, "Resident")]).await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };
    let report = reconciliation::run(&config).await.unwrap();

    assert_eq!(report.migrated, 0);
    assert_eq!(snapshot(&dest_url).await, vec![Record::new(7, "Resident")]);
}

#[tokio::test]
async fn test_atomicity_failed_run_leaves_destination_unchanged() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");
    let dest_url = descriptor(&temp_dir, "dest.db");

    // 2件目のレコードが失敗するソースを用意する（nameが長すぎる）
    populate(
        &source_url,
        &[Record::new(1, "New"), Record::new(2, "Brianabc")],
    )
    .await;

    // デスティネーションには競合キー以外の制約を持つ、より厳しいテーブルを
    // 事前に作成しておく。エンジンのスキーマ同期は冪等なので、このテーブルは
    // そのまま残る。
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(&dest_url)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL CHECK(length(name) <= 5))",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO users (id, name) VALUES (1, 'Keep')")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pre_run = snapshot(&dest_url).await;

    let config = Config {
        source_url,
        dest_url: dest_url.clone(),
    };
    let error = reconciliation::run(&config).await.unwrap_err();

    assert_eq!(error.phase(), Phase::Replicating);
    assert!(error.source.is_constraint());

    // 1件目のアップサート（成功していた）もロールバックで巻き戻され、
    // デスティネーションは実行前のスナップショットと完全に一致する
    assert_eq!(snapshot(&dest_url).await, pre_run);
    assert_eq!(pre_run, vec![Record::new(1, "Keep")]);
}

#[tokio::test]
async fn test_connection_failure_reports_connecting_phase() {
    install_default_drivers();
    let temp_dir = TempDir::new().unwrap();
    let source_url = descriptor(&temp_dir, "source.db");

    populate(&source_url, &[]).await;

    let config = Config {
        source_url,
        dest_url: "unknown://nowhere".to_string(),
    };
    let error = reconciliation::run(&config).await.unwrap_err();

    assert_eq!(error.phase(), Phase::Connecting);
    assert!(error.source.is_connection());
}
