// serveコマンドハンドラー
//
// デスティネーションストアのレコードを読み取り専用で公開するHTTPサービス。
// - 起動時にスキーマ作成と初期データシード（テーブルが空の場合のみ）
// - GET /users でレコード一覧をJSON配列として返す
// - 認証なし、他のルートなし

use crate::adapters::record_store::{RecordStore, SqlRecordStore};
use crate::core::config::{resolve_http_addr, resolve_store_url, DEST_URL_ENV};
use crate::core::record::Record;
use crate::services::seed;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

/// serveコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ServeCommand {
    /// デスティネーションストアの接続記述子（CLIフラグ、未指定時は環境変数）
    pub dest_url: Option<String>,
    /// バインドアドレス（CLIフラグ、未指定時は環境変数またはデフォルト）
    pub addr: Option<String>,
}

/// serveコマンドハンドラー
#[derive(Debug, Clone)]
pub struct ServeCommandHandler {}

impl ServeCommandHandler {
    /// 新しいServeCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// serveコマンドを実行
    ///
    /// ストアへの接続、スキーマ作成、初期データシードの後、
    /// HTTPサービスを起動して停止まで実行し続けます。
    pub async fn execute(&self, command: &ServeCommand) -> Result<String> {
        let dest_url = resolve_store_url(command.dest_url.clone(), DEST_URL_ENV)?;
        let addr = resolve_http_addr(command.addr.clone());

        let store = SqlRecordStore::connect(&dest_url)
            .await
            .context("Failed to connect to destination store")?;

        // 初回起動時のスキーマ作成とシード。失敗時もストアを解放してから返す。
        let init = async {
            store.ensure_schema().await?;
            seed::seed_initial_records(&store).await?;
            Ok::<_, crate::core::error::StoreError>(())
        }
        .await;
        if let Err(e) = init {
            store.close().await;
            return Err(anyhow::Error::new(e).context("Failed to initialize destination store"));
        }

        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                store.close().await;
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to bind HTTP listener to {}", addr)));
            }
        };

        let router = build_router(store);

        info!(addr = %addr, "Record read service is running");

        axum::serve(listener, router)
            .await
            .context("HTTP service terminated unexpectedly")?;

        Ok(String::new())
    }
}

impl Default for ServeCommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// レコード一覧ルーターを構築
///
/// GET /users のみを公開します。他のメソッドは405を返します。
pub fn build_router(store: SqlRecordStore) -> Router {
    Router::new()
        .route("/users", get(list_records))
        .with_state(store)
}

/// GET /users ハンドラー
///
/// ストアの全レコードをJSON配列として返します。
/// ストアの読み取りに失敗した場合は500を返します。
async fn list_records(
    State(store): State<SqlRecordStore>,
) -> Result<Json<Vec<Record>>, (StatusCode, String)> {
    match store.fetch_all().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
