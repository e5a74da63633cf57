// Ferryライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメインロジック（設定、レコードモデル、エラー型）
// - adapters: レコードストア（リレーショナルバックエンド）へのアクセスを抽象化
// - services: 照合エンジンとシード処理

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
