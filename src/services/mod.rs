// サービスモジュール
//
// 照合エンジンと初期データシードを提供します。

pub mod reconciliation;
pub mod seed;
