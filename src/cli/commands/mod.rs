// CLIコマンドモジュール

pub mod migrate;
pub mod serve;
