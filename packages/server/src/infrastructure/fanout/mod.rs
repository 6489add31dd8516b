//! FanoutTransport の実装
//!
//! - `broadcast`: 単一プロセス内の `tokio::sync::broadcast` チャンネル
//!
//! 複数プロセス構成では、同じ trait を外部の pub/sub（Redis など）で実装して差し替えます。

pub mod broadcast;

pub use broadcast::BroadcastFanout;
