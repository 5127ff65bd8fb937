//! Domain Service
//!
//! 単一の Entity に属さないドメインロジックを定義します。

pub mod tab_deduplicator;

pub use tab_deduplicator::TabDeduplicator;
