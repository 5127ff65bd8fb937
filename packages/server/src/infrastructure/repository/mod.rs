//! Repository 実装
//!
//! ドメイン層が定義する trait の具体的な実装を提供します。
//!
//! - `inmemory`: プロセス内メモリを使った実装（再起動で消える）

pub mod inmemory;

pub use inmemory::{
    InMemoryContextRegistry, InMemoryPresenceTracker, InMemoryQuestionQueue,
    InMemorySessionRegistry,
};
