//! InMemory 実装
//!
//! 各ストアはマップ全体を `RwLock` で、クラス・学生ごとの状態をそれぞれの `Mutex` で保護します。
//! 同じクラス（または同じ学生）への操作は直列化され、異なるクラスへの操作は並行に進みます。

pub mod context;
pub mod presence;
pub mod question;
pub mod session;

pub use context::InMemoryContextRegistry;
pub use presence::InMemoryPresenceTracker;
pub use question::InMemoryQuestionQueue;
pub use session::InMemorySessionRegistry;
