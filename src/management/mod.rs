mod cache;
mod history;

pub use cache::FileTokenCache;
pub use cache::MemoryTokenCache;
pub use cache::TokenCache;
pub use history::ListeningHistory;
pub use history::PlayRow;
