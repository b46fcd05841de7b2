pub mod redis;
pub mod sqlite;

pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use sqlite::create_pool;
pub use sqlite::run_migrations;
