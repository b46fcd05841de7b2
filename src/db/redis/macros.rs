/// A macro to simplify read-through caching against Redis.
///
/// Checks the cache for the given key and returns the cached value on a hit.
/// On a miss it runs the provided future, stores the result in the cache via
/// the non-blocking background writer, and returns it.
///
/// # Arguments
/// * `$cache`: The cache instance; must expose `get_from_cache` and
///   `set_in_background`.
/// * `$key`: The key under which the value is cached.
/// * `$ttl`: The time-to-live for the cached value in seconds.
/// * `$block`: The future to await when the value is not cached.
///
/// # Example
/// ```rust,ignore
/// let score = cached!(cache, key, PREDICTION_CACHE_TTL, async move {
///     fetch_prediction(user_id, movie_id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
