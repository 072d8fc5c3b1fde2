//! Functions bound to a cache identity

use crate::cache::DayCache;
use crate::key::Args;

/// A function whose results are cached until midnight under one identity
///
/// Created by [`DayCache::memoize`].
///
/// # Example
///
/// ```
/// use daycache::{Args, DayCache};
///
/// let cache: DayCache<String> = DayCache::new();
/// let greeting = cache.memoize("greeting", |args: &Args| {
///     Ok::<_, std::io::Error>(format!("hello {}", args.signature()))
/// });
///
/// let first = greeting.call(&Args::new().arg("ada")).unwrap();
/// let second = greeting.call(&Args::new().arg("grace")).unwrap();
/// assert_eq!(first, second);
/// ```
pub struct Memoized<'a, V, F> {
    cache: &'a DayCache<V>,
    identity: String,
    func: F,
}

impl<'a, V, F> Memoized<'a, V, F> {
    pub(crate) fn new(cache: &'a DayCache<V>, identity: String, func: F) -> Self {
        Self {
            cache,
            identity,
            func,
        }
    }

    /// Identity results are cached under
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl<V, F> Memoized<'_, V, F>
where
    V: Clone,
{
    /// Call through the cache
    pub fn call<E>(&self, args: &Args) -> Result<V, E>
    where
        F: Fn(&Args) -> Result<V, E>,
    {
        self.cache.get_or_compute(&self.identity, args, || (self.func)(args))
    }
}
