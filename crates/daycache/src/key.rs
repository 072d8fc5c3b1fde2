//! Cache keys and argument signatures

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::clock::date_stamp;
use crate::error::Error;

/// How call arguments take part in the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Key on identity and date only. Every call to the same identity on
    /// the same day shares one result, whatever its arguments.
    #[default]
    IdentityOnly,

    /// Key on identity, call arguments and date
    WithArgs,
}

impl FromStr for KeyPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(KeyPolicy::IdentityOnly),
            "args" => Ok(KeyPolicy::WithArgs),
            _ => Err(Error::InvalidConfig {
                var: "key policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Arguments of a cached call
///
/// Values are rendered with `Debug`, so `"1"` and `1` differ. Positional
/// arguments keep call order; named arguments are ordered by name, so
/// `a=1, b=2` and `b=2, a=1` are equal.
///
/// Keys compare the recorded arguments themselves, never the rendered
/// [`signature`](Args::signature).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Args {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl Args {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    ///
    /// The value's `Debug` output must be the same for equal values. Types
    /// with unordered `Debug` such as `HashMap` or `HashSet` make equal
    /// arguments miss each other; pass a `BTreeMap`/`BTreeSet` or a sorted
    /// `Vec` instead.
    pub fn arg<T: fmt::Debug + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(format!("{:?}", value));
        self
    }

    /// Set a named argument, replacing any earlier value under `name`
    ///
    /// Same `Debug` requirement as [`arg`](Args::arg).
    pub fn named<T: fmt::Debug + ?Sized>(mut self, name: &str, value: &T) -> Self {
        self.named.insert(name.to_string(), format!("{:?}", value));
        self
    }

    /// True when there are no arguments at all
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Readable rendering for logs and key display, e.g. `(1, "x", limit=10)`
    pub fn signature(&self) -> String {
        let parts: Vec<String> = self
            .positional
            .iter()
            .cloned()
            .chain(self.named.iter().map(|(name, value)| format!("{}={}", name, value)))
            .collect();
        format!("({})", parts.join(", "))
    }
}

/// Key of one stored result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identity: String,
    args: Option<Args>,
    date: NaiveDate,
}

impl CacheKey {
    /// Build the key for a call made on `date`
    pub fn new(identity: &str, args: &Args, date: NaiveDate, policy: KeyPolicy) -> Self {
        let args = match policy {
            KeyPolicy::IdentityOnly => None,
            KeyPolicy::WithArgs => Some(args.clone()),
        };

        Self {
            identity: identity.to_string(),
            args,
            date,
        }
    }

    /// Identity of the computation
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Arguments, when the policy keys on arguments
    pub fn args(&self) -> Option<&Args> {
        self.args.as_ref()
    }

    /// Day the entry belongs to
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether the key is valid on `today`
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => {
                write!(f, "{}{}:{}", self.identity, args.signature(), date_stamp(self.date))
            }
            None => write!(f, "{}:{}", self.identity, date_stamp(self.date)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    #[test]
    fn test_key_display_identity_only() {
        let args = Args::new().arg(&42);
        let key = CacheKey::new("report", &args, day(21), KeyPolicy::IdentityOnly);

        assert_eq!(key.to_string(), "report:2025-08-21");
        assert_eq!(key.args(), None);
    }

    #[test]
    fn test_key_display_with_args() {
        let args = Args::new().arg(&42).arg("eu").named("limit", &10);
        let key = CacheKey::new("report", &args, day(21), KeyPolicy::WithArgs);

        assert_eq!(key.to_string(), "report(42, \"eu\", limit=10):2025-08-21");
    }

    #[test]
    fn test_identity_only_ignores_args() {
        let a = CacheKey::new("report", &Args::new().arg(&1), day(21), KeyPolicy::IdentityOnly);
        let b = CacheKey::new("report", &Args::new().arg(&2), day(21), KeyPolicy::IdentityOnly);
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_distinguishes_values() {
        // Strings are quoted, so "1" never collides with 1
        assert_ne!(Args::new().arg("1").signature(), Args::new().arg(&1).signature());

        // A comma inside a value is not a separator
        assert_ne!(
            Args::new().arg("a, b").signature(),
            Args::new().arg("a").arg("b").signature()
        );

        // Positional order matters
        assert_ne!(
            Args::new().arg(&1).arg(&2).signature(),
            Args::new().arg(&2).arg(&1).signature()
        );
    }

    #[test]
    fn test_with_args_keys_do_not_collide_on_rendering() {
        let keyed = |args: &Args| CacheKey::new("report", args, day(21), KeyPolicy::WithArgs);

        // Separators inside an argument name render like real separators
        let two_named = Args::new().named("a", &1).named("b", &2);
        let one_named = Args::new().named("a=1, b", &2);
        assert_eq!(two_named.signature(), one_named.signature());
        assert_ne!(two_named, one_named);
        assert_ne!(keyed(&two_named), keyed(&one_named));

        let mixed = Args::new().arg(&1).named("x", &2);
        let named_only = Args::new().named("1, x", &2);
        assert_ne!(keyed(&mixed), keyed(&named_only));

        let same = Args::new().named("b", &2).named("a", &1);
        assert_eq!(keyed(&two_named), keyed(&same));
    }

    #[test]
    fn test_ordered_collections_give_stable_args() {
        use std::collections::{BTreeMap, BTreeSet};

        let build = || {
            let filters: BTreeMap<String, u32> =
                (0..8).map(|i| (format!("filter-{}", i), i)).collect();
            let tags: BTreeSet<&str> = ["eu", "us", "apac"].into_iter().collect();
            Args::new().arg(&filters).named("tags", &tags)
        };

        let first = build();
        for _ in 0..50 {
            let again = build();
            assert_eq!(again, first);
            assert_eq!(again.signature(), first.signature());
        }
    }

    #[test]
    fn test_named_order_is_irrelevant() {
        let a = Args::new().named("a", &1).named("b", &2);
        let b = Args::new().named("b", &2).named("a", &1);

        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "(a=1, b=2)");
    }

    #[test]
    fn test_empty_args() {
        let args = Args::new();
        assert!(args.is_empty());
        assert_eq!(args.signature(), "()");
        assert!(!Args::new().named("x", &()).is_empty());
    }

    #[test]
    fn test_is_current() {
        let key = CacheKey::new("report", &Args::new(), day(21), KeyPolicy::IdentityOnly);
        assert!(key.is_current(day(21)));
        assert!(!key.is_current(day(22)));
        assert!(!key.is_current(day(20)));
    }

    #[test]
    fn test_key_policy_from_str() {
        assert_eq!("identity".parse::<KeyPolicy>().unwrap(), KeyPolicy::IdentityOnly);
        assert_eq!(" ARGS ".parse::<KeyPolicy>().unwrap(), KeyPolicy::WithArgs);
        assert!("both".parse::<KeyPolicy>().is_err());
    }
}
