use std::fs::Metadata;

/// Best-effort file owner lookup. Implementations never fail; an unknown owner
/// is an empty string.
pub trait OwnerResolver: Send + Sync {
    fn owner(&self, metadata: &Metadata) -> String;
}

/// Always answers with an empty owner.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOwner;

impl OwnerResolver for NoOwner {
    fn owner(&self, _metadata: &Metadata) -> String {
        String::new()
    }
}

#[cfg(unix)]
pub use unix::PasswdOwnerResolver;

#[cfg(unix)]
mod unix {
    use std::fs::Metadata;
    use std::num::NonZeroUsize;
    use std::os::unix::fs::MetadataExt;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use lru::LruCache;

    use super::OwnerResolver;

    const CACHE_CAPACITY: usize = 256;

    /// Resolves uids through the passwd database, falling back to the numeric uid.
    ///
    /// Lookups are memoized per instance; every analysis builds its own resolver,
    /// so nothing is shared between concurrent scans.
    pub struct PasswdOwnerResolver {
        passwd: PathBuf,
        cache: Mutex<LruCache<u32, String>>,
    }

    impl PasswdOwnerResolver {
        pub fn new() -> Self {
            Self::with_passwd_file("/etc/passwd")
        }

        pub fn with_passwd_file(path: impl Into<PathBuf>) -> Self {
            let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
            Self { passwd: path.into(), cache: Mutex::new(LruCache::new(capacity)) }
        }

        pub fn name_for_uid(&self, uid: u32) -> String {
            if let Ok(mut cache) = self.cache.lock() {
                if let Some(name) = cache.get(&uid) {
                    return name.clone();
                }
            }

            let name = self.lookup(uid).unwrap_or_else(|| uid.to_string());

            if let Ok(mut cache) = self.cache.lock() {
                cache.put(uid, name.clone());
            }
            name
        }

        fn lookup(&self, uid: u32) -> Option<String> {
            let contents = std::fs::read_to_string(&self.passwd).ok()?;
            contents.lines().find_map(|line| {
                // name:password:uid:gid:gecos:home:shell
                let mut fields = line.split(':');
                let name = fields.next()?;
                let entry_uid = fields.nth(1)?.parse::<u32>().ok()?;
                (entry_uid == uid && !name.is_empty()).then(|| name.to_string())
            })
        }
    }

    impl Default for PasswdOwnerResolver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl OwnerResolver for PasswdOwnerResolver {
        fn owner(&self, metadata: &Metadata) -> String {
            self.name_for_uid(metadata.uid())
        }
    }
}

/// Owner resolver appropriate for the current platform. Windows would need ACL
/// interrogation, which is too expensive per file, so it stays empty there.
pub fn platform_owner_resolver() -> Box<dyn OwnerResolver> {
    #[cfg(unix)]
    {
        Box::new(PasswdOwnerResolver::new())
    }
    #[cfg(not(unix))]
    {
        Box::new(NoOwner)
    }
}
