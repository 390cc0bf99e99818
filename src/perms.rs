//! Per-domain home directories and path-containment checks.

use crate::identity::Identity;
use blogftp_core::auth::PermissionSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Decides which capabilities an identity is granted.
///
/// The shipped [`FullAccess`] policy gives everyone everything; substitute
/// your own implementation to tier capabilities per role without touching the
/// containment logic.
pub trait PermissionPolicy: Send + Sync + Debug {
    /// The capabilities granted to `identity`.
    fn permissions_for(&self, identity: &Identity) -> PermissionSet;
}

/// A [`PermissionPolicy`] that grants every identity the full capability set.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullAccess;

impl PermissionPolicy for FullAccess {
    fn permissions_for(&self, _identity: &Identity) -> PermissionSet {
        PermissionSet::full()
    }
}

/// Maps identities onto per-domain home directories under a common base and
/// answers containment questions about them.
#[derive(Clone, Debug)]
pub struct PermissionResolver {
    base_dir: PathBuf,
    policy: Arc<dyn PermissionPolicy>,
}

impl PermissionResolver {
    /// Creates a resolver rooting every domain under `base_dir`.
    pub fn new<P: Into<PathBuf>>(base_dir: P, policy: Arc<dyn PermissionPolicy>) -> Self {
        PermissionResolver {
            base_dir: base_dir.into(),
            policy,
        }
    }

    /// The home directory for `identity`: `<base-dir>/<domain>`.
    ///
    /// Purely a path computation; whether the directory exists is the host
    /// filesystem's concern.
    pub fn home_dir(&self, identity: &Identity) -> PathBuf {
        self.base_dir.join(&identity.domain)
    }

    /// The capabilities granted to `identity` by the configured policy.
    pub fn permissions_for(&self, identity: &Identity) -> PermissionSet {
        self.policy.permissions_for(identity)
    }

    /// Whether `path` lies inside the home directory of `identity`.
    ///
    /// The comparison is made per path segment, so a sibling directory whose
    /// name merely starts with the home directory's name does not match. The
    /// home directory itself is inside.
    pub fn allows(&self, identity: &Identity, path: &Path) -> bool {
        is_subpath(&normalize_case(path), &normalize_case(&self.home_dir(identity)))
    }
}

/// True if `path` equals `base` or lies underneath it, segment-wise.
fn is_subpath(path: &Path, base: &Path) -> bool {
    path.strip_prefix(base).is_ok()
}

/// Case-normalizes a path following host filesystem conventions: filenames
/// are case-insensitive on Windows and case-sensitive elsewhere.
#[cfg(windows)]
fn normalize_case(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase().replace('/', "\\"))
}

#[cfg(not(windows))]
fn normalize_case(path: &Path) -> PathBuf {
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver() -> PermissionResolver {
        PermissionResolver::new("/srv/blog/base", Arc::new(FullAccess))
    }

    fn acme() -> Identity {
        "acme.example.com\\alice".parse().unwrap()
    }

    #[test]
    fn home_dir_is_a_pure_function_of_the_domain() {
        let resolver = resolver();
        assert_eq!(resolver.home_dir(&acme()), PathBuf::from("/srv/blog/base/acme"));
        let bob: Identity = "acme\\bob".parse().unwrap();
        assert_eq!(resolver.home_dir(&bob), resolver.home_dir(&acme()));
    }

    #[test]
    fn home_dir_and_descendants_are_allowed() {
        let resolver = resolver();
        assert!(resolver.allows(&acme(), Path::new("/srv/blog/base/acme")));
        assert!(resolver.allows(&acme(), Path::new("/srv/blog/base/acme/")));
        assert!(resolver.allows(&acme(), Path::new("/srv/blog/base/acme/wp-content/uploads/cat.jpg")));
    }

    #[test]
    fn sibling_with_matching_name_prefix_is_denied() {
        assert!(!resolver().allows(&acme(), Path::new("/srv/blog/base/acme2")));
        assert!(!resolver().allows(&acme(), Path::new("/srv/blog/base/acme2/file.txt")));
    }

    #[test]
    fn parents_and_unrelated_paths_are_denied() {
        let resolver = resolver();
        assert!(!resolver.allows(&acme(), Path::new("/srv/blog/base")));
        assert!(!resolver.allows(&acme(), Path::new("/")));
        assert!(!resolver.allows(&acme(), Path::new("/etc/passwd")));
        assert!(!resolver.allows(&acme(), Path::new("/srv/blog/base/other/acme")));
    }

    #[test]
    fn full_access_policy_grants_everything() {
        assert_eq!(resolver().permissions_for(&acme()), PermissionSet::full());
    }

    #[test]
    fn custom_policy_is_consulted() {
        #[derive(Debug)]
        struct ReadOnly;

        impl PermissionPolicy for ReadOnly {
            fn permissions_for(&self, _identity: &Identity) -> PermissionSet {
                PermissionSet::READ
            }
        }

        let resolver = PermissionResolver::new("/srv/blog/base", Arc::new(ReadOnly));
        assert_eq!(resolver.permissions_for(&acme()), PermissionSet::READ);
    }
}
