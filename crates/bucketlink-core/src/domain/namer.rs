//! Revision naming for keep-both renames
//!
//! When safe mode preserves a superseded file, it needs a new key that
//! collides with nothing on either side. Names are generated by appending
//! a counter suffix to the file stem: `a.txt` → `a_1.txt`, `a_2.txt`, …
//! The suffix applies to the basename only, so `sub/a.txt` → `sub/a_1.txt`.

use uuid::Uuid;

use super::newtypes::RelativeKey;

/// Generates collision-free revision names.
pub struct RevisionNamer;

impl RevisionNamer {
    /// Produce the next revision key for `key` that `exists` rejects.
    ///
    /// `exists` must answer for every name already taken: both snapshots
    /// plus any targets already chosen for the current plan.
    pub fn next_available<F>(key: &RelativeKey, mut exists: F) -> RelativeKey
    where
        F: FnMut(&RelativeKey) -> bool,
    {
        let name = key.file_name();
        let (stem, ext) = split_extension(name);

        for counter in 1..=9999u32 {
            let candidate = rename_within(key, &format!("{stem}_{counter}{ext}"));
            if !exists(&candidate) {
                return candidate;
            }
        }

        // A tree with ten thousand revisions of one file; fall back to a
        // random suffix rather than loop forever.
        let suffix = Uuid::new_v4().simple().to_string();
        rename_within(key, &format!("{stem}_{suffix}{ext}"))
    }
}

/// Split `name` into (stem, extension-with-dot). Dotfiles keep their
/// leading dot in the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(pos) => (&name[..pos], &name[pos..]),
    }
}

fn rename_within(key: &RelativeKey, name: &str) -> RelativeKey {
    let full = match key.parent() {
        Some(dir) => format!("{dir}/{name}"),
        None => name.to_string(),
    };
    RelativeKey::from_validated(full)
}
