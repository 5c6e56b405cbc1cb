use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bit_types::ObjectId;
use tracing::{debug, warn};

use crate::config::FsStoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// Loose-object store on the local filesystem.
///
/// On-disk layout mirrors git's loose objects:
/// ```text
/// <root>/<first 2 hex chars>/<remaining 62 hex chars>
/// ```
/// Each file holds the kind tag, a NUL byte, and the object's data. Files are
/// written to a temporary name in the fan-out directory and renamed into
/// place, so readers never observe a partial object and two writers racing on
/// the same object both succeed.
#[derive(Debug)]
pub struct FsObjectStore {
    config: FsStoreConfig,
}

impl FsObjectStore {
    /// Open (or create) a store at `config.root`.
    pub fn open(config: FsStoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.root)?;
        debug!(root = %config.root.display(), "opened object store");
        Ok(Self { config })
    }

    /// Path of the file holding `id`.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.config.root.join(&hex[..2]).join(&hex[2..])
    }

    fn decode(id: &ObjectId, raw: &[u8]) -> StoreResult<StoredObject> {
        let corrupt = |reason: String| StoreError::CorruptObject { id: *id, reason };

        let nul = raw
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| corrupt("missing kind header".into()))?;
        let tag = std::str::from_utf8(&raw[..nul]).map_err(|e| corrupt(e.to_string()))?;
        let kind: ObjectKind = tag.parse().map_err(corrupt)?;
        Ok(StoredObject::new(kind, raw[nul + 1..].to_vec()))
    }

    /// Whether the file at `path` already holds a valid copy of `id`.
    fn holds(path: &Path, id: &ObjectId) -> StoreResult<bool> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        let intact = Self::decode(id, &raw).and_then(|object| object.check_key(id));
        if let Err(e) = intact {
            warn!(id = %id, error = %e, "replacing damaged loose object");
            return Ok(false);
        }
        Ok(true)
    }
}

impl ObjectStore for FsObjectStore {
    fn write(&self, id: &ObjectId, object: &StoredObject) -> StoreResult<()> {
        object.check_key(id)?;
        let path = self.object_path(id);
        if Self::holds(&path, id)? {
            debug!(id = %id.short_hex(), "object already stored");
            return Ok(());
        }

        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Io(io::Error::other("object path has no parent")))?;
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(object.kind.as_str().as_bytes())?;
        tmp.write_all(&[0])?;
        tmp.write_all(&object.data)?;
        if self.config.fsync {
            tmp.as_file().sync_all()?;
        }
        // rename replaces a damaged file left at `path`
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "wrote loose object");
        Ok(())
    }

    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let raw = match fs::read(self.object_path(id)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object = Self::decode(id, &raw)?;
        if self.config.verify_on_read {
            if let Err(e) = object.check_key(id) {
                warn!(id = %id, error = %e, "object failed hash verification");
                return Err(e);
            }
        }
        Ok(Some(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> FsObjectStore {
        FsObjectStore::open(FsStoreConfig::at(dir.path().join("objects"))).unwrap()
    }

    fn put(store: &FsObjectStore, kind: ObjectKind, data: &[u8]) -> (ObjectId, StoredObject) {
        let object = StoredObject::new(kind, data.to_vec());
        let id = object.compute_id();
        store.write(&id, &object).unwrap();
        (id, object)
    }

    /// Loose object files under the store root, temp files excluded.
    fn object_files(dir: &tempfile::TempDir) -> usize {
        let root = dir.path().join("objects");
        fs::read_dir(root)
            .unwrap()
            .map(|fanout| fanout.unwrap().path())
            .filter(|path| path.is_dir())
            .flat_map(|path| fs::read_dir(path).unwrap())
            .filter(|entry| {
                let name = entry.as_ref().unwrap().file_name();
                name.to_string_lossy().len() == 62
            })
            .count()
    }

    #[test]
    fn write_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, object) = put(&store, ObjectKind::Version, b"{\"impl\":{}}");
        assert_eq!(store.read(&id).unwrap(), Some(object));
    }

    #[test]
    fn uses_fanout_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, _) = put(&store, ObjectKind::Source, b"layout");
        let hex = id.to_hex();
        let expected = dir.path().join("objects").join(&hex[..2]).join(&hex[2..]);
        assert_eq!(store.object_path(&id), expected);

        let raw = fs::read(expected).unwrap();
        assert_eq!(raw, b"source\0layout");
    }

    #[test]
    fn write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        put(&store, ObjectKind::Source, b"same");
        put(&store, ObjectKind::Source, b"same");
        assert_eq!(object_files(&dir), 1);
    }

    #[test]
    fn wrong_key_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let object = StoredObject::new(ObjectKind::Source, b"content-a".to_vec());
        let other = ObjectId::from_bytes(b"content-b");
        assert!(matches!(
            store.write(&other, &object),
            Err(StoreError::HashMismatch { .. })
        ));
        assert!(!store.object_path(&other).exists());
    }

    #[test]
    fn read_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        assert!(store.read(&ObjectId::from_bytes(b"missing")).unwrap().is_none());
    }

    #[test]
    fn tampered_object_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, _) = put(&store, ObjectKind::Source, b"original");
        fs::write(store.object_path(&id), b"source\0tampered").unwrap();

        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { key, .. } if key == id));
    }

    #[test]
    fn verification_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = FsStoreConfig {
            verify_on_read: false,
            ..FsStoreConfig::at(dir.path().join("objects"))
        };
        let store = FsObjectStore::open(config).unwrap();
        let (id, _) = put(&store, ObjectKind::Source, b"original");
        fs::write(store.object_path(&id), b"source\0tampered").unwrap();

        let read = store.read(&id).unwrap().unwrap();
        assert_eq!(read.data, b"tampered");
    }

    #[test]
    fn unknown_kind_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, _) = put(&store, ObjectKind::Source, b"x");
        fs::write(store.object_path(&id), b"tree\0x").unwrap();

        let err = store.read(&id).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn missing_header_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, _) = put(&store, ObjectKind::Source, b"x");
        fs::write(store.object_path(&id), b"no header here").unwrap();

        assert!(matches!(
            store.read(&id),
            Err(StoreError::CorruptObject { .. })
        ));
    }

    #[test]
    fn rewrite_repairs_truncated_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let (id, object) = put(&store, ObjectKind::Source, b"complete content");
        fs::write(store.object_path(&id), b"source\0compl").unwrap();
        assert!(store.read(&id).is_err());

        store.write(&id, &object).unwrap();
        assert_eq!(store.read(&id).unwrap(), Some(object));
        assert_eq!(object_files(&dir), 1);
    }

    #[test]
    fn reopen_sees_existing_objects() {
        let dir = tempfile::tempdir().unwrap();
        let (id, _) = put(&open_store(&dir), ObjectKind::Source, b"persist");
        let reopened = open_store(&dir);
        assert_eq!(
            reopened.read(&id).unwrap().map(|o| o.data),
            Some(b"persist".to_vec())
        );
    }

    #[test]
    fn concurrent_writers_agree() {
        use std::sync::Arc;
        use std::thread;

        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(open_store(&dir));
        let object = StoredObject::new(ObjectKind::Source, b"raced".to_vec());
        let id = object.compute_id();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let object = object.clone();
                thread::spawn(move || store.write(&id, &object).unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(object_files(&dir), 1);
        assert_eq!(store.read(&id).unwrap(), Some(object));
    }
}
