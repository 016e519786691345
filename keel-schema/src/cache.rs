//! Per-type cache of compiled schemas.
//!
//! Each model type is compiled at most once per cache. Failures are cached as
//! well: a model that fails to compile keeps failing with the same error.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::compiler::ModelSchema;
use crate::error::SchemaResult;

type Entry = SchemaResult<Arc<ModelSchema>>;

static GLOBAL: LazyLock<SchemaCache> = LazyLock::new(SchemaCache::new);

/// A cache of compiled schemas keyed by model type.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl SchemaCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by models.
    pub fn global() -> &'static SchemaCache {
        &GLOBAL
    }

    /// Get the compiled schema for `T`, compiling it on first use.
    pub fn get_or_compile<T: 'static>(
        &self,
        compile: impl FnOnce() -> SchemaResult<ModelSchema>,
    ) -> SchemaResult<Arc<ModelSchema>> {
        let key = TypeId::of::<T>();

        if let Some(entry) = self.entries.read().get(&key) {
            return entry.clone();
        }

        // Compile under the write lock so concurrent first uses compile once.
        let mut entries = self.entries.write();
        entries
            .entry(key)
            .or_insert_with(|| compile().map(Arc::new))
            .clone()
    }

    /// Check if `T` has been compiled.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// Number of cached model types.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::field::FieldDescriptor;

    struct Post;
    struct Broken;

    fn post() -> SchemaResult<ModelSchema> {
        ModelSchema::builder("Post")
            .field("id", FieldDescriptor::integer().primary_key())
            .field("title", FieldDescriptor::string())
            .compile()
    }

    #[test]
    fn test_compiles_once() {
        let cache = SchemaCache::new();
        let mut calls = 0;

        let first = cache
            .get_or_compile::<Post>(|| {
                calls += 1;
                post()
            })
            .unwrap();
        let second = cache
            .get_or_compile::<Post>(|| {
                calls += 1;
                post()
            })
            .unwrap();

        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains::<Post>());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failure_is_cached() {
        let cache = SchemaCache::new();
        let compile = || ModelSchema::builder("Broken").field("x", FieldDescriptor::string()).compile();

        let err = cache.get_or_compile::<Broken>(compile).unwrap_err();
        assert_eq!(err, SchemaError::missing_primary_key("Broken"));

        let again = cache.get_or_compile::<Broken>(post).unwrap_err();
        assert_eq!(again, err);
    }
}
