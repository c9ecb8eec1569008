use super::item_store::ItemRepo;
use super::mem_backend::MemBackend;

pub type InMemoryStore = ItemRepo<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        ItemRepo::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::catalog::SchemaCatalog;
    use crate::lookup::MappingInfo;
    use crate::model::Item;
    use crate::store::ItemStore;
    use crate::test_utils;
    use uuid::Uuid;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub catalog: SchemaCatalog,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                catalog: test_utils::sample_catalog(),
            }
        }

        pub fn with_samples(mut self, count: usize) -> Self {
            for i in 0..count {
                let item = test_utils::sample_item(&self.catalog, &format!("S-{:03}", i + 1));
                self.store.save_item(&item).unwrap();
            }
            self
        }

        pub fn with_sample(mut self, name: &str) -> Self {
            let item = test_utils::sample_item(&self.catalog, name);
            self.store.save_item(&item).unwrap();
            self
        }

        pub fn with_project(mut self, name: &str) -> Self {
            let item = test_utils::project_item(&self.catalog, name);
            self.store.save_item(&item).unwrap();
            self
        }

        pub fn with_mapping(mut self, uid: Uuid, expression: &str, mapper: &str) -> Self {
            let info = MappingInfo {
                expression: expression.to_string(),
                mapper_name: mapper.to_string(),
            };
            self.store.save_mapping(uid, info).unwrap();
            self
        }

        pub fn item_named(&self, name: &str) -> Item {
            self.store
                .list_items()
                .unwrap()
                .into_iter()
                .find(|item| item.name == name)
                .unwrap()
        }
    }
}
