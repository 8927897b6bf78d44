/// Read-only reference data: category types, currencies, group subjects

use std::sync::Arc;

use crate::db::store::Store;
use crate::error::ServiceResult;
use crate::models::group::GroupSubject;
use crate::models::reference::{CategoryType, Currency};

#[derive(Clone)]
pub struct ReferenceService {
    store: Arc<dyn Store>,
}

impl ReferenceService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn category_types(&self) -> ServiceResult<Vec<CategoryType>> {
        Ok(self.store.list_category_types().await?)
    }

    pub async fn currencies(&self) -> ServiceResult<Vec<Currency>> {
        Ok(self.store.list_currencies().await?)
    }

    pub async fn group_subjects(&self) -> ServiceResult<Vec<GroupSubject>> {
        Ok(self.store.list_group_subjects().await?)
    }
}
