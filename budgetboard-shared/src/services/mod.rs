/// Validated CRUD services
///
/// Each service wraps the shared store handle and implements one entity's
/// operations in the same shape:
///
/// 1. validate every simple field, collecting all messages
/// 2. resolve foreign references, stopping at the first unresolvable one
/// 3. check board access for the caller
/// 4. check uniqueness
/// 5. write, then re-read through `find`
///
/// Category and record services are instantiated per [`Family`].

pub mod boards;
pub mod categories;
pub mod groups;
pub mod records;
pub mod reference;
pub mod users;

use std::sync::Arc;

use crate::db::store::Store;
use crate::models::Family;

pub use boards::BoardService;
pub use categories::CategoryService;
pub use groups::GroupService;
pub use records::RecordService;
pub use reference::ReferenceService;
pub use users::UserService;

/// All services over one store
#[derive(Clone)]
pub struct Services {
    store: Arc<dyn Store>,
    pub users: UserService,
    pub boards: BoardService,
    pub groups: GroupService,
    pub reference: ReferenceService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            users: UserService::new(store.clone()),
            boards: BoardService::new(store.clone()),
            groups: GroupService::new(store.clone()),
            reference: ReferenceService::new(store.clone()),
            store,
        }
    }

    pub fn categories(&self, family: Family) -> CategoryService {
        CategoryService::new(self.store.clone(), family)
    }

    pub fn records(&self, family: Family) -> RecordService {
        RecordService::new(self.store.clone(), family)
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }
}
