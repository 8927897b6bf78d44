//! Shared fixtures for service tests
//!
//! Two users, each administering one board:
//!
//! | user          | board             |
//! |---------------|-------------------|
//! | john_doe      | clever-budgetiers |
//! | jessica_stark | mega-economists   |
//!
//! Users are inserted directly with a placeholder hash so fixtures stay fast;
//! tests that exercise passwords go through `UserService`.

#![allow(dead_code)]

use std::sync::Arc;

use budgetboard_shared::auth::middleware::AuthorizedUser;
use budgetboard_shared::db::memory::MemoryStore;
use budgetboard_shared::db::store::Store;
use budgetboard_shared::error::ServiceError;
use budgetboard_shared::models::category::{Category, CreateCategory};
use budgetboard_shared::models::user::NewUser;
use budgetboard_shared::models::Family;
use budgetboard_shared::services::Services;

pub const EXPENSE_TYPE_ID: i64 = 1;
pub const INCOME_TYPE_ID: i64 = 2;

pub struct Fixture {
    pub store: Arc<dyn Store>,
    pub services: Services,
    pub john_id: i64,
    pub jessica_id: i64,
    pub clever_budgetiers_id: i64,
    pub mega_economists_id: i64,
}

impl Fixture {
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let john_id = insert_user(&store, "john_doe").await;
        let jessica_id = insert_user(&store, "jessica_stark").await;
        let clever_budgetiers_id = store
            .insert_board("clever-budgetiers", john_id)
            .await
            .expect("insert board");
        let mega_economists_id = store
            .insert_board("mega-economists", jessica_id)
            .await
            .expect("insert board");

        Self {
            services: Services::new(store.clone()),
            store,
            john_id,
            jessica_id,
            clever_budgetiers_id,
            mega_economists_id,
        }
    }

    pub async fn user(&self, id: i64) -> AuthorizedUser {
        AuthorizedUser::load(self.store.as_ref(), id)
            .await
            .expect("load user")
            .expect("user exists")
    }

    pub async fn john(&self) -> AuthorizedUser {
        self.user(self.john_id).await
    }

    pub async fn jessica(&self) -> AuthorizedUser {
        self.user(self.jessica_id).await
    }

    /// Category in john's board
    pub async fn category(&self, family: Family, name: &str) -> Category {
        let john = self.john().await;
        let dto = CreateCategory {
            name: Some(name.to_string().into()),
            board_id: Some(self.clever_budgetiers_id.into()),
            type_id: family.uses_type().then_some(EXPENSE_TYPE_ID.into()),
            unit: family.uses_unit().then(|| "km".to_string().into()),
            group_id: None,
        };
        self.services
            .categories(family)
            .create(&john, dto)
            .await
            .expect("create category")
    }
}

pub async fn insert_user(store: &Arc<dyn Store>, username: &str) -> i64 {
    store
        .insert_user(&NewUser {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        })
        .await
        .expect("insert user")
        .id
}

/// Field map of a BadRequest, panicking on anything else
pub fn fields(err: ServiceError) -> Vec<(String, String)> {
    match err {
        ServiceError::BadRequest(fields) => fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

pub fn field_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    pairs.sort();
    pairs
}
