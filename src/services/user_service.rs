use crate::error::Result;
use crate::models::user::User;
use crate::storage::json_store::JsonStore;

#[derive(Clone)]
pub struct UserService {
    store: JsonStore<User>,
}

impl UserService {
    pub fn new(store: JsonStore<User>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.store.read_all().await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .store
            .read_all()
            .await?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }
}
