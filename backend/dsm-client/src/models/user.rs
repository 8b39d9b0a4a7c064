use crate::error::DsmError;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An OpenDSM account.
///
/// `createdProducts` and `ownedProducts` fall back to empty lists when they
/// are missing or unusable; every other field, including the nested `git`
/// block, is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserWire", into = "UserWire")]
pub struct User {
    id: u64,
    username: String,
    email: String,
    about: String,
    created_product_ids: Vec<u64>,
    owned_product_ids: Vec<u64>,
    is_developer_account: bool,
    has_git_readme: bool,
    use_git_readme: bool,
}

impl User {
    pub fn from_json(json: &str) -> Result<Self, DsmError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DsmError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn created_product_ids(&self) -> &[u64] {
        &self.created_product_ids
    }

    pub fn owned_product_ids(&self) -> &[u64] {
        &self.owned_product_ids
    }

    pub fn is_developer_account(&self) -> bool {
        self.is_developer_account
    }

    pub fn has_git_readme(&self) -> bool {
        self.has_git_readme
    }

    pub fn use_git_readme(&self) -> bool {
        self.use_git_readme
    }
}

/// Outcome of `POST /user/validate`. A rejected login is a normal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialValidation {
    pub success: bool,
    pub user: Option<User>,
    pub message: String,
}

// ============================================
// WIRE FORMAT
// ============================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    #[serde(deserialize_with = "crate::models::flexible_id")]
    id: u64,
    username: String,
    email: String,
    about: String,
    #[serde(default, deserialize_with = "lenient_ids")]
    created_products: Vec<u64>,
    #[serde(default, deserialize_with = "lenient_ids")]
    owned_products: Vec<u64>,
    git: GitWire,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitWire {
    is_developer_account: bool,
    has_git_readme: bool,
    use_readme: bool,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.id,
            username: wire.username,
            email: wire.email,
            about: wire.about,
            created_product_ids: wire.created_products,
            owned_product_ids: wire.owned_products,
            is_developer_account: wire.git.is_developer_account,
            has_git_readme: wire.git.has_git_readme,
            use_git_readme: wire.git.use_readme,
        }
    }
}

impl From<User> for UserWire {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            about: user.about,
            created_products: user.created_product_ids,
            owned_products: user.owned_product_ids,
            git: GitWire {
                is_developer_account: user.is_developer_account,
                has_git_readme: user.has_git_readme,
                use_readme: user.use_git_readme,
            },
        }
    }
}

/// Any value that is not an array of ids becomes an empty list.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Vec::<u64>::deserialize(value).unwrap_or_else(|e| {
        warn!("Ignoring unusable product id list: {e}");
        Vec::new()
    }))
}
