use serde::{Deserialize, Serialize};

use crate::domain::{User, UserDraft, UserId};

pub const USERS_PATH: &str = "/users";
pub const EDIT_PATH: &str = "/users/edit";

pub fn details_path(user_id: UserId) -> String {
    format!("/users/details/{user_id}")
}

pub fn edit_path(user_id: UserId) -> String {
    format!("{EDIT_PATH}/{user_id}")
}

pub fn remove_path(user_id: UserId) -> String {
    format!("/users/remove/{user_id}")
}

/// Urlencoded body of the edit form. Either field may be missing entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListView {
    pub users: Vec<User>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditView {
    pub user: UserDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsView {
    pub user: User,
    pub path: String,
}

/// A named view plus the payload handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum View {
    List(ListView),
    Edit(EditView),
    Details(DetailsView),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "users/list",
            Self::Edit(_) => "users/edit",
            Self::Details(_) => "users/details",
        }
    }

    /// Request path used for active-nav highlighting.
    pub fn path(&self) -> &str {
        match self {
            Self::List(view) => &view.path,
            Self::Edit(view) => &view.path,
            Self::Details(view) => &view.path,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
