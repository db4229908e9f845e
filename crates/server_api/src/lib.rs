use shared::{
    domain::{UserDraft, UserId},
    error::{ApiError, ErrorCode},
    protocol::{details_path, DetailsView, EditView, ListView, UserForm, View, EDIT_PATH, USERS_PATH},
    validation::validate_user,
};
use storage::{StorageError, UserStore};
use tracing::{info, warn};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save user";

#[derive(Clone)]
pub struct ApiContext {
    pub storage: UserStore,
}

impl ApiContext {
    pub fn new(storage: UserStore) -> Self {
        Self { storage }
    }
}

/// What the HTTP layer should do with a request.
///
/// `failure` is set whenever the request did not succeed; its code decides the
/// response status even when the response is still a page or a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render {
        view: View,
        failure: Option<ApiError>,
    },
    Redirect {
        location: &'static str,
        failure: Option<ApiError>,
    },
}

impl Outcome {
    fn render(view: View) -> Self {
        Self::Render {
            view,
            failure: None,
        }
    }

    fn to_list() -> Self {
        Self::Redirect {
            location: USERS_PATH,
            failure: None,
        }
    }

    fn to_list_after(failure: ApiError) -> Self {
        Self::Redirect {
            location: USERS_PATH,
            failure: Some(failure),
        }
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match self {
            Self::Render { failure, .. } | Self::Redirect { failure, .. } => failure.as_ref(),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.failure().map(|failure| failure.code)
    }
}

/// Parses a path id. Only plain positive decimal integers are accepted.
pub fn parse_user_id(raw: &str) -> Option<UserId> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|id| *id > 0).map(UserId)
}

pub async fn list_users(ctx: &ApiContext) -> Outcome {
    Outcome::render(View::List(ListView {
        users: ctx.storage.list_users().await,
        path: USERS_PATH.to_string(),
    }))
}

/// Renders the edit form. A missing, malformed or unknown id yields a blank
/// draft rather than an error.
pub async fn edit_user(ctx: &ApiContext, raw_id: Option<&str>) -> Outcome {
    let user = match raw_id.and_then(parse_user_id) {
        Some(user_id) => ctx
            .storage
            .find_user(user_id)
            .await
            .map(UserDraft::from)
            .unwrap_or_default(),
        None => UserDraft::empty(),
    };
    Outcome::render(View::Edit(EditView {
        user,
        error: None,
        path: EDIT_PATH.to_string(),
    }))
}

pub async fn show_user_details(ctx: &ApiContext, raw_id: &str) -> Outcome {
    let Some(user_id) = parse_user_id(raw_id) else {
        warn!(raw_id, "details requested with malformed user id");
        return Outcome::to_list_after(ApiError::validation("invalid user id"));
    };
    let Some(user) = ctx.storage.find_user(user_id).await else {
        warn!(%user_id, "details requested for unknown user");
        return Outcome::to_list_after(ApiError::not_found("user not found"));
    };
    Outcome::render(View::Details(DetailsView {
        path: details_path(user_id),
        user,
    }))
}

/// Creates a user when no id is given, otherwise updates the named one.
/// A malformed id counts as no id.
pub async fn save_user(ctx: &ApiContext, raw_id: Option<&str>, form: UserForm) -> Outcome {
    let user_id = raw_id.and_then(parse_user_id);
    let UserForm { name, email } = form;

    if let Err(err) = validate_user(name.as_deref(), email.as_deref()) {
        let message = err.to_string();
        return edit_form_with_error(user_id, name, email, ApiError::validation(message));
    }
    let name = name.unwrap_or_default();
    let email = email.unwrap_or_default();

    let saved = match user_id {
        Some(user_id) => ctx.storage.replace_user(user_id, &name, &email).await,
        None => ctx.storage.insert_user(&name, &email).await,
    };

    match saved {
        Ok(user) => {
            if user_id.is_some() {
                info!(user_id = %user.id, "user updated");
            } else {
                info!(user_id = %user.id, "user created");
            }
            Outcome::to_list()
        }
        Err(err) => {
            warn!(error = %err, "saving user failed");
            edit_form_with_error(
                user_id,
                Some(name),
                Some(email),
                ApiError::internal(storage_message(&err)),
            )
        }
    }
}

pub async fn remove_user(ctx: &ApiContext, raw_id: &str) -> Outcome {
    let Some(user_id) = parse_user_id(raw_id) else {
        warn!(raw_id, "remove requested with malformed user id");
        return Outcome::to_list_after(ApiError::validation("invalid user id"));
    };
    if !ctx.storage.remove_user(user_id).await {
        warn!(%user_id, "remove requested for unknown user");
        return Outcome::to_list_after(ApiError::not_found("user not found"));
    }
    info!(%user_id, "user removed");
    Outcome::to_list()
}

fn edit_form_with_error(
    user_id: Option<UserId>,
    name: Option<String>,
    email: Option<String>,
    failure: ApiError,
) -> Outcome {
    let error = match failure.code {
        ErrorCode::Internal => SAVE_FAILED_MESSAGE.to_string(),
        _ => failure.message.clone(),
    };
    Outcome::Render {
        view: View::Edit(EditView {
            user: UserDraft {
                id: user_id,
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
            },
            error: Some(error),
            path: EDIT_PATH.to_string(),
        }),
        failure: Some(failure),
    }
}

fn storage_message(err: &StorageError) -> String {
    match err {
        StorageError::NotFound(user_id) => format!("user {user_id} vanished before save"),
        StorageError::IdSpaceExhausted => err.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/property_tests.rs"]
mod property_tests;
