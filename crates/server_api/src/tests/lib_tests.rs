use super::*;
use shared::domain::User;

fn setup() -> ApiContext {
    ApiContext::new(UserStore::seeded())
}

fn form(name: &str, email: &str) -> UserForm {
    UserForm {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
    }
}

fn rendered(outcome: Outcome) -> (View, Option<ApiError>) {
    match outcome {
        Outcome::Render { view, failure } => (view, failure),
        other => panic!("expected render, got {other:?}"),
    }
}

fn edit_view(outcome: Outcome) -> (EditView, Option<ApiError>) {
    let (view, failure) = rendered(outcome);
    let View::Edit(edit) = view else {
        panic!("expected edit view");
    };
    (edit, failure)
}

fn assert_redirect(outcome: &Outcome, code: Option<ErrorCode>) {
    let Outcome::Redirect { location, .. } = outcome else {
        panic!("expected redirect, got {outcome:?}");
    };
    assert_eq!(*location, "/users");
    assert_eq!(outcome.error_code(), code);
}

async fn users(ctx: &ApiContext) -> Vec<User> {
    ctx.storage.list_users().await
}

#[test]
fn parses_only_positive_decimal_ids() {
    assert_eq!(parse_user_id("1"), Some(UserId(1)));
    assert_eq!(parse_user_id(" 42 "), Some(UserId(42)));
    assert_eq!(parse_user_id("0"), None);
    assert_eq!(parse_user_id("-3"), None);
    assert_eq!(parse_user_id("+3"), None);
    assert_eq!(parse_user_id("12abc"), None);
    assert_eq!(parse_user_id("abc"), None);
    assert_eq!(parse_user_id(""), None);
    assert_eq!(parse_user_id("99999999999999999999"), None);
}

#[tokio::test]
async fn list_users_renders_every_user_in_order() {
    let ctx = setup();
    let (view, failure) = rendered(list_users(&ctx).await);
    assert!(failure.is_none());
    assert_eq!(view.name(), "users/list");
    assert_eq!(view.path(), "/users");
    let View::List(list) = view else {
        panic!("expected list view");
    };
    assert_eq!(list.users.len(), 3);
    assert_eq!(list.users[0].name, "John Doe");
    assert_eq!(list.users[0].email, "john@example.com");
}

#[tokio::test]
async fn edit_user_without_id_renders_blank_draft() {
    let ctx = setup();
    let (edit, failure) = edit_view(edit_user(&ctx, None).await);
    assert!(failure.is_none());
    assert_eq!(edit.user, UserDraft::empty());
    assert_eq!(edit.path, "/users/edit");
    assert!(edit.error.is_none());
}

#[tokio::test]
async fn edit_user_with_existing_id_renders_that_user() {
    let ctx = setup();
    let (edit, _) = edit_view(edit_user(&ctx, Some("1")).await);
    assert_eq!(edit.user.id, Some(UserId(1)));
    assert_eq!(edit.user.name, "John Doe");
    assert_eq!(edit.user.email, "john@example.com");
}

#[tokio::test]
async fn edit_user_with_unknown_or_malformed_id_renders_blank_draft() {
    let ctx = setup();
    for raw in ["999", "abc"] {
        let (edit, failure) = edit_view(edit_user(&ctx, Some(raw)).await);
        assert!(failure.is_none(), "{raw}");
        assert_eq!(edit.user, UserDraft::empty(), "{raw}");
    }
}

#[tokio::test]
async fn show_user_details_renders_existing_user() {
    let ctx = setup();
    let (view, failure) = rendered(show_user_details(&ctx, "1").await);
    assert!(failure.is_none());
    assert_eq!(view.name(), "users/details");
    assert_eq!(view.path(), "/users/details/1");
    let View::Details(details) = view else {
        panic!("expected details view");
    };
    assert_eq!(details.user.name, "John Doe");
    assert_eq!(details.user.team.len(), 2);
}

#[tokio::test]
async fn show_user_details_redirects_on_unknown_or_malformed_id() {
    let ctx = setup();
    assert_redirect(
        &show_user_details(&ctx, "999").await,
        Some(ErrorCode::NotFound),
    );
    assert_redirect(
        &show_user_details(&ctx, "abc").await,
        Some(ErrorCode::Validation),
    );
}

#[tokio::test]
async fn save_user_without_id_creates_user_with_fresh_id() {
    let ctx = setup();
    let before = users(&ctx).await;

    let outcome = save_user(&ctx, None, form("Test User", "test@example.com")).await;
    assert_redirect(&outcome, None);

    let after = users(&ctx).await;
    assert_eq!(after.len(), before.len() + 1);
    let created = after.last().expect("created");
    assert!(before.iter().all(|user| user.id < created.id));
    assert_eq!(created.name, "Test User");
    assert_eq!(created.email, "test@example.com");
}

#[tokio::test]
async fn save_user_with_existing_id_updates_in_place() {
    let ctx = setup();
    let outcome = save_user(&ctx, Some("2"), form("Updated Jane", "updated@example.com")).await;
    assert_redirect(&outcome, None);

    let after = users(&ctx).await;
    assert_eq!(after.len(), 3);
    assert_eq!(after[1].id, UserId(2));
    assert_eq!(after[1].name, "Updated Jane");
    assert_eq!(after[1].email, "updated@example.com");
}

#[tokio::test]
async fn save_user_rejects_invalid_input_and_keeps_attempted_values() {
    let ctx = setup();
    let outcome = save_user(&ctx, Some("1"), form("John", "bad-email")).await;
    assert_eq!(outcome.error_code(), Some(ErrorCode::Validation));

    let (edit, _) = edit_view(outcome);
    assert_eq!(edit.error.as_deref(), Some("Invalid email format"));
    assert_eq!(edit.user.id, Some(UserId(1)));
    assert_eq!(edit.user.name, "John");
    assert_eq!(edit.user.email, "bad-email");

    let unchanged = ctx.storage.find_user(UserId(1)).await.expect("user");
    assert_eq!(unchanged.email, "john@example.com");
}

#[tokio::test]
async fn save_user_reports_first_failing_rule_only() {
    let ctx = setup();
    let (edit, _) = edit_view(save_user(&ctx, None, form("", "invalid-email")).await);
    assert_eq!(edit.error.as_deref(), Some("Name is required"));

    let (edit, _) = edit_view(save_user(&ctx, None, UserForm::default()).await);
    assert_eq!(edit.error.as_deref(), Some("Name is required"));
    assert_eq!(edit.user, UserDraft::empty());

    let (edit, _) = edit_view(save_user(&ctx, None, form("Alice", "")).await);
    assert_eq!(edit.error.as_deref(), Some("Email is required"));
    assert_eq!(users(&ctx).await.len(), 3);
}

#[tokio::test]
async fn save_user_for_vanished_id_is_an_internal_failure() {
    let ctx = setup();
    let outcome = save_user(&ctx, Some("999"), form("Ghost", "ghost@example.com")).await;
    assert_eq!(outcome.error_code(), Some(ErrorCode::Internal));

    let (edit, _) = edit_view(outcome);
    assert_eq!(edit.error.as_deref(), Some(SAVE_FAILED_MESSAGE));
    assert_eq!(edit.user.id, Some(UserId(999)));
    assert_eq!(edit.user.name, "Ghost");
    assert_eq!(users(&ctx).await.len(), 3);
}

#[tokio::test]
async fn save_user_with_malformed_id_creates_user() {
    let ctx = setup();
    assert_redirect(&save_user(&ctx, Some("abc"), form("New", "new@example.com")).await, None);
    let after = users(&ctx).await;
    assert_eq!(after.len(), 4);
    assert_eq!(after[3].id, UserId(4));
}

#[tokio::test]
async fn invalid_save_with_malformed_id_rerenders_as_new_draft() {
    let ctx = setup();
    let outcome = save_user(&ctx, Some("abc"), form("", "x")).await;
    assert_eq!(outcome.error_code(), Some(ErrorCode::Validation));

    let (edit, _) = edit_view(outcome);
    assert_eq!(edit.user.id, None);
    assert!(edit.user.is_new());
    assert_eq!(edit.user.email, "x");
    assert_eq!(edit.error.as_deref(), Some("Name is required"));
    assert_eq!(users(&ctx).await.len(), 3);
}

#[tokio::test]
async fn remove_user_deletes_existing_user() {
    let ctx = setup();
    assert_redirect(&remove_user(&ctx, "1").await, None);
    assert_eq!(users(&ctx).await.len(), 2);
    assert!(ctx.storage.find_user(UserId(1)).await.is_none());
}

#[tokio::test]
async fn remove_user_reports_unknown_and_malformed_ids() {
    let ctx = setup();
    assert_redirect(&remove_user(&ctx, "999").await, Some(ErrorCode::NotFound));
    assert_redirect(&remove_user(&ctx, "abc").await, Some(ErrorCode::Validation));
    assert_eq!(users(&ctx).await.len(), 3);
}

#[tokio::test]
async fn ids_of_removed_users_are_not_reused() {
    let ctx = setup();
    assert_redirect(&remove_user(&ctx, "2").await, None);
    assert_redirect(&save_user(&ctx, None, form("X", "x@x.com")).await, None);

    let ids: Vec<i64> = users(&ctx).await.iter().map(|user| user.id.0).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}
