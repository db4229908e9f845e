use std::fmt::Write as _;

use shared::{
    domain::User,
    protocol::{
        details_path, edit_path, remove_path, DetailsView, EditView, ListView, View, EDIT_PATH,
        USERS_PATH,
    },
};

/// Turns a named view and its payload into an HTML document.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &View) -> anyhow::Result<String>;
}

/// Built-in renderer: a fixed layout with a nav bar around one page per view.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new("User Directory")
    }
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> anyhow::Result<String> {
        let mut content = String::new();
        match view {
            View::List(list) => render_list(&mut content, list)?,
            View::Edit(edit) => render_edit(&mut content, edit)?,
            View::Details(details) => render_details(&mut content, details)?,
        }
        let adding = matches!(view, View::Edit(edit) if edit.user.is_new());
        let mut page = String::with_capacity(content.len() + 512);
        write_layout(&mut page, &self.title, view.path(), adding, &content)?;
        Ok(page)
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn nav_class(active: bool) -> &'static str {
    if active {
        "nav-link active"
    } else {
        "nav-link"
    }
}

/// "Add User" is active only while drafting a new record; any other page
/// under `/users` marks "Users".
fn write_layout(
    out: &mut String,
    title: &str,
    path: &str,
    adding: bool,
    content: &str,
) -> std::fmt::Result {
    let browsing = !adding && path.starts_with(USERS_PATH);
    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav class="nav" data-testid="nav">
<a href="{USERS_PATH}" class="{users_class}" data-testid="nav-users">Users</a>
<a href="{EDIT_PATH}" class="{add_class}" data-testid="nav-add-user">Add User</a>
</nav>
<main>
{content}</main>
</body>
</html>
"#,
        title = escape_html(title),
        users_class = nav_class(browsing),
        add_class = nav_class(adding),
    )
}

fn render_list(out: &mut String, view: &ListView) -> std::fmt::Result {
    writeln!(out, r#"<div class="container">"#)?;
    writeln!(out, r#"<h1 data-testid="page-title">User List</h1>"#)?;
    writeln!(
        out,
        r#"<a href="{EDIT_PATH}" class="button" data-testid="add-user-button">Add User</a>"#
    )?;
    writeln!(out, r#"<ul class="user-list" data-testid="user-list">"#)?;
    for user in &view.users {
        writeln!(
            out,
            r#"<li data-testid="user-item">
<span data-testid="user-info">{name} - {email}</span>
<div class="user-actions">
<a href="{details}" class="button" data-testid="view-details-button">View Details</a>
<a href="{edit}" class="button" data-testid="edit-button">Edit</a>
<form action="{remove}" method="POST" style="display: inline;">
<button type="submit" class="button delete" data-testid="delete-button">Remove</button>
</form>
</div>
</li>"#,
            name = escape_html(&user.name),
            email = escape_html(&user.email),
            details = details_path(user.id),
            edit = edit_path(user.id),
            remove = remove_path(user.id),
        )?;
    }
    writeln!(out, "</ul>")?;
    writeln!(out, "</div>")
}

fn render_edit(out: &mut String, view: &EditView) -> std::fmt::Result {
    let user = &view.user;
    let heading = if user.is_new() { "Add User" } else { "Edit User" };
    let action = user.id.map_or_else(|| format!("{EDIT_PATH}/"), edit_path);

    writeln!(out, r#"<div class="container">"#)?;
    writeln!(out, r#"<h1 data-testid="page-title">{heading}</h1>"#)?;
    if let Some(error) = &view.error {
        writeln!(
            out,
            r#"<div class="error-message" data-testid="error-message">{}</div>"#,
            escape_html(error)
        )?;
    }
    writeln!(
        out,
        r#"<form action="{action}" method="POST" class="edit-form" data-testid="edit-form">
<div class="form-group">
<label for="name">Name:</label>
<input type="text" id="name" name="name" value="{name}" required data-testid="name-input">
</div>
<div class="form-group">
<label for="email">Email:</label>
<input type="email" id="email" name="email" value="{email}" required data-testid="email-input">
</div>
<div class="form-actions">
<button type="submit" class="button" data-testid="save-button">Save</button>
<a href="{USERS_PATH}" class="button back" data-testid="back-button">Back to List</a>
</div>
</form>"#,
        name = escape_html(&user.name),
        email = escape_html(&user.email),
    )?;
    writeln!(out, "</div>")
}

fn render_details(out: &mut String, view: &DetailsView) -> std::fmt::Result {
    let user = &view.user;
    writeln!(out, r#"<div class="container">"#)?;
    writeln!(out, r#"<h1 data-testid="page-title">User Details</h1>"#)?;
    writeln!(out, r#"<div class="user-details" data-testid="user-details">"#)?;
    detail_row(out, "user-id", "ID", &user.id.to_string())?;
    detail_row(out, "user-name", "Name", &user.name)?;
    detail_row(out, "user-email", "Email", &user.email)?;
    render_profile(out, user)?;
    writeln!(
        out,
        r#"<div class="actions">
<a href="{edit}" class="button" data-testid="edit-button">Edit</a>
<form action="{remove}" method="POST" style="display: inline;">
<button type="submit" class="button delete" data-testid="delete-button">Delete</button>
</form>
<a href="{USERS_PATH}" class="button back" data-testid="back-button">Back to List</a>
</div>"#,
        edit = edit_path(user.id),
        remove = remove_path(user.id),
    )?;
    writeln!(out, "</div>")?;
    writeln!(out, "</div>")
}

fn detail_row(out: &mut String, test_id: &str, label: &str, value: &str) -> std::fmt::Result {
    writeln!(
        out,
        r#"<div class="detail-row" data-testid="{test_id}">
<label>{label}:</label>
<span>{}</span>
</div>"#,
        escape_html(value)
    )
}

fn render_profile(out: &mut String, user: &User) -> std::fmt::Result {
    if let Some(avatar) = &user.avatar {
        writeln!(
            out,
            r#"<img class="avatar" src="{}" alt="{}" data-testid="user-avatar">"#,
            escape_html(avatar),
            escape_html(&user.name)
        )?;
    }
    if let Some(position) = &user.position {
        detail_row(out, "user-position", "Position", position)?;
    }
    if let Some(followers) = user.followers {
        detail_row(out, "user-followers", "Followers", &followers.to_string())?;
    }
    if let Some(following) = user.following {
        detail_row(out, "user-following", "Following", &following.to_string())?;
    }
    if user.team.is_empty() {
        return Ok(());
    }
    writeln!(out, r#"<ul class="team" data-testid="user-team">"#)?;
    for member in &user.team {
        writeln!(
            out,
            r#"<li data-testid="team-member"><img src="{}" alt=""> {}</li>"#,
            escape_html(&member.avatar),
            escape_html(&member.name)
        )?;
    }
    writeln!(out, "</ul>")
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
