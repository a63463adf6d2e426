use dytrack_core::{Blueprint, Tracker};
use serde_json::{json, Value};

/// Blueprint of the canonical user example
///
/// Tracks `name`, `email`, `permission.id` and the `title` of each post.
#[allow(dead_code)]
pub fn user_blueprint() -> Blueprint {
    Blueprint::new()
        .leaf("name")
        .leaf("email")
        .nested("permission", Blueprint::new().leaf("id"))
        .list("posts", "id", Blueprint::new().leaf("title"))
}

/// Same blueprint, parsed from its object-literal JSON shape
#[allow(dead_code)]
pub fn user_blueprint_json() -> Value {
    json!({
        "name": true,
        "email": true,
        "permission": { "id": true },
        "posts": { "__list__": { "title": true } }
    })
}

/// A user matching [`user_blueprint`]
#[allow(dead_code)]
pub fn user(id: i64) -> Value {
    json!({
        "id": id,
        "name": "Jane Doe",
        "email": "jane@example.com",
        "permission": { "id": 1, "name": "Admin" },
        "posts": [ { "id": 1, "title": "Hi there" } ]
    })
}

/// Tracker over [`user_blueprint`]
#[allow(dead_code)]
pub fn user_tracker() -> Tracker {
    Tracker::new(user_blueprint()).unwrap()
}

/// Append an entity to a list field of `obj`
#[allow(dead_code)]
pub fn push(obj: &mut Value, field: &str, entity: Value) {
    obj[field].as_array_mut().unwrap().push(entity);
}
