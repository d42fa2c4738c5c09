use serde_json::Value;

use crate::error::{AppError, JsonKind};
use crate::search::SearchResultItem;

/// Checks the search body and every record in it.
///
/// All or nothing: the first bad record fails the whole batch.
pub fn validate_response(body: &Value) -> Result<Vec<SearchResultItem>, AppError> {
    if body.is_null() {
        return Err(AppError::data_miss("response"));
    }
    let Some(obj) = body.as_object() else {
        return Err(AppError::validate("response", body, JsonKind::Object));
    };
    let items = match obj.get("items") {
        None | Some(Value::Null) => return Err(AppError::data_miss("items")),
        Some(items) => items,
    };
    let Some(items) = items.as_array() else {
        return Err(AppError::validate("items", items, JsonKind::Array));
    };

    items.iter().map(validate_item).collect()
}

/// Extracts `name`, `owner.login` and `stargazers_count` from one record.
pub fn validate_item(item: &Value) -> Result<SearchResultItem, AppError> {
    let Some(obj) = item.as_object() else {
        return Err(AppError::validate("item", item, JsonKind::Object));
    };

    let name = present(obj.get("name"), "name")?;
    let owner = match obj.get("owner") {
        None | Some(Value::Null) => return Err(AppError::data_miss("owner.login")),
        Some(Value::Object(owner)) => present(owner.get("login"), "owner.login")?,
        Some(other) => return Err(AppError::validate("owner", other, JsonKind::Object)),
    };
    let stars = present(obj.get("stargazers_count"), "stargazers_count")?;

    let Some(name) = name.as_str() else {
        return Err(AppError::validate("name", name, JsonKind::String));
    };
    let Some(owner) = owner.as_str() else {
        return Err(AppError::validate("owner.login", owner, JsonKind::String));
    };
    let Some(star_count) = stars.as_u64() else {
        return Err(AppError::validate(
            "stargazers_count",
            stars,
            JsonKind::Number,
        ));
    };

    Ok(SearchResultItem::new(name, owner, star_count))
}

fn present<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a Value, AppError> {
    match value {
        None | Some(Value::Null) => Err(AppError::data_miss(field)),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn repo(name: &str, owner: &str, stars: u64) -> Value {
        json!({"name": name, "owner": {"login": owner}, "stargazers_count": stars, "private": false})
    }

    #[test]
    fn accepts_well_formed_batch() {
        let body = json!({"total_count": 2, "items": [repo("react", "facebook", 220000), repo("preact", "preactjs", 0)]});
        let items = validate_response(&body).unwrap();
        assert_eq!(
            items,
            vec![
                SearchResultItem::new("react", "facebook", 220000),
                SearchResultItem::new("preact", "preactjs", 0),
            ]
        );
    }

    #[test]
    fn empty_items_is_fine() {
        assert!(validate_response(&json!({"items": []})).unwrap().is_empty());
    }

    #[test]
    fn missing_response_or_items_is_data_miss() {
        assert_eq!(
            validate_response(&Value::Null).unwrap_err(),
            AppError::data_miss("response")
        );
        assert_eq!(
            validate_response(&json!({"total_count": 0})).unwrap_err(),
            AppError::data_miss("items")
        );
    }

    #[test]
    fn wrong_container_shapes_are_validate_errors() {
        let err = validate_response(&json!("nope")).unwrap_err();
        assert_eq!(err, AppError::validate("response", &json!("nope"), JsonKind::Object));

        let err = validate_response(&json!({"items": {"name": "x"}})).unwrap_err();
        match err {
            AppError::Validate {
                field,
                actual,
                expected,
                ..
            } => {
                assert_eq!(field, "items");
                assert_eq!(actual, JsonKind::Object);
                assert_eq!(expected, JsonKind::Array);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_star_count_rejects_whole_batch() {
        let body = json!({"items": [
            repo("react", "facebook", 1),
            {"name": "vue", "owner": {"login": "vuejs"}},
            repo("svelte", "sveltejs", 3),
        ]});
        let err = validate_response(&body).unwrap_err();
        assert_eq!(err, AppError::data_miss("stargazers_count"));
        assert_eq!(err.kind(), ErrorKind::DataMiss);
    }

    #[test]
    fn missing_owner_login_is_data_miss() {
        let body = json!({"name": "x", "owner": {}, "stargazers_count": 1});
        assert_eq!(
            validate_item(&body).unwrap_err(),
            AppError::data_miss("owner.login")
        );
        let body = json!({"name": "x", "stargazers_count": 1});
        assert_eq!(
            validate_item(&body).unwrap_err(),
            AppError::data_miss("owner.login")
        );
    }

    #[test]
    fn wrong_field_types_are_tagged() {
        let err = validate_item(&json!({"name": 7, "owner": {"login": "a"}, "stargazers_count": 1}))
            .unwrap_err();
        assert_eq!(err, AppError::validate("name", &json!(7), JsonKind::String));

        let err = validate_item(&json!({"name": "a", "owner": {"login": true}, "stargazers_count": 1}))
            .unwrap_err();
        assert_eq!(
            err,
            AppError::validate("owner.login", &json!(true), JsonKind::String)
        );

        let err = validate_item(&json!({"name": "a", "owner": {"login": "b"}, "stargazers_count": "12"}))
            .unwrap_err();
        assert_eq!(
            err,
            AppError::validate("stargazers_count", &json!("12"), JsonKind::Number)
        );
    }

    #[test]
    fn non_object_item_is_rejected() {
        let err = validate_response(&json!({"items": [42]})).unwrap_err();
        assert_eq!(err, AppError::validate("item", &json!(42), JsonKind::Object));
    }
}
