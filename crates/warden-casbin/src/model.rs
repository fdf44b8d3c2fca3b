use casbin::prelude::DefaultModel;

// Permission-shaped requests: subject plus the two tokens of a
// `resource:action` permission.
const PERMISSION_MODEL: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && r.obj == p.obj && r.act == p.act
"#;

// Route-shaped requests: subject plus the request path and method, with
// keyMatch2 so policy objects may use `/blog/:id`-style patterns.
const ROUTE_MODEL: &str = r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && keyMatch2(r.obj, p.obj) && regexMatch(r.act, p.act)
"#;

pub fn permission_model_string() -> &'static str {
    PERMISSION_MODEL
}

pub async fn permission_model() -> DefaultModel {
    DefaultModel::from_str(PERMISSION_MODEL)
        .await
        .expect("permission model must be valid")
}

pub fn route_model_string() -> &'static str {
    ROUTE_MODEL
}

pub async fn route_model() -> DefaultModel {
    DefaultModel::from_str(ROUTE_MODEL)
        .await
        .expect("route model must be valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use casbin::Model;

    #[test]
    fn route_model_string_matches_on_path_patterns() {
        let model = route_model_string();
        assert!(model.contains("keyMatch2"));
        assert!(model.contains("request_definition"));
    }

    #[tokio::test]
    async fn both_models_build() {
        for model in [permission_model().await, route_model().await] {
            let data = model.get_model();
            assert!(data.contains_key("r"));
            assert!(data.contains_key("p"));
            assert!(data.contains_key("g"));
        }
    }
}
