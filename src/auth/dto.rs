use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

/// Login form body. `redirect` is the path the gate bounced the visitor
/// away from, carried through the form.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
    pub redirect: Option<String>,
}
