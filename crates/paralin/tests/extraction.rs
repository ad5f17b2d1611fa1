//! End-to-end extraction tests.
//!
//! These tests drive the builder the way a request handler would: build a
//! request, pull a handful of parameters out of it, and check both the
//! values and the failures.

use bytes::Bytes;
use http::{Method, StatusCode, Uri};
use paralin::{
    ConfigLoader, LengthUnit, Paralin, ParamError, ParamSource, Rejection, RequestContext,
};
use serde::Deserialize;
use std::fmt;

/// Error type of a hypothetical application.
#[derive(Debug)]
struct InvalidInput {
    message: String,
}

impl InvalidInput {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.message)
    }
}

impl std::error::Error for InvalidInput {}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Plan {
    Free,
    Pro,
}

#[derive(Debug, PartialEq, Deserialize)]
struct Address {
    city: String,
    zip: String,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn signup_request() -> RequestContext {
    RequestContext::builder()
        .method(Method::POST)
        .uri(Uri::from_static("/signup?plan=pro&ref=newsletter,spring"))
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-api-version", "3")
        .body(Bytes::from_static(
            b"email=alice%40example.com&age=34&nick=al&address=%7B%22city%22%3A%22Oslo%22%2C%22zip%22%3A%220150%22%7D",
        ))
        .build()
}

#[test]
fn test_signup_handler_flow() {
    init_tracing();
    let ctx = signup_request();

    let email = Paralin::with(&ctx)
        .form("email")
        .contains("@")
        .matches(r"[^@\s]+@[^@\s]+\.[a-z]+")
        .as_string()
        .unwrap();
    let age = Paralin::with(&ctx)
        .form("age")
        .verify(|v| v.chars().all(|c| c.is_ascii_digit()))
        .as_int()
        .unwrap();
    let plan: Plan = Paralin::with(&ctx).query("plan").as_enum().unwrap();
    let campaign = Paralin::with(&ctx)
        .query("ref")
        .split(",", 0)
        .as_string()
        .unwrap();
    let version = Paralin::with(&ctx).header("X-Api-Version").as_int().unwrap();
    let address: Address = Paralin::with(&ctx).form("address").as_json().unwrap();

    assert_eq!(email, "alice@example.com");
    assert_eq!(age, 34);
    assert_eq!(plan, Plan::Pro);
    assert_eq!(campaign, "newsletter");
    assert_eq!(version, 3);
    assert_eq!(
        address,
        Address {
            city: "Oslo".to_string(),
            zip: "0150".to_string()
        }
    );
}

#[test]
fn test_range_examples() {
    let ctx = RequestContext::builder()
        .uri(Uri::from_static("/?a=abc&b=ab"))
        .build();

    let err = Paralin::with(&ctx).query("a").range(1..3).as_string().unwrap_err();
    assert_eq!(err.rejection(), Some(Rejection::InvalidSize));
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(Paralin::with(&ctx).query("b").range(1..3).as_string().unwrap(), "ab");
}

#[test]
fn test_default_for_absent_key() {
    let ctx = RequestContext::builder().build();
    let user = Paralin::with(&ctx).query("user").default("guest").as_string();
    assert_eq!(user.unwrap(), "guest");
}

#[test]
fn test_split_after_trim() {
    let ctx = RequestContext::builder().header("x-list", " a,b,c ").build();
    let second = Paralin::with(&ctx).header("x-list").split(",", 1).as_string();
    assert_eq!(second.unwrap(), "b");
}

#[test]
fn test_enum_matching_ignores_case_and_padding() {
    let ctx = RequestContext::builder()
        .header("x-plan-a", "free")
        .header("x-plan-b", "Pro ")
        .header("x-plan-c", "enterprise")
        .build();

    assert_eq!(Paralin::with(&ctx).header("x-plan-a").as_enum::<Plan>().unwrap(), Plan::Free);
    assert_eq!(Paralin::with(&ctx).header("x-plan-b").as_enum::<Plan>().unwrap(), Plan::Pro);
    assert!(Paralin::with(&ctx).header("x-plan-c").as_enum::<Plan>().is_err());
    assert_eq!(Paralin::with(&ctx).header("x-plan-c").as_enum_opt::<Plan>(), None);
}

#[test]
fn test_custom_error_for_every_rejection() {
    init_tracing();
    let ctx = RequestContext::builder()
        .uri(Uri::from_static("/?blank=++&long=abcdef&word=hello"))
        .build();

    let cases = [
        ("absent", "missing"),
        ("blank", "empty"),
        ("long", "invalid-size"),
        ("word", "invalid-value"),
    ];

    for (key, expected) in cases {
        let err = Paralin::with(&ctx)
            .query(key)
            .range(0..6)
            .contains("z")
            .throw_as(InvalidInput::new)
            .as_string()
            .unwrap_err();

        let custom = err
            .downcast_ref::<InvalidInput>()
            .unwrap_or_else(|| panic!("expected InvalidInput for {key}, got {err:?}"));
        assert_eq!(custom.message, expected);
        assert_eq!(err.to_string(), format!("invalid input: {expected}"));
    }
}

#[test]
fn test_http_request_as_provider() {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri("/items?page=4")
        .header("authorization", "Bearer abc.def.ghi")
        .body(Bytes::new())
        .unwrap();

    let token = Paralin::with(&req)
        .header("authorization")
        .split(" ", 1)
        .as_string()
        .unwrap();
    let page = Paralin::with(&req).query("page").as_int().unwrap();

    assert_eq!(token, "abc.def.ghi");
    assert_eq!(page, 4);
}

#[test]
fn test_loaded_config_drives_extraction() {
    let config = ConfigLoader::new()
        .with_string("length_unit = \"utf16\"\nmax_form_body_bytes = 16", "toml")
        .unwrap()
        .load()
        .unwrap();
    assert_eq!(config.length_unit, LengthUnit::Utf16);

    let ctx = RequestContext::builder()
        .body("comment=this+body+is+too+long")
        .config(&config)
        .build();

    let err = Paralin::with_config(&ctx, &config)
        .form("comment")
        .as_string()
        .unwrap_err();
    assert_eq!(err.rejection(), Some(Rejection::Missing));
    assert_eq!(err.location(), Some(ParamSource::Form));
}

#[test]
fn test_utf16_length_on_query_value() {
    let config = paralin::ExtractConfig::builder()
        .length_unit(LengthUnit::Utf16)
        .build();
    let ctx = RequestContext::builder()
        .uri(Uri::from_static("/?c=%F0%9F%A6%80"))
        .build();

    assert_eq!(
        Paralin::with_config(&ctx, &config).query("c").length(2).as_string().unwrap(),
        "🦀"
    );
    assert!(Paralin::with(&ctx).query("c").length(2).as_string().is_err());
}

#[test]
fn test_invalid_pattern_surfaces_as_its_own_error() {
    let ctx = RequestContext::builder().header("x-id", "42").build();
    let err = Paralin::with(&ctx).header("x-id").matches("[0-9").as_string().unwrap_err();

    assert!(matches!(err, ParamError::InvalidPattern { .. }));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(Paralin::with(&ctx).header("x-id").matches("[0-9").as_string_opt(), None);
}
