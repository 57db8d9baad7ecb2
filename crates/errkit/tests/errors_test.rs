//! Tests for single-predecessor errors: construction, rendering and lookup.

use errkit::{Error, KV, Kind, NO_FRAME, Opt};
use serde_json::json;
use std::error::Error as StdError;

#[derive(Debug, derive_more::Display)]
#[display("sentinel")]
struct Sentinel;

impl StdError for Sentinel {}

#[test]
fn new_has_no_predecessor() {
    let err = errkit::new!("first error");
    assert!(err.source().is_none());
    assert!(errkit::unwrap(&err).is_none());
}

#[test]
fn wrap_keeps_the_wrapped_error_as_predecessor() {
    let err = errkit::wrap!(errkit::new!("first error"));
    let inner = errkit::unwrap(&err).expect("wrapped error");
    assert_eq!(inner.to_string(), "first error");
    assert!(inner.downcast_ref::<Error>().is_some());
}

#[test]
fn wrap_without_message_renders_only_the_predecessor() {
    let err = errkit::wrap!(Sentinel);
    assert_eq!(err.to_string(), "sentinel");
    assert_eq!(err.message(), "");
}

#[test]
fn wrap_of_absent_error_is_absent() {
    let none = errkit::wrap_opt(None::<Error>, [Opt::from("msg"), Opt::from(Kind::new("k"))]);
    assert!(none.is_none());

    let some = errkit::wrap_opt(Some(Sentinel), [Opt::from("msg")]).expect("present error");
    assert_eq!(some.to_string(), "msg: sentinel");
}

#[test]
fn message_renders_with_predecessor_text() {
    let err = errkit::new!("wrap msg", Opt::source(std::io::Error::other("a std lib error")));
    assert_eq!(err.to_string(), "wrap msg: a std lib error");

    let err = errkit::wrap!(errkit::wrap!(errkit::new!("deep"), "middle"), "top");
    assert_eq!(err.to_string(), "top: middle: deep");
}

#[test]
fn later_message_option_overwrites() {
    let err = errkit::new!("first", "second");
    assert_eq!(err.to_string(), "second");
}

#[test]
fn rendering_is_idempotent() {
    let err = errkit::wrap!(errkit::new!("inner", KV::new("k", 1)), "outer");
    assert_eq!(err.to_string(), err.to_string());
    assert_eq!(format!("{err:#}"), format!("{err:#}"));
    assert_eq!(err.fields(), err.fields());
}

#[test]
fn quoted_rendering_has_no_stack_trace() {
    let err = errkit::wrap!(errkit::new!("inner msg"), "outer");
    assert_eq!(format!("{err:?}"), "\"outer: inner msg\"");
}

#[test]
fn verbose_rendering_without_frames() {
    let err = errkit::new!("plain", NO_FRAME);
    assert_eq!(format!("{err:#}"), "plain []");
}

#[test]
fn kind_matches_own_kind_only() {
    let kind = Kind::new("first");
    let err = errkit::new!("some error", kind.clone());
    assert!(err.is(&kind));
    assert!(kind.matches(&err));
    assert!(!Kind::new("second").matches(&err));

    let wrapped = errkit::wrap!(err);
    assert!(!kind.matches(&wrapped));
    assert!(errkit::is(&wrapped, &kind));
    assert!(!errkit::is(&wrapped, &Kind::new("second")));
}

#[test]
fn kind_matching_reaches_the_matching_node_by_stepping() {
    let kind = Kind::new("inner");
    let err = errkit::wrap!(errkit::wrap!(errkit::new!("e", kind.clone()), Kind::new("outer")));
    let matching = errkit::chain(&err).position(|e| kind.matches(e));
    assert_eq!(matching, Some(2));
}

#[test]
fn absent_kind_never_matches() {
    let err = errkit::new!("no kind");
    assert!(err.kind().is_none());
    assert!(!errkit::is(&err, &Kind::new("")));
    assert!(!errkit::is(&err, &Kind::new("k")));
}

#[test]
fn kind_of_returns_first_kind_on_chain() {
    let err = errkit::wrap!(errkit::new!("e", Kind::new("inner")));
    assert_eq!(errkit::kind_of(&err), Some(&Kind::new("inner")));

    let err = errkit::wrap!(errkit::new!("e", Kind::new("inner")), Kind::new("outer"));
    assert_eq!(errkit::kind_of(&err), Some(&Kind::new("outer")));
}

#[test]
fn find_recovers_foreign_types() {
    let err = errkit::wrap!(errkit::wrap!(Sentinel), "outer");
    assert!(errkit::find::<Sentinel>(&err).is_some());
    assert!(errkit::find::<std::io::Error>(&err).is_none());
}

#[test]
fn key_values_are_accessible() {
    #[derive(serde::Serialize)]
    struct Foo {
        i: i32,
    }

    let err = errkit::new!(
        "simple msg",
        errkit::kvs!(
            "bool" => true,
            "str" => "string",
            "float" => 2.5,
            "int" => 1,
            "foo" => serde_json::to_value(Foo { i: 3 }).expect("serializable"),
        )
    );

    assert_eq!(err.v("bool"), Some(&json!(true)));
    assert_eq!(err.v("str"), Some(&json!("string")));
    assert_eq!(err.v("float"), Some(&json!(2.5)));
    assert_eq!(err.v("int"), Some(&json!(1)));
    assert_eq!(err.v("foo"), Some(&json!({"i": 3})));
    assert_eq!(err.v("non existent"), None);
}

#[test]
fn outer_key_value_shadows_inner() {
    let err = errkit::wrap!(
        errkit::new!("m", KV::new("x", "inner")),
        KV::new("x", "outer")
    );
    assert_eq!(errkit::v(&err, "x"), Some(&json!("outer")));

    let inner = errkit::unwrap(&err).expect("wrapped");
    assert_eq!(errkit::v(inner, "x"), Some(&json!("inner")));
}

#[test]
fn duplicate_keys_are_kept() {
    let err = errkit::new!("m", KV::new("k", 1), KV::new("k", 2), NO_FRAME);
    assert_eq!(err.kvs().len(), 2);
    assert_eq!(err.v("k"), Some(&json!(1)));
}

#[test]
fn foreign_errors_have_no_fields() {
    assert!(errkit::fields(&Sentinel).is_none());
    assert!(errkit::stack_trace(&Sentinel).is_none());
    assert!(errkit::v(&Sentinel, "k").is_none());
}

#[test]
fn result_extension_wraps_errors() {
    let res: Result<u8, Sentinel> = Err(Sentinel);
    let err = errkit::ResultExt::wrap_err(res, [Opt::from("read")]).unwrap_err();
    assert_eq!(err.to_string(), "read: sentinel");

    let ok: Result<u8, Sentinel> = Ok(3);
    assert_eq!(errkit::ResultExt::wrap_err(ok, Vec::<Opt>::new()).ok(), Some(3));
}

#[test]
fn option_extension_builds_errors_for_missing_values() {
    let missing: Option<u8> = None;
    let line = line!() + 1;
    let err = errkit::OptionExt::ok_or_new(missing, "no port", [Opt::from(Kind::new("config"))])
        .unwrap_err();
    assert_eq!(err.to_string(), "no port");
    assert!(err.is(&Kind::new("config")));
    assert_eq!(*err.frame().expect("captured frame").line(), line);

    let present = Some(8080_u16);
    assert_eq!(
        errkit::OptionExt::ok_or_new(present, "no port", Vec::<Opt>::new()).ok(),
        Some(8080)
    );
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Error>();
}
