//! Browser tests. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Element, Event, HtmlElement};

use utkit::bindings::{self, UtNamespace};
use utkit::core::DomError;
use utkit::models::{AwaitOutcome, ElementOptions};
use utkit::ElementExt;
use utkit::utils::{Deadline, cookie, css, dom, helpers, with_deadline};

wasm_bindgen_test_configure!(run_in_browser);

fn div() -> Element {
    dom::document().unwrap().create_element("div").unwrap()
}

fn attach(element: &Element) {
    dom::document()
        .unwrap()
        .body()
        .unwrap()
        .append_child(element)
        .unwrap();
}

// =============================================================================
// Cookie
// =============================================================================

#[wasm_bindgen_test]
fn test_cookie_round_trip() {
    cookie::set_cookie("utkit_test", "v", 1.0, "").unwrap();
    assert_eq!(cookie::get_cookie("utkit_test").unwrap(), "v");
    assert!(cookie::check_cookie("utkit_test", None).unwrap());
    assert!(cookie::check_cookie("utkit_test", Some("v")).unwrap());
    assert!(!cookie::check_cookie("utkit_test", Some("w")).unwrap());
    assert_eq!(
        cookie::get_cookies().unwrap().get("utkit_test").map(String::as_str),
        Some("v")
    );

    cookie::delete_cookie("utkit_test", "").unwrap();
    assert_eq!(cookie::get_cookie("utkit_test").unwrap(), "");
    assert!(!cookie::check_cookie("utkit_test", None).unwrap());
}

// =============================================================================
// Classes and Elements
// =============================================================================

#[wasm_bindgen_test]
fn test_add_class_is_idempotent() {
    let element = div();
    dom::add_class(&element, "a  b").unwrap();
    dom::add_class(&element, "a").unwrap();
    assert_eq!(element.class_list().length(), 2);

    assert!(!dom::toggle_class(&element, "a").unwrap());
    assert!(!dom::has_class(&element, "a").unwrap());
    assert!(dom::has_class(&element, "b").unwrap());

    dom::remove_class(&element, "b missing").unwrap();
    assert_eq!(element.class_list().length(), 0);
}

#[wasm_bindgen_test]
fn test_create_element_applies_options() {
    let parent = div();
    let options = ElementOptions::new()
        .id("card")
        .classes("card active")
        .style("color", "red")
        .html("<span>hi</span>")
        .attribute("role", "note")
        .data("userId", "7")
        .target(parent.clone());

    let element = dom::create_element("section", options).unwrap();
    assert_eq!(element.id(), "card");
    assert_eq!(element.class_name(), "card active");
    assert_eq!(element.get_attribute("role").as_deref(), Some("note"));
    assert_eq!(element.get_attribute("data-user-id").as_deref(), Some("7"));
    assert_eq!(element.inner_html(), "<span>hi</span>");
    let html: &HtmlElement = element.unchecked_ref();
    assert_eq!(html.style().get_property_value("color").unwrap(), "red");
    assert_eq!(parent.first_element_child(), Some(element));
}

#[wasm_bindgen_test]
fn test_html_object_wraps_siblings() {
    let single = dom::html_object("<p>a</p>").unwrap().unwrap();
    assert_eq!(single.tag_name(), "P");

    let wrapped = dom::html_object("<p>a</p><p>b</p>").unwrap().unwrap();
    assert_eq!(wrapped.tag_name(), "DIV");
    assert_eq!(wrapped.child_element_count(), 2);
}

#[wasm_bindgen_test]
fn test_invalid_selector_is_reported() {
    let err = dom::el("div[").unwrap_err();
    assert!(matches!(err, DomError::InvalidSelector { .. }));
}

#[wasm_bindgen_test]
fn test_element_scoped_queries() {
    let list = div();
    list.set_inner_html("<li class='x'>1</li><li>2</li><li class='x'>3</li>");

    assert_eq!(list.els("li").unwrap().len(), 3);
    assert_eq!(list.els(".x").unwrap().len(), 2);
    assert_eq!(list.el(".x").unwrap().map(|li| li.text_content()), Some(Some("1".into())));
    assert!(list.el("p").unwrap().is_none());
}

#[wasm_bindgen_test]
fn test_kill_me_and_kill_kids() {
    let parent = div();
    parent.set_inner_html("<i></i><b></b>");
    attach(&parent);

    dom::kill_kids(&parent).unwrap();
    assert_eq!(parent.child_element_count(), 0);

    dom::kill_me(&parent).unwrap();
    assert!(parent.parent_node().is_none());
}

// =============================================================================
// Events
// =============================================================================

#[wasm_bindgen_test]
fn test_listeners_clear_detaches() {
    let element = div();
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();

    let mut listeners =
        dom::add_events(&element, [("click", move |_: Event| counter.set(counter.get() + 1))])
            .unwrap();
    assert_eq!(listeners.len(), 1);

    let html: &HtmlElement = element.unchecked_ref();
    html.click();
    assert_eq!(clicks.get(), 1);

    listeners.clear();
    assert!(listeners.is_empty());
    html.click();
    assert_eq!(clicks.get(), 1);
}

// =============================================================================
// CSS
// =============================================================================

#[wasm_bindgen_test]
fn test_css_var_round_trip() {
    css::set_css_var("--utkit-gap", "12px", None).unwrap();
    let root = dom::document().unwrap().document_element().unwrap();

    let value = css::get_css_var("--utkit-gap", Some(&root)).unwrap();
    assert_eq!(value.number(), Some(12.0));
    assert_eq!(value.computed_value(), Some(12.0));
    assert!(value.absolute);
}

// =============================================================================
// Location
// =============================================================================

#[wasm_bindgen_test]
fn test_location_params_from_strings() {
    let hash = dom::location_hash(Some("#tab=2&open")).unwrap();
    assert_eq!(hash.get("tab"), Some(&Some("2".to_string())));
    assert_eq!(hash.get("open"), Some(&None));

    let search = dom::location_search(Some("?q=rust&page=3")).unwrap();
    assert_eq!(search.get("q"), Some(&Some("rust".to_string())));
    assert_eq!(search.len(), 2);
}

// =============================================================================
// Waiting
// =============================================================================

#[wasm_bindgen_test]
async fn test_await_ms_and_deadline() {
    helpers::await_ms(5).await;

    let never = Promise::new(&mut |_, _| {});
    assert!(matches!(with_deadline(never, 10).await, Deadline::Expired));

    let ready = Promise::resolve(&JsValue::from_f64(1.0));
    match with_deadline(ready, 1000).await {
        Deadline::Resolved(value) => assert_eq!(value.as_f64(), Some(1.0)),
        other => panic!("unexpected deadline outcome {other:?}"),
    }
}

#[wasm_bindgen_test]
async fn test_deadline_keeps_undefined_resolution() {
    let ready = Promise::resolve(&JsValue::UNDEFINED);
    match with_deadline(ready, 1000).await {
        Deadline::Resolved(value) => assert!(value.is_undefined()),
        other => panic!("undefined resolution reported as {other:?}"),
    }

    let failed = Promise::reject(&JsValue::from_str("nope"));
    assert!(matches!(with_deadline(failed, 1000).await, Deadline::Rejected(_)));
}

#[wasm_bindgen_test]
async fn test_await_event_outcomes() {
    let element = div();
    let outcome = helpers::await_event(&element, "never-fired", 10).await;
    assert!(outcome.is_timeout());

    let target = element.clone();
    let _pending = Timeout::new(5, move || {
        let _ = target.dispatch_event(&Event::new("ping").unwrap());
    });
    match helpers::await_event(&element, "ping", 1000).await {
        AwaitOutcome::Event(event) => assert_eq!(event.type_(), "ping"),
        AwaitOutcome::Timeout => panic!("event was not observed"),
    }
}

// =============================================================================
// Bindings
// =============================================================================

#[wasm_bindgen_test]
fn test_namespace_selection() {
    let ns = UtNamespace::new(JsValue::from_str("data")).unwrap();
    assert_eq!(ns.modules(), vec!["data".to_string()]);
    assert!(ns.is_loaded("data").unwrap());
    assert!(!ns.is_loaded("dom").unwrap());
    assert_eq!(ns.version(), vec![3, 0, 0]);

    let all = UtNamespace::new(JsValue::UNDEFINED).unwrap();
    assert!(all.is_loaded("helpers").unwrap());
}

#[wasm_bindgen_test]
fn test_parse_css_color_binding() {
    assert_eq!(bindings::parse_css_color("teal"), JsValue::FALSE);
    let parsed: js_sys::Array = bindings::parse_css_color("#ff0000").unchecked_into();
    assert_eq!(parsed.length(), 4);
    assert_eq!(parsed.get(0).as_f64(), Some(255.0));
    assert_eq!(parsed.get(3).as_f64(), Some(1.0));
}

#[wasm_bindgen_test]
fn test_lookup_bindings() {
    let users = js_sys::JSON::parse(
        r#"[{"id":1,"name":"Ann","team":{"id":"a"}},{"id":2,"name":"Jane","team":{"id":"b"}}]"#,
    )
    .unwrap();
    let found = bindings::item_by_prop(users.clone(), "id", JsValue::from_f64(2.0)).unwrap();
    assert_eq!(
        js_sys::Reflect::get(&found, &"name".into()).unwrap().as_string().as_deref(),
        Some("Jane")
    );
    assert!(bindings::item_by_prop(users, "id", JsValue::from_f64(9.0)).unwrap().is_undefined());

    let teams =
        js_sys::JSON::parse(r#"{"x":{"team":{"id":"a"}},"y":{"team":{"id":"b"}}}"#).unwrap();
    assert_eq!(
        bindings::key_by_deep_value(teams, "team.id", JsValue::from_str("b")).unwrap(),
        Some("y".to_string())
    );

    assert!(bindings::random_index(3) < 3);
    assert_eq!(bindings::random_index(0), 0);
}

#[wasm_bindgen_test]
fn test_jclone_is_a_deep_copy() {
    let original = js_sys::JSON::parse(r#"{"a":{"b":[1,2]}}"#).unwrap();
    let copy = bindings::jclone(original.clone()).unwrap();
    assert_ne!(copy, original);
    assert_eq!(
        js_sys::JSON::stringify(&copy).unwrap(),
        js_sys::JSON::stringify(&original).unwrap()
    );
}

#[wasm_bindgen_test]
fn test_hit_rect_binding() {
    assert!(bindings::hit_rect(vec![0.0, 0.0, 10.0, 10.0], 5.0, 5.0).unwrap());
    assert!(!bindings::hit_rect(vec![0.0, 0.0, 10.0, 10.0], 10.0, 5.0).unwrap());
    assert!(bindings::hit_rect(vec![0.0, 0.0], 1.0, 1.0).is_err());
}

#[wasm_bindgen_test]
fn test_namespace_helpers_follow_loaded_groups() {
    let data_only = UtNamespace::new(JsValue::from_str("data")).unwrap();
    assert_eq!(data_only.random_index(1).unwrap(), 0);
    assert!(data_only.hit_rect(vec![0.0, 0.0, 10.0, 10.0], 5.0, 5.0).is_err());

    let all = UtNamespace::new(JsValue::UNDEFINED).unwrap();
    assert!(all.hit_rect(vec![0.0, 0.0, 10.0, 10.0], 5.0, 5.0).unwrap());
}
