//! Helpers for checking HTML forms in tests.

use scraper::{ElementRef, Html, Selector};

/// Get the first form in the document, panicking if there is none.
#[track_caller]
pub fn must_get_form(html: &Html) -> ElementRef<'_> {
    let selector = Selector::parse("form").expect("invalid selector");

    html.select(&selector).next().expect("no form found")
}

/// Assert that the form posts to `endpoint` via htmx.
#[track_caller]
pub fn assert_hx_endpoint(form: &ElementRef, endpoint: &str) {
    let hx_endpoint = form
        .attr("hx-post")
        .or_else(|| form.attr("hx-put"))
        .or_else(|| form.attr("hx-delete"))
        .expect("form has no htmx endpoint attribute");

    assert_eq!(hx_endpoint, endpoint);
}

/// Assert that the form contains an input with the given name and type.
#[track_caller]
pub fn assert_form_input(form: &ElementRef, name: &str, input_type: &str) {
    let selector = Selector::parse("input, select, textarea").expect("invalid selector");

    let found = form.select(&selector).any(|input| {
        input.attr("name") == Some(name)
            && (input.attr("type") == Some(input_type) || input.value().name() != "input")
    });

    assert!(
        found,
        "form does not contain an input named {name:?} of type {input_type:?}"
    );
}

/// Assert that the form contains an input with the given name, type and
/// value.
#[track_caller]
pub fn assert_form_input_with_value(form: &ElementRef, name: &str, input_type: &str, value: &str) {
    let selector = Selector::parse("input").expect("invalid selector");

    let found = form.select(&selector).any(|input| {
        input.attr("name") == Some(name)
            && input.attr("type") == Some(input_type)
            && input.attr("value") == Some(value)
    });

    assert!(
        found,
        "form does not contain an input named {name:?} of type {input_type:?} with value {value:?}"
    );
}

/// Assert that the form has a submit button.
#[track_caller]
pub fn assert_form_submit_button(form: &ElementRef) {
    let selector = Selector::parse("button[type=submit]").expect("invalid selector");

    assert!(
        form.select(&selector).next().is_some(),
        "form has no submit button"
    );
}

/// Assert that the form shows the given error message.
#[track_caller]
pub fn assert_form_error_message(form: &ElementRef, error_message: &str) {
    let selector = Selector::parse("p").expect("invalid selector");

    let found = form.select(&selector).any(|paragraph| {
        paragraph
            .text()
            .collect::<String>()
            .contains(error_message)
    });

    assert!(
        found,
        "form does not contain the error message {error_message:?}"
    );
}
