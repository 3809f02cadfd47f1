#![allow(missing_docs)]
//! Shared helpers for route and view tests.

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::*;
pub(crate) use html::*;
pub(crate) use http::*;
