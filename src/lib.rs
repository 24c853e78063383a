#![doc(html_root_url = "https://docs.rs/html-parts/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Value resolution for HTML templates with dynamic parts.
//!
//! Templates are written with [`html!`], which yields a [`TemplateResult`]. Rendering one into a [`dom::Node`] or
//! [`part::NodePart`] instantiates the template once per target and afterwards only updates its parts,
//! each through the first matching strategy of [`processor::process_part`].
//!
//! Everything is single-threaded: nodes, parts and the template and directive registries are thread-local.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod boolean;
pub mod directive;
pub mod dom;
pub mod event;
pub mod instance;
pub mod iterable;
pub mod nested;
pub mod parse;
pub mod part;
pub mod processor;
pub mod task;
pub mod template_result;
pub mod trusted_types;
pub mod unsafe_html;
pub mod until;
pub mod value;

mod error;

pub use error::TemplateError;
pub use template_result::{render, RenderTarget, TemplateResult};
pub use value::Value;
