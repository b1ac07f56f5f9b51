//! JSON text emission.
//!
//! Emission is a single pass: the walker reads the object graph and feeds a
//! [`Sink`], either the text writer below or the canonical value builder of
//! [`canonical`](crate::canonical). No intermediate tree is built for text.

mod walker;
mod writer;

use alloc::string::String;
use alloc::vec;

use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use vc_reflect::Reflect;
use vc_reflect::ops::PrimitiveRef;

pub(crate) use walker::Walker;
pub(crate) use writer::format_date;

use crate::error::Result;
use crate::filter::MemberFilter;
use crate::settings::{Formatting, SerializeSettings};
use crate::value::Value;
use writer::JsonWriter;

/// Receiver of the events of a walk.
pub(crate) trait Sink {
    fn null(&mut self);
    fn primitive(&mut self, value: PrimitiveRef<'_>);
    /// A canonical value, written verbatim.
    fn value(&mut self, value: &Value);
    fn begin_object(&mut self);
    fn key(&mut self, key: &str);
    fn end_object(&mut self);
    fn begin_array(&mut self);
    fn end_array(&mut self);
}

/// Serializes an object graph to JSON text.
///
/// # Examples
///
/// ```
/// use vc_json::{SerializeSettings, to_json_string};
/// use vc_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct Greeting {
///     #[reflect(rename = "Value1")]
///     first: String,
///     #[reflect(rename = "Value2")]
///     second: String,
/// }
///
/// let greeting = Greeting { first: "Hello".into(), second: "World".into() };
/// let text = to_json_string(&greeting, &SerializeSettings::DEFAULT).unwrap();
/// assert_eq!(text, r#"{"Value1":"Hello","Value2":"World"}"#);
/// ```
pub fn to_json_string(value: &dyn Reflect, settings: &SerializeSettings) -> Result<String> {
    emit(value, settings, None)
}

/// Like [`to_json_string`], consulting `filter` before every member, entry
/// and item.
pub fn to_json_string_with(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    filter: &dyn MemberFilter,
) -> Result<String> {
    emit(value, settings, Some(filter))
}

/// Appends the JSON text of `value` to `out`.
///
/// On error `out` is left untouched.
pub fn write_json(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    out: &mut String,
) -> Result<()> {
    out.push_str(&emit(value, settings, None)?);
    Ok(())
}

fn emit(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    filter: Option<&dyn MemberFilter>,
) -> Result<String> {
    match settings.formatting {
        Formatting::Compact => render(value, settings, filter, CompactFormatter),
        Formatting::Indented(width) => {
            let indent = vec![b' '; width];
            render(value, settings, filter, PrettyFormatter::with_indent(&indent))
        }
    }
}

fn render<F: Formatter>(
    value: &dyn Reflect,
    settings: &SerializeSettings,
    filter: Option<&dyn MemberFilter>,
    layout: F,
) -> Result<String> {
    let mut walker = Walker::new(settings, filter, JsonWriter::new(settings, layout));
    walker.walk(value, None)?;
    walker.into_sink().finish()
}
