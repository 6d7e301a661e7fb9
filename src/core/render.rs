//! Value rendering
//!
//! Anything passed to the logger implements [`Loggable`]. The renderer turns
//! a slice of loggable values into the message body, consulting the
//! [`FormatterRegistry`] before any built-in rule.

use super::line_wrapper::LINE_SEP;
use super::pretty;
use super::throwable::Throwable;
use serde::Serialize;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Body used when a call carries no values
pub const NOTHING: &str = "log nothing";

/// Rendering of an absent value
pub const NULL: &str = "null";

/// Label of each value in a multi-value body
pub const ARGS: &str = "args";

/// How a single value should be pretty-printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    #[default]
    None,
    Json,
    Xml,
}

/// Upcast helper so registered formatters can match on the concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shape of a value as seen by the renderer
pub enum ValueKind<'a> {
    Null,
    Object,
    Text(&'a str),
    Array(Vec<&'a dyn Loggable>),
    Throwable(&'a Throwable),
    /// Transparent wrapper such as `Option` or `Box`
    Inner(&'a dyn Loggable),
}

/// A value that can appear in a log call
///
/// Values are matched against registered formatters by their runtime type,
/// so every implementor is `'static`. String literals work as they are, but a
/// borrowed `&str` does not: pass the owning `String`, a `Cow<'static, str>`,
/// or an owned copy instead.
///
/// ```
/// use rust_log_utils::prelude::*;
/// use std::borrow::Cow;
///
/// let logger = Logger::builder().silent_console().build()?;
/// let name = String::from("alice");
/// let borrowed: &str = name.as_str();
///
/// logger.d(&[&"literal"]);
/// logger.d(&[&name]);
/// logger.d(&[&borrowed.to_owned()]);
/// logger.d(&[&Cow::<'static, str>::Owned(borrowed.to_owned())]);
/// # Ok::<(), LoggerError>(())
/// ```
///
/// Types that derive `Serialize` can be wrapped in [`Json`] to be rendered
/// through their JSON form instead of `Debug`.
pub trait Loggable: AsAny + fmt::Debug {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Object
    }

    /// Default textual form
    fn to_plain(&self) -> String {
        format!("{:?}", self)
    }

    /// JSON form used under [`FormatHint::Json`], `None` if the value has none
    fn to_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
        None
    }
}

macro_rules! impl_loggable_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Loggable for $ty {
                fn to_plain(&self) -> String {
                    self.to_string()
                }

                fn to_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
                    Some(serde_json::to_value(self))
                }
            }
        )*
    };
}

impl_loggable_scalar!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char
);

impl Loggable for String {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Text(self)
    }

    fn to_plain(&self) -> String {
        self.clone()
    }
}

impl Loggable for &'static str {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Text(self)
    }

    fn to_plain(&self) -> String {
        (*self).to_string()
    }
}

impl Loggable for Cow<'static, str> {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Text(self)
    }

    fn to_plain(&self) -> String {
        self.to_string()
    }
}

impl<T: Loggable + 'static> Loggable for Option<T> {
    fn kind(&self) -> ValueKind<'_> {
        match self {
            Some(value) => ValueKind::Inner(value),
            None => ValueKind::Null,
        }
    }

    fn to_plain(&self) -> String {
        match self {
            Some(value) => value.to_plain(),
            None => NULL.to_string(),
        }
    }
}

impl<T: Loggable + 'static> Loggable for Box<T> {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Inner(&**self)
    }

    fn to_plain(&self) -> String {
        (**self).to_plain()
    }
}

impl Loggable for Box<dyn Loggable> {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Inner(&**self)
    }

    fn to_plain(&self) -> String {
        (**self).to_plain()
    }
}

impl<T: Loggable + 'static> Loggable for Vec<T> {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Array(self.iter().map(|v| v as &dyn Loggable).collect())
    }
}

impl<T: Loggable + 'static, const N: usize> Loggable for [T; N] {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Array(self.iter().map(|v| v as &dyn Loggable).collect())
    }
}

impl<T: Loggable + 'static> Loggable for &'static [T] {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Array(self.iter().map(|v| v as &dyn Loggable).collect())
    }
}

impl Loggable for serde_json::Value {
    fn kind(&self) -> ValueKind<'_> {
        match self {
            serde_json::Value::Null => ValueKind::Null,
            _ => ValueKind::Object,
        }
    }

    fn to_plain(&self) -> String {
        self.to_string()
    }

    fn to_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
        Some(Ok(self.clone()))
    }
}

impl Loggable for Throwable {
    fn kind(&self) -> ValueKind<'_> {
        ValueKind::Throwable(self)
    }

    fn to_plain(&self) -> String {
        self.full_stack_trace()
    }
}

/// Logs any `Serialize` value through its JSON form
///
/// ```
/// use rust_log_utils::prelude::*;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct Order {
///     id: u32,
///     paid: bool,
/// }
///
/// let logger = Logger::builder().silent_console().build()?;
/// logger.json(&Json(Order { id: 7, paid: true }));
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize + fmt::Debug + 'static> Loggable for Json<T> {
    fn to_plain(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }

    fn to_json(&self) -> Option<serde_json::Result<serde_json::Value>> {
        Some(serde_json::to_value(&self.0))
    }
}

type FormatFn = Arc<dyn Fn(&dyn Any) -> Option<String> + Send + Sync>;

/// User formatters keyed by the exact runtime type they accept
///
/// Registering a second formatter for the same type replaces the first.
#[derive(Clone, Default)]
pub struct FormatterRegistry {
    formatters: HashMap<TypeId, FormatFn>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T, F>(&mut self, formatter: F) -> &mut Self
    where
        T: Any,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let erased: FormatFn = Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&formatter));
        self.formatters.insert(TypeId::of::<T>(), erased);
        self
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.formatters.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Run the formatter registered for the value's own type
    ///
    /// A panicking formatter is reported and treated as absent.
    pub fn format(&self, value: &dyn Any) -> Option<String> {
        let formatter = self.formatters.get(&value.type_id())?;
        match panic::catch_unwind(AssertUnwindSafe(|| formatter(value))) {
            Ok(formatted) => formatted,
            Err(_) => {
                eprintln!("[LOGGER ERROR] Formatter panicked, falling back to default rendering");
                None
            }
        }
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formatters", &self.formatters.len())
            .finish()
    }
}

/// Turns loggable values into message bodies
#[derive(Debug, Clone, Copy)]
pub struct ValueRenderer<'a> {
    registry: &'a FormatterRegistry,
}

impl<'a> ValueRenderer<'a> {
    pub fn new(registry: &'a FormatterRegistry) -> Self {
        Self { registry }
    }

    /// Render the body of one log call
    ///
    /// A single value honours `hint`; several values are listed as
    /// `args[i] = ...` lines and always rendered without a hint.
    pub fn render_body(&self, values: &[&dyn Loggable], hint: FormatHint) -> String {
        let body = match values {
            [single] => self.render(*single, hint),
            _ => {
                let mut out = String::new();
                for (i, value) in values.iter().enumerate() {
                    out.push_str(&format!(
                        "{}[{}] = {}{}",
                        ARGS,
                        i,
                        self.render(*value, FormatHint::None),
                        LINE_SEP
                    ));
                }
                out
            }
        };

        if body.is_empty() {
            NOTHING.to_string()
        } else {
            body
        }
    }

    /// Render one value
    pub fn render(&self, value: &dyn Loggable, hint: FormatHint) -> String {
        if !self.registry.is_empty() {
            if let Some(formatted) = self.registry.format(value.as_any()) {
                return formatted;
            }
        }

        match value.kind() {
            ValueKind::Null => NULL.to_string(),
            ValueKind::Inner(inner) => self.render(inner, hint),
            ValueKind::Array(items) => self.render_array(&items),
            ValueKind::Throwable(throwable) => throwable.full_stack_trace(),
            ValueKind::Text(text) => match hint {
                FormatHint::None => text.to_string(),
                FormatHint::Json => pretty::format_json(text),
                FormatHint::Xml => pretty::format_xml(text),
            },
            ValueKind::Object => match hint {
                FormatHint::None => value.to_plain(),
                FormatHint::Json => match value.to_json() {
                    Some(Ok(json)) => {
                        serde_json::to_string_pretty(&json).unwrap_or_else(|_| value.to_plain())
                    }
                    _ => pretty::format_json(&value.to_plain()),
                },
                FormatHint::Xml => pretty::format_xml(&value.to_plain()),
            },
        }
    }

    fn render_array(&self, items: &[&dyn Loggable]) -> String {
        let rendered: Vec<String> = items
            .iter()
            .map(|item| self.render(*item, FormatHint::None))
            .collect();
        format!("[{}]", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Loggable for Point {}

    #[test]
    fn test_empty_body() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        assert_eq!(renderer.render_body(&[], FormatHint::None), NOTHING);
        assert_eq!(renderer.render_body(&[&""], FormatHint::None), NOTHING);
    }

    #[test]
    fn test_multiple_values() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        let none: Option<i32> = None;
        assert_eq!(
            renderer.render_body(&[&1, &"two", &none], FormatHint::None),
            "args[0] = 1\nargs[1] = two\nargs[2] = null\n"
        );
    }

    #[test]
    fn test_arrays_render_recursively() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        let nested = vec![vec![1, 2], vec![3]];
        assert_eq!(renderer.render(&nested, FormatHint::None), "[[1, 2], [3]]");
        assert_eq!(renderer.render(&[Some("a"), None], FormatHint::None), "[a, null]");
    }

    #[test]
    fn test_registered_formatter_wins() {
        let mut registry = FormatterRegistry::new();
        registry.register::<Point, _>(|p| format!("({}, {})", p.x, p.y));
        let renderer = ValueRenderer::new(&registry);

        let point = Point { x: 1, y: 2 };
        assert_eq!(renderer.render(&point, FormatHint::None), "(1, 2)");
        assert_eq!(renderer.render(&Some(Point { x: 3, y: 4 }), FormatHint::None), "(3, 4)");
        assert_eq!(renderer.render(&Box::new(Point { x: 5, y: 6 }), FormatHint::None), "(5, 6)");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = FormatterRegistry::new();
        registry
            .register::<Point, _>(|_| "first".to_string())
            .register::<Point, _>(|_| "second".to_string());
        assert_eq!(registry.len(), 1);
        let renderer = ValueRenderer::new(&registry);
        assert_eq!(renderer.render(&Point { x: 0, y: 0 }, FormatHint::None), "second");
    }

    #[test]
    fn test_panicking_formatter_falls_back() {
        let mut registry = FormatterRegistry::new();
        registry.register::<Point, _>(|_| panic!("formatter bug"));
        let renderer = ValueRenderer::new(&registry);
        assert_eq!(
            renderer.render(&Point { x: 1, y: 2 }, FormatHint::None),
            "Point { x: 1, y: 2 }"
        );
    }

    #[test]
    fn test_hints() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        assert_eq!(renderer.render(&r#"{"a":1}"#, FormatHint::Json), "{\n  \"a\": 1\n}");
        assert_eq!(
            renderer.render(&serde_json::json!({"k": "v"}), FormatHint::Json),
            "{\n  \"k\": \"v\"\n}"
        );
        assert_eq!(
            renderer.render(&"<a><b/></a>", FormatHint::Xml),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b/>\n</a>"
        );
        assert_eq!(renderer.render(&"not json", FormatHint::Json), "not json");
    }

    #[test]
    fn test_multi_value_ignores_hint() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        assert_eq!(
            renderer.render_body(&[&r#"{"a":1}"#, &2], FormatHint::Json),
            "args[0] = {\"a\":1}\nargs[1] = 2\n"
        );
    }

    #[derive(Debug, Serialize)]
    struct Order {
        id: u32,
        items: Vec<&'static str>,
    }

    #[test]
    fn test_json_wrapper_serializes() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        let order = Json(Order { id: 7, items: vec!["a", "b"] });

        assert_eq!(
            renderer.render(&order, FormatHint::Json),
            "{\n  \"id\": 7,\n  \"items\": [\n    \"a\",\n    \"b\"\n  ]\n}"
        );
        assert_eq!(renderer.render(&order, FormatHint::None), r#"{"id":7,"items":["a","b"]}"#);
        assert_eq!(
            renderer.render(&Point { x: 1, y: 2 }, FormatHint::Json),
            "Point { x: 1, y: 2 }"
        );
    }

    #[test]
    fn test_owned_strings_render_as_text() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        let name = String::from("alice");
        let borrowed: &str = name.as_str();
        let owned = borrowed.to_owned();
        let cow: Cow<'static, str> = Cow::Owned(borrowed.to_owned());
        assert_eq!(
            renderer.render_body(&[&name, &owned, &cow], FormatHint::None),
            "args[0] = alice\nargs[1] = alice\nargs[2] = alice\n"
        );
    }

    #[test]
    fn test_throwable_value() {
        let registry = FormatterRegistry::new();
        let renderer = ValueRenderer::new(&registry);
        let error = Throwable::new("B").with_cause(Throwable::new("A"));
        assert_eq!(renderer.render(&error, FormatHint::None), "A\n Caused by: B\n");
    }
}
