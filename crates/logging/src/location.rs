//! crates/logging/src/location.rs
//! Source locations attached to records and context declarations.

use std::fmt;

/// File, function, and line of a call site.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Source file, as produced by `file!()`.
    pub file: &'static str,
    /// Path of the enclosing function.
    pub function: &'static str,
    /// Line number, as produced by `line!()`.
    pub line: u32,
}

impl SourceLocation {
    /// Creates a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }

    /// The empty location assigned to popped contexts and the root context.
    #[must_use]
    pub const fn none() -> Self {
        Self::new("", "", 0)
    }

    /// Location of the nearest caller not marked `#[track_caller]`.
    ///
    /// The function path is unknown on this route and left empty.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self::new(caller.file(), "", caller.line())
    }

    /// Reports whether this is the empty location.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.file.is_empty() && self.function.is_empty() && self.line == 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[doc(hidden)]
pub fn __trim_function_path(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__here").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path
}

/// Captures the [`SourceLocation`] of the macro invocation.
///
/// # Examples
///
/// ```
/// let here = logging::location!();
/// assert!(here.file.ends_with(".rs"));
/// assert!(here.line > 0);
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::SourceLocation::new(
            ::core::file!(),
            {
                fn __here() {}
                fn __type_name_of<T>(_: T) -> &'static str {
                    ::core::any::type_name::<T>()
                }
                $crate::location::__trim_function_path(__type_name_of(__here))
            },
            ::core::line!(),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        let none = SourceLocation::none();
        assert!(none.is_none());
        assert_eq!(none, SourceLocation::default());
    }

    #[test]
    fn macro_captures_file_line_and_function() {
        let here = crate::location!();
        assert_eq!(here.file, file!());
        assert_eq!(here.line, line!() - 2);
        assert!(
            here.function.ends_with("macro_captures_file_line_and_function"),
            "unexpected function path: {}",
            here.function
        );
        assert!(!here.is_none());
    }

    #[test]
    fn closures_report_enclosing_function() {
        let capture = || crate::location!();
        let here = capture();
        assert!(
            here.function.ends_with("closures_report_enclosing_function"),
            "unexpected function path: {}",
            here.function
        );
    }

    #[test]
    fn caller_reports_invocation_line() {
        let here = SourceLocation::caller();
        assert_eq!(here.file, file!());
        assert_eq!(here.line, line!() - 2);
        assert!(here.function.is_empty());
    }

    #[test]
    fn display_is_file_colon_line() {
        let loc = SourceLocation::new("src/main.rs", "main", 42);
        assert_eq!(loc.to_string(), "src/main.rs:42");
    }
}
