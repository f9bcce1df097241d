use std::borrow::Cow;

/// Text transform applied before tokenizing, both at build time and at query time.
///
/// Implemented by [`Identity`], [`Lowercase`] and any `Fn(&str) -> String`.
pub trait Preprocessor: Send + Sync {
    fn preprocess<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Leaves the text untouched (default).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

impl Preprocessor for Identity {
    #[inline]
    fn preprocess<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Unicode lowercase.
/// Borrows when the text has no uppercase char.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lowercase;

impl Preprocessor for Lowercase {
    fn preprocess<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if text.chars().any(char::is_uppercase) {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }
}

impl<F> Preprocessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    #[inline]
    fn preprocess<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_borrows() {
        assert!(matches!(Identity.preprocess("Foo"), Cow::Borrowed("Foo")));
    }

    #[test]
    fn lowercase_only_allocates_when_needed() {
        assert!(matches!(Lowercase.preprocess("foo-bar"), Cow::Borrowed(_)));
        assert_eq!(Lowercase.preprocess("Foo-BAR"), "foo-bar");
    }

    #[test]
    fn closures_are_preprocessors() {
        let strip = |text: &str| text.replace(' ', "");
        assert_eq!(strip.preprocess("a b c"), "abc");
    }
}
