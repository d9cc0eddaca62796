//! Seed keys: the ordered string material a pick is derived from.

use std::borrow::Cow;

/// Ordered seed material. Order is significant and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedKey(Vec<String>);

impl SeedKey {
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SeedKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A value usable as a seed component. Missing values seed as `""`.
pub trait SeedPart {
    fn seed_text(&self) -> Cow<'_, str>;
}

impl SeedPart for str {
    fn seed_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl SeedPart for String {
    fn seed_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: SeedPart + ?Sized> SeedPart for &T {
    fn seed_text(&self) -> Cow<'_, str> {
        (**self).seed_text()
    }
}

impl<T: SeedPart> SeedPart for Option<T> {
    fn seed_text(&self) -> Cow<'_, str> {
        match self {
            Some(value) => value.seed_text(),
            None => Cow::Borrowed(""),
        }
    }
}

macro_rules! numeric_seed_part {
    ($($ty:ty),*) => {
        $(
            impl SeedPart for $ty {
                fn seed_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

numeric_seed_part!(u32, u64, usize, i32, i64);

/// Concatenate `parts` with `facet` appended last.
pub fn build_seed_key<I>(parts: I, facet: &str) -> SeedKey
where
    I: IntoIterator,
    I::Item: SeedPart,
{
    let mut key: Vec<String> = parts
        .into_iter()
        .map(|part| part.seed_text().into_owned())
        .collect();
    key.push(facet.to_string());
    SeedKey(key)
}
