/// A closed list of labelled values with a defined fallback.
///
/// Lookups never fail: an unknown key resolves to [`LabelSet::FALLBACK`].
pub trait LabelSet: Sized + Copy + PartialEq + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];

    /// Value used for unknown or empty keys.
    const FALLBACK: Self;

    /// Stored form.
    fn key(&self) -> &'static str;

    /// Human-readable form.
    fn label(&self) -> &'static str;

    fn lookup(key: &str) -> Self {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.key().eq_ignore_ascii_case(key) || v.label().eq_ignore_ascii_case(key))
            .unwrap_or(Self::FALLBACK)
    }

    fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.key()).collect()
    }
}

/// Implements `From<String>`/`From<Self> for String` through [`LabelSet`],
/// for use with `#[serde(from = "String", into = "String")]`. `Default`
/// is the fallback, so a missing field decodes like an unknown one.
#[macro_export]
macro_rules! label_set_strings {
    ($ty:ty) => {
        impl From<String> for $ty {
            fn from(s: String) -> Self {
                <$ty as $crate::labels::LabelSet>::lookup(&s)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                <$ty as $crate::labels::LabelSet>::key(&v).to_string()
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                <$ty as $crate::labels::LabelSet>::FALLBACK
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<$ty as $crate::labels::LabelSet>::label(self))
            }
        }
    };
}
