/// Fields of a form, in tab order.
pub trait Fields: Copy + PartialEq + 'static {
    /// Every field, in the order they're shown
    const FIELDS: &'static [Self];

    /// Fields whose contents shouldn't be shown
    const MASKED: &'static [Self];

    /// Position in `FIELDS`
    fn index(self) -> usize;

    /// What to call this field on screen
    fn label(self) -> &'static str;

    /// Should we hide what's typed?
    fn masked(self) -> bool {
        Self::MASKED.contains(&self)
    }

    /// Rotate through the options (e.g. with tab)
    fn next(self) -> Self {
        Self::FIELDS[(self.index() + 1) % Self::FIELDS.len()]
    }

    /// Rotate through the options in reverse (e.g. with shift-tab)
    fn prev(self) -> Self {
        Self::FIELDS[(self.index() + Self::FIELDS.len() - 1) % Self::FIELDS.len()]
    }
}

/// Create an enum of form fields that can be iterated over with tab/shift-tab,
/// each with a label to show above its input.
#[macro_export]
macro_rules! form_fields {
    ($name:ident { $($variant:ident => $label:literal),* $(,)? } $(, masked: [$($masked:ident),*])?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::form_fields::Fields for $name {
            const FIELDS: &'static [$name] = &[
                $($name::$variant),*
            ];

            const MASKED: &'static [$name] = &[
                $($($name::$masked),*)?
            ];

            fn index(self) -> usize {
                self as usize
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),*
                }
            }
        }
    };
}
