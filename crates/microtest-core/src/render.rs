//! Textual rendering of values streamed into failure messages.
//!
//! Rendering is dispatched per type with explicit rules instead of funneling
//! everything through one generic formatter: booleans print `true`/`false`,
//! integers print in decimal, floats use Rust's shortest round-trip `Display`
//! form, strings pass through verbatim.

/// A value that can be appended to a failure message.
pub trait MessageValue {
    /// Render the value as diagnostic text.
    fn render(&self) -> String;
}

impl MessageValue for bool {
    fn render(&self) -> String {
        if *self { "true" } else { "false" }.to_owned()
    }
}

macro_rules! impl_message_value_via_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MessageValue for $ty {
                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

// Decimal for integers; shortest round-trip representation for floats.
impl_message_value_via_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);

impl MessageValue for str {
    fn render(&self) -> String {
        self.to_owned()
    }
}

impl MessageValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl<T: MessageValue + ?Sized> MessageValue for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}
