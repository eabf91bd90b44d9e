/// Fixed diagnostic string handed back to the host
pub const GREETING: &str = "Hello from C++";

#[inline]
#[must_use]
pub fn greet() -> &'static str {
    GREETING
}
