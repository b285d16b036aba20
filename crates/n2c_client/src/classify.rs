#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Failure,
}

/// Classify a completed exchange by its status code.
///
/// Only 4xx and 5xx are failures. 1xx, 3xx and out-of-range codes count as
/// success; redirects are not followed.
pub fn classify(status: u16) -> ResponseClass {
    match status / 100 {
        4 | 5 => ResponseClass::Failure,
        _ => ResponseClass::Success,
    }
}
