//! Version information

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[allow(dead_code)]
pub fn format_version_info() -> String {
    format!("converge {}", CURRENT_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_string() {
        assert!(!CURRENT_VERSION.is_empty());
        assert!(format_version_info().starts_with("converge "));
    }
}
