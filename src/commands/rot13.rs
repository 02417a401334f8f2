//! The `rot13` command.

use async_trait::async_trait;

use crate::error::CommandError;
use crate::registry::{Arguments, CommandHandler};

/// Lowercases its `input` and rotates each ASCII letter by 13 places.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rot13;

impl Rot13 {
    /// Applies the transformation.
    #[must_use]
    pub fn transform(input: &str) -> String {
        input
            .chars()
            .flat_map(char::to_lowercase)
            .map(|c| {
                if c.is_ascii_lowercase() {
                    char::from((c as u8 - b'a' + 13) % 26 + b'a')
                } else {
                    c
                }
            })
            .collect()
    }
}

#[async_trait]
impl CommandHandler for Rot13 {
    async fn call(&self, arguments: Arguments) -> Result<String, CommandError> {
        Ok(Self::transform(arguments.get_str("input")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_letters() {
        assert_eq!(Rot13::transform("hello"), "uryyb");
        assert_eq!(Rot13::transform("uryyb"), "hello");
    }

    #[test]
    fn lowercases_first() {
        assert_eq!(Rot13::transform("Hello, World!"), "uryyb, jbeyq!");
    }

    #[test]
    fn leaves_other_characters() {
        assert_eq!(Rot13::transform("123 _-?"), "123 _-?");
        assert_eq!(Rot13::transform("café"), "pnsé");
    }

    #[tokio::test]
    async fn requires_input() {
        let err = Rot13.call(Arguments::new()).await.unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument { .. }));
    }
}
