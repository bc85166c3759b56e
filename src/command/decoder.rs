//! Command text decoder

use super::CommandRef;
use crate::error::MalformedCommand;

/// Split command text into its `domain.handler.action` reference.
///
/// Valid iff splitting on `.` yields exactly three non-empty segments; any
/// other arity never reaches the handler registry.
pub fn decode(text: &str) -> Result<CommandRef, MalformedCommand> {
    let parts: Vec<&str> = text.split('.').collect();

    match parts.as_slice() {
        [domain, handler, action]
            if !domain.is_empty() && !handler.is_empty() && !action.is_empty() =>
        {
            Ok(CommandRef {
                domain: (*domain).to_string(),
                handler: (*handler).to_string(),
                action: (*action).to_string(),
            })
        }
        _ => Err(MalformedCommand {
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_command() {
        let r = decode("light.switch.on").unwrap();
        assert_eq!(r.domain, "light");
        assert_eq!(r.handler, "switch");
        assert_eq!(r.action, "on");
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        assert!(decode("bad").is_err());
        assert!(decode("my.test").is_err());
        assert!(decode("a.b.c.d").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn test_decode_rejects_empty_segments() {
        assert!(decode("light..on").is_err());
        assert!(decode(".switch.on").is_err());
        assert!(decode("light.switch.").is_err());
    }

    #[test]
    fn test_decode_error_carries_text() {
        let err = decode("my.test").unwrap_err();
        assert_eq!(err.text, "my.test");
    }
}
