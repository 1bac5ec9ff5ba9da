//! Field-level constraint checks shared by every entity.
//!
//! Each check is independent; entities run them in field declaration order and
//! stop at the first violation.

use std::error::Error;
use std::fmt::{Display, Formatter};
use validator::ValidateEmail;

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 15;
pub const PASSWORD_MIN_CHARS: usize = 5;
pub const TWEET_MAX_CHARS: usize = 280;

/// A single field that failed its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmailEmpty,
    EmailInvalid,
    UsernameTooShort,
    UsernameTooLong,
    UsernameHasWhitespace,
    PasswordTooShort,
    FirstNameEmpty,
    LastNameEmpty,
    RoleNameEmpty,
    MessageEmpty,
    MessageTooLong,
}

impl ValidationError {
    /// Qualified name of the offending field, e.g. `user.username`.
    pub fn field(self) -> &'static str {
        match self {
            Self::EmailEmpty | Self::EmailInvalid => "user.email",
            Self::UsernameTooShort | Self::UsernameTooLong | Self::UsernameHasWhitespace => {
                "user.username"
            }
            Self::PasswordTooShort => "user.password",
            Self::FirstNameEmpty => "user.first_name",
            Self::LastNameEmpty => "user.last_name",
            Self::RoleNameEmpty => "role.role",
            Self::MessageEmpty | Self::MessageTooLong => "tweet.message",
        }
    }

    /// User-facing message for the violation.
    pub fn message(self) -> &'static str {
        match self {
            Self::EmailEmpty => "Please provide an email",
            Self::EmailInvalid => "Please provide a valid email",
            Self::UsernameTooShort => "Your username must be at least 3 characters",
            Self::UsernameTooLong => "Your username can't be more than 15 characters",
            Self::UsernameHasWhitespace => "Your username cannot have spaces",
            Self::PasswordTooShort => "Your password must have at least 5 characters",
            Self::FirstNameEmpty => "Please provide your first name",
            Self::LastNameEmpty => "Please provide your last name",
            Self::RoleNameEmpty => "A role name can't be blank",
            Self::MessageEmpty => "A tweet can't be blank",
            Self::MessageTooLong => "Tweet can't be more than 280 characters",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl Error for ValidationError {}

pub(crate) fn check_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }
    if !value.validate_email() {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Rejects any Unicode whitespace (`char::is_whitespace`), not only ASCII.
pub(crate) fn check_username(value: &str) -> Result<(), ValidationError> {
    let len = char_len(value);
    if len < USERNAME_MIN_CHARS {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > USERNAME_MAX_CHARS {
        return Err(ValidationError::UsernameTooLong);
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::UsernameHasWhitespace);
    }
    Ok(())
}

pub(crate) fn check_password(value: &str) -> Result<(), ValidationError> {
    if char_len(value) < PASSWORD_MIN_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub(crate) fn check_not_empty(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

pub(crate) fn check_message(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MessageEmpty);
    }
    if char_len(value) > TWEET_MAX_CHARS {
        return Err(ValidationError::MessageTooLong);
    }
    Ok(())
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::{check_email, check_message, check_username, ValidationError};

    #[test]
    fn email_syntax_accepts_common_shapes() {
        for email in ["a@b.com", "first.last+tag@mail.example.org"] {
            assert_eq!(check_email(email), Ok(()), "{email} should be accepted");
        }
    }

    #[test]
    fn email_syntax_rejects_malformed_values() {
        for email in ["not-an-email", "a@", "@b.com", "a b@c.com", "a@@b.com", "a@-b.com"] {
            assert_eq!(
                check_email(email),
                Err(ValidationError::EmailInvalid),
                "{email} should be rejected"
            );
        }
        assert_eq!(check_email(""), Err(ValidationError::EmailEmpty));
    }

    #[test]
    fn username_length_counts_chars_not_bytes() {
        assert_eq!(check_username("äöü"), Ok(()));
        assert_eq!(check_username("ñañ"), Ok(()));
        assert_eq!(
            check_username("ab\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}\u{00e9}"),
            Ok(())
        );
    }

    #[test]
    fn username_rejects_tabs_and_newlines() {
        assert_eq!(
            check_username("abc\tdef"),
            Err(ValidationError::UsernameHasWhitespace)
        );
        assert_eq!(
            check_username("abc\ndef"),
            Err(ValidationError::UsernameHasWhitespace)
        );
    }

    #[test]
    fn username_rejects_unicode_whitespace() {
        for username in ["ab\u{00a0}cd", "ab\u{2003}cd", "ab\u{3000}cd"] {
            assert_eq!(
                check_username(username),
                Err(ValidationError::UsernameHasWhitespace),
                "{username:?} should be rejected"
            );
        }
    }

    #[test]
    fn message_bounds_use_char_count() {
        let emoji_280 = "\u{1F600}".repeat(280);
        assert_eq!(check_message(&emoji_280), Ok(()));
        let emoji_281 = "\u{1F600}".repeat(281);
        assert_eq!(check_message(&emoji_281), Err(ValidationError::MessageTooLong));
    }

    #[test]
    fn display_names_field_and_message() {
        let rendered = ValidationError::UsernameTooShort.to_string();
        assert_eq!(
            rendered,
            "user.username: Your username must be at least 3 characters"
        );
    }
}
