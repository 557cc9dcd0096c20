//! Email Value Object
//!
//! メールアドレスは、アカウントの登録とログイン時の検索に使う識別属性。
//! セッションストアのキー（`refresh:<email>`）にも使われる。
//!
//! ## 設計方針
//! - 形式チェックのみ（到達可能性は検証しない）
//! - 前後の空白を除去し、canonical（正規形）は小文字
//!
//! ## 不変条件
//! - 長さ: 254文字以下（RFC 5321）
//! - ローカル部: 1〜64文字、空白を含まない
//! - ドメイン部: ドットを含み、英数字・`.`・`-` のみ、連続ドット禁止

use std::fmt;
use std::str::FromStr;

use crate::error::{AuthError, AuthResult};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Trimmed, lower-cased email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl AsRef<str>) -> AuthResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AuthError::InvalidEmail("Email cannot be empty".into()));
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AuthError::InvalidEmail(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }
        if !has_valid_shape(&email) {
            return Err(AuthError::InvalidEmail("Invalid email format".into()));
        }

        Ok(Self(email))
    }

    /// Trusted value read back from the account table
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

fn has_valid_shape(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH || local.chars().any(char::is_whitespace) {
        return false;
    }

    !domain.is_empty()
        && domain.contains('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !domain.starts_with(['.', '-'])
        && !domain.ends_with(['.', '-'])
        && !domain.contains("..")
}

impl FromStr for Email {
    type Err = AuthError;

    fn from_str(s: &str) -> AuthResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
